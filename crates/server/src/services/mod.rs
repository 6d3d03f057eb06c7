pub mod mailer;
pub mod runner;
