pub mod contact;
pub mod graphql;
pub mod run;
