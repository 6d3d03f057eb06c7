use serde_json::{json, Value};

use crate::{
    config::Config,
    error::{AppError, Result},
};

/// Relays contact-form messages through a Brevo-compatible transactional
/// mail API.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    to: String,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            to: config.mail_to.clone(),
        }
    }

    fn payload(&self, name: &str, email: &str, reason: &str) -> Value {
        json!({
            "subject": format!("{name} sent you a message"),
            "htmlContent": format!("<html><body><h1>codehive:</h1><p>{reason}</p></body></html>"),
            "sender": { "name": name, "email": email },
            "to": [{ "email": self.to, "name": "codehive" }],
        })
    }

    pub async fn send_contact(&self, name: &str, email: &str, reason: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .json(&self.payload(name, email, reason))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reach mail API: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Mail API returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
