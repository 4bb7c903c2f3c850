//! Transactional email via the Resend API.
//!
//! Sends contact-form messages and new-order alerts to the shop inbox.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use watchpost_core::{Email, OrderReceipt, ShippingDetails};

use crate::config::MailerConfig;
use crate::zoho::OrderLine;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build a header.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A message submitted through the contact form.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Resend API client.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    endpoint: String,
    from_address: String,
    shop_address: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

impl Mailer {
    /// Create a new mailer.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &MailerConfig) -> Result<Self, MailerError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| MailerError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", config.api_url),
            from_address: config.from_address.clone(),
            shop_address: config.shop_address.clone(),
        })
    }

    async fn send(
        &self,
        subject: String,
        text: String,
        reply_to: Option<&str>,
    ) -> Result<String, MailerError> {
        let body = SendRequest {
            from: &self.from_address,
            to: [&self.shop_address],
            subject,
            text,
            reply_to,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendResponse = response.json().await?;
        debug!(email_id = %sent.id, "Email sent");
        Ok(sent.id)
    }

    /// Forward a contact-form message to the shop inbox.
    ///
    /// # Errors
    ///
    /// Returns error if Resend rejects the message.
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<String, MailerError> {
        let mut text = format!(
            "Name: {}\nEmail: {}\n",
            message.name, message.email
        );
        if let Some(phone) = &message.phone {
            text.push_str(&format!("Phone: {phone}\n"));
        }
        text.push('\n');
        text.push_str(&message.message);

        self.send(
            format!("Website enquiry: {}", message.subject),
            text,
            Some(message.email.as_str()),
        )
        .await
    }

    /// Notify the shop of a new order.
    ///
    /// # Errors
    ///
    /// Returns error if Resend rejects the message.
    #[instrument(skip_all, fields(order_number = %receipt.order_number))]
    pub async fn send_order_alert(
        &self,
        receipt: &OrderReceipt,
        line: &OrderLine,
        shipping: &ShippingDetails,
        email: &Email,
    ) -> Result<String, MailerError> {
        let total = receipt
            .total
            .unwrap_or_else(|| line.rate.times(line.quantity));
        let mut text = format!(
            "Order {number} ({status})\n\n{qty} x {name} @ {rate}\nTotal: {total}\n\n\
             Ship to:\n{full_name}\n{address}\n{city}, {state} {postal}\n\n\
             Customer email: {email}\nPhone: {phone}\n",
            number = receipt.order_number,
            status = receipt.status,
            qty = line.quantity,
            name = line.name,
            rate = line.rate,
            full_name = shipping.full_name(),
            address = shipping.address,
            city = shipping.city,
            state = shipping.state,
            postal = shipping.postal_code,
            phone = shipping.phone,
        );
        if let Some(notes) = &shipping.notes {
            text.push_str(&format!("\nNotes:\n{notes}\n"));
        }

        self.send(
            format!("New order {}", receipt.order_number),
            text,
            Some(email.as_str()),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::HeaderMap as AxumHeaders;
    use axum::routing::post;
    use axum::{Json, Router};
    use secrecy::SecretString;
    use serde_json::{Value, json};

    use super::*;

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn capture(
        State(captured): State<Captured>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        captured.lock().unwrap().push((auth, body));
        Json(json!({"id": "email-1"}))
    }

    #[tokio::test]
    async fn test_send_contact() {
        let captured: Captured = Arc::default();
        let router = Router::new()
            .route("/emails", post(capture))
            .with_state(Arc::clone(&captured));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let mailer = Mailer::new(&MailerConfig {
            api_url: format!("http://{addr}"),
            api_key: SecretString::from("re_test"),
            from_address: "site@watchpost.example".to_string(),
            shop_address: "shop@watchpost.example".to_string(),
        })
        .unwrap();

        let id = mailer
            .send_contact(&ContactMessage {
                name: "Dana Reyes".to_string(),
                email: Email::parse("dana@example.com").unwrap(),
                phone: None,
                subject: "Quote".to_string(),
                message: "Four cameras for a warehouse.".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(id, "email-1");

        let sent = captured.lock().unwrap();
        let (auth, body) = &sent[0];
        assert_eq!(auth.as_deref(), Some("Bearer re_test"));
        assert_eq!(body["to"][0], "shop@watchpost.example");
        assert_eq!(body["reply_to"], "dana@example.com");
        assert_eq!(body["subject"], "Website enquiry: Quote");
        assert!(body["text"].as_str().unwrap().contains("warehouse"));
    }
}
