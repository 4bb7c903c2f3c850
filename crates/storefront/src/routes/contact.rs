//! Contact page and form submission.
//!
//! The form posts JSON to `/api/contact`, which forwards the message to the
//! shop inbox through Resend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use watchpost_core::Email;

use crate::filters;
use crate::middleware::form_rate_limiter;
use crate::services::ContactMessage;
use crate::state::AppState;

/// Longest accepted message body.
const MAX_MESSAGE_LEN: usize = 5_000;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub phone: &'static str,
    pub email_enabled: bool,
}

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactResponse {
    fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                success: false,
                message: Some(message.to_string()),
            }),
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl ContactForm {
    /// Validate the submission into a mailer message.
    fn into_message(self) -> Result<ContactMessage, &'static str> {
        let email =
            Email::parse(&self.email).map_err(|_| "Please enter a valid email address.")?;

        let name = self.name.trim();
        let message = self.message.trim();
        if name.is_empty() || message.is_empty() {
            return Err("Name and message are required.");
        }
        if message.len() > MAX_MESSAGE_LEN {
            return Err("Message is too long.");
        }

        Ok(ContactMessage {
            name: name.to_string(),
            email,
            phone: non_empty(self.phone.as_deref()),
            subject: non_empty(self.subject.as_deref())
                .unwrap_or_else(|| "General enquiry".to_string()),
            message: message.to_string(),
        })
    }
}

/// Display the contact page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    ContactTemplate {
        phone: "(555) 014-2290",
        email_enabled: state.mailer().is_some(),
    }
}

/// Submit the contact form.
///
/// POST /api/contact
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> impl IntoResponse {
    let message = match form.into_message() {
        Ok(message) => message,
        Err(reason) => return ContactResponse::failure(StatusCode::BAD_REQUEST, reason),
    };

    let Some(mailer) = state.mailer() else {
        tracing::error!("Mailer not configured, dropping contact message");
        return ContactResponse::failure(
            StatusCode::SERVICE_UNAVAILABLE,
            "Email is temporarily unavailable. Please call us instead.",
        );
    };

    match mailer.send_contact(&message).await {
        Ok(id) => {
            tracing::info!(email_id = %id, email_domain = %message.email.domain(), "Contact message sent");
            (
                StatusCode::OK,
                Json(ContactResponse {
                    success: true,
                    message: None,
                }),
            )
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Failed to send contact message");
            ContactResponse::failure(
                StatusCode::BAD_GATEWAY,
                "Something went wrong. Please try again.",
            )
        }
    }
}

/// Create the contact routes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/contact", get(show)).route(
        "/api/contact",
        post(submit).layer(form_rate_limiter()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("  ".to_string()),
            subject: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_form_is_normalized() {
        let message = form(" Dana ", "Dana@Example.com", " Need 4 cameras ")
            .into_message()
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(message.name, "Dana");
        assert_eq!(message.phone, None);
        assert_eq!(message.subject, "General enquiry");
        assert_eq!(message.message, "Need 4 cameras");
    }

    #[test]
    fn test_invalid_email_rejected() {
        assert!(form("Dana", "not-an-email", "hi").into_message().is_err());
    }

    #[test]
    fn test_blank_message_rejected() {
        assert_eq!(
            form("Dana", "dana@example.com", "   ").into_message().err(),
            Some("Name and message are required.")
        );
    }
}
