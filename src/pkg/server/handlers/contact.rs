use std::path::Path;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use standard_error::{Interpolate, StandardError};

use crate::{
    pkg::{
        internal::{
            email::{self, acknowledgement, notification, OutgoingFile},
            scratch,
        },
        server::state::AppState,
    },
    prelude::Result,
};

#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct Submission {
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub resume: UploadedFile,
}

/// Every failure is caught here and answered with a generic body; the full
/// error only reaches the server log.
pub async fn submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Json<SubmitResponse>) {
    match process(&state, multipart).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SubmitResponse {
                success: true,
                message: "Form submitted successfully".into(),
            }),
        ),
        Err(err) => {
            tracing::error!("error processing contact submission: {:?}", &err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse {
                    success: false,
                    message: "Failed to submit form".into(),
                }),
            )
        }
    }
}

async fn process(state: &AppState, multipart: Multipart) -> Result<()> {
    scratch::ensure_dir(&state.contact.scratch_dir).await?;
    let submission = parse_submission(multipart).await?;
    let staged = scratch::stage(
        &state.contact.scratch_dir,
        &submission.resume.filename,
        &submission.resume.bytes,
    )
    .await?;
    if let Err(err) = deliver(state, &submission, &staged).await {
        if let Err(cleanup) = scratch::discard(&staged).await {
            tracing::warn!(
                "could not remove staged upload {}: {:?}",
                staged.display(),
                cleanup
            );
        }
        return Err(err);
    }
    scratch::discard(&staged).await?;
    Ok(())
}

async fn parse_submission(mut multipart: Multipart) -> Result<Submission> {
    let mut name = String::new();
    let mut email = String::new();
    let mut service = String::new();
    let mut message = String::new();
    let mut resume: Option<UploadedFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| StandardError::new("CONTACT-001").interpolate_err(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("");
        match field_name {
            "name" => {
                name = field
                    .text()
                    .await
                    .map_err(|e| StandardError::new("CONTACT-002").interpolate_err(e.to_string()))?;
            }
            "email" => {
                email = field
                    .text()
                    .await
                    .map_err(|e| StandardError::new("CONTACT-002").interpolate_err(e.to_string()))?;
            }
            "service" => {
                service = field
                    .text()
                    .await
                    .map_err(|e| StandardError::new("CONTACT-002").interpolate_err(e.to_string()))?;
            }
            "message" => {
                message = field
                    .text()
                    .await
                    .map_err(|e| StandardError::new("CONTACT-002").interpolate_err(e.to_string()))?;
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("unknown").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| StandardError::new("CONTACT-003").interpolate_err(e.to_string()))?;
                resume = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: data.to_vec(),
                });
            }
            _ => {
                let _ = field
                    .bytes()
                    .await
                    .map_err(|e| StandardError::new("CONTACT-004").interpolate_err(e.to_string()))?;
            }
        }
    }
    let resume = resume.ok_or_else(|| StandardError::new("CONTACT-005"))?;
    Ok(Submission {
        name,
        email,
        service,
        message,
        resume,
    })
}

async fn deliver(state: &AppState, submission: &Submission, staged: &Path) -> Result<()> {
    let conf = &state.contact;
    let ack = email::build_message(
        email::mailbox(&conf.service_name, &conf.from_email)?,
        email::mailbox(&submission.name, &submission.email)?,
        None,
        acknowledgement::SUBJECT,
        &acknowledgement::Acknowledgement {
            name: &submission.name,
            service: &submission.service,
            owner_name: &conf.owner_name,
        }
        .to_string(),
        None,
    )?;
    email::dispatch(state.mailer.clone(), ack).await?;
    tracing::info!("acknowledgement sent to {}", &submission.email);

    let content = tokio::fs::read(staged).await?;
    let notify = email::build_message(
        email::mailbox(&conf.service_name, &conf.from_email)?,
        email::mailbox(&conf.owner_name, &conf.owner_email)?,
        Some(email::mailbox(&submission.name, &submission.email)?),
        notification::SUBJECT,
        &notification::Notification {
            name: &submission.name,
            email: &submission.email,
            service: &submission.service,
            message: &submission.message,
        }
        .to_string(),
        Some(OutgoingFile {
            filename: submission.resume.filename.clone(),
            content_type: submission.resume.content_type.clone(),
            content,
        }),
    )?;
    email::dispatch(state.mailer.clone(), notify).await?;
    tracing::info!("owner notified at {}", &conf.owner_email);
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Request};
    use http_body_util::BodyExt;
    use lettre::Message;
    use serde_json::Value;
    use tower::util::ServiceExt;
    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::internal::email::Mailer;
    use crate::pkg::server::router::routes_with_state;
    use crate::pkg::server::state::{AppState, ContactConfig};
    use crate::prelude::Result;

    struct SentMail {
        to: Vec<String>,
        raw: Vec<u8>,
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<SentMail>>,
        fail: bool,
    }

    impl Mailer for RecordingMailer {
        fn send(&self, message: &Message) -> Result<()> {
            let to = message
                .envelope()
                .to()
                .iter()
                .map(|a| a.to_string())
                .collect();
            self.sent.lock().unwrap().push(SentMail {
                to,
                raw: message.formatted(),
            });
            if self.fail {
                return Err(StandardError::new("MAIL-TEST: send refused"));
            }
            Ok(())
        }
    }

    fn test_state(mailer: Arc<RecordingMailer>, scratch_dir: &std::path::Path) -> AppState {
        AppState {
            mailer,
            contact: Arc::new(ContactConfig {
                service_name: "Contact API".into(),
                from_email: "forms@example.com".into(),
                owner_email: "owner@example.com".into(),
                owner_name: "Site Owner".into(),
                scratch_dir: scratch_dir.to_path_buf(),
            }),
        }
    }

    const BOUNDARY: &str = "contact-test-boundary";

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{}\r\n",
            String::from_utf8_lossy(bytes)
        )
    }

    fn form_request(parts: &[String]) -> Request<Body> {
        let mut body = parts.concat();
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn text_fields() -> Vec<String> {
        vec![
            text_part("name", "Alice"),
            text_part("email", "alice@example.com"),
            text_part("service", "Consulting"),
            text_part("message", "Hi"),
        ]
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn error_codes_resolve_to_messages() {
        let err = StandardError::new("CONTACT-005");
        assert_eq!(err.message, "Resume file is required");
        let err = StandardError::new("MAIL-002").interpolate_err("connection refused".into());
        assert_eq!(err.message, "Could not send email: connection refused");
    }

    #[tokio::test]
    #[traced_test]
    async fn submits_form_and_cleans_up() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mailer = Arc::new(RecordingMailer::default());
        let app = routes_with_state(test_state(mailer.clone(), dir.path()));

        let mut parts = text_fields();
        parts.push(file_part(
            "resume",
            "resume.pdf",
            "application/pdf",
            b"0123456789",
        ));
        let response = app.oneshot(form_request(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Form submitted successfully");

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, vec!["alice@example.com".to_string()]);
        assert_eq!(sent[1].to, vec!["owner@example.com".to_string()]);
        let ack = String::from_utf8_lossy(&sent[0].raw);
        assert!(ack.contains("Thank you for contacting us!"));
        assert!(ack.contains("regarding Consulting"));
        let notify = String::from_utf8_lossy(&sent[1].raw);
        assert!(notify.contains("New contact form submission"));
        assert!(notify.contains("resume.pdf"));
        assert!(notify.contains("0123456789"));
        drop(sent);

        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_missing_resume() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mailer = Arc::new(RecordingMailer::default());
        let app = routes_with_state(test_state(mailer.clone(), dir.path()));

        let response = app.oneshot(form_request(&text_fields())).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to submit form");
        assert!(json.get("error").is_none());

        assert_eq!(mailer.sent.lock().unwrap().len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_send_skips_notification_and_discards_upload() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(Vec::new()),
            fail: true,
        });
        let app = routes_with_state(test_state(mailer.clone(), dir.path()));

        let mut parts = text_fields();
        parts.push(file_part(
            "resume",
            "resume.pdf",
            "application/pdf",
            b"0123456789",
        ));
        let response = app.oneshot(form_request(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["success"], false);

        // only the acknowledgement was attempted, and nothing was left staged
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }
}
