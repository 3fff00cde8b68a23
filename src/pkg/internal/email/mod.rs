use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use standard_error::{Interpolate, StandardError};

pub mod acknowledgement;
pub mod notification;

use crate::{conf::settings, prelude::Result};

pub trait Mailer: Send + Sync {
    fn send(&self, message: &Message) -> Result<()>;
}

pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new() -> Result<Self> {
        let creds = Credentials::new(settings.smtp_user.clone(), settings.smtp_pass.clone());
        let transport = SmtpTransport::relay(&settings.smtp_server)
            .map_err(|e| StandardError::new("MAIL-001").interpolate_err(e.to_string()))?
            .port(settings.smtp_port)
            .credentials(creds)
            .build();
        Ok(SmtpMailer { transport })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &Message) -> Result<()> {
        self.transport
            .send(message)
            .map_err(|e| StandardError::new("MAIL-002").interpolate_err(e.to_string()))?;
        Ok(())
    }
}

pub struct OutgoingFile {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

pub fn mailbox(name: &str, email: &str) -> Result<Mailbox> {
    format!("{} <{}>", name, email)
        .parse()
        .map_err(|e| StandardError::new("MAIL-003").interpolate_err(format!("{}: {}", email, e)))
}

pub fn build_message(
    from: Mailbox,
    to: Mailbox,
    reply_to: Option<Mailbox>,
    subject: &str,
    body: &str,
    attachment: Option<OutgoingFile>,
) -> Result<Message> {
    let mut builder = Message::builder().from(from).to(to).subject(subject);
    if let Some(mailbox) = reply_to {
        builder = builder.reply_to(mailbox);
    }
    let message = match attachment {
        Some(file) => {
            let content_type = ContentType::parse(&file.content_type)
                .or_else(|_| ContentType::parse("application/octet-stream"))
                .map_err(|e| StandardError::new("MAIL-004").interpolate_err(e.to_string()))?;
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(
                        Attachment::new(file.filename).body(Body::new(file.content), content_type),
                    ),
            )
        }
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string()),
    }
    .map_err(|e| StandardError::new("MAIL-005").interpolate_err(e.to_string()))?;
    Ok(message)
}

/// lettre's smtp transport is blocking, so the actual send runs on the
/// blocking pool; the handle is awaited so sends stay sequential.
pub async fn dispatch(mailer: Arc<dyn Mailer>, message: Message) -> Result<()> {
    tokio::task::spawn_blocking(move || mailer.send(&message))
        .await
        .map_err(|e| StandardError::new("MAIL-006").interpolate_err(e.to_string()))??;
    Ok(())
}
