use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    conf::settings,
    pkg::internal::email::{Mailer, SmtpMailer},
    prelude::Result,
};

#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    pub contact: Arc<ContactConfig>,
}

#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub service_name: String,
    pub from_email: String,
    pub owner_email: String,
    pub owner_name: String,
    pub scratch_dir: PathBuf,
}

impl AppState {
    pub fn new() -> Result<AppState> {
        Ok(AppState {
            mailer: Arc::new(SmtpMailer::new()?),
            contact: Arc::new(ContactConfig {
                service_name: settings.service_name.clone(),
                from_email: settings.from_email.clone(),
                owner_email: settings.owner_email.clone(),
                owner_name: settings.owner_name.clone(),
                scratch_dir: PathBuf::from(&settings.scratch_dir),
            }),
        })
    }
}
