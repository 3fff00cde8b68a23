use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: String,
    pub scratch_dir: String,
    //smtp
    pub smtp_user: String,
    pub smtp_pass: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    //addresses
    pub from_email: String,
    pub owner_email: String,
    pub owner_name: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("listen_port", "8000")?
            .set_default("scratch_dir", "tmp")?
            .set_default("smtp_port", 587)?
            .set_default("from_email", "")?
            .set_default("owner_email", "")?
            .add_source(Environment::default())
            .build()?;
        let mut s: Settings = conf.try_deserialize()?;
        // one mail account doubles as sender and owner unless overridden
        if s.from_email.is_empty() {
            s.from_email = s.smtp_user.clone();
        }
        if s.owner_email.is_empty() {
            s.owner_email = s.smtp_user.clone();
        }
        Ok(s)
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
