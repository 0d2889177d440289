use std::time::Duration;

use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub cors: CorsSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    // Environment variables are always strings, e.g. `APP_APPLICATION__PORT=10000`
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// SMTP relay account used to deliver the confirmation emails.
///
/// The password is held in a [`Secret`] so it never shows up in `Debug`
/// output or logs; it is only exposed when the transport credentials are built.
#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub smtp_host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub smtp_port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub sender_email: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

/// Origins allowed to call the API from a browser.
#[derive(serde::Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut settings = config::Config::default();

    // Looks for a top level file named `configuration` with any extension
    // `config` knows how to parse: yaml, json, etc.
    settings.merge(config::File::with_name("configuration"))?;

    // Overrides from the environment, e.g. `APP_EMAIL_CLIENT__PASSWORD=...`
    // sets `Settings.email_client.password`
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    settings.try_into()
}
