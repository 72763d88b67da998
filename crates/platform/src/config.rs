use std::path::Path;

use reqwest::Url;
use serde::Deserialize;

use crate::error::PlatformError;
use crate::secret;

/// Top level layout of the connection file.
///
/// ```toml
/// [connection]
/// url = "https://acme.cumulocity.com"
/// tenant = "t1234"
/// credential = "prod"            # resolved from the environment, or:
/// username = "alice"
/// password_encrypted = "qL0v…"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub connection: ConnectionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionSettings {
    pub url: String,
    /// Tenant identifier; empty means the platform's default tenant.
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password_encrypted: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl PlatformConfig {
    pub fn load(path: &Path) -> Result<Self, PlatformError> {
        let text = std::fs::read_to_string(path).map_err(|source| PlatformError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text).map_err(|source| PlatformError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

impl ConnectionSettings {
    pub fn validate(&self) -> Result<(), PlatformError> {
        if self.url.trim().is_empty() {
            return Err(PlatformError::InvalidSettings(
                "connection url must not be empty".into(),
            ));
        }
        Url::parse(self.url.trim()).map_err(|err| PlatformError::InvalidBaseUrl {
            url: self.url.clone(),
            reason: err.to_string(),
        })?;
        if self.credential.is_none() && self.username.is_none() {
            return Err(PlatformError::InvalidSettings(
                "either 'credential' or 'username' with 'password_encrypted' must be set".into(),
            ));
        }
        Ok(())
    }

    /// Resolves the login to use. A named credential wins over inline
    /// username and password and is looked up from the environment pair
    /// `WEIR_CRED_<NAME>_USER` / `WEIR_CRED_<NAME>_PASSWORD`.
    pub fn resolve_credentials(&self) -> Result<Credentials, PlatformError> {
        if let Some(name) = self.credential.as_deref() {
            return credentials_from_env(name);
        }

        let username = self.username.clone().ok_or_else(|| {
            PlatformError::InvalidSettings("no credential name and no username given".into())
        })?;
        let encrypted = self.password_encrypted.as_deref().ok_or_else(|| {
            PlatformError::InvalidSettings(format!(
                "no 'password_encrypted' stored for user '{username}'"
            ))
        })?;
        let password = secret::decrypt(encrypted, &secret::active_key())?;
        Ok(Credentials { username, password })
    }
}

fn credentials_from_env(name: &str) -> Result<Credentials, PlatformError> {
    let slug = env_slug(name);
    let user_var = format!("WEIR_CRED_{slug}_USER");
    let password_var = format!("WEIR_CRED_{slug}_PASSWORD");

    let username = std::env::var(&user_var).map_err(|_| {
        PlatformError::InvalidSettings(format!("credential '{name}': {user_var} is not set"))
    })?;
    let password = std::env::var(&password_var).map_err(|_| {
        PlatformError::InvalidSettings(format!("credential '{name}': {password_var} is not set"))
    })?;
    Ok(Credentials { username, password })
}

fn env_slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
