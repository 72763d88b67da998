use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Invalid connection settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid platform base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to read connection file '{path}'")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse connection file '{path}'")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Platform request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Secret(#[from] SecretError),
}

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Stored secret is not valid base64")]
    Encoding(#[from] base64::DecodeError),

    #[error("Decrypted secret is not valid UTF-8; wrong key?")]
    Garbled(#[from] std::string::FromUtf8Error),
}
