use std::path::PathBuf;

use thiserror::Error;

/// All errors produced outside the per-frame core.
///
/// The sampler, reducer, generator, and physics are total functions and never
/// return these; only configuration, the contact relay, and the HTTP surface do.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// Config file could not be read.
    #[error("cannot read config '{}': {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid JSON for `NarrativeConfig`.
    #[error("invalid config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A contact submission was rejected or could not be delivered.
    #[error(transparent)]
    Contact(#[from] ContactError),
    /// The HTTP listener failed to bind or serve.
    #[error("server error: {0}")]
    Server(String),
}

/// Errors surfaced by the mail relay boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// A required field was absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The mail transport refused or failed the delivery.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, NarrativeError>;

impl NarrativeError {
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_error_messages() {
        let e = ContactError::MissingField("email");
        assert_eq!(e.to_string(), "missing required field: email");
        let wrapped: NarrativeError = e.into();
        assert_eq!(wrapped.to_string(), "missing required field: email");
    }

    #[test]
    fn config_io_names_the_path() {
        let e = NarrativeError::ConfigIo {
            path: PathBuf::from("narrative.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.to_string().contains("narrative.json"));
        assert!(e.to_string().contains("gone"));
    }
}
