use thiserror::Error;

/// Errors raised by the JSON encoder
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(
        "Invalid value: expected null, object, array, number, boolean or string, \
         found `{description}`"
    )]
    UnsupportedValue { description: String },

    #[error("Expected finite number, found `{value}`")]
    NonFiniteNumber { value: f64 },

    #[error("Sink rejected write")]
    Sink(#[from] std::fmt::Error),

    #[error("Failed to write encoded bytes: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by a `ReportTransport`
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to initiate connection to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("Failed to build request: {reason}")]
    InvalidRequest { reason: String },

    #[error("I/O failure while talking to service: {reason}")]
    Io { reason: String },
}

/// A live gauge accessor could not produce a value
#[derive(Debug, Clone, Error)]
#[error("gauge unavailable: {0}")]
pub struct GaugeError(pub String);

/// Errors reported by a `Scheduler`
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("No background runtime available: {reason}")]
    Unavailable { reason: String },

    #[error("Invalid schedule: period must be non-zero")]
    ZeroPeriod,
}

/// Everything that can end a single reporting tick early.
///
/// All of these are soft failures: the tick logs them and returns.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to encode API URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Failed to encode data to submit: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Failed to connect to service: {0}")]
    Transport(#[from] TransportError),
}

impl ReportError {
    /// Short label used for the failure counter
    pub fn stage(&self) -> &'static str {
        match self {
            ReportError::Endpoint(_) => "endpoint",
            ReportError::Encoding(_) => "encoding",
            ReportError::Transport(TransportError::Connect { .. }) => "connect",
            ReportError::Transport(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_formatting() {
        let error = EncodingError::NonFiniteNumber { value: f64::NAN };
        assert!(error.to_string().contains("NaN"));

        let error = EncodingError::UnsupportedValue {
            description: "socket handle".to_string(),
        };
        assert!(error.to_string().contains("socket handle"));
    }

    #[test]
    fn test_gauge_error_formatting() {
        let error = GaugeError("legacy accessor missing".to_string());
        assert_eq!(error.to_string(), "gauge unavailable: legacy accessor missing");
        let boxed: Box<dyn std::error::Error> = Box::new(error);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_report_error_stages() {
        let connect = ReportError::from(TransportError::Connect {
            endpoint: "https://example.invalid".to_string(),
            reason: "refused".to_string(),
        });
        assert_eq!(connect.stage(), "connect");

        let io = ReportError::from(TransportError::Io {
            reason: "reset".to_string(),
        });
        assert_eq!(io.stage(), "io");

        let encoding = ReportError::from(EncodingError::NonFiniteNumber {
            value: f64::INFINITY,
        });
        assert_eq!(encoding.stage(), "encoding");
        assert!(encoding.to_string().starts_with("Failed to encode data"));
    }
}
