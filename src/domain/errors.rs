use thiserror::Error;

/// Errors raised while talking to the prediction API or shaping its data
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Request to {endpoint} failed: {reason}")]
    Network { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedPayload { endpoint: String, reason: String },

    #[error("API not reachable or unhealthy: {detail}")]
    Unhealthy { detail: String },

    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("CSV export failed: {reason}")]
    Export { reason: String },
}

impl ForecastError {
    pub fn malformed(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedPayload {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn network(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_formatting() {
        let error = ForecastError::HttpStatus {
            endpoint: "/predict".to_string(),
            status: 503,
            body: "model warming up".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("/predict"));
        assert!(msg.contains("503"));
        assert!(msg.contains("model warming up"));
    }

    #[test]
    fn test_invalid_parameter_formatting() {
        let error = ForecastError::InvalidParameter {
            name: "horizon",
            reason: "must be between 1 and 14, got 30".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Invalid horizon: must be between 1 and 14, got 30"
        );
    }
}
