use std::fmt;

use http::StatusCode;
use tower::BoxError;

use crate::CreateDocumentResponse;
use crate::RawResponse;
use crate::TransportError;

/// The result of one submission attempt.
///
/// Every variant means one admission unit was spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The registry answered with a non-error status.
    Success { body: String },

    /// The registry answered with a 4xx or 5xx status. The body is kept verbatim.
    RemoteRejected { status: StatusCode, body: String },

    /// The exchange could not be completed.
    TransportFailure { cause: TransportError },
}

impl Outcome {
    pub(crate) fn from_result(result: Result<RawResponse, BoxError>) -> Self {
        match result {
            Ok(response) => Self::from_response(response),
            Err(err) => Self::from_error(err),
        }
    }

    fn from_response(RawResponse { status, body }: RawResponse) -> Self {
        if status.is_client_error() || status.is_server_error() {
            Self::RemoteRejected { status, body }
        } else {
            Self::Success { body }
        }
    }

    fn from_error(err: BoxError) -> Self {
        let cause = match err.downcast::<TransportError>() {
            Ok(cause) => *cause,
            // Wrap any other transport stack errors
            Err(other) => TransportError::Other(other.to_string()),
        };
        Self::TransportFailure { cause }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The response body, if the registry answered at all.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body } | Self::RemoteRejected { body, .. } => Some(body),
            Self::TransportFailure { .. } => None,
        }
    }

    /// Wraps a successful body the way the registry's creation call reports it.
    pub fn into_response(self) -> Option<CreateDocumentResponse> {
        match self {
            Self::Success { body } => Some(CreateDocumentResponse { response: body }),
            _ => None,
        }
    }

    /// Short name used as a metric label.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::RemoteRejected { .. } => "remote_rejected",
            Self::TransportFailure { .. } => "transport_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { body } => write!(f, "accepted: {body}"),
            Self::RemoteRejected { status, body } => write!(f, "rejected with {status}: {body}"),
            Self::TransportFailure { cause } => write!(f, "not delivered: {cause}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Result<RawResponse, BoxError> {
        Ok(RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        })
    }

    #[test]
    fn test_success_statuses() {
        for status in [200, 201, 204, 302] {
            assert_eq!(
                Outcome::from_result(response(status, "ok")),
                Outcome::Success {
                    body: "ok".to_string()
                }
            );
        }
    }

    #[test]
    fn test_rejection_statuses_keep_body() {
        for status in [400, 404, 429, 500, 503] {
            let outcome = Outcome::from_result(response(status, "{\"error\": \"nope\"}"));
            assert_eq!(
                outcome,
                Outcome::RemoteRejected {
                    status: StatusCode::from_u16(status).unwrap(),
                    body: "{\"error\": \"nope\"}".to_string(),
                }
            );
            assert_eq!(outcome.body(), Some("{\"error\": \"nope\"}"));
        }
    }

    #[test]
    fn test_transport_error_is_recovered() {
        let outcome = Outcome::from_result(Err(Box::new(TransportError::Timeout)));
        assert_eq!(
            outcome,
            Outcome::TransportFailure {
                cause: TransportError::Timeout
            }
        );
        assert_eq!(outcome.body(), None);
    }

    #[test]
    fn test_foreign_error_is_wrapped() {
        let err = std::io::Error::other("boom");
        let outcome = Outcome::from_result(Err(Box::new(err)));
        assert_eq!(
            outcome,
            Outcome::TransportFailure {
                cause: TransportError::Other("boom".to_string())
            }
        );
    }

    #[test]
    fn test_into_response() {
        let outcome = Outcome::Success {
            body: "some response".to_string(),
        };
        assert_eq!(
            outcome.into_response(),
            Some(CreateDocumentResponse {
                response: "some response".to_string()
            })
        );
    }
}
