use std::future::Future;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use http::StatusCode;
use http::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Serialize;
use tower::BoxError;
use tower::Service;

use crate::ClientConfig;
use crate::ClientError;
use crate::TransportError;

/// A single document submission as handed to a transport.
#[derive(Debug, Clone)]
pub struct Submission<T> {
    pub document: T,
    /// Opaque signature supplied by the caller, passed through unmodified.
    pub signature: String,
}

/// The registry's answer, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Delivers submissions to the registry over HTTP.
///
/// Each call serializes the document to JSON and issues exactly one `POST` to the configured
/// endpoint. The response is returned for any status; classification is the client's job.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    bearer_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let endpoint = endpoint(config.base_url(), config.path())?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint,
            bearer_token: config.bearer_token().map(str::to_string),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn endpoint(base_url: &str, path: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    // Without a trailing slash `join` would replace the last segment of the base.
    let base = if base_url.ends_with('/') {
        Url::parse(base_url)
    } else {
        Url::parse(&format!("{base_url}/"))
    }
    .map_err(|e| invalid(e.to_string()))?;

    if base.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a base".to_string()));
    }

    base.join(path.trim_start_matches('/'))
        .map_err(|e| invalid(e.to_string()))
}

impl<T> Service<Submission<T>> for HttpTransport
where
    T: Serialize + Send + 'static,
{
    type Response = RawResponse;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<RawResponse, BoxError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Submission<T>) -> Self::Future {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        let bearer_token = self.bearer_token.clone();

        Box::pin(async move {
            let body = serde_json::to_vec(&req.document)
                .map_err(|e| TransportError::Encode(e.to_string()))?;

            tracing::debug!(
                url = %endpoint,
                body = %String::from_utf8_lossy(&body),
                "sending document to registry"
            );

            let mut request = http
                .post(endpoint)
                .header(CONTENT_TYPE, "application/json")
                .body(body);
            if let Some(token) = bearer_token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(TransportError::from)?;
            let status = response.status();
            let body = response.text().await.map_err(TransportError::from)?;

            tracing::trace!(%status, %body, "registry response");

            Ok::<_, BoxError>(RawResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use tower::ServiceExt;

    use super::*;
    use crate::TimeUnit;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig::new(base_url, TimeUnit::Minutes, 10).unwrap()
    }

    #[test]
    fn test_endpoint_joins_relative_path() {
        let transport =
            HttpTransport::new(&config("https://registry.example.com/api/v3/lk/")).unwrap();
        assert_eq!(
            transport.endpoint().as_str(),
            "https://registry.example.com/api/v3/lk/documents/create"
        );
    }

    #[test]
    fn test_endpoint_keeps_last_segment_without_trailing_slash() {
        let transport = HttpTransport::new(&config("http://localhost:8080/api")).unwrap();
        assert_eq!(
            transport.endpoint().as_str(),
            "http://localhost:8080/api/documents/create"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpTransport::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));

        let err = HttpTransport::new(&config("mailto:registry@example.com")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[tokio::test]
    async fn test_encode_failure_is_reported_before_sending() {
        let config = config("http://127.0.0.1:9/").with_request_timeout(Duration::from_millis(50));
        let transport = HttpTransport::new(&config).unwrap();

        // JSON object keys must be strings.
        let document = HashMap::from([((1u8, 2u8), 3u8)]);
        let err = transport
            .oneshot(Submission {
                document,
                signature: String::new(),
            })
            .await
            .unwrap_err();

        let err = err.downcast::<TransportError>().unwrap();
        assert!(matches!(*err, TransportError::Encode(_)));
    }
}
