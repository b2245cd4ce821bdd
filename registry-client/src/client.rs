use std::sync::Arc;

use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::metrics::Counter;
use quota_gate::QuotaGate;
use serde::Serialize;
use tower::BoxError;
use tower::Service;
use tower::ServiceBuilder;
use tower::ServiceExt;
use tower::util::BoxCloneSyncService;

use crate::ClientConfig;
use crate::ClientError;
use crate::HttpTransport;
use crate::Outcome;
use crate::QuotaLayer;
use crate::RawResponse;
use crate::Submission;

#[derive(Clone, Debug)]
struct ClientMetrics {
    submissions: Counter<u64>,
}

/// Submits documents of type `T` to the registry, one admission unit per call.
///
/// Clones share the same [`QuotaGate`], so a single client (or its clones) must be used by
/// every caller that falls under one quota. Building a second client creates a second,
/// independent quota.
pub struct RegistryClient<T> {
    service: BoxCloneSyncService<Submission<T>, RawResponse, BoxError>,
    gate: Arc<QuotaGate>,
    instruments: ClientMetrics,
}

impl<T> Clone for RegistryClient<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            gate: Arc::clone(&self.gate),
            instruments: self.instruments.clone(),
        }
    }
}

impl<T> std::fmt::Debug for RegistryClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl<T> RegistryClient<T>
where
    T: Serialize + Send + 'static,
{
    /// A client speaking HTTP to the registry described by `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        let gate = Arc::new(QuotaGate::from_rate(config.rate()));
        Ok(Self::with_transport(gate, transport))
    }

    /// A client that admits through `gate` and delivers through any transport service.
    pub fn with_transport<S>(gate: Arc<QuotaGate>, transport: S) -> Self
    where
        S: Service<Submission<T>, Response = RawResponse, Error = BoxError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        let meter = global::meter("registry_client");
        let instruments = ClientMetrics {
            submissions: meter.u64_counter("submissions").build(),
        };

        let service = ServiceBuilder::new()
            .layer(QuotaLayer::new(Arc::clone(&gate)))
            .service(transport);

        Self {
            service: BoxCloneSyncService::new(service),
            gate,
            instruments,
        }
    }

    pub fn gate(&self) -> &Arc<QuotaGate> {
        &self.gate
    }

    /// Waits for admission, performs exactly one remote call and classifies the result.
    ///
    /// Never retries. Dropping the future while it waits for admission abandons the
    /// submission before anything is sent or any token is spent.
    pub async fn submit(&self, document: T, signature: impl Into<String>) -> Outcome {
        let submission = Submission {
            document,
            signature: signature.into(),
        };

        let result = self.service.clone().oneshot(submission).await;
        let outcome = Outcome::from_result(result);

        match &outcome {
            Outcome::Success { .. } => tracing::debug!("document accepted by registry"),
            Outcome::RemoteRejected { status, body } => {
                tracing::warn!(%status, %body, "registry rejected document")
            }
            Outcome::TransportFailure { cause } => {
                tracing::error!(%cause, "failed to deliver document to registry")
            }
        }
        self.instruments
            .submissions
            .add(1, &[KeyValue::new("outcome", outcome.kind())]);

        outcome
    }
}
