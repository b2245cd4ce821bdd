use std::sync::Arc;

use quota_gate::QuotaGate;
use tower::Layer;

use crate::service::QuotaService;

/// Applies quota admission to requests.
///
/// Every service produced by one layer (and every clone of those services) draws from the
/// same gate.
#[derive(Debug, Clone)]
pub struct QuotaLayer {
    gate: Arc<QuotaGate>,
}

impl QuotaLayer {
    /// Create a QuotaLayer
    pub fn new(gate: Arc<QuotaGate>) -> Self {
        QuotaLayer { gate }
    }
}

impl<S> Layer<S> for QuotaLayer {
    type Service = QuotaService<S>;

    fn layer(&self, service: S) -> Self::Service {
        QuotaService::new(service, self.gate.clone())
    }
}
