use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Context;
use std::task::Poll;

use quota_gate::QuotaGate;
use tower::BoxError;
use tower::Service;
use tower::ServiceExt;

/// Waits for admission from a [`QuotaGate`] before forwarding each request to `inner`.
///
/// Admission happens inside the response future, so `poll_ready` is always ready and
/// dropping the future while it waits gives up the caller's place without spending a token.
#[derive(Debug)]
pub struct QuotaService<S> {
    inner: S,
    gate: Arc<QuotaGate>,
}

impl<S: Clone> Clone for QuotaService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<S> QuotaService<S> {
    pub fn new(inner: S, gate: Arc<QuotaGate>) -> Self {
        Self { inner, gate }
    }

    pub fn gate(&self) -> &Arc<QuotaGate> {
        &self.gate
    }
}

impl<S, Req> Service<Req> for QuotaService<S>
where
    S: Service<Req, Error = BoxError> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, BoxError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness of the inner service is checked after admission, in `call`.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let gate = Arc::clone(&self.gate);

        Box::pin(async move {
            gate.acquire().await;
            inner.ready().await?.call(req).await
        })
    }
}
