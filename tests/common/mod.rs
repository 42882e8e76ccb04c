//! Shared fixtures for webhook contract tests.
#![allow(dead_code)]

use anyhow::anyhow;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use external_dns_webhook::provider::AdjustError;
use external_dns_webhook::{router, Changes, DomainFilter, DynProvider, Endpoint, Provider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

pub const V1: &str = "application/external.dns.webhook+json;version=1";

/// A provider that returns canned results and counts how often it is called.
#[derive(Default)]
pub struct MockProvider {
    pub records: Vec<Endpoint>,
    pub filter: DomainFilter,
    pub fail: bool,
    /// Endpoints reported alongside an adjust failure.
    pub adjust_failure: Option<Vec<Endpoint>>,
    pub applied: Mutex<Vec<Changes>>,
    /// Delay before every records, apply and adjust call answers.
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl MockProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn called(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    async fn stall(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl Provider for MockProvider {
    async fn records(&self) -> anyhow::Result<Vec<Endpoint>> {
        self.called();
        self.stall().await;
        if self.fail {
            return Err(anyhow!("records unavailable"));
        }
        Ok(self.records.clone())
    }

    async fn apply_changes(&self, changes: Changes) -> anyhow::Result<()> {
        self.called();
        self.stall().await;
        if self.fail {
            return Err(anyhow!("apply rejected"));
        }
        self.applied.lock().unwrap().push(changes);
        Ok(())
    }

    async fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>, AdjustError> {
        self.called();
        self.stall().await;
        match &self.adjust_failure {
            Some(partial) => Err(AdjustError {
                endpoints: partial.clone(),
                error: anyhow!("adjust rejected"),
            }),
            None => Ok(endpoints),
        }
    }

    fn domain_filter(&self) -> DomainFilter {
        self.called();
        self.filter.clone()
    }
}

pub fn app(provider: &Arc<MockProvider>) -> Router {
    let provider: DynProvider = provider.clone();
    router(provider, None)
}

/// Like [`app`], but provider calls are cut off after `limit`.
pub fn app_with_timeout(provider: &Arc<MockProvider>, limit: Duration) -> Router {
    let provider: DynProvider = provider.clone();
    router(provider, Some(limit))
}

pub fn request(method: &str, uri: &str, headers: &[(&str, &str)], body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (Response<()>, String) {
    let response = app.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = hyper::body::to_bytes(body).await.unwrap();
    (
        Response::from_parts(parts, ()),
        String::from_utf8(bytes.to_vec()).unwrap(),
    )
}

pub fn header<'a>(response: &'a Response<()>, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .map(|value| value.to_str().unwrap())
}

pub fn a(name: &str, target: &str) -> Endpoint {
    Endpoint::new(name, "A", &[target]).with_ttl(300)
}
