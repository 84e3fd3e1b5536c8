//! Security shield middleware.
//! Classifies every request that is not a static asset before any handler runs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::config::{AppConfig, EdgeConfig};
use crate::http::request;
use crate::observability::metrics;
use crate::routing::ExclusionList;
use crate::security::{Action, EventSink, RuleError, Shield, StdoutSink};

/// State required by the shield middleware.
#[derive(Clone, Debug)]
pub struct ShieldState {
    pub shield: Arc<Shield>,
    pub exclusions: Arc<ExclusionList>,
    pub edge: Arc<EdgeConfig>,
}

impl ShieldState {
    pub fn new(shield: Shield, exclusions: ExclusionList, edge: EdgeConfig) -> Self {
        Self {
            shield: Arc::new(shield),
            exclusions: Arc::new(exclusions),
            edge: Arc::new(edge),
        }
    }

    /// Build from configuration, writing events to standard output.
    pub fn from_config(config: &AppConfig) -> Result<Self, RuleError> {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    pub fn with_sink(config: &AppConfig, sink: Arc<dyn EventSink>) -> Result<Self, RuleError> {
        let shield = Shield::with_sink(&config.shield, sink)?;
        let exclusions = ExclusionList::new(config.exclusions.paths.iter().cloned())?;
        Ok(Self::new(shield, exclusions, config.edge.clone()))
    }
}

pub async fn shield_middleware(
    State(state): State<ShieldState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // 1. Static assets never reach the classifier.
    if state.exclusions.is_excluded(req.uri().path()) {
        metrics::record_excluded();
        return next.run(req).await;
    }

    // 2. Classify a snapshot; the request itself is forwarded untouched.
    let snapshot = request::capture(&req, &state.edge);
    match state.shield.inspect(&snapshot) {
        Action::Forward => next.run(req).await,
        Action::Reject(rejection) => rejection.respond().await,
    }
}

/// Mount the shield in front of every route of `router`.
pub fn protect<S>(router: Router<S>, state: ShieldState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(state, shield_middleware))
}
