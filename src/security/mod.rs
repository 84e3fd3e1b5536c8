//! Request security shield.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → snapshot.rs (method, path, query, agent, referer, edge context)
//!     → classifier.rs (rule tables in fixed order, first match wins)
//!     → events.rs (security event to the sink, never blocks)
//!     → response.rs (synthesized 400/403/404 or pass-through)
//! ```
//!
//! # Design Decisions
//! - Rule tables are plain data compiled once; a bad pattern fails startup
//! - No state shared between requests; the shield is read-only after construction
//! - Logging failures never change the response

pub mod classifier;
pub mod decision;
pub mod events;
pub mod response;
pub mod rules;
pub mod ruleset;
pub mod snapshot;

use std::sync::Arc;

pub use classifier::{Classifier, Stages};
pub use decision::{Category, Decision, MatchedRule, Reason};
pub use events::{EventLogger, EventSink, MemorySink, SecurityEvent, SinkError, StdoutSink};
pub use response::{Action, Rejection, ResponsePolicy};
pub use ruleset::{RuleBook, RuleError, RuleSet, RuleTable};
pub use snapshot::RequestSnapshot;

use crate::config::ShieldConfig;
use crate::observability::metrics;

/// Classifier, event logger and response policy, assembled once at startup.
#[derive(Debug, Clone)]
pub struct Shield {
    classifier: Classifier,
    logger: EventLogger,
    policy: ResponsePolicy,
}

impl Shield {
    pub fn new(classifier: Classifier, logger: EventLogger, policy: ResponsePolicy) -> Self {
        Self {
            classifier,
            logger,
            policy,
        }
    }

    /// Build a shield that writes events to standard output.
    pub fn from_config(config: &ShieldConfig) -> Result<Self, RuleError> {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    pub fn with_sink(config: &ShieldConfig, sink: Arc<dyn EventSink>) -> Result<Self, RuleError> {
        let classifier = Classifier::from_config(config)?;
        let logger = EventLogger::new(sink, config.enable_logging, config.max_user_agent_log_len);
        Ok(Self::new(classifier, logger, ResponsePolicy::from(config)))
    }

    pub fn classify(&self, req: &RequestSnapshot) -> Decision {
        self.classifier.classify(req)
    }

    pub fn policy(&self) -> &ResponsePolicy {
        &self.policy
    }

    /// Classify, record and decide what to answer.
    pub fn inspect(&self, req: &RequestSnapshot) -> Action {
        let decision = self.classifier.classify(req);
        metrics::record_decision(&decision);
        self.logger.record(&decision, req);

        if !decision.allows() {
            tracing::debug!(
                method = %req.method,
                path = %req.path,
                decision = %decision,
                "Request rejected"
            );
        }
        self.policy.action_for(&decision)
    }
}
