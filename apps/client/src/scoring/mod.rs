//! Readiness Scorer: turns an [`AssessmentInput`] into a [`ScoreSummary`].
//!
//! The remote service is tried first whenever the caller holds a session.
//! Any failure, or the absence of a session, yields the local estimate
//! instead. The caller learns which path produced the summary from the
//! [`EvaluationOutcome`] variant.

pub mod local;
pub mod recommendations;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::EvaluationError;
use crate::models::api::{EvaluationRequest, EvaluationResponse};
use crate::models::assessment::AssessmentInput;
use crate::models::summary::ScoreSummary;
use crate::session::ActiveSession;

pub use local::compute_local_summary;

pub const SYNCED_NOTICE: &str = "Synced with backend scoring engine.";
pub const REMOTE_FAILED_NOTICE: &str = "Falling back to local estimation (API unavailable).";
pub const SIGN_IN_NOTICE: &str = "Local estimation generated. Sign in to sync with backend.";

/// The remote evaluation seam. Implemented by the HTTP client; tests swap in
/// canned evaluators.
#[async_trait]
pub trait RemoteEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        profile_id: &str,
        token: &str,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, EvaluationError>;
}

/// Why the local estimate was used.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// No session (or an empty token) was supplied.
    AuthenticationRequired,
    /// The remote attempt was made and failed.
    RemoteFailed { code: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Remote(ScoreSummary),
    Local {
        summary: ScoreSummary,
        reason: FallbackReason,
    },
}

impl EvaluationOutcome {
    pub fn summary(&self) -> &ScoreSummary {
        match self {
            EvaluationOutcome::Remote(summary) => summary,
            EvaluationOutcome::Local { summary, .. } => summary,
        }
    }

    pub fn into_summary(self) -> ScoreSummary {
        match self {
            EvaluationOutcome::Remote(summary) => summary,
            EvaluationOutcome::Local { summary, .. } => summary,
        }
    }

    /// True when a remote attempt was made and failed.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            EvaluationOutcome::Local {
                reason: FallbackReason::RemoteFailed { .. },
                ..
            }
        )
    }

    /// Human-readable status line for the submission.
    pub fn advisory(&self) -> &'static str {
        match self {
            EvaluationOutcome::Remote(_) => SYNCED_NOTICE,
            EvaluationOutcome::Local {
                reason: FallbackReason::RemoteFailed { .. },
                ..
            } => REMOTE_FAILED_NOTICE,
            EvaluationOutcome::Local {
                reason: FallbackReason::AuthenticationRequired,
                ..
            } => SIGN_IN_NOTICE,
        }
    }
}

#[derive(Clone)]
pub struct ReadinessScorer {
    evaluator: Arc<dyn RemoteEvaluator>,
}

impl ReadinessScorer {
    pub fn new(evaluator: Arc<dyn RemoteEvaluator>) -> Self {
        Self { evaluator }
    }

    pub fn compute_local_summary(&self, input: &AssessmentInput) -> ScoreSummary {
        compute_local_summary(input)
    }

    /// One remote evaluation, reshaped into a summary. No retries.
    pub async fn request_remote_summary(
        &self,
        profile_id: &str,
        token: &str,
        request: &EvaluationRequest,
    ) -> Result<ScoreSummary, EvaluationError> {
        if token.trim().is_empty() {
            return Err(EvaluationError::Auth);
        }
        let response = self.evaluator.evaluate(profile_id, token, request).await?;
        remote::summary_from_response(response)
    }

    /// Remote first when a session is present, local otherwise. Never fails.
    pub async fn evaluate(
        &self,
        input: &AssessmentInput,
        session: Option<&ActiveSession>,
    ) -> EvaluationOutcome {
        let local = compute_local_summary(input);

        let Some(session) = session.filter(|s| !s.token.trim().is_empty()) else {
            debug!("No session, using local estimate");
            return EvaluationOutcome::Local {
                summary: local,
                reason: FallbackReason::AuthenticationRequired,
            };
        };

        let request = remote::build_evaluation_request(input);
        debug!(profile_id = %session.profile_id, "Requesting remote evaluation");

        match self
            .request_remote_summary(&session.profile_id, &session.token, &request)
            .await
        {
            Ok(summary) => EvaluationOutcome::Remote(summary),
            Err(err) => {
                warn!(code = err.code(), "Remote evaluation failed: {err}");
                EvaluationOutcome::Local {
                    summary: local,
                    reason: FallbackReason::RemoteFailed {
                        code: err.code(),
                        message: err.to_string(),
                    },
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{synced_response, unreachable, StubEvaluator};
    use super::*;

    fn session() -> ActiveSession {
        ActiveSession {
            token: "token-123".to_string(),
            profile_id: "p-1".to_string(),
        }
    }

    fn input() -> AssessmentInput {
        AssessmentInput::new(75.0, 80.0, 70.0, 3).with_linkedin_headline("Aspiring SDE")
    }

    #[tokio::test]
    async fn test_remote_success_uses_remote_summary() {
        let stub = StubEvaluator::new(synced_response);
        let scorer = ReadinessScorer::new(stub.clone());

        let outcome = scorer.evaluate(&input(), Some(&session())).await;

        assert!(matches!(outcome, EvaluationOutcome::Remote(_)));
        assert_eq!(outcome.summary().total_score, 85);
        assert_eq!(
            outcome.summary().recommendations,
            vec!["Great job! Your Technical skills are a clear strength."]
        );
        assert_eq!(outcome.advisory(), SYNCED_NOTICE);
        assert!(!outcome.is_degraded());

        let (profile_id, token, request) = stub.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(profile_id, "p-1");
        assert_eq!(token, "token-123");
        assert_eq!(request.experience, 60.0);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_local() {
        let stub = StubEvaluator::new(unreachable);
        let scorer = ReadinessScorer::new(stub.clone());

        let outcome = scorer.evaluate(&input(), Some(&session())).await;

        assert_eq!(stub.call_count(), 1);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.advisory(), REMOTE_FAILED_NOTICE);
        assert_eq!(outcome.summary(), &compute_local_summary(&input()));
        match outcome {
            EvaluationOutcome::Local {
                reason: FallbackReason::RemoteFailed { code, .. },
                ..
            } => assert_eq!(code, "NETWORK_ERROR"),
            other => panic!("expected remote failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_session_skips_remote() {
        let stub = StubEvaluator::new(synced_response);
        let scorer = ReadinessScorer::new(stub.clone());

        let outcome = scorer.evaluate(&input(), None).await;

        assert_eq!(stub.call_count(), 0);
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.advisory(), SIGN_IN_NOTICE);
        assert_eq!(outcome.into_summary(), compute_local_summary(&input()));
    }

    #[tokio::test]
    async fn test_blank_token_counts_as_no_session() {
        let stub = StubEvaluator::new(synced_response);
        let scorer = ReadinessScorer::new(stub.clone());
        let blank = ActiveSession {
            token: "  ".to_string(),
            profile_id: "p-1".to_string(),
        };

        let outcome = scorer.evaluate(&input(), Some(&blank)).await;

        assert_eq!(stub.call_count(), 0);
        assert!(matches!(
            outcome,
            EvaluationOutcome::Local {
                reason: FallbackReason::AuthenticationRequired,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_request_remote_summary_requires_token() {
        let scorer = ReadinessScorer::new(StubEvaluator::new(synced_response));
        let request = remote::build_evaluation_request(&input());
        let err = scorer
            .request_remote_summary("p-1", "", &request)
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Auth));
    }

    #[tokio::test]
    async fn test_malformed_remote_payload_falls_back() {
        fn bad_total() -> Result<EvaluationResponse, EvaluationError> {
            let mut response = synced_response()?;
            response.total_score = f64::INFINITY;
            Ok(response)
        }
        let scorer = ReadinessScorer::new(StubEvaluator::new(bad_total));

        let outcome = scorer.evaluate(&input(), Some(&session())).await;

        assert!(outcome.is_degraded());
        assert_eq!(outcome.summary(), &compute_local_summary(&input()));
    }
}
