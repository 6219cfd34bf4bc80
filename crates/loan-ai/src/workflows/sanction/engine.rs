//! The workflow engine: a fixed directed graph of stages driven from the
//! entry node to a terminal node, merging each stage's partial update into
//! the accumulated [`ApplicationState`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::collaborators::{
    FinancialAnalystModel, ReviewDesk, StatementClassifier, UnderwritingAssessor,
};
use super::domain::{LoanSubmission, UnderwritingDisposition};
use super::extraction::DocumentExtractor;
use super::nodes::{self, StageError};
use super::routing::{self, DecisionThresholds};
use super::state::{
    ApplicationState, StateUpdate, MAX_RISK_DTI, STATUS_INVALID_FINANCIALS, STATUS_INVALID_FORMAT,
};

/// Identifies one stage in the fixed workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Start,
    Ingestion,
    UserFeedback,
    FinancialAnalyst,
    RiskUnderwriter,
    ManualReview,
    Orchestrator,
    Sanctioned,
    NotSanctioned,
    ConditionalApproval,
}

impl NodeId {
    pub const COUNT: usize = 10;

    pub const fn label(self) -> &'static str {
        match self {
            NodeId::Start => "start",
            NodeId::Ingestion => "ingestion",
            NodeId::UserFeedback => "user_feedback",
            NodeId::FinancialAnalyst => "financial_analyst",
            NodeId::RiskUnderwriter => "risk_underwriter",
            NodeId::ManualReview => "manual_review",
            NodeId::Orchestrator => "orchestrator",
            NodeId::Sanctioned => "sanctioned",
            NodeId::NotSanctioned => "not_sanctioned",
            NodeId::ConditionalApproval => "conditional_approval",
        }
    }

    /// Terminal nodes have no outgoing edge and end the run.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            NodeId::UserFeedback
                | NodeId::Sanctioned
                | NodeId::NotSanctioned
                | NodeId::ConditionalApproval
        )
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Fault that escaped every per-node recovery policy. Callers surface this
/// as a single generic service error; under the fixed topology it should
/// be unreachable.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("workflow revisited node '{0}'")]
    NodeRevisited(&'static str),
}

/// Composes the stage functions and routing rules into the sanction graph.
/// Collaborators are injected at construction so deployments and tests can
/// substitute implementations freely. One engine serves many concurrent
/// runs; each run owns its state exclusively.
pub struct SanctionEngine {
    extractor: Arc<dyn DocumentExtractor>,
    statements: Arc<dyn StatementClassifier>,
    analyst: Arc<dyn FinancialAnalystModel>,
    underwriter: Arc<dyn UnderwritingAssessor>,
    review_desk: Arc<dyn ReviewDesk>,
    thresholds: DecisionThresholds,
}

impl SanctionEngine {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        statements: Arc<dyn StatementClassifier>,
        analyst: Arc<dyn FinancialAnalystModel>,
        underwriter: Arc<dyn UnderwritingAssessor>,
        review_desk: Arc<dyn ReviewDesk>,
        thresholds: DecisionThresholds,
    ) -> Self {
        Self {
            extractor,
            statements,
            analyst,
            underwriter,
            review_desk,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    /// Run a fresh submission from the entry node to a terminal node and
    /// return the final accumulated state.
    pub fn run(&self, submission: LoanSubmission) -> Result<ApplicationState, EngineError> {
        self.run_state(ApplicationState::from_submission(submission))
    }

    /// Drive an already-initialized state through the graph. Exposed so
    /// callers can pre-populate fields beyond the submission interface.
    pub fn run_state(&self, mut state: ApplicationState) -> Result<ApplicationState, EngineError> {
        let mut visited = [false; NodeId::COUNT];
        let mut current = NodeId::Start;

        loop {
            if visited[current.index()] {
                return Err(EngineError::NodeRevisited(current.label()));
            }
            visited[current.index()] = true;
            state.record_visit(current);

            let update = match self.execute(current, &state) {
                Ok(update) => update,
                Err(error) => {
                    warn!(node = current.label(), %error, "stage failed, applying recovery policy");
                    recovery_update(current, &error)
                }
            };
            state.apply(update);
            info!(node = current.label(), status = %state.status_message, "stage complete");

            match self.next(current, &state) {
                Some(next) => current = next,
                None => break,
            }
        }

        Ok(state)
    }

    fn execute(&self, node: NodeId, state: &ApplicationState) -> Result<StateUpdate, StageError> {
        match node {
            NodeId::Start => nodes::start(state),
            NodeId::Ingestion => {
                nodes::ingestion(state, self.extractor.as_ref(), self.statements.as_ref())
            }
            NodeId::UserFeedback => nodes::user_feedback(state),
            NodeId::FinancialAnalyst => nodes::financial_analyst(state, self.analyst.as_ref()),
            NodeId::RiskUnderwriter => nodes::risk_underwriter(state, self.underwriter.as_ref()),
            NodeId::ManualReview => nodes::manual_review(state, self.review_desk.as_ref()),
            NodeId::Orchestrator => nodes::orchestrator(state),
            NodeId::Sanctioned => nodes::sanctioned(state),
            NodeId::NotSanctioned => nodes::not_sanctioned(state),
            NodeId::ConditionalApproval => nodes::conditional_approval(state),
        }
    }

    /// Static successors plus the three conditional branches. Routing runs
    /// on the state as updated by the node just executed.
    fn next(&self, node: NodeId, state: &ApplicationState) -> Option<NodeId> {
        match node {
            NodeId::Start => Some(NodeId::Ingestion),
            NodeId::Ingestion => Some(routing::after_ingestion(state)),
            NodeId::FinancialAnalyst => Some(NodeId::RiskUnderwriter),
            NodeId::RiskUnderwriter => Some(routing::after_risk_underwriter(state)),
            NodeId::ManualReview => Some(NodeId::Orchestrator),
            NodeId::Orchestrator => Some(routing::final_decision(state, &self.thresholds)),
            NodeId::UserFeedback
            | NodeId::Sanctioned
            | NodeId::NotSanctioned
            | NodeId::ConditionalApproval => None,
        }
    }
}

/// Per-node failure policy. Ingestion failures of any kind collapse into
/// the invalid-format sentinel; analyst failures fall back to the maximum
/// risk short-circuit; underwriting failures are flagged for manual review.
fn recovery_update(node: NodeId, error: &StageError) -> StateUpdate {
    match node {
        NodeId::Ingestion => StateUpdate {
            status_message: Some(STATUS_INVALID_FORMAT.to_string()),
            ..StateUpdate::default()
        },
        NodeId::FinancialAnalyst => StateUpdate {
            dti_ratio: Some(MAX_RISK_DTI),
            status_message: Some(STATUS_INVALID_FINANCIALS.to_string()),
            ..StateUpdate::default()
        },
        NodeId::RiskUnderwriter => StateUpdate {
            irregularities_found: Some(true),
            status_message: Some(UnderwritingDisposition::FlagForReview.label().to_string()),
            reasoning: Some(format!("Underwriting unavailable: {error}")),
            ..StateUpdate::default()
        },
        // The remaining stages have no failure mode; annotate and continue.
        _ => StateUpdate {
            status_message: Some(format!("Stage failed: {error}")),
            ..StateUpdate::default()
        },
    }
}
