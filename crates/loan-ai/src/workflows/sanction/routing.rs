//! Conditional edges: pure, total decision functions over the accumulated
//! state. Every predicate handles defaulted fields, so routing never fails
//! mid-run.

use serde::{Deserialize, Serialize};

use super::domain::FinalDecision;
use super::engine::NodeId;
use super::state::{ApplicationState, STATUS_INVALID_FORMAT};

/// DTI cut-offs separating approval, conditional approval, and rejection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Ratios at or below this approve outright.
    pub approve_below: f64,
    /// Ratios strictly above this reject outright; the band in between is
    /// a conditional approval.
    pub reject_above: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            approve_below: 0.40,
            reject_above: 0.60,
        }
    }
}

pub(crate) fn after_ingestion(state: &ApplicationState) -> NodeId {
    if state.status_message == STATUS_INVALID_FORMAT {
        NodeId::UserFeedback
    } else {
        NodeId::FinancialAnalyst
    }
}

pub(crate) fn after_risk_underwriter(state: &ApplicationState) -> NodeId {
    if state.irregularities_found {
        NodeId::ManualReview
    } else {
        NodeId::Orchestrator
    }
}

/// Pick the terminal branch. A reviewer override selects its branch
/// directly; otherwise the DTI thresholds decide. The irregularity flag is
/// deliberately not consulted here (see DESIGN.md).
pub(crate) fn final_decision(state: &ApplicationState, thresholds: &DecisionThresholds) -> NodeId {
    if let Some(decision) = state.final_decision {
        return match decision {
            FinalDecision::Approved => NodeId::Sanctioned,
            FinalDecision::Rejected => NodeId::NotSanctioned,
            FinalDecision::Conditional => NodeId::ConditionalApproval,
        };
    }

    let dti = state.dti_ratio();
    if dti <= thresholds.approve_below {
        NodeId::Sanctioned
    } else if dti > thresholds.reject_above {
        NodeId::NotSanctioned
    } else {
        NodeId::ConditionalApproval
    }
}
