use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{FinalDecision, FinancialCategory, LoanSubmission, UserData};
use super::engine::NodeId;

/// Sole status sentinel consulted by routing after ingestion.
pub const STATUS_INVALID_FORMAT: &str = "Invalid Format";
/// Set by the analyst when income makes the DTI calculation degenerate.
pub const STATUS_INVALID_FINANCIALS: &str = "Invalid Financials";
pub const STATUS_INGESTED: &str = "SUCCESS";
pub const STATUS_AWAITING_RESUBMISSION: &str = "Waiting for correct format";
pub const STATUS_MANUAL_REVIEW_COMPLETE: &str = "Manual Review Completed";
pub const STATUS_EVALUATING: &str = "Evaluating final criteria";

/// Ratio applied when analysis never produced one. Maximum risk.
pub const MAX_RISK_DTI: f64 = 1.0;

/// The single mutable record threaded through a workflow run. One instance
/// per run; stages contribute [`StateUpdate`]s that merge additively.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationState {
    pub user_data: UserData,
    pub raw_financial_text: String,
    pub status_message: String,
    dti_ratio: Option<f64>,
    pub financial_category: Option<FinancialCategory>,
    pub irregularities_found: bool,
    pub reasoning: String,
    pub final_status: String,
    pub final_decision: Option<FinalDecision>,
    trace: Vec<TraceEntry>,
}

/// One visited node, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub node: NodeId,
    pub at: DateTime<Utc>,
}

impl ApplicationState {
    pub fn from_submission(submission: LoanSubmission) -> Self {
        Self {
            user_data: UserData {
                name: Some(submission.name),
                email: submission.email,
                mobile: submission.mobile,
                requested_amount: submission.requested_amount,
                file_path: submission.file_path,
                ..UserData::default()
            },
            ..Self::default()
        }
    }

    /// Defaults to [`MAX_RISK_DTI`] so routing predicates stay total.
    pub fn dti_ratio(&self) -> f64 {
        self.dti_ratio.unwrap_or(MAX_RISK_DTI)
    }

    /// Whether any stage has produced a ratio yet.
    pub fn has_dti_ratio(&self) -> bool {
        self.dti_ratio.is_some()
    }

    pub(crate) fn record_visit(&mut self, node: NodeId) {
        self.trace.push(TraceEntry {
            node,
            at: Utc::now(),
        });
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn visited(&self, node: NodeId) -> bool {
        self.trace.iter().any(|entry| entry.node == node)
    }

    /// Merge a stage's partial update into the accumulated record. Unset
    /// fields leave the current value untouched; `reasoning` accumulates.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(user_data) = update.user_data {
            self.user_data = user_data;
        }
        if let Some(raw_financial_text) = update.raw_financial_text {
            self.raw_financial_text = raw_financial_text;
        }
        if let Some(status_message) = update.status_message {
            self.status_message = status_message;
        }
        if let Some(dti_ratio) = update.dti_ratio {
            self.dti_ratio = Some(dti_ratio);
        }
        if let Some(financial_category) = update.financial_category {
            self.financial_category = Some(financial_category);
        }
        if let Some(irregularities_found) = update.irregularities_found {
            self.irregularities_found = irregularities_found;
        }
        if let Some(reasoning) = update.reasoning {
            if self.reasoning.is_empty() {
                self.reasoning = reasoning;
            } else {
                self.reasoning.push('\n');
                self.reasoning.push_str(&reasoning);
            }
        }
        if let Some(final_status) = update.final_status {
            self.final_status = final_status;
        }
        if let Some(final_decision) = update.final_decision {
            self.final_decision = Some(final_decision);
        }
    }

    /// Sanitized representation of the run outcome for API responses.
    pub fn decision_view(&self) -> DecisionView {
        DecisionView {
            status_message: self.status_message.clone(),
            final_status: self.final_status.clone(),
            final_decision: self.final_decision.map(FinalDecision::label),
            dti_ratio: self.dti_ratio(),
            financial_category: self.financial_category.map(FinancialCategory::label),
            irregularities_found: self.irregularities_found,
            reasoning: self.reasoning.clone(),
            visited: self.trace.iter().map(|entry| entry.node.label()).collect(),
        }
    }
}

/// Partial update contributed by a single stage. Fields left `None` are not
/// merged, so a stage only ever writes what it owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub user_data: Option<UserData>,
    pub raw_financial_text: Option<String>,
    pub status_message: Option<String>,
    pub dti_ratio: Option<f64>,
    pub financial_category: Option<FinancialCategory>,
    pub irregularities_found: Option<bool>,
    pub reasoning: Option<String>,
    pub final_status: Option<String>,
    pub final_decision: Option<FinalDecision>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionView {
    pub status_message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub final_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_decision: Option<&'static str>,
    pub dti_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_category: Option<&'static str>,
    pub irregularities_found: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reasoning: String,
    pub visited: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_routing_predicates_total() {
        let state = ApplicationState::default();
        assert_eq!(state.dti_ratio(), MAX_RISK_DTI);
        assert!(!state.has_dti_ratio());
        assert!(!state.irregularities_found);
        assert!(state.final_decision.is_none());
        assert!(state.status_message.is_empty());
    }

    #[test]
    fn apply_merges_without_clearing_previous_fields() {
        let mut state = ApplicationState::default();
        state.apply(StateUpdate {
            raw_financial_text: Some("statement text".to_string()),
            status_message: Some(STATUS_INGESTED.to_string()),
            ..StateUpdate::default()
        });
        state.apply(StateUpdate {
            dti_ratio: Some(0.31),
            status_message: Some("Analysis Complete".to_string()),
            ..StateUpdate::default()
        });

        assert_eq!(state.raw_financial_text, "statement text");
        assert_eq!(state.status_message, "Analysis Complete");
        assert_eq!(state.dti_ratio(), 0.31);
    }

    #[test]
    fn reasoning_accumulates_across_stages() {
        let mut state = ApplicationState::default();
        state.apply(StateUpdate {
            reasoning: Some("first".to_string()),
            ..StateUpdate::default()
        });
        state.apply(StateUpdate {
            reasoning: Some("second".to_string()),
            ..StateUpdate::default()
        });
        assert_eq!(state.reasoning, "first\nsecond");
    }

    #[test]
    fn from_submission_carries_identity_and_defaults() {
        let state = ApplicationState::from_submission(LoanSubmission {
            name: "Mr. Jack".to_string(),
            email: None,
            mobile: None,
            requested_amount: 50_000.0,
            file_path: None,
        });
        assert_eq!(state.user_data.name.as_deref(), Some("Mr. Jack"));
        assert_eq!(state.user_data.requested_amount, 50_000.0);
        assert_eq!(state.user_data.monthly_income, 0.0);
        assert!(state.trace().is_empty());
    }
}
