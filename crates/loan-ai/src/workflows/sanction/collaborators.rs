//! Contracts for the external analysis collaborators.
//!
//! The engine never talks to a classifier directly; each stage consumes one
//! of these traits so deployments can wire in model-backed clients while
//! tests substitute deterministic stand-ins. Faults surface as
//! [`CollaboratorError`] and are normalized at the node boundary; they
//! never escape a stage as a raw fault.

use serde::{Deserialize, Serialize};

use super::domain::{FinalDecision, FinancialCategory, UnderwritingDisposition, UserData};
use super::state::ApplicationState;

/// Structured output of the statement-validity classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedStatement {
    pub monthly_income: f64,
    pub total_expenses: f64,
    pub current_balance: f64,
    pub is_valid_statement: bool,
}

/// Structured output of the financial-health analyst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAssessment {
    pub dti_ratio: f64,
    pub category: FinancialCategory,
    pub reasoning: String,
}

/// Structured output of the underwriting assessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingAssessment {
    pub disposition: UnderwritingDisposition,
    pub irregularities_found: bool,
    pub summary: String,
}

/// Inputs handed to the underwriting assessor. `category` is `None` when
/// the analyst stage never produced one.
#[derive(Debug, Clone, Copy)]
pub struct UnderwritingContext<'a> {
    pub dti_ratio: f64,
    pub category: Option<FinancialCategory>,
    pub requested_amount: f64,
    pub raw_statement: &'a str,
}

/// Failure signal shared by every classifier contract. Timeouts and
/// malformed structured responses collapse into the owning node's policy.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("collaborator returned a malformed response: {0}")]
    Malformed(String),
    #[error("collaborator timed out")]
    Timeout,
}

/// Validates a raw statement and extracts the headline figures.
pub trait StatementClassifier: Send + Sync {
    fn classify(&self, raw_text: &str) -> Result<ExtractedStatement, CollaboratorError>;
}

/// Assesses financial health: DTI ratio, category, and reasoning.
pub trait FinancialAnalystModel: Send + Sync {
    fn assess(
        &self,
        user_data: &UserData,
        raw_text: &str,
    ) -> Result<FinancialAssessment, CollaboratorError>;
}

/// Renders an underwriting verdict over the analyzed application.
pub trait UnderwritingAssessor: Send + Sync {
    fn evaluate(
        &self,
        context: UnderwritingContext<'_>,
    ) -> Result<UnderwritingAssessment, CollaboratorError>;
}

/// Human-in-the-loop seam consulted by the manual-review stage. A desk may
/// annotate the run and override the irregularity flag or the final
/// decision before the workflow resumes.
pub trait ReviewDesk: Send + Sync {
    fn review(&self, state: &ApplicationState) -> ReviewOutcome;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewOutcome {
    pub note: Option<String>,
    pub irregularities_override: Option<bool>,
    pub decision_override: Option<FinalDecision>,
}

/// Default desk: records the completion annotation and resumes
/// automatically without touching the state.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoResumeDesk;

impl ReviewDesk for AutoResumeDesk {
    fn review(&self, _state: &ApplicationState) -> ReviewOutcome {
        ReviewOutcome::default()
    }
}
