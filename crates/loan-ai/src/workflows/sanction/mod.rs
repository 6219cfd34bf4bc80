//! Multi-stage loan sanction decision workflow.
//!
//! An [`ApplicationState`] record is threaded through a fixed graph of
//! stages (ingestion, financial analysis, underwriting, manual review,
//! orchestration) with conditional routing between them. External
//! collaborators (document extraction and the three classifier contracts)
//! are injected behind traits so the workflow itself stays deterministic
//! and testable.

pub mod collaborators;
pub mod domain;
pub mod engine;
pub mod extraction;
pub(crate) mod nodes;
pub(crate) mod routing;
pub mod router;
pub mod state;

#[cfg(test)]
mod tests;

pub use collaborators::{
    AutoResumeDesk, CollaboratorError, ExtractedStatement, FinancialAnalystModel,
    FinancialAssessment, ReviewDesk, ReviewOutcome, StatementClassifier, UnderwritingAssessment,
    UnderwritingAssessor, UnderwritingContext,
};
pub use domain::{
    FinalDecision, FinancialCategory, LoanSubmission, UnderwritingDisposition, UserData,
};
pub use engine::{EngineError, NodeId, SanctionEngine};
pub use extraction::{CsvStatementExtractor, DocumentExtractor, ExtractionError};
pub use router::sanction_router;
pub use routing::DecisionThresholds;
pub use state::{
    ApplicationState, DecisionView, StateUpdate, TraceEntry, MAX_RISK_DTI,
    STATUS_AWAITING_RESUBMISSION, STATUS_EVALUATING, STATUS_INGESTED, STATUS_INVALID_FINANCIALS,
    STATUS_INVALID_FORMAT, STATUS_MANUAL_REVIEW_COMPLETE,
};
