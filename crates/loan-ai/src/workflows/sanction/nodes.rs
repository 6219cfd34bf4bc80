//! Stage functions, one per workflow node.
//!
//! Every stage is a function from the accumulated state to a partial
//! update. A stage that cannot produce its update returns a [`StageError`];
//! the engine translates that into the owning node's failure policy so no
//! fault ever crosses a node boundary unhandled.

use super::collaborators::{
    FinancialAnalystModel, ReviewDesk, StatementClassifier, UnderwritingAssessor,
    UnderwritingContext,
};
use super::domain::{FinalDecision, UnderwritingDisposition};
use super::extraction::DocumentExtractor;
use super::state::{
    ApplicationState, StateUpdate, MAX_RISK_DTI, STATUS_AWAITING_RESUBMISSION,
    STATUS_EVALUATING, STATUS_INGESTED, STATUS_INVALID_FINANCIALS, STATUS_MANUAL_REVIEW_COMPLETE,
};

/// Failure raised inside a stage before the engine normalizes it into
/// state fields.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("no document was attached to the application")]
    MissingDocument,
    #[error("the attached document is not a readable bank statement")]
    NotAStatement,
    #[error(transparent)]
    Extraction(#[from] super::extraction::ExtractionError),
    #[error(transparent)]
    Collaborator(#[from] super::collaborators::CollaboratorError),
}

pub(crate) fn start(_state: &ApplicationState) -> Result<StateUpdate, StageError> {
    Ok(StateUpdate::default())
}

/// Read the submitted document, validate it as a bank statement, and enrich
/// `user_data` with the extracted figures.
pub(crate) fn ingestion(
    state: &ApplicationState,
    extractor: &dyn DocumentExtractor,
    classifier: &dyn StatementClassifier,
) -> Result<StateUpdate, StageError> {
    let path = state
        .user_data
        .file_path
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(StageError::MissingDocument)?;

    let raw_text = extractor.extract(path)?;
    let extracted = classifier.classify(&raw_text)?;
    if !extracted.is_valid_statement {
        return Err(StageError::NotAStatement);
    }

    let mut user_data = state.user_data.clone();
    user_data.monthly_income = extracted.monthly_income;
    user_data.total_expenses = extracted.total_expenses;
    user_data.current_balance = extracted.current_balance;

    Ok(StateUpdate {
        user_data: Some(user_data),
        raw_financial_text: Some(raw_text),
        status_message: Some(STATUS_INGESTED.to_string()),
        ..StateUpdate::default()
    })
}

/// Terminal stage for rejected documents. The ingestion sentinel stays in
/// `status_message`; the resubmission guidance lands in `final_status`.
pub(crate) fn user_feedback(_state: &ApplicationState) -> Result<StateUpdate, StageError> {
    Ok(StateUpdate {
        final_status: Some(STATUS_AWAITING_RESUBMISSION.to_string()),
        ..StateUpdate::default()
    })
}

pub(crate) fn financial_analyst(
    state: &ApplicationState,
    analyst: &dyn FinancialAnalystModel,
) -> Result<StateUpdate, StageError> {
    let income = state.user_data.monthly_income;

    // Degenerate income short-circuits to maximum risk; the collaborator is
    // never consulted, which also guards the DTI division downstream.
    if income <= 0.0 {
        return Ok(StateUpdate {
            dti_ratio: Some(MAX_RISK_DTI),
            status_message: Some(STATUS_INVALID_FINANCIALS.to_string()),
            ..StateUpdate::default()
        });
    }

    let assessment = analyst.assess(&state.user_data, &state.raw_financial_text)?;

    Ok(StateUpdate {
        dti_ratio: Some(assessment.dti_ratio),
        financial_category: Some(assessment.category),
        status_message: Some(format!("Analysis Complete: {}", assessment.reasoning)),
        ..StateUpdate::default()
    })
}

pub(crate) fn risk_underwriter(
    state: &ApplicationState,
    assessor: &dyn UnderwritingAssessor,
) -> Result<StateUpdate, StageError> {
    let assessment = assessor.evaluate(UnderwritingContext {
        dti_ratio: state.dti_ratio(),
        category: state.financial_category,
        requested_amount: state.user_data.requested_amount,
        raw_statement: &state.raw_financial_text,
    })?;

    // Either signal alone is enough to require manual review.
    let irregularities_found = assessment.irregularities_found
        || assessment.disposition == UnderwritingDisposition::FlagForReview;

    Ok(StateUpdate {
        irregularities_found: Some(irregularities_found),
        reasoning: Some(format!("Underwriting Complete: {}", assessment.summary)),
        status_message: Some(assessment.disposition.label().to_string()),
        ..StateUpdate::default()
    })
}

/// Human-in-the-loop pause point. The desk may override the irregularity
/// flag or pick the final decision before the run resumes.
pub(crate) fn manual_review(
    state: &ApplicationState,
    desk: &dyn ReviewDesk,
) -> Result<StateUpdate, StageError> {
    let outcome = desk.review(state);

    Ok(StateUpdate {
        status_message: Some(
            outcome
                .note
                .unwrap_or_else(|| STATUS_MANUAL_REVIEW_COMPLETE.to_string()),
        ),
        irregularities_found: outcome.irregularities_override,
        final_decision: outcome.decision_override,
        ..StateUpdate::default()
    })
}

/// Aggregation seam ahead of the final routing decision.
pub(crate) fn orchestrator(_state: &ApplicationState) -> Result<StateUpdate, StageError> {
    Ok(StateUpdate {
        final_status: Some(STATUS_EVALUATING.to_string()),
        ..StateUpdate::default()
    })
}

pub(crate) fn sanctioned(_state: &ApplicationState) -> Result<StateUpdate, StageError> {
    Ok(StateUpdate {
        final_decision: Some(FinalDecision::Approved),
        ..StateUpdate::default()
    })
}

pub(crate) fn not_sanctioned(_state: &ApplicationState) -> Result<StateUpdate, StageError> {
    Ok(StateUpdate {
        final_decision: Some(FinalDecision::Rejected),
        ..StateUpdate::default()
    })
}

pub(crate) fn conditional_approval(_state: &ApplicationState) -> Result<StateUpdate, StageError> {
    Ok(StateUpdate {
        final_decision: Some(FinalDecision::Conditional),
        ..StateUpdate::default()
    })
}
