use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::workflows::sanction::collaborators::{
    AutoResumeDesk, CollaboratorError, ExtractedStatement, FinancialAnalystModel,
    FinancialAssessment, ReviewDesk, ReviewOutcome, StatementClassifier, UnderwritingAssessment,
    UnderwritingAssessor, UnderwritingContext,
};
use crate::workflows::sanction::domain::{
    FinancialCategory, LoanSubmission, UnderwritingDisposition, UserData,
};
use crate::workflows::sanction::engine::SanctionEngine;
use crate::workflows::sanction::extraction::{DocumentExtractor, ExtractionError};
use crate::workflows::sanction::routing::DecisionThresholds;
use crate::workflows::sanction::state::ApplicationState;

pub(super) const SAMPLE_STATEMENT: &str = "Date,Description,Amount,Balance\n\
    2025-07-01,Monthly Salary,5000,6200\n\
    2025-07-03,Rent,-1500,4700\n\
    2025-07-10,Groceries,-400,4300";

pub(super) fn submission() -> LoanSubmission {
    LoanSubmission {
        name: "Mr. Jack".to_string(),
        email: Some("jack@example.com".to_string()),
        mobile: None,
        requested_amount: 50_000.0,
        file_path: Some("statement.csv".into()),
    }
}

pub(super) fn extracted(income: f64, expenses: f64, balance: f64) -> ExtractedStatement {
    ExtractedStatement {
        monthly_income: income,
        total_expenses: expenses,
        current_balance: balance,
        is_valid_statement: true,
    }
}

pub(super) fn clean_assessment() -> UnderwritingAssessment {
    UnderwritingAssessment {
        disposition: UnderwritingDisposition::Sanctioned,
        irregularities_found: false,
        summary: "no irregularities detected".to_string(),
    }
}

/// Extractor returning a fixed text regardless of the submitted path.
pub(super) struct StaticExtractor(pub(super) &'static str);

impl DocumentExtractor for StaticExtractor {
    fn extract(&self, _path: &Path) -> Result<String, ExtractionError> {
        Ok(self.0.to_string())
    }
}

pub(super) struct FailingExtractor;

impl DocumentExtractor for FailingExtractor {
    fn extract(&self, _path: &Path) -> Result<String, ExtractionError> {
        Err(ExtractionError::UnsupportedFormat {
            extension: Some("pdf".to_string()),
        })
    }
}

pub(super) struct StaticClassifier(pub(super) ExtractedStatement);

impl StatementClassifier for StaticClassifier {
    fn classify(&self, _raw_text: &str) -> Result<ExtractedStatement, CollaboratorError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingClassifier;

impl StatementClassifier for FailingClassifier {
    fn classify(&self, _raw_text: &str) -> Result<ExtractedStatement, CollaboratorError> {
        Err(CollaboratorError::Timeout)
    }
}

/// Analyst computing the ratio from the enriched figures. Invocations are
/// counted so tests can assert the income guard never consults it.
#[derive(Default)]
pub(super) struct RatioAnalyst {
    pub(super) calls: AtomicUsize,
}

impl RatioAnalyst {
    pub(super) fn invocations(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl FinancialAnalystModel for RatioAnalyst {
    fn assess(
        &self,
        user_data: &UserData,
        _raw_text: &str,
    ) -> Result<FinancialAssessment, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let dti_ratio = user_data.total_expenses / user_data.monthly_income;
        let category = if dti_ratio < 0.4 {
            FinancialCategory::Stable
        } else if dti_ratio <= 0.6 {
            FinancialCategory::Moderate
        } else {
            FinancialCategory::HighRisk
        };
        Ok(FinancialAssessment {
            dti_ratio,
            category,
            reasoning: format!(
                "expenses {:.0} against income {:.0}",
                user_data.total_expenses, user_data.monthly_income
            ),
        })
    }
}

pub(super) struct FailingAnalyst;

impl FinancialAnalystModel for FailingAnalyst {
    fn assess(
        &self,
        _user_data: &UserData,
        _raw_text: &str,
    ) -> Result<FinancialAssessment, CollaboratorError> {
        Err(CollaboratorError::Unavailable("analyst offline".to_string()))
    }
}

pub(super) struct StaticUnderwriter(pub(super) UnderwritingAssessment);

impl UnderwritingAssessor for StaticUnderwriter {
    fn evaluate(
        &self,
        _context: UnderwritingContext<'_>,
    ) -> Result<UnderwritingAssessment, CollaboratorError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingUnderwriter;

impl UnderwritingAssessor for FailingUnderwriter {
    fn evaluate(
        &self,
        _context: UnderwritingContext<'_>,
    ) -> Result<UnderwritingAssessment, CollaboratorError> {
        Err(CollaboratorError::Malformed("truncated verdict".to_string()))
    }
}

pub(super) struct OverrideDesk(pub(super) ReviewOutcome);

impl ReviewDesk for OverrideDesk {
    fn review(&self, _state: &ApplicationState) -> ReviewOutcome {
        self.0.clone()
    }
}

pub(super) fn engine_with(
    extractor: Arc<dyn DocumentExtractor>,
    classifier: Arc<dyn StatementClassifier>,
    analyst: Arc<dyn FinancialAnalystModel>,
    underwriter: Arc<dyn UnderwritingAssessor>,
    desk: Arc<dyn ReviewDesk>,
) -> SanctionEngine {
    SanctionEngine::new(
        extractor,
        classifier,
        analyst,
        underwriter,
        desk,
        DecisionThresholds::default(),
    )
}

/// Engine wired for the straight-through path: fixed statement text, the
/// given extracted figures, ratio-derived analysis, and a clean verdict.
pub(super) fn happy_engine(income: f64, expenses: f64) -> (SanctionEngine, Arc<RatioAnalyst>) {
    let analyst = Arc::new(RatioAnalyst::default());
    let engine = engine_with(
        Arc::new(StaticExtractor(SAMPLE_STATEMENT)),
        Arc::new(StaticClassifier(extracted(income, expenses, 1200.0))),
        analyst.clone(),
        Arc::new(StaticUnderwriter(clean_assessment())),
        Arc::new(AutoResumeDesk),
    );
    (engine, analyst)
}
