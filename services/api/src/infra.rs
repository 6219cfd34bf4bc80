use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use loan_ai::workflows::sanction::{
    AutoResumeDesk, CollaboratorError, CsvStatementExtractor, DecisionThresholds,
    ExtractedStatement, FinancialAnalystModel, FinancialAssessment, FinancialCategory,
    SanctionEngine, StatementClassifier, UnderwritingAssessment, UnderwritingAssessor,
    UnderwritingContext, UnderwritingDisposition, UserData,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the engine with the in-process collaborator implementations. The
/// deterministic heuristics below stand in for the model-backed clients a
/// production deployment would inject.
pub(crate) fn build_engine(thresholds: DecisionThresholds) -> SanctionEngine {
    SanctionEngine::new(
        Arc::new(CsvStatementExtractor),
        Arc::new(LedgerStatementClassifier),
        Arc::new(RubricFinancialAnalyst),
        Arc::new(PolicyUnderwriter::default()),
        Arc::new(AutoResumeDesk),
        thresholds,
    )
}

/// Statement classifier reading the flattened ledger text produced by the
/// extractor: one `Date,Description,Amount,Balance` record per line.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LedgerStatementClassifier;

impl StatementClassifier for LedgerStatementClassifier {
    fn classify(&self, raw_text: &str) -> Result<ExtractedStatement, CollaboratorError> {
        let mut monthly_income = 0.0;
        let mut total_expenses = 0.0;
        let mut current_balance = None;

        for line in raw_text.lines().skip(1) {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 3 {
                continue;
            }
            let description = fields[1].to_ascii_lowercase();
            let Some(amount) = parse_amount(fields[2]) else {
                continue;
            };

            if description.contains("salary") {
                monthly_income += amount.abs();
            } else if amount < 0.0 {
                total_expenses += -amount;
            }

            if let Some(balance) = fields.get(3).and_then(|field| parse_amount(field)) {
                current_balance = Some(balance);
            }
        }

        let Some(current_balance) = current_balance else {
            return Err(CollaboratorError::Malformed(
                "statement has no balance column".to_string(),
            ));
        };

        Ok(ExtractedStatement {
            monthly_income,
            total_expenses,
            current_balance,
            is_valid_statement: monthly_income > 0.0,
        })
    }
}

fn parse_amount(field: &str) -> Option<f64> {
    field.trim().trim_start_matches('$').parse::<f64>().ok()
}

/// Analyst applying the standard rubric: strict expenses/income ratio
/// bucketed into Stable (< 0.4), Moderate (0.4–0.6), and High Risk (> 0.6).
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RubricFinancialAnalyst;

impl FinancialAnalystModel for RubricFinancialAnalyst {
    fn assess(
        &self,
        user_data: &UserData,
        _raw_text: &str,
    ) -> Result<FinancialAssessment, CollaboratorError> {
        // The stage guard rejects non-positive income before this runs.
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
                "monthly expenses {:.2} against income {:.2} with balance {:.2}",
                user_data.total_expenses, user_data.monthly_income, user_data.current_balance
            ),
        })
    }
}

const CRITICAL_DTI: f64 = 0.75;
const SUSPICIOUS_MARKERS: [&str; 4] = ["cash advance", "wire transfer", "casino", "crypto"];

/// Underwriter applying the bank's sanction policy over the analyzed
/// figures and a keyword sweep of the raw statement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PolicyUnderwriter {
    /// Requested amounts above this always need review for moderate risk.
    pub(crate) review_amount_floor: f64,
}

impl Default for PolicyUnderwriter {
    fn default() -> Self {
        Self {
            review_amount_floor: 50_000.0,
        }
    }
}

impl UnderwritingAssessor for PolicyUnderwriter {
    fn evaluate(
        &self,
        context: UnderwritingContext<'_>,
    ) -> Result<UnderwritingAssessment, CollaboratorError> {
        let statement = context.raw_statement.to_ascii_lowercase();
        let suspicious = SUSPICIOUS_MARKERS
            .iter()
            .find(|marker| statement.contains(**marker))
            .copied();
        let irregularities_found = suspicious.is_some() || context.dti_ratio >= CRITICAL_DTI;

        let disposition = if context.dti_ratio > 0.6 {
            UnderwritingDisposition::NotSanctioned
        } else if suspicious.is_some() {
            UnderwritingDisposition::FlagForReview
        } else if context.requested_amount > self.review_amount_floor
            && context.category == Some(FinancialCategory::Moderate)
        {
            UnderwritingDisposition::FlagForReview
        } else if context.dti_ratio <= 0.4 {
            UnderwritingDisposition::Sanctioned
        } else {
            UnderwritingDisposition::ConditionalApproval
        };

        let summary = match suspicious {
            Some(marker) => format!(
                "statement contains '{marker}' activity at DTI {:.2}",
                context.dti_ratio
            ),
            None => format!(
                "DTI {:.2} for requested amount {:.2}",
                context.dti_ratio, context.requested_amount
            ),
        };

        Ok(UnderwritingAssessment {
            disposition,
            irregularities_found,
            summary,
        })
    }
}
