//! Integration specifications for the loan sanction workflow.
//!
//! Scenarios exercise the public engine facade and the HTTP router with a
//! real CSV statement on disk, so document extraction, ingestion, analysis,
//! underwriting, and routing are validated together without reaching into
//! private modules.

mod common {
    use std::io::Write;
    use std::sync::Arc;

    use loan_ai::workflows::sanction::{
        AutoResumeDesk, CollaboratorError, CsvStatementExtractor, DecisionThresholds,
        ExtractedStatement, FinancialAnalystModel, FinancialAssessment, FinancialCategory,
        LoanSubmission, SanctionEngine, StatementClassifier, UnderwritingAssessment,
        UnderwritingAssessor, UnderwritingContext, UnderwritingDisposition, UserData,
    };

    pub(crate) const STATEMENT_CSV: &str = "Date,Description,Amount,Balance\n\
        2025-07-01,Monthly Salary,5000,6200\n\
        2025-07-03,Rent,-1500,4700\n";

    /// Classifier that trusts any text mentioning a salary line.
    pub(crate) struct SalaryLineClassifier {
        pub(crate) income: f64,
        pub(crate) expenses: f64,
    }

    impl StatementClassifier for SalaryLineClassifier {
        fn classify(&self, raw_text: &str) -> Result<ExtractedStatement, CollaboratorError> {
            Ok(ExtractedStatement {
                monthly_income: self.income,
                total_expenses: self.expenses,
                current_balance: 4700.0,
                is_valid_statement: raw_text.contains("Monthly Salary"),
            })
        }
    }

    pub(crate) struct RatioAnalyst;

    impl FinancialAnalystModel for RatioAnalyst {
        fn assess(
            &self,
            user_data: &UserData,
            _raw_text: &str,
        ) -> Result<FinancialAssessment, CollaboratorError> {
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
                reasoning: "ratio derived from ingested figures".to_string(),
            })
        }
    }

    pub(crate) struct CleanUnderwriter;

    impl UnderwritingAssessor for CleanUnderwriter {
        fn evaluate(
            &self,
            context: UnderwritingContext<'_>,
        ) -> Result<UnderwritingAssessment, CollaboratorError> {
            let disposition = if context.dti_ratio > 0.6 {
                UnderwritingDisposition::NotSanctioned
            } else {
                UnderwritingDisposition::Sanctioned
            };
            Ok(UnderwritingAssessment {
                disposition,
                irregularities_found: false,
                summary: "statement reconciles".to_string(),
            })
        }
    }

    pub(crate) fn engine(income: f64, expenses: f64) -> SanctionEngine {
        SanctionEngine::new(
            Arc::new(CsvStatementExtractor),
            Arc::new(SalaryLineClassifier { income, expenses }),
            Arc::new(RatioAnalyst),
            Arc::new(CleanUnderwriter),
            Arc::new(AutoResumeDesk),
            DecisionThresholds::default(),
        )
    }

    pub(crate) fn statement_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp statement");
        file.write_all(STATEMENT_CSV.as_bytes())
            .expect("write statement");
        file
    }

    pub(crate) fn submission(file_path: Option<std::path::PathBuf>) -> LoanSubmission {
        LoanSubmission {
            name: "Mr. Jack".to_string(),
            email: Some("jack@example.com".to_string()),
            mobile: Some("555-0100".to_string()),
            requested_amount: 50_000.0,
            file_path,
        }
    }
}

use axum::http::StatusCode;
use common::*;
use loan_ai::workflows::sanction::{sanction_router, FinalDecision, NodeId};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

#[test]
fn csv_statement_flows_to_an_approval() {
    let file = statement_file();
    let engine = engine(5000.0, 1500.0);

    let state = engine
        .run(submission(Some(file.path().to_path_buf())))
        .expect("run completes");

    assert_eq!(state.final_decision, Some(FinalDecision::Approved));
    assert_eq!(state.user_data.monthly_income, 5000.0);
    assert!(state.raw_financial_text.contains("Monthly Salary"));
    assert!(state.visited(NodeId::Sanctioned));
}

#[test]
fn high_ratio_statement_is_rejected() {
    let file = statement_file();
    let engine = engine(5000.0, 4000.0);

    let state = engine
        .run(submission(Some(file.path().to_path_buf())))
        .expect("run completes");

    assert_eq!(state.final_decision, Some(FinalDecision::Rejected));
    assert_eq!(state.dti_ratio(), 0.8);
}

#[test]
fn unsupported_document_terminates_on_the_feedback_branch() {
    let engine = engine(5000.0, 1500.0);

    let state = engine
        .run(submission(Some("statement.pdf".into())))
        .expect("run completes");

    assert_eq!(state.status_message, "Invalid Format");
    assert!(state.final_decision.is_none());
    assert!(state.visited(NodeId::UserFeedback));
    assert!(!state.visited(NodeId::FinancialAnalyst));
}

#[tokio::test]
async fn router_serves_the_full_workflow() {
    let file = statement_file();
    let router = sanction_router(Arc::new(engine(5000.0, 2750.0)));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/loans")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&submission(Some(file.path().to_path_buf()))).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");

    assert_eq!(payload.get("final_decision"), Some(&json!("Conditional")));
    assert_eq!(payload.get("financial_category"), Some(&json!("Moderate")));
    assert_eq!(
        payload.get("dti_ratio").and_then(Value::as_f64),
        Some(0.55)
    );
}
