use std::path::PathBuf;

use clap::Args;

use loan_ai::error::AppError;
use loan_ai::workflows::sanction::{
    ApplicationState, DecisionThresholds, FinalDecision, LoanSubmission,
};

use crate::infra::build_engine;

const STABLE_STATEMENT: &str = "Date,Description,Amount,Balance\n\
    2025-07-01,Monthly Salary,5000,6200\n\
    2025-07-03,Rent,-1100,5100\n\
    2025-07-10,Groceries,-400,4700\n";

const MODERATE_STATEMENT: &str = "Date,Description,Amount,Balance\n\
    2025-07-01,Monthly Salary,5000,5400\n\
    2025-07-02,Rent,-1500,3900\n\
    2025-07-08,Car Loan,-650,3250\n\
    2025-07-12,Casino Deposit,-600,2650\n";

const OVEREXTENDED_STATEMENT: &str = "Date,Description,Amount,Balance\n\
    2025-07-01,Monthly Salary,5000,5150\n\
    2025-07-02,Rent,-2200,2950\n\
    2025-07-05,Credit Card,-1300,1650\n\
    2025-07-18,Utilities,-500,1150\n";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Path to a CSV bank statement; canned scenarios run when omitted
    #[arg(long)]
    pub(crate) statement: Option<PathBuf>,
    /// Requested loan amount
    #[arg(long, default_value_t = 25_000.0)]
    pub(crate) amount: f64,
    /// Applicant name shown in the output
    #[arg(long, default_value = "Mr. Jack")]
    pub(crate) name: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = build_engine(DecisionThresholds::default());

    println!("Loan sanction workflow demo");

    let scenarios: Vec<(String, PathBuf)> = match args.statement {
        Some(path) => vec![("submitted statement".to_string(), path)],
        None => canned_statements()?,
    };

    for (label, path) in scenarios {
        let submission = LoanSubmission {
            name: args.name.clone(),
            email: None,
            mobile: None,
            requested_amount: args.amount,
            file_path: Some(path),
        };

        let state = engine.run(submission)?;
        render_outcome(&label, &state);
    }

    Ok(())
}

fn canned_statements() -> Result<Vec<(String, PathBuf)>, AppError> {
    let dir = std::env::temp_dir().join("loan-ai-demo");
    std::fs::create_dir_all(&dir)?;

    let mut scenarios = Vec::new();
    for (label, contents) in [
        ("stable applicant", STABLE_STATEMENT),
        ("moderate applicant with flagged activity", MODERATE_STATEMENT),
        ("overextended applicant", OVEREXTENDED_STATEMENT),
    ] {
        let path = dir.join(format!("{}.csv", label.replace(' ', "-")));
        std::fs::write(&path, contents)?;
        scenarios.push((label.to_string(), path));
    }

    Ok(scenarios)
}

fn render_outcome(label: &str, state: &ApplicationState) {
    println!("\nScenario: {label}");
    println!(
        "- path: {}",
        state
            .trace()
            .iter()
            .map(|entry| entry.node.label())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    println!(
        "- dti ratio {:.2} | category {}",
        state.dti_ratio(),
        state
            .financial_category
            .map(|category| category.label())
            .unwrap_or("n/a")
    );
    if state.irregularities_found {
        println!("- irregularities noted; manual review completed");
    }
    match state.final_decision {
        Some(FinalDecision::Approved) => println!("- decision: APPROVED"),
        Some(FinalDecision::Rejected) => println!("- decision: REJECTED"),
        Some(FinalDecision::Conditional) => {
            println!("- decision: CONDITIONAL (more information requested)")
        }
        None => println!("- no decision: {}", state.status_message),
    }
    if !state.reasoning.is_empty() {
        println!("- reasoning: {}", state.reasoning.replace('\n', "; "));
    }
}
