use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Applicant identity plus the financial figures enriched during ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub requested_amount: f64,
    pub file_path: Option<PathBuf>,
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub current_balance: f64,
}

/// Inbound payload starting a workflow run. Everything beyond the document
/// handle, requested amount, and identity fields defaults inside the state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSubmission {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    pub requested_amount: f64,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

/// Financial health bucket assigned by the analyst stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinancialCategory {
    Stable,
    Moderate,
    HighRisk,
}

impl FinancialCategory {
    pub const fn label(self) -> &'static str {
        match self {
            FinancialCategory::Stable => "Stable",
            FinancialCategory::Moderate => "Moderate",
            FinancialCategory::HighRisk => "High Risk",
        }
    }

    /// Map collaborator free text onto the closed set. Anything unrecognized
    /// is treated as maximum risk rather than propagated verbatim.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "stable" => FinancialCategory::Stable,
            "moderate" => FinancialCategory::Moderate,
            _ => FinancialCategory::HighRisk,
        }
    }
}

/// Terminal outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalDecision {
    Approved,
    Rejected,
    Conditional,
}

impl FinalDecision {
    pub const fn label(self) -> &'static str {
        match self {
            FinalDecision::Approved => "Approved",
            FinalDecision::Rejected => "Rejected",
            FinalDecision::Conditional => "Conditional",
        }
    }
}

/// Verdict returned by the underwriting collaborator. `FlagForReview` is one
/// of the two independent signals that can send a run to manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnderwritingDisposition {
    Sanctioned,
    NotSanctioned,
    ConditionalApproval,
    FlagForReview,
}

impl UnderwritingDisposition {
    pub const fn label(self) -> &'static str {
        match self {
            UnderwritingDisposition::Sanctioned => "Sanctioned",
            UnderwritingDisposition::NotSanctioned => "Not Sanctioned",
            UnderwritingDisposition::ConditionalApproval => "Conditional Approval",
            UnderwritingDisposition::FlagForReview => "Flag for Review",
        }
    }

    /// Map collaborator free text onto the closed set, accepting the
    /// "proceed"/"reject" phrasing some assessors use. Unrecognized verdicts
    /// fall back to a manual-review flag.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sanctioned" | "proceed" | "approve" | "approved" => {
                UnderwritingDisposition::Sanctioned
            }
            "not sanctioned" | "reject" | "rejected" => UnderwritingDisposition::NotSanctioned,
            "conditional approval" | "conditional" => UnderwritingDisposition::ConditionalApproval,
            _ => UnderwritingDisposition::FlagForReview,
        }
    }
}
