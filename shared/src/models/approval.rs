//! Approval history models
//!
//! One immutable record is appended per purchase request transition.
//! Rows are never updated or deleted.

use serde::{Deserialize, Serialize};

/// Who acted: the requester (0), the department manager (1), or finance (2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    Requester,
    Manager,
    Finance,
}

impl ApprovalLevel {
    pub fn as_i16(&self) -> i16 {
        match self {
            ApprovalLevel::Requester => 0,
            ApprovalLevel::Manager => 1,
            ApprovalLevel::Finance => 2,
        }
    }

    pub fn from_i16(level: i16) -> Option<Self> {
        match level {
            0 => Some(ApprovalLevel::Requester),
            1 => Some(ApprovalLevel::Manager),
            2 => Some(ApprovalLevel::Finance),
            _ => None,
        }
    }
}

/// Action recorded in an approval history row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Approved,
    Rejected,
    Cancelled,
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Approved => "approved",
            ApprovalAction::Rejected => "rejected",
            ApprovalAction::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(ApprovalAction::Approved),
            "rejected" => Some(ApprovalAction::Rejected),
            "cancelled" => Some(ApprovalAction::Cancelled),
            _ => None,
        }
    }
}
