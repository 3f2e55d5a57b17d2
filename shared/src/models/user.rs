//! User role model
//!
//! User and department master data are external collaborators; the roles
//! are defined here because the approval chain is gated on them.

use serde::{Deserialize, Serialize};

/// Roles within a business, ordered by approval authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Employee,
    Manager,
    Finance,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "employee",
            UserRole::Manager => "manager",
            UserRole::Finance => "finance",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "employee" => Some(UserRole::Employee),
            "manager" => Some(UserRole::Manager),
            "finance" => Some(UserRole::Finance),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// First approval level: the department manager
    pub fn can_approve_as_manager(&self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Admin)
    }

    /// Second approval level: finance
    pub fn can_approve_as_finance(&self) -> bool {
        matches!(self, UserRole::Finance | UserRole::Admin)
    }
}
