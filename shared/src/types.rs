//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Thai,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Thai => "th",
            Language::English => "en",
        }
    }
}

/// Kinds of documents that receive sequential numbers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PurchaseRequest,
    PurchaseOrder,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::PurchaseRequest => "PR",
            DocumentKind::PurchaseOrder => "PO",
        }
    }

    /// Scope period for the sequence: month for PRs, year for POs
    pub fn period(&self, date: chrono::NaiveDate) -> String {
        use chrono::Datelike;
        match self {
            DocumentKind::PurchaseRequest => format!("{}{:02}", date.year(), date.month()),
            DocumentKind::PurchaseOrder => format!("{}", date.year()),
        }
    }

    /// Format a full document number from a period and sequence value
    pub fn format_number(&self, period: &str, sequence: i64) -> String {
        format!("{}-{}-{:04}", self.prefix(), period, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_pr_number_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let kind = DocumentKind::PurchaseRequest;
        let period = kind.period(date);
        assert_eq!(period, "202503");
        assert_eq!(kind.format_number(&period, 12), "PR-202503-0012");
    }

    #[test]
    fn test_po_number_format() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        let kind = DocumentKind::PurchaseOrder;
        let period = kind.period(date);
        assert_eq!(period, "2025");
        assert_eq!(kind.format_number(&period, 7), "PO-2025-0007");
    }

    #[test]
    fn test_sequence_padding() {
        let kind = DocumentKind::PurchaseOrder;
        assert_eq!(kind.format_number("2025", 12345), "PO-2025-12345");
    }
}
