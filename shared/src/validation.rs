//! Validation utilities for the Procurement Management Platform
//!
//! Includes Thailand-specific validations for vendor compliance.

use rust_decimal::Decimal;

use crate::types::DocumentKind;

// ============================================================================
// Procurement Validations
// ============================================================================

/// Validate a request line: non-empty name, positive quantity,
/// non-negative unit price
pub fn validate_request_line(
    name: &str,
    quantity: Decimal,
    unit_price: Decimal,
) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Item name cannot be empty");
    }
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    if unit_price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

/// Validate a tax rate expressed as a fraction (0.07 for 7% Thai VAT)
pub fn validate_tax_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err("Tax rate must be between 0 and 1");
    }
    Ok(())
}

/// Shipping cost and discount must not be negative
pub fn validate_charge(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Rejection and cancellation both require a stated reason
pub fn validate_reason(reason: &str) -> Result<(), &'static str> {
    if reason.trim().is_empty() {
        return Err("Reason cannot be empty");
    }
    Ok(())
}

/// Validate a document number against its expected shape
/// (`PR-YYYYMM-NNNN` for requests, `PO-YYYY-NNNN` for orders)
pub fn validate_document_number(kind: DocumentKind, number: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = number.split('-').collect();
    if parts.len() != 3 {
        return Err("Document number must have three dash-separated parts");
    }
    if parts[0] != kind.prefix() {
        return Err("Document number has the wrong prefix");
    }
    let period_len = match kind {
        DocumentKind::PurchaseRequest => 6,
        DocumentKind::PurchaseOrder => 4,
    };
    if parts[1].len() != period_len || !parts[1].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid period in document number");
    }
    if parts[2].len() < 4 || !parts[2].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid sequence in document number");
    }
    Ok(())
}

// ============================================================================
// Thailand-Specific Validations
// ============================================================================

/// Validate Thai Tax ID (เลขประจำตัวผู้เสียภาษี)
/// 13-digit number for businesses/individuals, kept on vendor records
pub fn validate_thai_tax_id(tax_id: &str) -> Result<(), &'static str> {
    let digits: String = tax_id.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 13 {
        return Err("Thai Tax ID must be 13 digits");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_request_line_valid() {
        assert!(validate_request_line("Laptop", dec("2"), dec("35000")).is_ok());
        assert!(validate_request_line("Paper A4", dec("0.5"), dec("0")).is_ok());
    }

    #[test]
    fn test_validate_request_line_invalid() {
        assert!(validate_request_line("", dec("1"), dec("100")).is_err());
        assert!(validate_request_line("   ", dec("1"), dec("100")).is_err());
        assert!(validate_request_line("Desk", dec("0"), dec("100")).is_err());
        assert!(validate_request_line("Desk", dec("-1"), dec("100")).is_err());
        assert!(validate_request_line("Desk", dec("1"), dec("-100")).is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(dec("0")).is_ok());
        assert!(validate_tax_rate(dec("0.07")).is_ok());
        assert!(validate_tax_rate(dec("1")).is_ok());
        assert!(validate_tax_rate(dec("-0.01")).is_err());
        assert!(validate_tax_rate(dec("1.01")).is_err());
    }

    #[test]
    fn test_validate_charge() {
        assert!(validate_charge(dec("0")).is_ok());
        assert!(validate_charge(dec("120.50")).is_ok());
        assert!(validate_charge(dec("-1")).is_err());
    }

    #[test]
    fn test_validate_reason() {
        assert!(validate_reason("price exceeds quote").is_ok());
        assert!(validate_reason("").is_err());
        assert!(validate_reason("   ").is_err());
    }

    #[test]
    fn test_validate_document_number_valid() {
        assert!(
            validate_document_number(DocumentKind::PurchaseRequest, "PR-202503-0001").is_ok()
        );
        assert!(validate_document_number(DocumentKind::PurchaseOrder, "PO-2025-0042").is_ok());
        // Sequences beyond four digits are still valid
        assert!(validate_document_number(DocumentKind::PurchaseOrder, "PO-2025-12345").is_ok());
    }

    #[test]
    fn test_validate_document_number_invalid() {
        assert!(
            validate_document_number(DocumentKind::PurchaseRequest, "PO-202503-0001").is_err()
        );
        assert!(validate_document_number(DocumentKind::PurchaseRequest, "PR-2025-0001").is_err());
        assert!(validate_document_number(DocumentKind::PurchaseOrder, "PO-2025-01").is_err());
        assert!(validate_document_number(DocumentKind::PurchaseOrder, "PO2025-0001").is_err());
    }

    #[test]
    fn test_validate_thai_tax_id_valid() {
        assert!(validate_thai_tax_id("0123456789012").is_ok());
        assert!(validate_thai_tax_id("1234567890123").is_ok());
    }

    #[test]
    fn test_validate_thai_tax_id_invalid() {
        assert!(validate_thai_tax_id("123456789").is_err());
        assert!(validate_thai_tax_id("12345678901234").is_err());
    }
}
