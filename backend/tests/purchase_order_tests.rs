//! Purchase order fulfillment tests
//!
//! Tests for the fulfillment state machine, order total calculations,
//! and the PO numbering format.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{
    allowed_order_transitions, calculate_order_totals, order_transition_allowed, OrderStatus,
};
use shared::types::DocumentKind;
use shared::validation::validate_document_number;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const ALL_STATUSES: [OrderStatus; 8] = [
    OrderStatus::Draft,
    OrderStatus::Issued,
    OrderStatus::Acknowledged,
    OrderStatus::PartialReceived,
    OrderStatus::Received,
    OrderStatus::Invoiced,
    OrderStatus::Closed,
    OrderStatus::Cancelled,
];

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Both receiving paths reach Closed
    #[test]
    fn test_fulfillment_paths() {
        let direct = [
            OrderStatus::Draft,
            OrderStatus::Issued,
            OrderStatus::Acknowledged,
            OrderStatus::Received,
            OrderStatus::Invoiced,
            OrderStatus::Closed,
        ];
        let partial = [
            OrderStatus::Draft,
            OrderStatus::Issued,
            OrderStatus::Acknowledged,
            OrderStatus::PartialReceived,
            OrderStatus::Received,
            OrderStatus::Invoiced,
            OrderStatus::Closed,
        ];
        for path in [&direct[..], &partial[..]] {
            for pair in path.windows(2) {
                assert!(
                    order_transition_allowed(pair[0], pair[1]),
                    "{:?} -> {:?}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_cancellable_from_every_non_terminal_status() {
        for status in ALL_STATUSES {
            assert_eq!(
                order_transition_allowed(status, OrderStatus::Cancelled),
                !status.is_terminal(),
                "cancel from {:?}",
                status
            );
        }
    }

    #[test]
    fn test_no_stage_skipping() {
        assert!(!order_transition_allowed(
            OrderStatus::Draft,
            OrderStatus::Acknowledged
        ));
        assert!(!order_transition_allowed(
            OrderStatus::Issued,
            OrderStatus::Received
        ));
        assert!(!order_transition_allowed(
            OrderStatus::Acknowledged,
            OrderStatus::Invoiced
        ));
        assert!(!order_transition_allowed(
            OrderStatus::Received,
            OrderStatus::Closed
        ));
    }

    #[test]
    fn test_no_backwards_moves() {
        assert!(!order_transition_allowed(
            OrderStatus::Issued,
            OrderStatus::Draft
        ));
        assert!(!order_transition_allowed(
            OrderStatus::Received,
            OrderStatus::PartialReceived
        ));
        assert!(!order_transition_allowed(
            OrderStatus::Invoiced,
            OrderStatus::Received
        ));
    }

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        assert!(allowed_order_transitions(OrderStatus::Closed).is_empty());
        assert!(allowed_order_transitions(OrderStatus::Cancelled).is_empty());
    }

    #[test]
    fn test_only_draft_is_editable() {
        for status in ALL_STATUSES {
            assert_eq!(status.is_editable(), status == OrderStatus::Draft);
        }
    }

    /// At most one active order per request: every status except
    /// Cancelled keeps the request's order slot occupied.
    #[test]
    fn test_only_cancellation_frees_the_request_slot() {
        for status in ALL_STATUSES {
            assert_eq!(
                status.is_active(),
                status != OrderStatus::Cancelled,
                "active from {:?}",
                status
            );
        }
        // A fulfilled order still occupies its request
        assert!(OrderStatus::Closed.is_active());
    }

    /// Cancelling an order frees the slot, so a replacement can be
    /// generated; any order that can still move stays blocking.
    #[test]
    fn test_slot_frees_exactly_when_cancel_is_reached() {
        for status in ALL_STATUSES {
            if !status.is_active() {
                continue;
            }
            let can_cancel = order_transition_allowed(status, OrderStatus::Cancelled);
            assert_eq!(
                can_cancel,
                !status.is_terminal(),
                "cancel reachability from {:?}",
                status
            );
        }
    }

    /// Standard 7% Thai VAT on a two-line order with shipping and discount
    #[test]
    fn test_order_totals_with_thai_vat() {
        let totals = calculate_order_totals(
            &[dec("120000.00"), dec("8500.00")],
            dec("0.07"),
            dec("1500.00"),
            dec("2000.00"),
        );

        assert_eq!(totals.subtotal, dec("128500.00"));
        assert_eq!(totals.tax_amount, dec("8995.0000"));
        assert_eq!(totals.grand_total, dec("137995.0000"));
    }

    #[test]
    fn test_order_totals_empty_lines() {
        let totals =
            calculate_order_totals(&[], dec("0.07"), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_order_number_format() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let kind = DocumentKind::PurchaseOrder;
        let period = kind.period(date);
        assert_eq!(period, "2025");

        let number = kind.format_number(&period, 42);
        assert_eq!(number, "PO-2025-0042");
        assert!(validate_document_number(kind, &number).is_ok());
    }

    /// Order numbers are year-scoped, unlike the monthly request numbers
    #[test]
    fn test_order_period_ignores_month() {
        let kind = DocumentKind::PurchaseOrder;
        let jan = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let dec_ = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        assert_eq!(kind.period(jan), kind.period(dec_));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for line totals in satang precision
    fn line_total_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn charge_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Tax rate as a fraction between 0 and 0.20
    fn tax_rate_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=2000i64).prop_map(|n| Decimal::new(n, 4))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// grand_total = subtotal + tax + shipping - discount, always.
        #[test]
        fn prop_grand_total_identity(
            lines in prop::collection::vec(line_total_strategy(), 1..10),
            tax_rate in tax_rate_strategy(),
            shipping in charge_strategy(),
            discount in charge_strategy()
        ) {
            let totals = calculate_order_totals(&lines, tax_rate, shipping, discount);

            prop_assert_eq!(
                totals.grand_total,
                totals.subtotal + totals.tax_amount + totals.shipping_cost - totals.discount
            );
        }

        /// Subtotal is the plain sum of the line totals.
        #[test]
        fn prop_subtotal_is_line_sum(
            lines in prop::collection::vec(line_total_strategy(), 1..10)
        ) {
            let totals = calculate_order_totals(
                &lines, dec("0.07"), Decimal::ZERO, Decimal::ZERO,
            );
            let expected: Decimal = lines.iter().copied().sum();
            prop_assert_eq!(totals.subtotal, expected);
        }

        /// Tax scales linearly with the subtotal.
        #[test]
        fn prop_tax_is_rate_times_subtotal(
            lines in prop::collection::vec(line_total_strategy(), 1..10),
            tax_rate in tax_rate_strategy()
        ) {
            let totals = calculate_order_totals(
                &lines, tax_rate, Decimal::ZERO, Decimal::ZERO,
            );
            prop_assert_eq!(totals.tax_amount, totals.subtotal * tax_rate);
        }

        /// Every status reaches a terminal status within the diameter of
        /// the transition graph by always taking the first allowed move.
        #[test]
        fn prop_every_status_can_terminate(start in prop::sample::select(ALL_STATUSES.to_vec())) {
            let mut status = start;
            for _ in 0..8 {
                match allowed_order_transitions(status).first() {
                    Some(next) => status = *next,
                    None => break,
                }
            }
            prop_assert!(status.is_terminal(), "stuck at {:?} from {:?}", status, start);
        }
    }
}
