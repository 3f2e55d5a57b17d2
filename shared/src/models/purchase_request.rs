//! Purchase request status machine and line item arithmetic

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Purchase request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    PendingManager,
    PendingFinance,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Draft => "draft",
            RequestStatus::PendingManager => "pending_manager",
            RequestStatus::PendingFinance => "pending_finance",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(RequestStatus::Draft),
            "pending_manager" => Some(RequestStatus::PendingManager),
            "pending_finance" => Some(RequestStatus::PendingFinance),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            "cancelled" => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }

    /// No further domain transition is defined from a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Approved | RequestStatus::Rejected | RequestStatus::Cancelled
        )
    }
}

/// Lifecycle events accepted by the purchase request state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestEvent {
    Submit,
    ApproveManager,
    ApproveFinance,
    Reject,
    Cancel,
}

/// The fixed transition table for purchase requests.
///
/// Returns the destination status, or `None` when the (status, event)
/// pair is not a defined transition. Side effects (budget reservation,
/// history rows) are owned by the backend service; this table is the
/// single source of truth for which moves exist.
pub fn next_request_status(status: RequestStatus, event: RequestEvent) -> Option<RequestStatus> {
    use RequestEvent::*;
    use RequestStatus::*;

    match (status, event) {
        (Draft, Submit) => Some(PendingManager),
        (PendingManager, ApproveManager) => Some(PendingFinance),
        (PendingFinance, ApproveFinance) => Some(Approved),
        (PendingManager, Reject) | (PendingFinance, Reject) => Some(Rejected),
        (Draft, Cancel) | (PendingManager, Cancel) | (PendingFinance, Cancel) => Some(Cancelled),
        _ => None,
    }
}

/// Subtotal of one request line
pub fn line_subtotal(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

/// Total amount of a request: the sum of its line subtotals
pub fn items_total<'a, I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = &'a (Decimal, Decimal)>,
{
    lines
        .into_iter()
        .fold(Decimal::ZERO, |acc, (qty, price)| acc + qty * price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert_eq!(
            next_request_status(RequestStatus::Draft, RequestEvent::Submit),
            Some(RequestStatus::PendingManager)
        );
        assert_eq!(
            next_request_status(RequestStatus::PendingManager, RequestEvent::ApproveManager),
            Some(RequestStatus::PendingFinance)
        );
        assert_eq!(
            next_request_status(RequestStatus::PendingFinance, RequestEvent::ApproveFinance),
            Some(RequestStatus::Approved)
        );
    }

    #[test]
    fn test_reject_from_pending_only() {
        assert_eq!(
            next_request_status(RequestStatus::PendingManager, RequestEvent::Reject),
            Some(RequestStatus::Rejected)
        );
        assert_eq!(
            next_request_status(RequestStatus::PendingFinance, RequestEvent::Reject),
            Some(RequestStatus::Rejected)
        );
        assert_eq!(
            next_request_status(RequestStatus::Draft, RequestEvent::Reject),
            None
        );
        assert_eq!(
            next_request_status(RequestStatus::Approved, RequestEvent::Reject),
            None
        );
    }

    #[test]
    fn test_cancel_reaches_every_non_terminal_state() {
        for status in [
            RequestStatus::Draft,
            RequestStatus::PendingManager,
            RequestStatus::PendingFinance,
        ] {
            assert_eq!(
                next_request_status(status, RequestEvent::Cancel),
                Some(RequestStatus::Cancelled)
            );
        }
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for status in [
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ] {
            assert!(status.is_terminal());
            for event in [
                RequestEvent::Submit,
                RequestEvent::ApproveManager,
                RequestEvent::ApproveFinance,
                RequestEvent::Reject,
                RequestEvent::Cancel,
            ] {
                assert_eq!(next_request_status(status, event), None);
            }
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            RequestStatus::Draft,
            RequestStatus::PendingManager,
            RequestStatus::PendingFinance,
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ] {
            assert_eq!(RequestStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::from_str("unknown"), None);
    }

    #[test]
    fn test_items_total() {
        let lines = vec![
            (Decimal::from(2), Decimal::from(150)),
            (Decimal::from(10), Decimal::from(35)),
        ];
        assert_eq!(items_total(&lines), Decimal::from(650));
        assert_eq!(items_total(&[]), Decimal::ZERO);
    }
}
