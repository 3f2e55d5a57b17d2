//! Purchase order fulfillment status machine and total calculations

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Purchase order fulfillment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Issued,
    Acknowledged,
    PartialReceived,
    Received,
    Invoiced,
    Closed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Issued => "issued",
            OrderStatus::Acknowledged => "acknowledged",
            OrderStatus::PartialReceived => "partial_received",
            OrderStatus::Received => "received",
            OrderStatus::Invoiced => "invoiced",
            OrderStatus::Closed => "closed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(OrderStatus::Draft),
            "issued" => Some(OrderStatus::Issued),
            "acknowledged" => Some(OrderStatus::Acknowledged),
            "partial_received" => Some(OrderStatus::PartialReceived),
            "received" => Some(OrderStatus::Received),
            "invoiced" => Some(OrderStatus::Invoiced),
            "closed" => Some(OrderStatus::Closed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Closed | OrderStatus::Cancelled)
    }

    /// Only drafts may have their line items or header fields edited
    pub fn is_editable(&self) -> bool {
        matches!(self, OrderStatus::Draft)
    }

    /// An active order occupies its request's single order slot.
    /// Only cancellation frees the slot; a closed order still counts,
    /// since the request was fulfilled.
    pub fn is_active(&self) -> bool {
        !matches!(self, OrderStatus::Cancelled)
    }
}

/// Allowed destinations for each fulfillment status.
pub fn allowed_order_transitions(status: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match status {
        Draft => &[Issued, Cancelled],
        Issued => &[Acknowledged, Cancelled],
        Acknowledged => &[PartialReceived, Received, Cancelled],
        PartialReceived => &[Received, Cancelled],
        Received => &[Invoiced, Cancelled],
        Invoiced => &[Closed, Cancelled],
        Closed => &[],
        Cancelled => &[],
    }
}

/// Whether `from -> to` appears in the fulfillment transition table
pub fn order_transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_order_transitions(from).contains(&to)
}

/// Monetary totals of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub discount: Decimal,
    pub grand_total: Decimal,
}

/// Compute order totals from line totals.
///
/// `tax_rate` is a fraction (0.07 for Thai VAT). The grand total identity
/// `grand_total = subtotal + tax_amount + shipping_cost - discount` holds
/// by construction; callers recompute rather than patching stored totals.
pub fn calculate_order_totals(
    line_totals: &[Decimal],
    tax_rate: Decimal,
    shipping_cost: Decimal,
    discount: Decimal,
) -> OrderTotals {
    let subtotal: Decimal = line_totals.iter().copied().sum();
    let tax_amount = subtotal * tax_rate;
    let grand_total = subtotal + tax_amount + shipping_cost - discount;
    OrderTotals {
        subtotal,
        tax_amount,
        shipping_cost,
        discount,
        grand_total,
    }
}
