//! Purchase order generation and fulfillment service
//!
//! A purchase order is generated from an approved purchase request, at
//! most one active (non-cancelled) order per request. Generation copies
//! the request lines, applies per-line overrides, and computes totals;
//! fulfillment then walks the Draft -> Issued -> .. -> Closed machine.
//! Nothing in this service touches the budget ledger: the money was
//! committed when finance approved the request.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{
    calculate_order_totals, line_subtotal, order_transition_allowed, validate_charge,
    validate_reason, validate_tax_rate, DocumentKind, OrderStatus, RequestStatus, VendorStatus,
};
use crate::services::activity::ActivityLogService;
use crate::services::numbering::NumberingService;

/// Purchase order service
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: PgPool,
}

/// Purchase order record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub number: String,
    pub purchase_request_id: Uuid,
    pub vendor_id: Uuid,
    pub status: String,
    pub tax_rate: Decimal,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub discount: Decimal,
    pub grand_total: Decimal,
    pub expected_delivery_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Purchase order line item record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub request_item_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Order with its line items
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderWithItems {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub items: Vec<OrderItem>,
}

/// Per-line override applied during generation, keyed by the originating
/// request item. Unset fields fall back to the request item's values.
#[derive(Debug, Deserialize)]
pub struct LineOverride {
    pub request_item_id: Uuid,
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

/// Input for generating an order from an approved request
#[derive(Debug, Deserialize)]
pub struct GenerateOrderInput {
    pub purchase_request_id: Uuid,
    pub vendor_id: Uuid,
    pub tax_rate: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub line_overrides: Vec<LineOverride>,
}

/// Replacement line for editing a draft order
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub request_item_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Input for editing a draft order. Absent header fields keep their
/// current values; the nullable fields treat an explicit JSON null as
/// "clear". `items`, when present, replaces all lines wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderInput {
    pub vendor_id: Option<Uuid>,
    pub tax_rate: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub discount: Option<Decimal>,
    #[serde(default, deserialize_with = "keep_or_clear::deserialize")]
    pub expected_delivery_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "keep_or_clear::deserialize")]
    pub payment_terms: Option<Option<String>>,
    #[serde(default, deserialize_with = "keep_or_clear::deserialize")]
    pub notes: Option<Option<String>>,
    pub items: Option<Vec<OrderItemInput>>,
}

/// Distinguishes an absent field (keep the stored value) from an
/// explicit null (clear it). Plain `Option` collapses the two.
mod keep_or_clear {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Input for a fulfillment transition
#[derive(Debug, Deserialize)]
pub struct TransitionInput {
    pub status: OrderStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// The slice of the purchase request the generator needs
#[derive(Debug, FromRow)]
struct RequestForGeneration {
    id: Uuid,
    number: String,
    requester_id: Uuid,
    total_amount: Decimal,
    status: String,
}

/// Request line snapshot copied into the order
#[derive(Debug, FromRow)]
struct RequestLine {
    id: Uuid,
    name: String,
    description: Option<String>,
    quantity: Decimal,
    unit_price: Decimal,
}

const ORDER_COLUMNS: &str = r#"id, number, purchase_request_id, vendor_id, status, tax_rate,
    subtotal, tax_amount, shipping_cost, discount, grand_total, expected_delivery_date,
    payment_terms, notes, cancellation_reason, created_by, created_at, updated_at"#;

const ACTIVE_ORDER_IDX: &str = "purchase_orders_one_active_per_request_idx";

impl PurchaseOrderService {
    /// Create a new PurchaseOrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Generate a draft purchase order from an approved purchase request.
    ///
    /// `default_tax_rate` applies when the input does not carry its own
    /// rate. The request row is locked for the duration so the
    /// one-active-order check cannot race; the partial unique index backs
    /// it up as a last line of defense.
    pub async fn generate(
        &self,
        actor: &AuthUser,
        input: GenerateOrderInput,
        default_tax_rate: Decimal,
    ) -> AppResult<PurchaseOrderWithItems> {
        let tax_rate = input.tax_rate.unwrap_or(default_tax_rate);
        let shipping_cost = input.shipping_cost.unwrap_or(Decimal::ZERO);
        let discount = input.discount.unwrap_or(Decimal::ZERO);
        validate_terms(tax_rate, shipping_cost, discount)?;

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let request = sqlx::query_as::<_, RequestForGeneration>(
            r#"
            SELECT id, number, requester_id, total_amount, status
            FROM purchase_requests
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(input.purchase_request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase request".to_string()))?;

        if RequestStatus::from_str(&request.status) != Some(RequestStatus::Approved) {
            return Err(AppError::InvalidStateTransition(format!(
                "purchase request {} is {}, only approved requests can be ordered",
                request.number, request.status
            )));
        }

        check_vendor_active(&mut tx, input.vendor_id).await?;

        let has_active = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM purchase_orders
                WHERE purchase_request_id = $1 AND status <> 'cancelled'
            )
            "#,
        )
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await?;

        if has_active {
            return Err(active_order_conflict(&request.number));
        }

        let lines = sqlx::query_as::<_, RequestLine>(
            r#"
            SELECT id, name, description, quantity, unit_price
            FROM request_items
            WHERE purchase_request_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(request.id)
        .fetch_all(&mut *tx)
        .await?;

        let order_lines = merge_overrides(&lines, &input.line_overrides)?;
        let line_totals: Vec<Decimal> = order_lines.iter().map(|l| l.line_total).collect();
        let totals = calculate_order_totals(&line_totals, tax_rate, shipping_cost, discount);

        let number =
            NumberingService::next_number(&mut tx, DocumentKind::PurchaseOrder, now).await?;

        let insert = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchase_orders (number, purchase_request_id, vendor_id, status,
                                         tax_rate, subtotal, tax_amount, shipping_cost,
                                         discount, grand_total, expected_delivery_date,
                                         payment_terms, notes, created_by)
            VALUES ($1, $2, $3, 'draft', $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&number)
        .bind(request.id)
        .bind(input.vendor_id)
        .bind(tax_rate)
        .bind(totals.subtotal)
        .bind(totals.tax_amount)
        .bind(totals.shipping_cost)
        .bind(totals.discount)
        .bind(totals.grand_total)
        .bind(input.expected_delivery_date)
        .bind(&input.payment_terms)
        .bind(&input.notes)
        .bind(actor.user_id)
        .fetch_one(&mut *tx)
        .await;

        let order_id = insert.map_err(|e| map_active_order_violation(e, &request.number))?;

        insert_order_lines(&mut tx, order_id, &order_lines).await?;

        // The order may legitimately exceed the amount reserved at
        // approval time (price changes, shipping). Record the overrun;
        // the ledger is not touched again.
        let overrun = if totals.grand_total > request.total_amount {
            tracing::warn!(
                order = %number,
                request = %request.number,
                grand_total = %totals.grand_total,
                reserved = %request.total_amount,
                "purchase order total exceeds the amount approved on the request"
            );
            Some(totals.grand_total - request.total_amount)
        } else {
            None
        };

        ActivityLogService::record(
            &mut tx,
            actor.user_id,
            "purchase_order.generated",
            "purchase_order",
            order_id,
            serde_json::json!({
                "number": number,
                "purchase_request": request.number,
                "requester_id": request.requester_id,
                "grand_total": totals.grand_total,
                "overrun": overrun,
            }),
        )
        .await?;

        tx.commit().await?;

        self.get_order(order_id).await
    }

    /// Edit a draft order's header fields and, optionally, replace all of
    /// its line items. Totals are recomputed from whatever lines remain.
    pub async fn update_draft(
        &self,
        actor: &AuthUser,
        order_id: Uuid,
        input: UpdateOrderInput,
    ) -> AppResult<PurchaseOrderWithItems> {
        let mut tx = self.db.begin().await?;

        let order = lock_order(&mut tx, order_id).await?;
        let status = parse_status(&order.status)?;
        if !status.is_editable() {
            return Err(AppError::InvalidStateTransition(format!(
                "purchase order {} cannot be edited: current status is {}",
                order.number,
                status.as_str()
            )));
        }

        let vendor_id = input.vendor_id.unwrap_or(order.vendor_id);
        if vendor_id != order.vendor_id {
            check_vendor_active(&mut tx, vendor_id).await?;
        }

        let tax_rate = input.tax_rate.unwrap_or(order.tax_rate);
        let shipping_cost = input.shipping_cost.unwrap_or(order.shipping_cost);
        let discount = input.discount.unwrap_or(order.discount);
        validate_terms(tax_rate, shipping_cost, discount)?;

        let line_totals = match input.items {
            Some(items) => {
                let lines = validate_order_items(&items)?;
                sqlx::query("DELETE FROM purchase_order_items WHERE purchase_order_id = $1")
                    .bind(order_id)
                    .execute(&mut *tx)
                    .await?;
                insert_order_lines(&mut tx, order_id, &lines).await?;
                lines.iter().map(|l| l.line_total).collect()
            }
            None => sqlx::query_scalar::<_, Decimal>(
                "SELECT line_total FROM purchase_order_items WHERE purchase_order_id = $1",
            )
            .bind(order_id)
            .fetch_all(&mut *tx)
            .await?,
        };

        let totals = calculate_order_totals(&line_totals, tax_rate, shipping_cost, discount);

        let expected_delivery_date = input
            .expected_delivery_date
            .unwrap_or(order.expected_delivery_date);
        let payment_terms = input
            .payment_terms
            .unwrap_or_else(|| order.payment_terms.clone());
        let notes = input.notes.unwrap_or_else(|| order.notes.clone());

        sqlx::query(
            r#"
            UPDATE purchase_orders
            SET vendor_id = $1, tax_rate = $2, subtotal = $3, tax_amount = $4,
                shipping_cost = $5, discount = $6, grand_total = $7,
                expected_delivery_date = $8, payment_terms = $9, notes = $10,
                updated_at = NOW()
            WHERE id = $11
            "#,
        )
        .bind(vendor_id)
        .bind(tax_rate)
        .bind(totals.subtotal)
        .bind(totals.tax_amount)
        .bind(totals.shipping_cost)
        .bind(totals.discount)
        .bind(totals.grand_total)
        .bind(expected_delivery_date)
        .bind(&payment_terms)
        .bind(&notes)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        ActivityLogService::record(
            &mut tx,
            actor.user_id,
            "purchase_order.updated",
            "purchase_order",
            order_id,
            serde_json::json!({ "number": order.number, "grand_total": totals.grand_total }),
        )
        .await?;

        tx.commit().await?;

        self.get_order(order_id).await
    }

    /// Move an order to the next fulfillment status.
    ///
    /// The target must be adjacent in the transition table; cancellation
    /// additionally requires a reason.
    pub async fn transition(
        &self,
        actor: &AuthUser,
        order_id: Uuid,
        input: TransitionInput,
    ) -> AppResult<PurchaseOrderWithItems> {
        let mut tx = self.db.begin().await?;

        let order = lock_order(&mut tx, order_id).await?;
        let current = parse_status(&order.status)?;
        let target = input.status;

        if !order_transition_allowed(current, target) {
            return Err(AppError::InvalidStateTransition(format!(
                "purchase order {} cannot move from {} to {}",
                order.number,
                current.as_str(),
                target.as_str()
            )));
        }

        if target == OrderStatus::Cancelled {
            let reason = input.reason.as_deref().unwrap_or("");
            if let Err(msg) = validate_reason(reason) {
                return Err(AppError::Validation {
                    field: "reason".to_string(),
                    message: msg.to_string(),
                    message_th: "ต้องระบุเหตุผลในการยกเลิกใบสั่งซื้อ".to_string(),
                });
            }
            sqlx::query("UPDATE purchase_orders SET cancellation_reason = $1 WHERE id = $2")
                .bind(reason)
                .bind(order_id)
                .execute(&mut *tx)
                .await?;
        }

        let updated = sqlx::query(
            r#"
            UPDATE purchase_orders
            SET status = $1, notes = COALESCE($2, notes), updated_at = NOW()
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(target.as_str())
        .bind(&input.notes)
        .bind(order_id)
        .bind(current.as_str())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::ConcurrencyConflict(
                "purchase order was modified concurrently".to_string(),
            ));
        }

        ActivityLogService::record(
            &mut tx,
            actor.user_id,
            "purchase_order.transitioned",
            "purchase_order",
            order_id,
            serde_json::json!({
                "number": order.number,
                "from": current.as_str(),
                "to": target.as_str(),
                "reason": input.reason,
            }),
        )
        .await?;

        tx.commit().await?;

        self.get_order(order_id).await
    }

    /// Get an order with its line items
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<PurchaseOrderWithItems> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {} FROM purchase_orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, purchase_order_id, request_item_id, name, description,
                   quantity, unit_price, line_total, created_at
            FROM purchase_order_items
            WHERE purchase_order_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseOrderWithItems { order, items })
    }

    /// List orders, optionally filtered by fulfillment status
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> AppResult<Vec<PurchaseOrder>> {
        let orders = match status {
            Some(status) => {
                sqlx::query_as::<_, PurchaseOrder>(&format!(
                    "SELECT {} FROM purchase_orders WHERE status = $1 ORDER BY created_at DESC",
                    ORDER_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, PurchaseOrder>(&format!(
                    "SELECT {} FROM purchase_orders ORDER BY created_at DESC",
                    ORDER_COLUMNS
                ))
                .fetch_all(&self.db)
                .await?
            }
        };

        Ok(orders)
    }
}

/// A fully resolved order line ready for insertion
struct ResolvedLine {
    request_item_id: Option<Uuid>,
    name: String,
    description: Option<String>,
    quantity: Decimal,
    unit_price: Decimal,
    line_total: Decimal,
}

fn validate_terms(tax_rate: Decimal, shipping_cost: Decimal, discount: Decimal) -> AppResult<()> {
    if let Err(msg) = validate_tax_rate(tax_rate) {
        return Err(AppError::Validation {
            field: "tax_rate".to_string(),
            message: msg.to_string(),
            message_th: "อัตราภาษีต้องเป็นสัดส่วนระหว่าง 0 ถึง 1".to_string(),
        });
    }
    for (field, amount) in [("shipping_cost", shipping_cost), ("discount", discount)] {
        if let Err(msg) = validate_charge(amount) {
            return Err(AppError::Validation {
                field: field.to_string(),
                message: msg.to_string(),
                message_th: "จำนวนเงินต้องไม่ติดลบ".to_string(),
            });
        }
    }
    Ok(())
}

/// Copy request lines into order lines, applying any overrides.
///
/// Every override must point at a line of this request.
fn merge_overrides(
    lines: &[RequestLine],
    overrides: &[LineOverride],
) -> AppResult<Vec<ResolvedLine>> {
    for o in overrides {
        if !lines.iter().any(|l| l.id == o.request_item_id) {
            return Err(AppError::Validation {
                field: "line_overrides".to_string(),
                message: format!(
                    "override references item {} which is not on this request",
                    o.request_item_id
                ),
                message_th: "รายการที่แก้ไขไม่อยู่ในใบขอซื้อนี้".to_string(),
            });
        }
    }

    let mut resolved = Vec::with_capacity(lines.len());
    for line in lines {
        let o = overrides.iter().find(|o| o.request_item_id == line.id);
        let quantity = o.and_then(|o| o.quantity).unwrap_or(line.quantity);
        let unit_price = o.and_then(|o| o.unit_price).unwrap_or(line.unit_price);
        if quantity <= Decimal::ZERO || unit_price < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "line_overrides".to_string(),
                message: format!("invalid quantity or price for item {}", line.name),
                message_th: format!("จำนวนหรือราคาของ {} ไม่ถูกต้อง", line.name),
            });
        }
        resolved.push(ResolvedLine {
            request_item_id: Some(line.id),
            name: line.name.clone(),
            description: o
                .and_then(|o| o.description.clone())
                .or_else(|| line.description.clone()),
            quantity,
            unit_price,
            line_total: line_subtotal(quantity, unit_price),
        });
    }
    Ok(resolved)
}

fn validate_order_items(items: &[OrderItemInput]) -> AppResult<Vec<ResolvedLine>> {
    if items.is_empty() {
        return Err(AppError::Validation {
            field: "items".to_string(),
            message: "A purchase order needs at least one item".to_string(),
            message_th: "ใบสั่งซื้อต้องมีรายการสินค้าอย่างน้อยหนึ่งรายการ".to_string(),
        });
    }
    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        if item.name.trim().is_empty()
            || item.quantity <= Decimal::ZERO
            || item.unit_price < Decimal::ZERO
        {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: format!("invalid order line: {}", item.name),
                message_th: format!("รายการสินค้าไม่ถูกต้อง: {}", item.name),
            });
        }
        resolved.push(ResolvedLine {
            request_item_id: item.request_item_id,
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: line_subtotal(item.quantity, item.unit_price),
        });
    }
    Ok(resolved)
}

async fn check_vendor_active(conn: &mut PgConnection, vendor_id: Uuid) -> AppResult<()> {
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM vendors WHERE id = $1")
        .bind(vendor_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor".to_string()))?;

    let active = VendorStatus::from_str(&status)
        .map(|s| s.can_receive_orders())
        .unwrap_or(false);

    if !active {
        return Err(AppError::Conflict {
            resource: "vendor".to_string(),
            message: format!("Vendor is {} and cannot receive purchase orders", status),
            message_th: "ผู้ขายไม่อยู่ในสถานะที่สามารถรับใบสั่งซื้อได้".to_string(),
        });
    }
    Ok(())
}

async fn lock_order(conn: &mut PgConnection, order_id: Uuid) -> AppResult<PurchaseOrder> {
    sqlx::query_as::<_, PurchaseOrder>(&format!(
        "SELECT {} FROM purchase_orders WHERE id = $1 FOR UPDATE",
        ORDER_COLUMNS
    ))
    .bind(order_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))
}

async fn insert_order_lines(
    conn: &mut PgConnection,
    order_id: Uuid,
    lines: &[ResolvedLine],
) -> AppResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO purchase_order_items (purchase_order_id, request_item_id, name,
                                              description, quantity, unit_price, line_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order_id)
        .bind(line.request_item_id)
        .bind(&line.name)
        .bind(&line.description)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.line_total)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn parse_status(status: &str) -> AppResult<OrderStatus> {
    OrderStatus::from_str(status)
        .ok_or_else(|| AppError::Internal(format!("unknown purchase order status: {}", status)))
}

fn active_order_conflict(request_number: &str) -> AppError {
    AppError::Conflict {
        resource: "purchase_order".to_string(),
        message: format!(
            "An active purchase order already exists for request {}",
            request_number
        ),
        message_th: format!("มีใบสั่งซื้อที่ยังไม่ถูกยกเลิกสำหรับ {} อยู่แล้ว", request_number),
    }
}

/// Two generators can pass the EXISTS check in between each other's lock
/// windows only if they lock different request rows; the partial unique
/// index still rejects the second insert, which surfaces here.
fn map_active_order_violation(e: sqlx::Error, request_number: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.constraint() == Some(ACTIVE_ORDER_IDX) {
            return active_order_conflict(request_number);
        }
    }
    AppError::DatabaseError(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_input_distinguishes_null_from_absent() {
        let keep: UpdateOrderInput = serde_json::from_str("{}").unwrap();
        assert_eq!(keep.notes, None);
        assert_eq!(keep.payment_terms, None);
        assert_eq!(keep.expected_delivery_date, None);

        let clear: UpdateOrderInput =
            serde_json::from_str(r#"{"notes": null, "expected_delivery_date": null}"#).unwrap();
        assert_eq!(clear.notes, Some(None));
        assert_eq!(clear.expected_delivery_date, Some(None));
        assert_eq!(clear.payment_terms, None);

        let set: UpdateOrderInput = serde_json::from_str(r#"{"notes": "rush order"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("rush order".to_string())));
    }
}
