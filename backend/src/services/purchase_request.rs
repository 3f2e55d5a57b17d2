//! Purchase request workflow service
//!
//! Owns the request lifecycle: Draft -> PendingManager -> PendingFinance
//! -> Approved, with Rejected and Cancelled as the other exits. Every
//! transition runs as one database transaction combining the status
//! update (guarded on the expected current status under a row lock), the
//! budget ledger side effect, the approval history append, and the audit
//! entry. Notifications go out only after the transaction commits.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{
    items_total, line_subtotal, next_request_status, validate_request_line, ApprovalAction,
    ApprovalLevel, DocumentKind, RequestEvent, RequestStatus,
};
use crate::services::activity::ActivityLogService;
use crate::services::budget::BudgetService;
use crate::services::notification::NotificationService;
use crate::services::numbering::NumberingService;

/// Purchase request service
#[derive(Clone)]
pub struct PurchaseRequestService {
    db: PgPool,
    notifications: NotificationService,
}

/// Purchase request record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseRequest {
    pub id: Uuid,
    pub number: String,
    pub requester_id: Uuid,
    pub department_id: Uuid,
    pub fiscal_year: i32,
    pub total_amount: Decimal,
    pub status: String,
    pub manager_approver_id: Option<Uuid>,
    pub manager_approved_at: Option<DateTime<Utc>>,
    pub manager_comments: Option<String>,
    pub finance_approver_id: Option<Uuid>,
    pub finance_approved_at: Option<DateTime<Utc>>,
    pub finance_comments: Option<String>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request line item record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RequestItem {
    pub id: Uuid,
    pub purchase_request_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One immutable approval history row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApprovalRecord {
    pub id: Uuid,
    pub purchase_request_id: Uuid,
    pub approval_level: i16,
    pub action: String,
    pub previous_status: String,
    pub new_status: String,
    pub approver_id: Uuid,
    pub amount_at_time: Decimal,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for one request line
#[derive(Debug, Deserialize)]
pub struct RequestItemInput {
    pub name: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Input for creating a draft request
#[derive(Debug, Deserialize)]
pub struct CreateRequestInput {
    pub items: Vec<RequestItemInput>,
    pub notes: Option<String>,
}

/// Input for an approval call
#[derive(Debug, Deserialize)]
pub struct ApproveInput {
    pub level: ApprovalLevel,
    pub comments: Option<String>,
}

/// Input for a rejection call
#[derive(Debug, Deserialize)]
pub struct RejectInput {
    pub reason: String,
}

/// Request with its lines and approval trail
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRequestWithDetails {
    #[serde(flatten)]
    pub request: PurchaseRequest,
    pub items: Vec<RequestItem>,
    pub history: Vec<ApprovalRecord>,
}

const REQUEST_COLUMNS: &str = r#"id, number, requester_id, department_id, fiscal_year,
    total_amount, status, manager_approver_id, manager_approved_at, manager_comments,
    finance_approver_id, finance_approved_at, finance_comments, rejected_by, rejected_at,
    rejection_reason, cancelled_at, notes, created_at, updated_at"#;

impl PurchaseRequestService {
    /// Create a new PurchaseRequestService instance
    pub fn new(db: PgPool) -> Self {
        let notifications = NotificationService::new(db.clone());
        Self { db, notifications }
    }

    /// Create a draft purchase request with its line items
    pub async fn create_request(
        &self,
        requester: &AuthUser,
        input: CreateRequestInput,
    ) -> AppResult<PurchaseRequestWithDetails> {
        validate_items(&input.items)?;

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let number =
            NumberingService::next_number(&mut tx, DocumentKind::PurchaseRequest, now).await?;

        let lines: Vec<(Decimal, Decimal)> = input
            .items
            .iter()
            .map(|i| (i.quantity, i.unit_price))
            .collect();
        let total_amount = items_total(&lines);

        let request_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchase_requests (number, requester_id, department_id, fiscal_year,
                                           total_amount, status, notes)
            VALUES ($1, $2, $3, $4, $5, 'draft', $6)
            RETURNING id
            "#,
        )
        .bind(&number)
        .bind(requester.user_id)
        .bind(requester.department_id)
        .bind(now.year())
        .bind(total_amount)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        insert_items(&mut tx, request_id, &input.items).await?;

        ActivityLogService::record(
            &mut tx,
            requester.user_id,
            "purchase_request.created",
            "purchase_request",
            request_id,
            serde_json::json!({ "number": number, "total_amount": total_amount }),
        )
        .await?;

        tx.commit().await?;

        self.get_request(request_id).await
    }

    /// Replace the line items of a draft request.
    ///
    /// Editing is only possible before submission; a submitted request
    /// must be cancelled and re-raised instead.
    pub async fn replace_items(
        &self,
        requester: &AuthUser,
        request_id: Uuid,
        items: Vec<RequestItemInput>,
    ) -> AppResult<PurchaseRequestWithDetails> {
        validate_items(&items)?;

        let mut tx = self.db.begin().await?;

        let request = lock_request(&mut tx, request_id).await?;
        require_requester(&request, requester)?;

        let status = parse_status(&request.status)?;
        if status != RequestStatus::Draft {
            return Err(AppError::InvalidStateTransition(format!(
                "purchase request {} cannot be edited: current status is {}",
                request.number,
                status.as_str()
            )));
        }

        sqlx::query("DELETE FROM request_items WHERE purchase_request_id = $1")
            .bind(request_id)
            .execute(&mut *tx)
            .await?;

        insert_items(&mut tx, request_id, &items).await?;

        let lines: Vec<(Decimal, Decimal)> =
            items.iter().map(|i| (i.quantity, i.unit_price)).collect();
        let total_amount = items_total(&lines);

        sqlx::query(
            "UPDATE purchase_requests SET total_amount = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(total_amount)
        .bind(request_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_request(request_id).await
    }

    /// Submit a draft request for approval.
    ///
    /// Freezes the total and reserves it against the requester's
    /// department budget for the current fiscal year. Insufficient budget
    /// fails the whole transition.
    pub async fn submit(
        &self,
        requester: &AuthUser,
        request_id: Uuid,
    ) -> AppResult<PurchaseRequestWithDetails> {
        let now = Utc::now();
        let fiscal_year = now.year();

        let mut tx = self.db.begin().await?;

        let request = lock_request(&mut tx, request_id).await?;
        require_requester(&request, requester)?;

        let current = parse_status(&request.status)?;
        let next = next_request_status(current, RequestEvent::Submit)
            .ok_or_else(|| invalid_transition(&request.number, current, "be submitted"))?;

        let items = load_items(&mut *tx, request_id).await?;
        if items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "A purchase request needs at least one item before submission"
                    .to_string(),
                message_th: "ต้องมีรายการสินค้าอย่างน้อยหนึ่งรายการก่อนส่งอนุมัติ".to_string(),
            });
        }

        // Totals are frozen at submission time
        let lines: Vec<(Decimal, Decimal)> =
            items.iter().map(|i| (i.quantity, i.unit_price)).collect();
        let total_amount = items_total(&lines);

        BudgetService::reserve(&mut tx, request.department_id, fiscal_year, total_amount).await?;

        let updated = sqlx::query(
            r#"
            UPDATE purchase_requests
            SET status = $1, total_amount = $2, fiscal_year = $3, updated_at = NOW()
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(next.as_str())
        .bind(total_amount)
        .bind(fiscal_year)
        .bind(request_id)
        .bind(current.as_str())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::ConcurrencyConflict(
                "purchase request was modified concurrently".to_string(),
            ));
        }

        ActivityLogService::record(
            &mut tx,
            requester.user_id,
            "purchase_request.submitted",
            "purchase_request",
            request_id,
            serde_json::json!({
                "number": request.number,
                "total_amount": total_amount,
                "fiscal_year": fiscal_year,
            }),
        )
        .await?;

        tx.commit().await?;

        self.get_request(request_id).await
    }

    /// Approve a pending request at the given level.
    ///
    /// Level 1 (manager) moves PendingManager -> PendingFinance; the
    /// approver must be a manager of the request's department. Level 2
    /// (finance) moves PendingFinance -> Approved and commits the budget
    /// reservation into permanent spend.
    pub async fn approve(
        &self,
        approver: &AuthUser,
        request_id: Uuid,
        input: ApproveInput,
    ) -> AppResult<PurchaseRequestWithDetails> {
        let (event, level) = match input.level {
            ApprovalLevel::Manager => (RequestEvent::ApproveManager, ApprovalLevel::Manager),
            ApprovalLevel::Finance => (RequestEvent::ApproveFinance, ApprovalLevel::Finance),
            ApprovalLevel::Requester => {
                return Err(AppError::Validation {
                    field: "level".to_string(),
                    message: "Approval level must be manager or finance".to_string(),
                    message_th: "ระดับการอนุมัติต้องเป็นผู้จัดการหรือฝ่ายการเงิน".to_string(),
                });
            }
        };

        let mut tx = self.db.begin().await?;

        let request = lock_request(&mut tx, request_id).await?;
        let current = parse_status(&request.status)?;
        let next = next_request_status(current, event)
            .ok_or_else(|| invalid_transition(&request.number, current, "be approved"))?;

        match level {
            ApprovalLevel::Manager => {
                if !approver.role.can_approve_as_manager()
                    || approver.department_id != request.department_id
                {
                    return Err(AppError::InsufficientPermissions);
                }
                sqlx::query(
                    r#"
                    UPDATE purchase_requests
                    SET manager_approver_id = $1, manager_approved_at = NOW(),
                        manager_comments = $2
                    WHERE id = $3
                    "#,
                )
                .bind(approver.user_id)
                .bind(&input.comments)
                .bind(request_id)
                .execute(&mut *tx)
                .await?;
            }
            ApprovalLevel::Finance => {
                if !approver.role.can_approve_as_finance() {
                    return Err(AppError::InsufficientPermissions);
                }
                BudgetService::commit_reserved(
                    &mut tx,
                    request.department_id,
                    request.fiscal_year,
                    request.total_amount,
                )
                .await?;
                sqlx::query(
                    r#"
                    UPDATE purchase_requests
                    SET finance_approver_id = $1, finance_approved_at = NOW(),
                        finance_comments = $2
                    WHERE id = $3
                    "#,
                )
                .bind(approver.user_id)
                .bind(&input.comments)
                .bind(request_id)
                .execute(&mut *tx)
                .await?;
            }
            ApprovalLevel::Requester => unreachable!(),
        }

        set_status(&mut tx, request_id, current, next).await?;

        append_history(
            &mut tx,
            &request,
            level,
            ApprovalAction::Approved,
            current,
            next,
            approver.user_id,
            input.comments.as_deref(),
        )
        .await?;

        ActivityLogService::record(
            &mut tx,
            approver.user_id,
            match level {
                ApprovalLevel::Manager => "purchase_request.manager_approved",
                _ => "purchase_request.finance_approved",
            },
            "purchase_request",
            request_id,
            serde_json::json!({ "number": request.number, "amount": request.total_amount }),
        )
        .await?;

        tx.commit().await?;

        match level {
            ApprovalLevel::Manager => self.notifications.dispatch(
                request.requester_id,
                "Purchase request approved by manager",
                "ใบขอซื้อผ่านการอนุมัติขั้นผู้จัดการ",
                format!("{} is now awaiting finance approval", request.number),
                format!("{} กำลังรอการอนุมัติจากฝ่ายการเงิน", request.number),
                "purchase_request",
                request_id,
            ),
            _ => self.notifications.dispatch(
                request.requester_id,
                "Purchase request approved",
                "ใบขอซื้อได้รับการอนุมัติแล้ว",
                format!("{} is fully approved", request.number),
                format!("{} ได้รับการอนุมัติครบทุกขั้นแล้ว", request.number),
                "purchase_request",
                request_id,
            ),
        }

        self.get_request(request_id).await
    }

    /// Reject a pending request, releasing its budget reservation.
    ///
    /// The rejection level follows the request's current station: a
    /// manager rejects at PendingManager, finance at PendingFinance.
    pub async fn reject(
        &self,
        approver: &AuthUser,
        request_id: Uuid,
        input: RejectInput,
    ) -> AppResult<PurchaseRequestWithDetails> {
        if let Err(msg) = crate::models::validate_reason(&input.reason) {
            return Err(AppError::Validation {
                field: "reason".to_string(),
                message: msg.to_string(),
                message_th: "ต้องระบุเหตุผลในการปฏิเสธ".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let request = lock_request(&mut tx, request_id).await?;
        let current = parse_status(&request.status)?;
        let next = next_request_status(current, RequestEvent::Reject)
            .ok_or_else(|| invalid_transition(&request.number, current, "be rejected"))?;

        let level = match current {
            RequestStatus::PendingManager => {
                if !approver.role.can_approve_as_manager()
                    || approver.department_id != request.department_id
                {
                    return Err(AppError::InsufficientPermissions);
                }
                ApprovalLevel::Manager
            }
            RequestStatus::PendingFinance => {
                if !approver.role.can_approve_as_finance() {
                    return Err(AppError::InsufficientPermissions);
                }
                ApprovalLevel::Finance
            }
            // next_request_status already rules other statuses out
            _ => unreachable!(),
        };

        BudgetService::release(
            &mut tx,
            request.department_id,
            request.fiscal_year,
            request.total_amount,
        )
        .await?;

        sqlx::query(
            r#"
            UPDATE purchase_requests
            SET rejected_by = $1, rejected_at = NOW(), rejection_reason = $2
            WHERE id = $3
            "#,
        )
        .bind(approver.user_id)
        .bind(&input.reason)
        .bind(request_id)
        .execute(&mut *tx)
        .await?;

        set_status(&mut tx, request_id, current, next).await?;

        append_history(
            &mut tx,
            &request,
            level,
            ApprovalAction::Rejected,
            current,
            next,
            approver.user_id,
            Some(&input.reason),
        )
        .await?;

        ActivityLogService::record(
            &mut tx,
            approver.user_id,
            "purchase_request.rejected",
            "purchase_request",
            request_id,
            serde_json::json!({ "number": request.number, "reason": input.reason }),
        )
        .await?;

        tx.commit().await?;

        self.notifications.dispatch(
            request.requester_id,
            "Purchase request rejected",
            "ใบขอซื้อถูกปฏิเสธ",
            format!("{} was rejected: {}", request.number, input.reason),
            format!("{} ถูกปฏิเสธ: {}", request.number, input.reason),
            "purchase_request",
            request_id,
        );

        self.get_request(request_id).await
    }

    /// Cancel a request. Only the requester may cancel, and only before
    /// the approval path reaches a terminal status. Releases the budget
    /// reservation (a no-op for drafts, where nothing was reserved).
    pub async fn cancel(
        &self,
        requester: &AuthUser,
        request_id: Uuid,
    ) -> AppResult<PurchaseRequestWithDetails> {
        let mut tx = self.db.begin().await?;

        let request = lock_request(&mut tx, request_id).await?;
        require_requester(&request, requester)?;

        let current = parse_status(&request.status)?;
        let next = next_request_status(current, RequestEvent::Cancel)
            .ok_or_else(|| invalid_transition(&request.number, current, "be cancelled"))?;

        if current != RequestStatus::Draft {
            BudgetService::release(
                &mut tx,
                request.department_id,
                request.fiscal_year,
                request.total_amount,
            )
            .await?;
        }

        sqlx::query("UPDATE purchase_requests SET cancelled_at = NOW() WHERE id = $1")
            .bind(request_id)
            .execute(&mut *tx)
            .await?;

        set_status(&mut tx, request_id, current, next).await?;

        append_history(
            &mut tx,
            &request,
            ApprovalLevel::Requester,
            ApprovalAction::Cancelled,
            current,
            next,
            requester.user_id,
            None,
        )
        .await?;

        ActivityLogService::record(
            &mut tx,
            requester.user_id,
            "purchase_request.cancelled",
            "purchase_request",
            request_id,
            serde_json::json!({ "number": request.number }),
        )
        .await?;

        tx.commit().await?;

        self.get_request(request_id).await
    }

    /// Get a request with its items and approval history
    pub async fn get_request(&self, request_id: Uuid) -> AppResult<PurchaseRequestWithDetails> {
        let request = sqlx::query_as::<_, PurchaseRequest>(&format!(
            "SELECT {} FROM purchase_requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(request_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase request".to_string()))?;

        let items = load_items(&self.db, request_id).await?;

        let history = sqlx::query_as::<_, ApprovalRecord>(
            r#"
            SELECT id, purchase_request_id, approval_level, action, previous_status,
                   new_status, approver_id, amount_at_time, comments, created_at
            FROM approval_histories
            WHERE purchase_request_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseRequestWithDetails {
            request,
            items,
            history,
        })
    }

    /// List requests, optionally narrowed to one department
    pub async fn list_requests(
        &self,
        department_id: Option<Uuid>,
    ) -> AppResult<Vec<PurchaseRequest>> {
        let requests = match department_id {
            Some(department_id) => {
                sqlx::query_as::<_, PurchaseRequest>(&format!(
                    "SELECT {} FROM purchase_requests WHERE department_id = $1 ORDER BY created_at DESC",
                    REQUEST_COLUMNS
                ))
                .bind(department_id)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, PurchaseRequest>(&format!(
                    "SELECT {} FROM purchase_requests ORDER BY created_at DESC",
                    REQUEST_COLUMNS
                ))
                .fetch_all(&self.db)
                .await?
            }
        };

        Ok(requests)
    }
}

/// Validate line items before any write
fn validate_items(items: &[RequestItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::Validation {
            field: "items".to_string(),
            message: "At least one item is required".to_string(),
            message_th: "ต้องมีรายการสินค้าอย่างน้อยหนึ่งรายการ".to_string(),
        });
    }
    for item in items {
        if let Err(msg) = validate_request_line(&item.name, item.quantity, item.unit_price) {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: msg.to_string(),
                message_th: format!("รายการสินค้าไม่ถูกต้อง: {}", msg),
            });
        }
    }
    Ok(())
}

/// Load a request under a row lock for the current transaction
async fn lock_request(conn: &mut PgConnection, request_id: Uuid) -> AppResult<PurchaseRequest> {
    sqlx::query_as::<_, PurchaseRequest>(&format!(
        "SELECT {} FROM purchase_requests WHERE id = $1 FOR UPDATE",
        REQUEST_COLUMNS
    ))
    .bind(request_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Purchase request".to_string()))
}

fn require_requester(request: &PurchaseRequest, user: &AuthUser) -> AppResult<()> {
    if request.requester_id != user.user_id {
        return Err(AppError::InsufficientPermissions);
    }
    Ok(())
}

fn parse_status(status: &str) -> AppResult<RequestStatus> {
    RequestStatus::from_str(status)
        .ok_or_else(|| AppError::Internal(format!("unknown purchase request status: {}", status)))
}

fn invalid_transition(number: &str, current: RequestStatus, attempted: &str) -> AppError {
    AppError::InvalidStateTransition(format!(
        "purchase request {} cannot {}: current status is {}",
        number,
        attempted,
        current.as_str()
    ))
}

/// Compare-and-swap status update; losing the race means another
/// transition won between our lock and theirs.
async fn set_status(
    conn: &mut PgConnection,
    request_id: Uuid,
    from: RequestStatus,
    to: RequestStatus,
) -> AppResult<()> {
    let updated = sqlx::query(
        "UPDATE purchase_requests SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3",
    )
    .bind(to.as_str())
    .bind(request_id)
    .bind(from.as_str())
    .execute(conn)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::ConcurrencyConflict(
            "purchase request was modified concurrently".to_string(),
        ));
    }

    Ok(())
}

async fn insert_items(
    conn: &mut PgConnection,
    request_id: Uuid,
    items: &[RequestItemInput],
) -> AppResult<()> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO request_items (purchase_request_id, name, description, quantity,
                                       unit_price, subtotal)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(request_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(line_subtotal(item.quantity, item.unit_price))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn load_items<'e, E>(executor: E, request_id: Uuid) -> AppResult<Vec<RequestItem>>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let items = sqlx::query_as::<_, RequestItem>(
        r#"
        SELECT id, purchase_request_id, name, description, quantity, unit_price,
               subtotal, created_at
        FROM request_items
        WHERE purchase_request_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(request_id)
    .fetch_all(executor)
    .await?;

    Ok(items)
}

/// Append one immutable approval history row in the caller's transaction
#[allow(clippy::too_many_arguments)]
async fn append_history(
    conn: &mut PgConnection,
    request: &PurchaseRequest,
    level: ApprovalLevel,
    action: ApprovalAction,
    previous: RequestStatus,
    new: RequestStatus,
    approver_id: Uuid,
    comments: Option<&str>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO approval_histories (purchase_request_id, approval_level, action,
                                        previous_status, new_status, approver_id,
                                        amount_at_time, comments)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(request.id)
    .bind(level.as_i16())
    .bind(action.as_str())
    .bind(previous.as_str())
    .bind(new.as_str())
    .bind(approver_id)
    .bind(request.total_amount)
    .bind(comments)
    .execute(conn)
    .await?;

    Ok(())
}
