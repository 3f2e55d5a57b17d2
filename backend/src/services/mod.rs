//! Business logic services for the Procurement Management Platform

pub mod activity;
pub mod budget;
pub mod notification;
pub mod numbering;
pub mod purchase_order;
pub mod purchase_request;

pub use activity::ActivityLogService;
pub use budget::BudgetService;
pub use notification::NotificationService;
pub use numbering::NumberingService;
pub use purchase_order::PurchaseOrderService;
pub use purchase_request::PurchaseRequestService;
