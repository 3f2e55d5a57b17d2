//! HTTP request handlers for the Procurement Management Platform

pub mod budget;
pub mod health;
pub mod purchase_order;
pub mod purchase_request;

pub use budget::*;
pub use health::*;
pub use purchase_order::*;
pub use purchase_request::*;
