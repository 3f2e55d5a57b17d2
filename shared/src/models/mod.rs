//! Domain models for the Procurement Management Platform

mod approval;
mod budget;
mod purchase_order;
mod purchase_request;
mod user;
mod vendor;

pub use approval::*;
pub use budget::*;
pub use purchase_order::*;
pub use purchase_request::*;
pub use user::*;
pub use vendor::*;
