//! Request middleware for the Procurement Management Platform

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
