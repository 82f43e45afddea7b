//! Tripline Types - Shared domain types
//!
//! This crate contains domain types used across Tripline services:
//! - User identity (local and Telegram ids)
//! - The request-scoped security principal

pub mod user;

pub use user::*;
