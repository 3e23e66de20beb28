//! # Showroom Core
//!
//! Core library for Showroom - record keeping for a small motorcycle
//! showroom: inventory, bookings, sales, customers, a simple accounts
//! ledger, and PDF documents stamped onto pre-rendered templates.
//!
//! This crate provides the domain logic, storage and document generation
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **store**: SQLite-backed store, typed records and filtered queries
//! - **pdf**: template-overlay document compositor
//! - **documents**: per-document-type templates, coordinate maps, output paths
//! - **lifecycle**: sale/booking transitions with their document side effects
//! - **auth**: operator password hashing

pub mod auth;
pub mod documents;
pub mod error;
pub mod fs;
pub mod lifecycle;
pub mod pdf;
pub mod store;

pub use error::{Result, ShowroomError};
pub use store::Store;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
