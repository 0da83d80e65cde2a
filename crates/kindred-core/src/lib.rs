//! Core types and trait definitions for the Kindred enrichment pipeline.
//!
//! Everything here is plain data and policy: contact records, enrichment
//! results, the consent rules, audit-log shapes and the store trait. The
//! crate pulls in no HTTP or database machinery, so the engine and every
//! store implementation can share it freely.

pub mod audit;
pub mod consent;
pub mod contact;
pub mod enrichment;
pub mod error;
pub mod store;

pub use error::{Error, Result};
