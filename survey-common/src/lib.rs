//! # Survey Common Library
//!
//! Shared code for the survey service including:
//! - Schema registry (field identifiers and their labels)
//! - Submitted value model and normalization
//! - CSV rendering for exports
//! - Configuration loading
//! - SQLite initialization for the document table

pub mod config;
pub mod csv;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod normalize;
pub mod schema;
pub mod time;
pub mod value;

pub use csv::{escape_csv_cell, to_csv};
pub use error::{Error, Result};
pub use normalize::{normalize, to_labeled, NormalizedRecord};
pub use schema::{FieldDef, FIELDS};
pub use value::{FieldValue, RawSubmission};
