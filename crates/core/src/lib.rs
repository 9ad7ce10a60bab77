//! `storepulse-core`: shared building blocks.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the error
//! model, and calendar-date windows used by every pipeline stage.

pub mod error;
pub mod id;
pub mod period;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{LoadId, ProductId};
pub use period::{parse_iso_date, DateBounds, DateWindow, ISO_DATE_FORMAT};
pub use value_object::ValueObject;
