//! Relationship-tracking domain model.
//!
//! # Responsibility
//! - Define value objects (ids, names, contact fields, frequencies) and the
//!   three aggregates built from them: `Contact`, `Category`, `CheckIn`.
//!
//! # Invariants
//! - Values and entities are immutable; changes go through `rebuild`, which
//!   re-runs the validating factory.
//! - Every aggregate exposes a `'static` null instance detected with
//!   `is_null()`, never produced by normal construction.

pub mod category;
pub mod check_in;
pub mod contact;
pub mod ids;
pub mod validation;
pub mod value;
