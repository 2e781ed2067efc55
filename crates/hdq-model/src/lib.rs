//! Canonical data model for the healthcare data-quality workspace.
//!
//! This crate defines the three-table canonical schema every source adapter
//! produces (patients, admissions, lab results), the row-aligned boolean
//! flag tables validators emit, and the small shared helpers (case-insensitive
//! column lookup, lenient date parsing, `AnyValue` conversions) the other
//! crates build on.

pub mod canonical;
pub mod dates;
pub mod flags;
pub mod lookup;
pub mod value;

pub use canonical::{CanonicalTables, columns};
pub use dates::{days_between, parse_date, to_iso_date};
pub use flags::FlagTable;
pub use lookup::CaseInsensitiveLookup;
pub use value::{any_to_f64, any_to_i64, any_to_string, is_missing, parse_f64, parse_i64};
