//! # stix-core — Foundational Types for STIX Property Validation
//!
//! This crate holds the primitives the property type system is built from.
//! It depends on nothing internal.
//!
//! ## Contents
//!
//! 1. **[`Value`]**: the closed set of raw/validated field shapes, plus
//!    [`StixObject`] for already-constructed instances.
//!
//! 2. **Identifier grammar.** [`StixId`] for `<type>--<uuid-v4>` identifiers
//!    and [`is_reference`] for syntactic reference checks.
//!
//! 3. **Selector grammar.** [`is_selector`] for dotted/bracketed paths.
//!
//! 4. **Timestamp parsing.** [`parse_timestamp`] reads free-form date and
//!    time text and normalizes to UTC.
//!
//! 5. **Errors.** [`PropertyError`] is the single value-rejection kind;
//!    [`ObjectError`] adds field context during construction.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `stix-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identifier;
pub mod selector;
pub mod temporal;
pub mod value;

pub use error::{ObjectError, PropertyError, StixError};
pub use identifier::{is_reference, parse_uuid_v4, type_prefix, StixId, ID_SEPARATOR};
pub use selector::is_selector;
pub use temporal::{
    date_at_legacy_midnight, legacy_date_offset, parse_timestamp, parse_timestamp_on,
    ParsedTimestamp,
    LEGACY_DATE_OFFSET_SECS,
};
pub use value::{format_datetime, utc_offset, StixObject, Value};
