//! # Object Identifiers
//!
//! STIX objects are identified by `<object-type>--<uuid>`. Two grammars are
//! in play:
//!
//! - **Own identifiers** ([`StixId`]) carry a known type prefix and a
//!   version 4 UUID suffix. They are generated fresh or parsed against the
//!   type they must belong to.
//! - **References** ([`is_reference`]) point at some other object. Only the
//!   syntax is checked: a lowercase-hyphen type token, `--`, and a UUID in
//!   canonical hyphenated hex form. Whether the target exists is not this
//!   layer's concern.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PropertyError;

/// Separator between the type token and the UUID.
pub const ID_SEPARATOR: &str = "--";

const REFERENCE_PATTERN: &str = "^[a-z][a-z-]+[a-z]--[0-9a-fA-F]{8}-[0-9a-fA-F]{4}\
-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern is a valid regex"))
}

/// The `<type>--` prefix every identifier of `object_type` starts with.
pub fn type_prefix(object_type: &str) -> String {
    format!("{object_type}{ID_SEPARATOR}")
}

/// True when `value` is syntactically a reference: `<object-type>--<uuid>`.
pub fn is_reference(value: &str) -> bool {
    reference_regex().is_match(value)
}

/// An object identifier with a verified type prefix and v4 UUID suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StixId(String);

impl StixId {
    /// Generate a fresh identifier for `object_type`.
    ///
    /// Every call draws a new random UUID, so two calls never collide in
    /// practice.
    pub fn generate(object_type: &str) -> Self {
        Self(format!("{}{}", type_prefix(object_type), Uuid::new_v4()))
    }

    /// Parse `value` as an identifier belonging to `object_type`.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::PrefixMismatch`] if `value` does not start with
    ///   `<object_type>--`.
    /// - [`PropertyError::InvalidUuid`] if the text after the first `--` is
    ///   not a version 4 UUID.
    pub fn parse(object_type: &str, value: &str) -> Result<Self, PropertyError> {
        let prefix = type_prefix(object_type);
        if !value.starts_with(&prefix) {
            return Err(PropertyError::PrefixMismatch { expected: prefix });
        }
        // The UUID is whatever follows the first separator.
        let suffix = value
            .split_once(ID_SEPARATOR)
            .map(|(_, rest)| rest)
            .unwrap_or_default();
        parse_uuid_v4(suffix)?;
        Ok(Self(value.to_string()))
    }

    /// The type token (text before the first `--`).
    pub fn object_type(&self) -> &str {
        self.0
            .split_once(ID_SEPARATOR)
            .map(|(t, _)| t)
            .unwrap_or(&self.0)
    }

    /// The full identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the identifier text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for StixId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse `text` as a UUID and require version 4.
pub fn parse_uuid_v4(text: &str) -> Result<Uuid, PropertyError> {
    let uuid = Uuid::parse_str(text).map_err(|_| PropertyError::InvalidUuid)?;
    if uuid.get_version_num() != 4 {
        return Err(PropertyError::InvalidUuid);
    }
    Ok(uuid)
}
