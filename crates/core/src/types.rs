//! Data model for types recovered from a dump

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key into the type arena. Types refer to one another only through these
/// keys, never through owning pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeIndex(pub usize);

impl TypeIndex {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a discovered declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
}

impl TypeKind {
    /// Instances of value types are embedded inline in their container.
    pub fn is_value_type(&self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum)
    }
}

/// One declared data member of a type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Sanitized identifier, valid as a C member name
    pub name: String,
    /// Declared-type text as it appeared in the dump
    pub declared_type: String,
    pub is_static: bool,
    /// Native type expression, filled in by the resolver
    pub native_type: Option<String>,
    /// Value-type dependency that must be emitted before the owner
    pub depends: Option<TypeIndex>,
}

impl Field {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, is_static: bool) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            is_static,
            native_type: None,
            depends: None,
        }
    }
}

/// One discovered namespace-qualified type declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeInfo {
    pub full_name: String,
    pub short_name: String,
    /// Sanitized name used for the emitted structures
    pub struct_name: String,
    pub kind: TypeKind,
    /// First listed base that is not the object or value-type root
    pub parent: Option<String>,
    /// Underlying-type name, enums only
    pub enum_base: Option<String>,
    /// Instance fields, in declaration order
    pub fields: Vec<Field>,
    /// Static fields, in declaration order
    pub static_fields: Vec<Field>,
}

impl TypeInfo {
    pub fn is_value_type(&self) -> bool {
        self.kind.is_value_type()
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty() || !self.static_fields.is_empty()
    }
}

/// Il2Cpp metadata layout version selecting the descriptor preamble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderVersion {
    #[serde(rename = "22")]
    V22,
    #[serde(rename = "24")]
    V24,
    #[serde(rename = "24.1")]
    V24_1,
    #[serde(rename = "24.2")]
    V24_2,
    #[serde(rename = "27")]
    V27,
    #[serde(rename = "29")]
    V29,
}

impl HeaderVersion {
    pub const ALL: [HeaderVersion; 6] = [
        HeaderVersion::V22,
        HeaderVersion::V24,
        HeaderVersion::V24_1,
        HeaderVersion::V24_2,
        HeaderVersion::V27,
        HeaderVersion::V29,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderVersion::V22 => "22",
            HeaderVersion::V24 => "24",
            HeaderVersion::V24_1 => "24.1",
            HeaderVersion::V24_2 => "24.2",
            HeaderVersion::V27 => "27",
            HeaderVersion::V29 => "29",
        }
    }
}

impl Default for HeaderVersion {
    fn default() -> Self {
        HeaderVersion::V29
    }
}

impl fmt::Display for HeaderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeaderVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim() {
            "22" => Ok(HeaderVersion::V22),
            "24" => Ok(HeaderVersion::V24),
            "24.1" => Ok(HeaderVersion::V24_1),
            "24.2" => Ok(HeaderVersion::V24_2),
            "27" => Ok(HeaderVersion::V27),
            "29" => Ok(HeaderVersion::V29),
            other => Err(Error::UnsupportedVersion(other.to_string())),
        }
    }
}
