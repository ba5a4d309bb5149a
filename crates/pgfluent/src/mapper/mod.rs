//! Row mapping between tagged structs and column/value maps.
//!
//! A [`Tagged`] type publishes a static table of [`FieldDescriptor`]s, one per field
//! carrying a column tag. The table drives both directions:
//!
//! - **read**: [`scan_one`] / [`scan_all`] copy values out of a [`RowMap`] into fields,
//! - **write**: [`extract_fields`] collects the set fields of a struct as
//!   `(column, value)` pairs for INSERT/UPDATE payloads.
//!
//! Untagged fields have no descriptor and take part in neither direction.
//!
//! # Which fields are written
//!
//! [`extract_fields`] only returns fields that are *set*. For plain scalar fields
//! "set" means "not the zero value": `0`, `0.0`, `""`, `false` and the epoch
//! timestamp are indistinguishable from "left untouched" and are **never written**.
//! Wrap a field in `Option<T>` when zero is a legitimate value to store: `None` is
//! skipped, `Some(0)` / `Some(false)` are written.
//!
//! ```ignore
//! use pgfluent::Tagged;
//!
//! #[derive(Debug, Default, Tagged)]
//! struct Account {
//!     #[fluent(column = "id")]
//!     id: i64,
//!     #[fluent(column = "name")]
//!     name: String,
//!     #[fluent(column = "is_active")]
//!     is_active: Option<bool>,
//! }
//! ```

mod column;
mod extract;
mod scan;


pub use column::Column;
pub use extract::{extract_columns, extract_fields};
pub use scan::{scan_all, scan_fields, scan_nested, scan_one};

use crate::error::FluentResult;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// One result row: column name to decoded value.
pub type RowMap = HashMap<String, Value>;

/// Declared kind of a tagged field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Text,
    Bool,
    Timestamp,
    Nested,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Text => "text",
            FieldKind::Bool => "bool",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Nested => "nested",
        };
        f.write_str(name)
    }
}

/// Reads a field as a [`Value`].
pub type ReadFn<T> = fn(&T) -> Value;
/// Reports whether a field is unset (and must be left out of write payloads).
pub type IsUnsetFn<T> = fn(&T) -> bool;
/// Stores a value into a field, handing the value back when it does not fit.
pub type WriteFn<T> = fn(&mut T, Value) -> Result<(), Value>;
/// Populates a nested field from the same row.
pub type NestedFn<T> = fn(&mut T, &RowMap) -> FluentResult<()>;

/// Accessors for a scalar field.
pub struct ScalarAccess<T: 'static> {
    pub read: ReadFn<T>,
    pub is_unset: IsUnsetFn<T>,
    /// `None` marks a field that rows may not write to.
    pub write: Option<WriteFn<T>>,
}

/// How a descriptor reaches its field.
pub enum Access<T: 'static> {
    Scalar(ScalarAccess<T>),
    Nested(NestedFn<T>),
}

/// Static description of one tagged field.
pub struct FieldDescriptor<T: 'static> {
    /// Column name the field maps to.
    pub tag: &'static str,
    /// Rust field name, used in error messages.
    pub name: &'static str,
    pub kind: FieldKind,
    pub access: Access<T>,
}

impl<T: 'static> FieldDescriptor<T> {
    /// A scalar field that rows can read from and write to.
    pub const fn scalar(
        tag: &'static str,
        name: &'static str,
        kind: FieldKind,
        read: ReadFn<T>,
        is_unset: IsUnsetFn<T>,
        write: WriteFn<T>,
    ) -> Self {
        Self {
            tag,
            name,
            kind,
            access: Access::Scalar(ScalarAccess {
                read,
                is_unset,
                write: Some(write),
            }),
        }
    }

    /// A scalar field that can be extracted but not set from a row.
    pub const fn unsettable(
        tag: &'static str,
        name: &'static str,
        kind: FieldKind,
        read: ReadFn<T>,
        is_unset: IsUnsetFn<T>,
    ) -> Self {
        Self {
            tag,
            name,
            kind,
            access: Access::Scalar(ScalarAccess {
                read,
                is_unset,
                write: None,
            }),
        }
    }

    /// A nested struct populated from the same row.
    pub const fn nested(tag: &'static str, name: &'static str, scan: NestedFn<T>) -> Self {
        Self {
            tag,
            name,
            kind: FieldKind::Nested,
            access: Access::Nested(scan),
        }
    }
}

impl<T: 'static> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A struct with a static field descriptor table.
///
/// This trait should typically be derived using `#[derive(Tagged)]`
/// from the `pgfluent-derive` crate.
pub trait Tagged: Sized + 'static {
    /// Descriptors in field declaration order.
    const FIELDS: &'static [FieldDescriptor<Self>];

    /// Look up a descriptor by column tag.
    fn field(tag: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::FIELDS.iter().find(|f| f.tag == tag)
    }
}
