use super::{Access, FieldKind, RowMap, Tagged};
use crate::error::{FluentError, FluentResult};
use crate::value::Value;

/// Map one row onto an existing struct.
///
/// Columns missing from the row, or present as `NULL`, leave the field untouched.
/// Stops at the first field that fails.
pub fn scan_one<T: Tagged>(target: &mut T, row: &RowMap) -> FluentResult<()> {
    if row.is_empty() {
        return Err(FluentError::EmptyResult);
    }
    scan_fields(target, row)
}

/// Map one row onto a fresh `T::default()` and append it to `targets`.
///
/// Called once per row; nothing is appended when mapping fails.
pub fn scan_all<T: Tagged + Default>(targets: &mut Vec<T>, row: &RowMap) -> FluentResult<()> {
    if row.is_empty() {
        return Err(FluentError::EmptyResult);
    }
    let mut item = T::default();
    scan_fields(&mut item, row)?;
    targets.push(item);
    Ok(())
}

/// Build a nested struct from the row that is populating its parent.
pub fn scan_nested<U: Tagged + Default>(row: &RowMap) -> FluentResult<U> {
    let mut inner = U::default();
    scan_fields(&mut inner, row)?;
    Ok(inner)
}

/// Field walk shared by [`scan_one`], [`scan_all`] and nested fields.
pub fn scan_fields<T: Tagged>(target: &mut T, row: &RowMap) -> FluentResult<()> {
    for field in T::FIELDS {
        let access = match &field.access {
            Access::Nested(scan) => {
                scan(target, row)?;
                continue;
            }
            Access::Scalar(access) => access,
        };

        let value = match row.get(field.tag) {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };

        let write = access
            .write
            .ok_or_else(|| FluentError::NotSettable(field.name.to_string()))?;

        write(target, coerce_for(field.kind, value)).map_err(|rejected| {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "pgfluent.mapper",
                field = field.name,
                column = field.tag,
                expected = %field.kind,
                found = rejected.kind_name(),
                "row value does not fit field"
            );
            FluentError::mismatch(field.name, field.kind, rejected.kind_name())
        })?;
    }
    Ok(())
}

// Raw bytes are text for text fields; anything else gets the numeric promotion.
// Bytes that are not UTF-8 stay bytes, which no scalar field accepts.
fn coerce_for(kind: FieldKind, value: &Value) -> Value {
    match value {
        Value::Bytes(raw) if kind == FieldKind::Text => match std::str::from_utf8(raw) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => value.clone(),
        },
        Value::Bytes(raw) => Value::coerce_bytes(raw),
        other => other.clone(),
    }
}
