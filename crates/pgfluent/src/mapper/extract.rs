use super::{Access, Tagged};
use crate::value::Value;

/// Collect `(column, value)` for every set scalar field, in declaration order.
///
/// Zero-valued plain scalars are treated as unset and skipped, see the
/// [module docs](super). Nested fields never take part.
pub fn extract_fields<T: Tagged>(source: &T) -> Vec<(&'static str, Value)> {
    T::FIELDS
        .iter()
        .filter_map(|field| match &field.access {
            Access::Scalar(access) if !(access.is_unset)(source) => {
                Some((field.tag, (access.read)(source)))
            }
            _ => None,
        })
        .collect()
}

/// [`extract_fields`] split into the column list and the argument list.
pub fn extract_columns<T: Tagged>(source: &T) -> (Vec<&'static str>, Vec<Value>) {
    extract_fields(source).into_iter().unzip()
}
