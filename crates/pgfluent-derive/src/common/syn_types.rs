//! Type helper utilities for syn type analysis.

/// The single type argument of a path type whose last segment is `wrapper`.
fn single_arg<'a>(ty: &'a syn::Type, wrapper: &str) -> Option<&'a syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    let syn::GenericArgument::Type(inner) = args.args.first()? else {
        return None;
    };
    Some(inner)
}

/// Extract the inner type T from Option<T>, or return None if not an Option type.
///
/// Recognizes `Option<T>`, `std::option::Option<T>`, and `core::option::Option<T>`.
pub fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "Option")
}

/// Extract the inner type T from Box<T>, or return None if not a Box type.
pub fn box_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "Box")
}

/// How a nested struct field wraps its struct type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedShape {
    /// `U`
    Plain,
    /// `Box<U>`
    Boxed,
    /// `Option<U>`
    Optional,
    /// `Option<Box<U>>`
    OptionalBoxed,
}

/// Split a nested field type into its shape and the nested struct type.
pub fn nested_shape(ty: &syn::Type) -> (NestedShape, &syn::Type) {
    if let Some(inner) = option_inner(ty) {
        return match box_inner(inner) {
            Some(base) => (NestedShape::OptionalBoxed, base),
            None => (NestedShape::Optional, inner),
        };
    }
    match box_inner(ty) {
        Some(base) => (NestedShape::Boxed, base),
        None => (NestedShape::Plain, ty),
    }
}
