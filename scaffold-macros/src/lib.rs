//! Procedural macros for scaffold.
//!
//! - `#[derive(Fault)]` maps a user error type into `StructuredError`

use proc_macro::TokenStream;

mod fault;

/// Derive `From<T> for scaffold::StructuredError`.
///
/// Each enum variant takes `#[fault(code = N, status = "...")]`. A variant
/// without the attribute uses the type-level attribute as a whole. A variant
/// with its own attribute takes only a missing `code` from the type level;
/// its `status` defaults to the variant name. Structs use the type-level
/// attribute, with `status` defaulting to the type name. The value's
/// `Display` text is carried in the `message` field.
///
/// ```rust,ignore
/// #[derive(Debug, thiserror::Error, Fault)]
/// #[fault(code = 500, status = "ServerError")]
/// enum SignupError {
///     #[error("password too short")]
///     #[fault(code = 400, status = "BadRequest")]
///     TooShort,
///     #[error("user {0} exists")]
///     #[fault(code = 409)]
///     Conflict(String),
///     #[error("store unavailable")]
///     Unavailable,
/// }
/// ```
#[proc_macro_derive(Fault, attributes(fault))]
pub fn derive_fault(input: TokenStream) -> TokenStream {
    fault::derive_fault_impl(input)
}
