#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the registrar workspace.
//!
//! Every crate in the workspace declares exactly one error enum and annotates it with
//! [`macro@registrar_error`]. The macro keeps those enums uniform: the same derives, the
//! same `.context(..)` extension, and the same conversions from upstream errors.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! registrar-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns an enum with named-field variants into a workspace error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant carrying a source.
/// * `From<SourceError>` for variants with a `source` field (or a field marked
///   `#[source]`/`#[from]`) and a `context` field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant is present.
/// * `ErrorName::kind(&self) -> &'static str` returning the variant name, meant for
///   structured log fields (`error.kind = err.kind()`).
/// * A private `format_context` helper used inside `#[error(..)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Every variant uses named fields; tuple and unit variants are rejected.
/// 3. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 4. A variant with a source must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use registrar_derive::registrar_error;
/// use std::borrow::Cow;
///
/// #[registrar_error]
/// pub enum StorageError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal storage fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &std::path::Path) -> Result<Vec<u8>, StorageError> {
///     std::fs::read(path).context("Reading record")
/// }
/// ```
#[proc_macro_attribute]
pub fn registrar_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
