//! Proc macros for the tsrow SDK.
//!
//! This crate is an internal implementation detail of `tsrow-sdk`.
//! Do not depend on it directly; use `tsrow_sdk::Record` instead.

mod record;

use proc_macro::TokenStream;

/// Derive `tsrow_sdk::Record` for a struct with named fields.
///
/// Only `pub` fields are mapped, in declaration order. Every mapped field's
/// type must implement `tsrow_sdk::FieldValue`.
///
/// # Container attribute
///
/// - `#[tsrow(table = "<name>")]`: table name used verbatim instead of the
///   sanitized struct name.
///
/// # Field attribute
///
/// `#[tsrow("<annotation>")]`, semicolon separated:
///
/// - `tag`, `field`, `timestamp`: column role (default `field`)
/// - `column:<name>`: column name used verbatim
/// - `type:<type>`: column type, e.g. `int32`, `float`, `json`, `timestamp`
/// - `precision:<second|millisecond|microsecond|nanosecond>`: width of a
///   bare `timestamp` type
/// - `-` on its own: skip the field
#[proc_macro_derive(Record, attributes(tsrow))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::expand(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
