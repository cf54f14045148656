//! # Parameter Tools Module
//!
//! Utilities for reshaping nested request-parameter trees.
//!
//! ## Overview
//!
//! Request payloads rarely arrive shaped the way the application wants them.
//! This module provides:
//!
//! - **[`ParamValue`] / [`ParamMap`]** - a parameter tree of mappings,
//!   sequences, and opaque scalar leaves, with an allow-list trust flag on
//!   mappings
//! - **[`Renamer`]** - a dot-path rename engine that moves keys around the
//!   tree, including per-element rewrites of collections via `[]` markers
//! - **[`underscore_keys`] / [`deep_transform_keys`]** - recursive key-case
//!   normalization
//!
//! ## Rename expressions
//!
//! A rename spec maps dot-path expressions to dot-path expressions:
//!
//! | Spec | Effect |
//! |------|--------|
//! | `"root" => "newname"` | rename a key |
//! | `"a.b" => "a.c"` | rename a nested key |
//! | `"root" => "root.nested"` | push a value down a level |
//! | `"root.nested" => "root"` | pull a value up a level |
//! | `"items[].a" => "items[].b"` | rename inside every element of `items` |
//!
//! A `from` path missing from the data is a no-op, not an error. Malformed
//! expressions and mismatched `[]` counts are configuration errors, rejected
//! before anything is mutated.

mod action;
mod address;
mod case;
mod error;
mod rename;
mod value;

pub use case::{deep_transform_keys, underscore_keys};
pub use error::RenameError;
pub use rename::{rename, rename_in_place, Renamer};
pub use value::{ParamMap, ParamValue};
