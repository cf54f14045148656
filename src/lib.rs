//! # crosstie
//!
//! **crosstie** is a small collection of opinionated utilities for JSON-driven
//! services: reshaping nested request parameters, loading `.env` files, and
//! formatting structured log output.
//!
//! ## Overview
//!
//! The library is organized into three modules:
//!
//! - **[`params`]** - parameter trees ([`ParamValue`]), a dot-path rename
//!   engine ([`Renamer`]), and deep key-case normalization
//! - **[`dotenv`]** - a `.env` parser with quoting, escaping, and
//!   variable/command substitution, plus a multi-file loader
//! - **[`logging`]** - logfmt and human-friendly `tracing-subscriber` event
//!   formatters
//!
//! ## Quick Start
//!
//! Renaming request parameters with dot-path expressions:
//!
//! ```
//! use crosstie::{rename, ParamValue};
//! use serde_json::json;
//!
//! let params = ParamValue::from(json!({
//!     "pets": [{ "petName": 1 }, { "petName": 2 }]
//! }));
//!
//! let renamed = rename(&[("pets[].petName", "pets[].name")], &params).unwrap();
//! assert_eq!(
//!     renamed.to_value(),
//!     json!({ "pets": [{ "name": 1 }, { "name": 2 }] })
//! );
//! ```
//!
//! Loading environment files at startup:
//!
//! ```no_run
//! crosstie::dotenv::load(&[".env.local", ".env"], false).expect("env files load");
//! ```
//!
//! ## Design Notes
//!
//! The rename engine never raises for data that does not match the spec; a
//! missing `from` path is a silent no-op. Only a malformed spec is an error,
//! and it is rejected before the target is mutated. See [`params::Renamer`]
//! for the full expression grammar.

pub mod dotenv;
pub mod logging;
pub mod params;

pub use params::{rename, rename_in_place, ParamMap, ParamValue, RenameError, Renamer};
