//! # Dotenv Module
//!
//! Parser and loader for `.env` files.
//!
//! ## Overview
//!
//! The `.env` format is line-oriented `KEY=value` pairs with a few amenities:
//!
//! - optional `export ` prefix and `KEY: value` separator style
//! - unquoted, single-quoted, and double-quoted values
//! - trailing `#` comments
//! - `\n` / `\r` expansion and backslash escapes inside double quotes
//! - variable substitution: `$NAME` or `${NAME}`, escaped with `\$`
//! - command substitution: `$(command)`, run through `sh -c`
//!
//! Single-quoted values are taken verbatim; no escapes, no substitutions.
//! Substituted variables resolve against the process environment overlaid
//! with the pairs parsed so far, so files can build on their own values:
//!
//! ```text
//! HOST=localhost
//! PORT=5432
//! DATABASE_URL="postgres://$HOST:$PORT/app"
//! ```
//!
//! ## Loading
//!
//! [`load`] reads a list of files and applies the result to the process
//! environment. Missing files are skipped; within the list, later files
//! overwrite earlier ones, and already-set process variables win unless
//! `overwrite` is passed.
//!
//! ```no_run
//! crosstie::dotenv::load(&[".env.local", ".env"], false).expect("env files load");
//! ```

mod parser;
mod substitutions;

pub use parser::Parser;

use anyhow::Context;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Env file parsing error
#[derive(Debug)]
pub enum DotenvError {
    /// A standalone `export KEY` line names a variable that no parsed line
    /// defines.
    UnsetVariable {
        /// The offending line, trimmed
        line: String,
    },
    /// A `$(command)` substitution could not be executed.
    Command {
        /// The command text inside the parentheses
        command: String,
        source: io::Error,
    },
}

impl fmt::Display for DotenvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DotenvError::UnsetVariable { line } => {
                write!(f, "env line {:?} has an unset variable", line)
            }
            DotenvError::Command { command, source } => {
                write!(f, "failed to run substituted command '{}': {}", command, source)
            }
        }
    }
}

impl std::error::Error for DotenvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DotenvError::Command { source, .. } => Some(source),
            DotenvError::UnsetVariable { .. } => None,
        }
    }
}

/// Parses the given files into a single key/value map.
///
/// Later files in the list overwrite keys from earlier ones. When
/// `ignore_missing` is set, files that do not exist are skipped; any other
/// read failure is an error either way.
pub fn parse_files<P: AsRef<Path>>(
    paths: &[P],
    ignore_missing: bool,
) -> anyhow::Result<HashMap<String, String>> {
    let mut vars = HashMap::new();

    for path in paths {
        let path = path.as_ref();
        let payload = match fs::read_to_string(path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == io::ErrorKind::NotFound && ignore_missing => continue,
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read env file {}", path.display()))
            }
        };

        let parsed = Parser::new(&payload)
            .parse()
            .with_context(|| format!("failed to parse env file {}", path.display()))?;
        debug!(file = %path.display(), count = parsed.len(), "parsed env file");
        vars.extend(parsed);
    }

    Ok(vars)
}

/// Loads the given files into the process environment.
///
/// Missing files are skipped. Variables already present in the process
/// environment are kept unless `overwrite` is set. Returns the parsed map.
pub fn load<P: AsRef<Path>>(paths: &[P], overwrite: bool) -> anyhow::Result<HashMap<String, String>> {
    let vars = parse_files(paths, true)?;
    apply(&vars, overwrite);
    Ok(vars)
}

/// Applies a parsed map to the process environment.
pub fn apply(vars: &HashMap<String, String>, overwrite: bool) {
    for (key, value) in vars {
        if overwrite || env::var_os(key).is_none() {
            env::set_var(key, value);
        }
    }
}
