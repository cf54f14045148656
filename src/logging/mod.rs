//! # Logging Module
//!
//! Event formatters for the `tracing-subscriber` pipeline.
//!
//! ## Overview
//!
//! Two [`FormatEvent`](tracing_subscriber::fmt::FormatEvent) implementations
//! with opposite audiences:
//!
//! - **[`LogfmtFormatter`]** - machine-first `key=value` lines for log
//!   collectors
//! - **[`HumanFriendlyFormatter`]** - colorized, compact lines for local
//!   development
//!
//! Both treat the event message and fields the same way; only the dressing
//! differs. A field named `tid` gets special placement in both, carrying the
//! request/job correlation id.
//!
//! ## Usage
//!
//! ```no_run
//! use crosstie::logging::{HumanFriendlyFormatter, LogfmtFormatter};
//! use std::io::IsTerminal;
//!
//! if std::io::stdout().is_terminal() {
//!     tracing_subscriber::fmt()
//!         .event_format(HumanFriendlyFormatter::new())
//!         .init();
//! } else {
//!     tracing_subscriber::fmt()
//!         .event_format(LogfmtFormatter::new())
//!         .init();
//! }
//! ```

mod fields;
mod human;
mod logfmt;

pub use human::HumanFriendlyFormatter;
pub use logfmt::LogfmtFormatter;
