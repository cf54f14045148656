use chrono::Local;
use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::fields::KvVisitor;

// ANSI sequence modes
const CLEAR: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";

// ANSI sequence colors
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

/// Formats events for people watching a terminal:
/// `14:03:55.214  INFO [req-id] message key=value`.
///
/// A field named `tid` is rendered as a bracketed, truncated tag right after
/// the level, matching the request-id convention of the rest of the crate's
/// log output. Colors can be switched off for dumb terminals and log files.
#[derive(Debug, Clone)]
pub struct HumanFriendlyFormatter {
    colorize: bool,
    tid_strlimit: Option<usize>,
}

impl HumanFriendlyFormatter {
    pub fn new() -> Self {
        HumanFriendlyFormatter { colorize: true, tid_strlimit: Some(8) }
    }

    pub fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Truncates the `tid` tag to at most `limit` characters. `None` keeps
    /// it whole.
    pub fn tid_strlimit(mut self, limit: Option<usize>) -> Self {
        self.tid_strlimit = limit;
        self
    }

    fn paint(&self, text: &str, color: Option<&str>, bold: bool, italic: bool) -> String {
        if !self.colorize {
            return text.to_string();
        }

        let mut painted = String::new();
        if bold {
            painted.push_str(BOLD);
        }
        if italic {
            painted.push_str(ITALIC);
        }
        if let Some(color) = color {
            painted.push_str(color);
        }
        painted.push_str(text);
        painted.push_str(CLEAR);
        painted
    }

    fn format_level(&self, level: Level) -> String {
        let (label, color) = match level {
            Level::TRACE => ("TRACE", CYAN),
            Level::DEBUG => ("DEBUG", BLUE),
            Level::INFO => (" INFO", GREEN),
            Level::WARN => (" WARN", YELLOW),
            Level::ERROR => ("ERROR", RED),
        };
        self.paint(label, Some(color), true, false)
    }
}

impl Default for HumanFriendlyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N> FormatEvent<S, N> for HumanFriendlyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = KvVisitor::default();
        event.record(&mut visitor);

        let ts = Local::now().format("%H:%M:%S%.3f").to_string();
        write!(writer, "{} {}", ts, self.format_level(*event.metadata().level()))?;

        if let Some(tid) = visitor.take("tid") {
            let tid = match self.tid_strlimit {
                Some(limit) => tid.chars().take(limit).collect::<String>(),
                None => tid,
            };
            write!(writer, " {}", self.paint(&format!("[{}]", tid), Some(MAGENTA), false, false))?;
        }

        if let Some(msg) = &visitor.message {
            write!(writer, " {}", msg.trim())?;
        }

        for (key, value) in &visitor.fields {
            write!(
                writer,
                " {}{}{}",
                self.paint(key, None, true, false),
                self.paint("=", Some(BLUE), true, false),
                self.paint(value, None, false, true),
            )?;
        }

        writer.write_char('\n')
    }
}
