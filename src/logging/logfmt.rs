use chrono::Local;
use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::fields::KvVisitor;

/// Formats events as logfmt lines: `ts=... sev=INFO msg=... key=value`.
///
/// Values are collapsed to single-space whitespace and quoted when they
/// contain spaces, quotes, or backslashes. Event fields named `ts`, `sev`,
/// or `msg` never override the generated entries.
///
/// ```
/// use crosstie::logging::LogfmtFormatter;
///
/// tracing_subscriber::fmt()
///     .event_format(LogfmtFormatter::new())
///     .init();
/// ```
#[derive(Debug, Clone)]
pub struct LogfmtFormatter {
    output_timestamp: bool,
}

impl LogfmtFormatter {
    pub fn new() -> Self {
        LogfmtFormatter { output_timestamp: true }
    }

    /// Toggles the leading `ts=` entry. Useful when the collector stamps
    /// lines itself.
    pub fn output_timestamp(mut self, output: bool) -> Self {
        self.output_timestamp = output;
        self
    }
}

impl Default for LogfmtFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N> FormatEvent<S, N> for LogfmtFormatter
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

        let mut first = true;
        let mut reserved = vec!["sev"];

        if self.output_timestamp {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
            write_pair(&mut writer, &mut first, "ts", &ts)?;
            reserved.push("ts");
        }
        write_pair(&mut writer, &mut first, "sev", &event.metadata().level().to_string())?;

        if let Some(tid) = visitor.take("tid") {
            write_pair(&mut writer, &mut first, "tid", &tid)?;
        }
        if let Some(msg) = visitor.message.take() {
            write_pair(&mut writer, &mut first, "msg", &msg)?;
            reserved.push("msg");
        }

        for (key, value) in &visitor.fields {
            if reserved.contains(&key.as_str()) {
                continue;
            }
            write_pair(&mut writer, &mut first, key, value)?;
        }

        writer.write_char('\n')
    }
}

fn write_pair(writer: &mut Writer<'_>, first: &mut bool, key: &str, value: &str) -> fmt::Result {
    if !*first {
        writer.write_char(' ')?;
    }
    *first = false;
    write!(writer, "{}={}", key, escape_value(value))
}

/// Collapses whitespace runs to single spaces and quotes the value when it
/// contains spaces, quotes, or backslashes, escaping both with a backslash.
fn escape_value(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if !collapsed.contains([' ', '"', '\\']) {
        return collapsed;
    }

    let mut escaped = String::with_capacity(collapsed.len() + 2);
    escaped.push('"');
    for c in collapsed.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('"');
    escaped
}
