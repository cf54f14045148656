use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::substitutions;
use super::DotenvError;

/// Grammar for one `KEY=value` line. Quoted values may span multiple lines;
/// the unquoted form runs to the first `#` or end of line.
static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*(?:export[ \t]+)?([\w.]+)(?:[ \t]*=[ \t]*|:[ \t]+)([ \t]*'(?:\\'|[^'])*'|[ \t]*"(?:\\"|[^"])*"|[^#\r\n]+)?[ \t]*(?:#.*)?$"#,
    )
    .expect("env line pattern is valid")
});

/// Parses the `.env` file format into key/value pairs.
///
/// Pairs are processed top to bottom, so substitutions can reference keys
/// defined earlier in the same payload.
pub struct Parser<'a> {
    payload: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(payload: &'a str) -> Self {
        Parser { payload }
    }

    pub fn parse(&self) -> Result<HashMap<String, String>, DotenvError> {
        let payload = self.payload.replace("\r\n", "\n").replace('\r', "\n");
        let mut vars = HashMap::new();
        let mut consumed = Vec::new();

        for caps in LINE.captures_iter(&payload) {
            if let Some(whole) = caps.get(0) {
                consumed.push((whole.start(), whole.end()));
            }
            let raw = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let value = parse_value(raw, &vars)?;
            vars.insert(caps[1].to_string(), value);
        }

        // Lines the grammar did not consume still get a minimal check: a
        // standalone `export KEY` must name variables defined above.
        let mut leftover = String::new();
        let mut cursor = 0;
        for &(start, end) in &consumed {
            leftover.push_str(&payload[cursor..start]);
            cursor = end;
        }
        leftover.push_str(&payload[cursor..]);

        for line in leftover.split(['\n', '\r']) {
            let mut words = line.split_whitespace();
            if words.next() == Some("export")
                && words.any(|name| !vars.contains_key(name))
            {
                return Err(DotenvError::UnsetVariable { line: line.trim().to_string() });
            }
        }

        Ok(vars)
    }
}

fn parse_value(raw: &str, vars: &HashMap<String, String>) -> Result<String, DotenvError> {
    let trimmed = raw.trim();
    let (inner, quote) = strip_surrounding_quotes(trimmed);

    let unescaped = match quote {
        Some('"') => unescape(&expand_newlines(inner)),
        // Single quotes: verbatim, and no substitutions either.
        Some(_) => return Ok(inner.to_string()),
        None => unescape(inner),
    };

    let substituted = substitutions::variables(&unescaped, vars);
    substitutions::commands(&substituted)
}

fn strip_surrounding_quotes(value: &str) -> (&str, Option<char>) {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return (&value[1..value.len() - 1], Some(first as char));
        }
    }
    (value, None)
}

/// Turns the two-character sequences `\n` and `\r` into escaped line breaks,
/// so that [`unescape`] collapses them to the real control characters.
fn expand_newlines(value: &str) -> String {
    value.replace("\\n", "\\\n").replace("\\r", "\\\r")
}

/// Drops one backslash from every escape pair, except `\$` which is left for
/// the substitution pass to interpret.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('$') => {
                out.push('\\');
                out.push('$');
            }
            Some(next) => out.push(next),
            None => out.push('\\'),
        }
    }

    out
}
