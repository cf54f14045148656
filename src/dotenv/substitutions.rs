use std::collections::HashMap;
use std::env;
use std::process::Command;

use super::DotenvError;

/// Expands `$NAME` and `${NAME}` references.
///
/// `\$` keeps the reference literal (minus the backslash). Undefined names
/// expand to the empty string. A `$` followed by `(` is left for the command
/// pass. Hand-rolled rather than a regex because distinguishing `$NAME` from
/// `$(...)` needs one character of lookahead the regex crate does not offer.
pub(super) fn variables(value: &str, vars: &HashMap<String, String>) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < chars.len() {
        // An escaped reference: drop the backslash, keep the rest verbatim.
        if chars[i] == '\\' && peek(&chars, i + 1) == Some('$') && peek(&chars, i + 2) != Some('(') {
            i += 1;
            out.push('$');
            i += 1;
            if peek(&chars, i) == Some('{') {
                out.push('{');
                i += 1;
            }
            while let Some(c) = peek(&chars, i).filter(|c| is_name_char(*c)) {
                out.push(c);
                i += 1;
            }
            if peek(&chars, i) == Some('}') {
                out.push('}');
                i += 1;
            }
            continue;
        }

        if chars[i] == '$' && peek(&chars, i + 1) != Some('(') {
            let start = i;
            i += 1;
            if peek(&chars, i) == Some('{') {
                i += 1;
            }
            let name_start = i;
            while peek(&chars, i).filter(|c| is_name_char(*c)).is_some() {
                i += 1;
            }
            let name: String = chars[name_start..i].iter().collect();
            if peek(&chars, i) == Some('}') {
                i += 1;
            }

            if name.is_empty() {
                // A bare `$` (or empty braces) is not a reference.
                out.extend(&chars[start..i]);
            } else {
                out.push_str(&lookup(vars, &name));
            }
            continue;
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Expands `$(command)` by running the command through `sh -c`, trimming the
/// trailing line break. Parentheses nest; `\$(...)` is left verbatim minus
/// the backslash.
pub(super) fn commands(value: &str) -> Result<String, DotenvError> {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' && peek(&chars, i + 1) == Some('$') && peek(&chars, i + 2) == Some('(') {
            if let Some(close) = matching_paren(&chars, i + 2) {
                out.extend(&chars[i + 1..=close]);
                i = close + 1;
                continue;
            }
        }

        if chars[i] == '$' && peek(&chars, i + 1) == Some('(') {
            if let Some(close) = matching_paren(&chars, i + 1) {
                let command: String = chars[i + 2..close].iter().collect();
                out.push_str(&run(&command)?);
                i = close + 1;
                continue;
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    Ok(out)
}

fn peek(chars: &[char], i: usize) -> Option<char> {
    chars.get(i).copied()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lookup(vars: &HashMap<String, String>, name: &str) -> String {
    if let Some(value) = vars.get(name) {
        return value.clone();
    }
    env::var(name).unwrap_or_default()
}

/// Index of the `)` closing the `(` at `open`, honoring nesting.
fn matching_paren(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in chars.iter().enumerate().skip(open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn run(command: &str) -> Result<String, DotenvError> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|source| DotenvError::Command { command: command.to_string(), source })?;

    let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if stdout.ends_with('\n') {
        stdout.pop();
        if stdout.ends_with('\r') {
            stdout.pop();
        }
    }
    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_vars() -> HashMap<String, String> {
        HashMap::new()
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_plain_and_braced_references() {
        let ctx = vars(&[("NAME", "world")]);
        assert_eq!(variables("hello $NAME", &ctx), "hello world");
        assert_eq!(variables("hello ${NAME}!", &ctx), "hello world!");
    }

    #[test]
    fn test_undefined_reference_is_empty() {
        assert_eq!(variables("a${CROSSTIE_SUBST_UNSET}b", &no_vars()), "ab");
    }

    #[test]
    fn test_escaped_reference_is_literal() {
        let ctx = vars(&[("NAME", "world")]);
        assert_eq!(variables(r"\$NAME", &ctx), "$NAME");
        assert_eq!(variables(r"\${NAME}", &ctx), "${NAME}");
    }

    #[test]
    fn test_bare_dollar_is_untouched() {
        assert_eq!(variables("cost: 5$", &no_vars()), "cost: 5$");
        assert_eq!(variables("a $ b", &no_vars()), "a $ b");
    }

    #[test]
    fn test_parsed_pairs_shadow_process_env() {
        env::set_var("CROSSTIE_SUBST_SHADOWED", "from-env");
        let ctx = vars(&[("CROSSTIE_SUBST_SHADOWED", "from-file")]);
        assert_eq!(variables("$CROSSTIE_SUBST_SHADOWED", &ctx), "from-file");
        assert_eq!(variables("$CROSSTIE_SUBST_SHADOWED", &no_vars()), "from-env");
    }

    #[test]
    fn test_command_substitution() {
        assert_eq!(commands("today is $(echo tuesday)").unwrap(), "today is tuesday");
    }

    #[test]
    fn test_nested_command_parentheses() {
        assert_eq!(commands("$(echo $(echo inner))").unwrap(), "inner");
    }

    #[test]
    fn test_escaped_command_is_literal() {
        assert_eq!(commands(r"\$(echo hi)").unwrap(), "$(echo hi)");
    }

    #[test]
    fn test_unbalanced_parens_are_untouched() {
        assert_eq!(commands("$(echo hi").unwrap(), "$(echo hi");
    }
}
