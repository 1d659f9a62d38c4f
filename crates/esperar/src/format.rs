//! Diff Message Formatter.
//!
//! Renders the two-part failure message: a headline naming the subject, verb
//! and expectation, then an `Expected`/`Received` body. Scalars render as a
//! plain two-line block; arrays and objects render as a line-level
//! structural diff. Negation relabels the expected side and keeps the
//! columns aligned, and a negated assertion that failed because the values
//! DID match renders the raw values instead of a meaningless diff of
//! identical trees.
//!
//! Pure rendering functions of their inputs; nothing here polls or reads
//! remote state.

use serde_json::Value;

use crate::options::ExpectOpts;

const EXPECTED_LABEL: &str = "Expected";
const EXPECTED_NOT_LABEL: &str = "Expected [not]";
const RECEIVED_LABEL: &str = "Received";

/// Everything the headline needs, threaded explicitly from the matcher
#[derive(Debug, Clone)]
pub struct MessageSpec {
    /// Rendered subject description (selector path or "mock")
    pub subject: String,
    /// Verb of the expectation phrase ("be", "have", ...)
    pub verb: String,
    /// Expectation phrase ("displayed", "text", ...)
    pub expectation: String,
    /// Whether the assertion is negated
    pub is_not: bool,
    /// Appends the word "containing" to the expectation phrase
    pub containing: bool,
    /// Extra label (attribute/property name), appended with a leading space
    pub extra_label: String,
}

impl MessageSpec {
    /// Message ingredients for a plain assertion
    #[must_use]
    pub fn new(subject: impl Into<String>, verb: &str, expectation: &str) -> Self {
        Self {
            subject: subject.into(),
            verb: verb.to_string(),
            expectation: expectation.to_string(),
            is_not: false,
            containing: false,
            extra_label: String::new(),
        }
    }

    /// Set the negation flag
    #[must_use]
    pub fn negated(mut self, is_not: bool) -> Self {
        self.is_not = is_not;
        self
    }

    /// Set the containing flag
    #[must_use]
    pub fn containing(mut self, containing: bool) -> Self {
        self.containing = containing;
        self
    }

    /// Set the extra label
    #[must_use]
    pub fn with_extra_label(mut self, label: impl Into<String>) -> Self {
        self.extra_label = label.into();
        self
    }
}

/// Render the full failure message.
///
/// A caller-supplied `opts.message` is prepended, or replaces the generated
/// message entirely when `opts.suppress_default_message` is also set.
#[must_use]
pub fn format_message(
    spec: &MessageSpec,
    expected: &Value,
    actual: &Value,
    opts: &ExpectOpts,
) -> String {
    let generated = format!("{}{}", headline(spec), body(expected, actual, spec.is_not));
    match (&opts.message, opts.suppress_default_message) {
        (Some(custom), true) => custom.clone(),
        (Some(custom), false) => format!("{custom}\n{generated}"),
        (None, _) => generated,
    }
}

/// Compose the headline: `Expect <subject> <not >to <verb> <expectation>`
#[must_use]
pub fn headline(spec: &MessageSpec) -> String {
    let not = if spec.is_not { "not " } else { "" };
    let containing = if spec.containing { " containing" } else { "" };
    let extra = if spec.extra_label.is_empty() {
        String::new()
    } else {
        format!(" {}", spec.extra_label)
    };
    let phrase = if spec.expectation.is_empty() {
        spec.verb.clone()
    } else {
        format!("{} {}", spec.verb, spec.expectation)
    };
    format!(
        "Expect {} {not}to {phrase}{containing}{extra}\n\n",
        spec.subject
    )
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn body(expected: &Value, actual: &Value, is_not: bool) -> String {
    // A `.not` assertion that failed because the value DID match: show the
    // raw values, a structural diff of identical trees carries no signal.
    if is_not && expected == actual {
        return plain_block(expected, actual, true);
    }
    if is_scalar(expected) && is_scalar(actual) {
        return plain_block(expected, actual, is_not);
    }
    structural_diff(expected, actual, is_not)
}

/// Two-line `Expected:` / `Received:` block, columns aligned when negated
fn plain_block(expected: &Value, actual: &Value, is_not: bool) -> String {
    let (exp_label, recv_label) = labels(is_not);
    format!("{exp_label}: {expected}\n{recv_label}: {actual}")
}

fn labels(is_not: bool) -> (String, String) {
    if is_not {
        let exp = EXPECTED_NOT_LABEL.to_string();
        let recv = format!("{RECEIVED_LABEL:<width$}", width = exp.len());
        (exp, recv)
    } else {
        (EXPECTED_LABEL.to_string(), RECEIVED_LABEL.to_string())
    }
}

/// Line-level structural diff with a `- Expected` / `+ Received` header
fn structural_diff(expected: &Value, actual: &Value, is_not: bool) -> String {
    let exp_header = if is_not {
        EXPECTED_NOT_LABEL
    } else {
        EXPECTED_LABEL
    };
    let mut out = format!("- {exp_header}\n+ {RECEIVED_LABEL}\n\n");

    let expected_lines = pretty_lines(expected);
    let actual_lines = pretty_lines(actual);
    for line in diff_lines(&expected_lines, &actual_lines) {
        out.push_str(&line);
        out.push('\n');
    }
    out.pop();
    out
}

/// Pretty-print a value in `Array [` / `Object {` style, one entry per line
#[must_use]
pub fn pretty_lines(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    render(value, 0, "", &mut lines);
    lines
}

fn render(value: &Value, depth: usize, suffix: &str, lines: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    match value {
        Value::Array(items) => {
            lines.push(format!("{pad}Array ["));
            for item in items {
                render(item, depth + 1, ",", lines);
            }
            lines.push(format!("{pad}]{suffix}"));
        }
        Value::Object(map) => {
            lines.push(format!("{pad}Object {{"));
            for (key, item) in map {
                match item {
                    Value::Array(_) | Value::Object(_) => {
                        let mut nested = Vec::new();
                        render(item, depth + 1, ",", &mut nested);
                        let first = nested.remove(0);
                        lines.push(format!("{pad}  {key:?}: {}", first.trim_start()));
                        lines.extend(nested);
                    }
                    scalar => lines.push(format!("{pad}  {key:?}: {scalar},")),
                }
            }
            lines.push(format!("{pad}}}{suffix}"));
        }
        scalar => lines.push(format!("{pad}{scalar}{suffix}")),
    }
}

/// Minimal LCS line diff: shared lines keep a two-space prefix, lines only
/// in `expected` get `-`, lines only in `actual` get `+`.
fn diff_lines(expected: &[String], actual: &[String]) -> Vec<String> {
    let n = expected.len();
    let m = actual.len();
    let mut lcs = vec![vec![0_usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if expected[i] == actual[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if expected[i] == actual[j] {
            out.push(format!("  {}", expected[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push(format!("- {}", expected[i]));
            i += 1;
        } else {
            out.push(format!("+ {}", actual[j]));
            j += 1;
        }
    }
    for line in &expected[i..] {
        out.push(format!("- {line}"));
    }
    for line in &actual[j..] {
        out.push(format!("+ {line}"));
    }
    out
}
