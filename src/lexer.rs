//! Splits raw input text into logical statements.
//!
//! Molpro separates statements with `;` or a newline, and groups a command
//! with its directives in braces:
//!
//! ```text
//! geometry={He}
//! {frequencies;thermo,temp=298}
//! ```
//!
//! [`normalise`] first rewrites a few legacy spellings of the basis block,
//! then scans the text once. Inside a group every separator becomes `;`, so
//! a group always ends up on one logical line; the line ends at the closing
//! brace and whatever follows starts a new statement.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref LEGACY_BASIS_BLOCK: Regex =
        Regex::new(r"(?ims)^[ \t]*basis[ \t]*\n(.*?)\n[ \t]*end[ \t]*$").unwrap();
    static ref BASIS_OPEN_NEWLINE: Regex = Regex::new(r"(?i)basis=\{\n").unwrap();
    static ref BASIS_SPLIT_LINES: Regex =
        Regex::new(r"(?is)basis=\{([^}]+[^,}])\n([^}]+=[^}]+)\}").unwrap();
    static ref BASIS_GROUP: Regex = Regex::new(r"(?is)basis=\{ *([^}]*?)\n*\}").unwrap();
    static ref FREQ_SHORTHAND: Regex = Regex::new(r"(?i)\{freq\}").unwrap();
}

lazy_static! {
    /// An explicit shell definition, `basis={s,...}` or `basis={spd,...}`,
    /// which must stay a brace group.
    pub(crate) static ref SHELL_BASIS: Regex = Regex::new(r"(?is)basis=\{ *s[pdfghi]* *[,}]").unwrap();
}

/// One statement produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Statement text; group members are separated by `;`
    pub text: String,
    /// Set when a `{` had no matching `}` before the end of the input
    pub unterminated: bool,
}

/// Rewrites legacy basis and frequency spellings into the forms the
/// classifier understands.
///
/// - `basis` / `...` / `end` blocks become `basis={...}`
/// - newline-separated element lines in a basis group are joined by commas
/// - a basis group that is not a shell definition becomes `basis, ...`
/// - `{FREQ}` becomes `{frequencies\nthermo}`
pub fn rewrite_legacy(input: &str) -> String {
    let mut text = LEGACY_BASIS_BLOCK.replace_all(input, "basis={$1}").into_owned();
    text = BASIS_OPEN_NEWLINE.replace_all(&text, "basis={").into_owned();
    for _ in 0..100 {
        let joined = BASIS_SPLIT_LINES.replace_all(&text, "basis={$1,$2}").into_owned();
        if joined == text {
            break;
        }
        text = joined;
    }
    if !SHELL_BASIS.is_match(&text) {
        text = BASIS_GROUP.replace_all(&text, "basis, $1").into_owned();
    }
    FREQ_SHORTHAND
        .replace_all(&text, "{frequencies\nthermo}")
        .into_owned()
}

/// Splits text into logical lines without applying legacy rewrites.
///
/// Blank statements are dropped.
pub fn split_statements(input: &str) -> Vec<LogicalLine> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_group = false;

    for c in input.chars() {
        match c {
            '\r' => {}
            '{' if !in_group => {
                in_group = true;
                current.push(c);
            }
            '}' if in_group => {
                current.push(c);
                in_group = false;
                push_statement(&mut lines, &mut current, false);
            }
            ';' | '\n' if in_group => current.push(';'),
            ';' | '\n' => push_statement(&mut lines, &mut current, false),
            _ => current.push(c),
        }
    }
    if in_group {
        debug!("Unterminated group at end of input: {:?}", current);
    }
    push_statement(&mut lines, &mut current, in_group);
    lines
}

fn push_statement(lines: &mut Vec<LogicalLine>, current: &mut String, unterminated: bool) {
    let text = std::mem::take(current);
    if !text.trim().is_empty() {
        lines.push(LogicalLine { text, unterminated });
    }
}

/// Rewrites legacy forms, then splits into logical lines.
///
/// # Examples
///
/// ```
/// use mpspec::lexer::normalise;
///
/// let lines: Vec<String> = normalise("geometry={\nHe\n};hf\n")
///     .into_iter()
///     .map(|l| l.text)
///     .collect();
/// assert_eq!(lines, vec!["geometry={;He;}", "hf"]);
/// ```
pub fn normalise(input: &str) -> Vec<LogicalLine> {
    split_statements(&rewrite_legacy(input))
}
