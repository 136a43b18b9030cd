//! Canonical form of Molpro input, used to compare two inputs.
//!
//! [`canonicalise`] works on the text alone and knows nothing about
//! [`InputSpecification`](crate::specification::InputSpecification). It
//! smooths over differences that do not change the job:
//!
//! - `;` and newlines, blank lines, spaces around `,` and `=`
//! - comments and letter case
//! - the spellings `basis,X`, `basis={X}` and `basis=default=X`
//! - `set,` before assignments, `hf`/`ks` for `rhf`/`rks`
//! - the shorthands `{optg}`, `{freq}`, `freq` and `nosym`
//! - several assignments on one line versus one per line
//! - bare commands versus commands wrapped in `{...}`
//!
//! Simple assignments written above the geometry, basis or orientation
//! statements are moved below them, and `dkho` is moved above the other
//! assignments, matching the order in which the generator writes them.
//! Statements are otherwise kept in order.

use crate::lexer::rewrite_legacy;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref COMMA_SPACES: Regex = Regex::new(r" *, *").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n+").unwrap();
    static ref OPEN_NEWLINE: Regex = Regex::new(r"\{[ \t]*\n").unwrap();
    static ref EQUALS_SPACES: Regex = Regex::new(r" *= *").unwrap();
    static ref NEWLINE_CLOSE: Regex = Regex::new(r"\n[ \t]*\}").unwrap();
    static ref SET_PREFIX: Regex = Regex::new(r"(?im)^[ \t]*set[, ]").unwrap();
    static ref BASIS_COMMA: Regex = Regex::new(r"\bbasis *, *").unwrap();
    static ref BASIS_GROUP: Regex = Regex::new(r"basis= *\{(.*)\} *$").unwrap();
    static ref BASIS_DEFAULT: Regex = Regex::new(r"basis= *default *= *").unwrap();
    static ref LEADING_HF_KS: Regex = Regex::new(r"^ *(\{?) *((?:df-|ldf-|pno-)?)(hf|ks)\b").unwrap();
    static ref BRACKET_COMMA: Regex = Regex::new(r"(\[[0-9!]+),").unwrap();
    static ref ASSIGNMENT_LIST: Regex =
        Regex::new(r"^([a-z][a-z0-9_]*) *= *\[?[!a-z0-9_.+\- ]*\]? *,").unwrap();
    static ref CLOSE_SPACES: Regex = Regex::new(r" *\}").unwrap();
    static ref OPEN_SPACES: Regex = Regex::new(r"\{ *").unwrap();
    static ref ASSIGNMENT: Regex = Regex::new(r"^\w+ *=").unwrap();
    static ref DEFAULT_ASSIGNMENT: Regex = Regex::new(r"^(charge=0|\w+=)$").unwrap();
    static ref OPTION_COMMAND: Regex = Regex::new(r"gparam|gthresh|gprint").unwrap();
    static ref SIMPLE_ASSIGNMENT: Regex = Regex::new(r"^(\w+)=[\w.+\-\[\],]*$").unwrap();
    static ref DKHO: Regex = Regex::new(r"^dkho=\d").unwrap();
}

/// Returns the canonical form of `input`.
///
/// The result has one statement per line, ends with a newline, and is
/// stable: canonicalising it again changes nothing.
///
/// # Examples
///
/// ```
/// use mpspec::canonical::canonicalise;
///
/// assert_eq!(canonicalise("geometry={\nHe\n}"), "geometry={he}\n");
/// assert_eq!(canonicalise("a\n\n\nb\n"), "{a}\n{b}\n");
/// assert_eq!(
///     canonicalise("basis={default=cc-pVTZ,h=cc-pVDZ} ! comment"),
///     "basis=cc-pvtz,h=cc-pvdz\n"
/// );
/// ```
pub fn canonicalise(input: &str) -> String {
    let text = collapse(&rewrite_legacy(&input.replace('\r', "")));

    let mut entries: Vec<String> = Vec::new();
    let mut in_group = false;
    for raw in text.lines() {
        let continuing = in_group;
        in_group = track_group(raw, in_group);
        let line = normalise_line(raw, continuing);
        if !continuing {
            entries.extend(split_pieces(&line));
        } else if !line.is_empty() {
            match entries.last_mut() {
                Some(last) => {
                    // braces kept from a comment close onto the previous line
                    if !line.starts_with('}') {
                        last.push('\n');
                    }
                    last.push_str(&line);
                }
                None => entries.push(line),
            }
        }
    }
    reanchor(&mut entries);

    let mut canonical = entries.join("\n");
    canonical.push('\n');
    canonical
}

/// Two inputs are equivalent when their canonical forms agree, ignoring
/// case.
pub fn equivalent(first: &str, second: &str) -> bool {
    canonicalise(first).to_lowercase() == canonicalise(second).to_lowercase()
}

/// Whole-text normalisation of separators and spacing.
fn collapse(text: &str) -> String {
    let text = text.replace(';', "\n");
    let text = COMMA_SPACES.replace_all(&text, ",");
    let text = BLANK_LINES.replace_all(&text, "\n");
    let text = OPEN_NEWLINE.replace_all(&text, "{");
    let text = EQUALS_SPACES.replace_all(&text, "=");
    let text = NEWLINE_CLOSE.replace_all(&text, "}");
    let text = text.trim_matches(|c| c == '\n' || c == ' ');
    SET_PREFIX.replace_all(text, "").into_owned()
}

/// Brace state after `line`, scanned the same way the lexer scans groups.
fn track_group(line: &str, mut in_group: bool) -> bool {
    for c in line.chars() {
        match c {
            '{' if !in_group => in_group = true,
            '}' if in_group => in_group = false,
            _ => {}
        }
    }
    in_group
}

/// Drops a `!` comment but keeps any `}` inside it, since the comment does
/// not hide the brace from the lexer.
fn strip_comment(line: &str) -> String {
    match line.split_once('!') {
        Some((code, comment)) => {
            let mut code = code.trim_end().to_string();
            code.extend(comment.chars().filter(|&c| c == '}'));
            code
        }
        None => line.to_string(),
    }
}

fn normalise_line(raw: &str, continuing: bool) -> String {
    let line = strip_comment(&raw.to_lowercase());
    let line = line.trim().trim_end_matches([' ', ',']);
    if continuing {
        return line.to_string();
    }
    let line = BASIS_COMMA.replace_all(line, "basis=");
    let line = BASIS_GROUP.replace_all(&line, "basis=${1}");
    let line = BASIS_DEFAULT.replace_all(&line, "basis=");
    let line = LEADING_HF_KS.replace(&line, "${1}${2}r${3}");
    match line.trim() {
        "{optg}" => "optg".to_string(),
        "{freq}" | "freq" => "frequencies".to_string(),
        "nosym" => "symmetry,nosym".to_string(),
        other => other.to_string(),
    }
}

/// Splits an assignment list into separate entries and wraps bare
/// commands in braces.
fn split_pieces(line: &str) -> Vec<String> {
    let mut line = line.to_string();
    loop {
        let protected = BRACKET_COMMA.replace_all(&line, "${1}!").into_owned();
        if protected == line {
            break;
        }
        line = protected;
    }

    let pieces: Vec<&str> = match ASSIGNMENT_LIST.captures(&line) {
        Some(c) if !matches!(&c[1], "basis" | "geometry") => line.split(',').collect(),
        _ => vec![line.as_str()],
    };

    pieces
        .into_iter()
        .filter_map(|piece| {
            let piece = piece.replace('!', ",");
            let piece = CLOSE_SPACES.replace_all(&piece, "}");
            let piece = OPEN_SPACES.replace_all(&piece, "{");
            let piece = piece.trim();
            if piece.is_empty() || DEFAULT_ASSIGNMENT.is_match(piece) {
                None
            } else if piece.starts_with('{') || ASSIGNMENT.is_match(piece) || OPTION_COMMAND.is_match(piece) {
                Some(piece.to_string())
            } else {
                Some(format!("{{{}}}", piece))
            }
        })
        .collect()
}

fn is_simple_assignment(entry: &str) -> bool {
    SIMPLE_ASSIGNMENT
        .captures(entry)
        .is_some_and(|c| !matches!(&c[1], "basis" | "geometry"))
}

fn is_anchor(entry: &str) -> bool {
    entry.starts_with("geometry=")
        || entry.starts_with("basis=")
        || entry.starts_with("{orient,")
        || entry == "{symmetry,nosym}"
}

/// Moves simple assignments below adjacent anchors and `dkho` above
/// adjacent assignments until nothing moves.
fn reanchor(entries: &mut [String]) {
    loop {
        let mut moved = false;
        for i in 1..entries.len() {
            let above = &entries[i - 1];
            let below = &entries[i];
            let sinks = is_simple_assignment(above) && is_anchor(below);
            let rises = DKHO.is_match(below) && is_simple_assignment(above) && !DKHO.is_match(above);
            if sinks || rises {
                entries.swap(i - 1, i);
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
}
