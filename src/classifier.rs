//! Statement classification.
//!
//! Each logical line from the [`lexer`](crate::lexer) is matched against an
//! ordered table of rules, [`RULES`]. The first rule that claims the line
//! decides what it is; a line that no rule claims is
//! [`Statement::Unrecognized`] and contributes nothing. A rule may claim a
//! line and still return `Unrecognized` (for example `orient,foo`), which
//! stops later rules from reinterpreting it.
//!
//! The priority order is the order of [`RULES`]:
//!
//! | Rule | Example |
//! |------|---------|
//! | orientation | `orient,mass` |
//! | symmetry | `symmetry,nosym`, `nosym` |
//! | relativistic | `dkho=3` |
//! | property | `gexpec,dm` |
//! | molden export | `put,molden,ibo.molden` |
//! | orbital generator | `ibba`, `locali,pipek` |
//! | inline geometry | `geometry={He}` |
//! | external geometry | `geometry=h2o.xyz` |
//! | basis | `basis=cc-pVTZ,H=cc-pVDZ` |
//! | variables | `set,charge=1,spin=1` |
//! | option block | `gthresh,energy=1e-8` |
//! | core | `core,small` |
//! | step | `{df-ccsd(t);expec,dm}` |
//! | postscript | `put,xyz,final.xyz` |

use crate::config::ParserConfig;
use crate::keywords::{
    is_template_command, CoreCorrelation, Hamiltonian, OptionBlock, OrbitalType, Orientation, Property,
    WaveFunctionSymmetry,
};
use crate::lexer::{LogicalLine, SHELL_BASIS};
use crate::parser::Unrepresentable;
use crate::specification::{Basis, Directive, Geometry, Step};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref BASIS_COMMA: Regex = Regex::new(r"(?i)\bbasis *,").unwrap();
    static ref LEADING_HF_KS: Regex = Regex::new(r"(?i)^((?:df-|ldf-|pno-)?)(hf|ks)\b").unwrap();
    static ref ORIENT: Regex = Regex::new(r"(?i)^orient *, *(.*)$").unwrap();
    static ref SYMMETRY: Regex = Regex::new(r"(?i)^symmetry *, *(.*)$").unwrap();
    static ref DKHO: Regex = Regex::new(r"(?i)^dkho\s*=\s*([^,;!\s}]*)\s*\}?\s*(?:!.*)?$").unwrap();
    static ref MOLDEN: Regex = Regex::new(r"(?i)^put\s*,\s*molden\s*,\s*(\w+)\.molden").unwrap();
    static ref GEOMETRY_INLINE: Regex = Regex::new(r"(?i)^geometry *= *\{").unwrap();
    static ref GEOMETRY_EXTERNAL: Regex = Regex::new(r"(?i)^geometry *=(.*)$").unwrap();
    static ref BASIS_INLINE: Regex = Regex::new(r"(?i)^basis *= *[^{ ]").unwrap();
    static ref BASIS_ANY: Regex = Regex::new(r"(?i)^basis *=").unwrap();
    static ref BASIS_PREFIX: Regex = Regex::new(r"(?i)^ *basis *= *(?:default *= *)?").unwrap();
    static ref ASSIGNMENT: Regex = Regex::new(r"(?i)^(set\s*,)?\s*[a-z][a-z0-9_]*\s*=").unwrap();
    static ref SET_PREFIX: Regex = Regex::new(r"(?i)^set\s*,").unwrap();
    static ref BRACKET_COMMA: Regex = Regex::new(r"(\[[0-9! ]+),").unwrap();
    static ref OPTION_PREFIX: Regex = Regex::new(r"^\s*g(?:param|thresh|print)\s*,*").unwrap();
}

const POSTSCRIPT_COMMANDS: &[&str] = &["put", "table", "noorbitals", "nobasis"];

/// A logical line prepared for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Trimmed statement with `basis,` already rewritten to `basis=`
    pub raw: String,
    /// `raw` without opening braces, leading `hf`/`ks` made restricted
    pub text: String,
    /// Lower-case leading token of `text`
    pub command: String,
}

impl Line {
    /// Prepares a logical line.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpspec::classifier::Line;
    ///
    /// let line = Line::new("{ks,b3lyp}");
    /// assert_eq!(line.text, "rks,b3lyp}");
    /// assert_eq!(line.command, "rks");
    /// ```
    pub fn new(statement: &str) -> Self {
        let raw = BASIS_COMMA
            .replace_all(statement.trim(), "basis=")
            .trim()
            .to_string();
        let text = if SHELL_BASIS.is_match(&raw) {
            raw.clone()
        } else {
            raw.replace('{', "").trim().to_string()
        };
        let text = LEADING_HF_KS.replace(&text, "${1}r${2}").into_owned();
        let command = text
            .split([';', ',', ' ', '!'])
            .next()
            .unwrap_or_default()
            .replace('}', "")
            .to_lowercase();
        Self { raw, text, command }
    }
}

impl From<&LogicalLine> for Line {
    fn from(line: &LogicalLine) -> Self {
        Line::new(&line.text)
    }
}

/// How a step relates to density fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fitting {
    /// No fitting prefix
    Plain,
    /// `df-` prefix, removed from the stored command
    Prefixed,
    /// `pno-` or `ldf-` prefix, kept as part of the command
    Embedded,
}

/// What a line means.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `orient,<option>`
    Orientation(Orientation),
    /// `symmetry,nosym`
    Symmetry(WaveFunctionSymmetry),
    /// `dkho=<order>`
    Hamiltonian(Hamiltonian),
    /// `gexpec,<operator>`
    Property(Property),
    /// `put,molden,<key>.molden`
    OrbitalExport(OrbitalType),
    /// Command that generates localised orbitals; regenerated from the export
    OrbitalGenerator(OrbitalType),
    /// Inline or external geometry
    Geometry(Geometry),
    /// Basis set definition
    Basis(Basis),
    /// One or more `name=value` assignments
    Variables(Vec<(String, String)>),
    /// `gparam`, `gthresh` or `gprint` with its options
    Options(OptionBlock, IndexMap<String, String>),
    /// `core,<size>`
    Core(CoreCorrelation),
    /// Computational step
    Step(Step, Fitting),
    /// Trailing command kept verbatim (lower case)
    Postscript(String),
    /// A construct that the structured model cannot hold
    Unrepresentable(Unrepresentable),
    /// Anything else, ignored
    Unrecognized,
}

/// Signature of a classification rule.
pub type Rule = fn(&Line, &ParserConfig) -> Option<Statement>;

/// Classification rules in priority order.
pub const RULES: &[(&str, Rule)] = &[
    ("orientation", orientation),
    ("symmetry", symmetry),
    ("relativistic", relativistic),
    ("property", property),
    ("molden export", molden_export),
    ("orbital generator", orbital_generator),
    ("inline geometry", inline_geometry),
    ("external geometry", external_geometry),
    ("basis", basis),
    ("variables", variables),
    ("option block", option_block),
    ("core", core),
    ("step", step),
    ("postscript", postscript),
];

/// Classifies one line. The first rule in [`RULES`] that claims the line
/// wins.
pub fn classify(line: &Line, config: &ParserConfig) -> Statement {
    for (name, rule) in RULES {
        if let Some(statement) = rule(line, config) {
            debug!("{:?} -> {} {:?}", line.raw, name, statement);
            return statement;
        }
    }
    debug!("{:?} -> unrecognized", line.raw);
    Statement::Unrecognized
}

/// Text before a `!` comment.
fn strip_comment(text: &str) -> &str {
    text.split('!').next().unwrap_or_default()
}

/// Comment, closing braces and outer whitespace removed.
fn clean(text: &str) -> String {
    strip_comment(text).replace('}', "").trim().to_string()
}

fn split_options(text: &str) -> Vec<String> {
    let text = text.trim_matches(|c| c == ',' || c == ' ' || c == '\n');
    if text.is_empty() {
        Vec::new()
    } else {
        text.split(',').map(|o| o.trim().to_string()).collect()
    }
}

fn orientation(line: &Line, _: &ParserConfig) -> Option<Statement> {
    let option = ORIENT.captures(&line.text)?;
    Some(
        Orientation::from_keyword(&clean(&option[1]))
            .map(Statement::Orientation)
            .unwrap_or(Statement::Unrecognized),
    )
}

fn symmetry(line: &Line, _: &ParserConfig) -> Option<Statement> {
    let option = if line.command == "nosym" {
        "nosym".to_string()
    } else {
        clean(&SYMMETRY.captures(&line.text)?[1])
    };
    Some(if option.eq_ignore_ascii_case("nosym") {
        Statement::Symmetry(WaveFunctionSymmetry::NoSymmetry)
    } else {
        Statement::Unrecognized
    })
}

fn relativistic(line: &Line, _: &ParserConfig) -> Option<Statement> {
    let order = DKHO.captures(&line.text)?;
    Some(match Hamiltonian::from_dkho_order(&order[1]) {
        Some(hamiltonian) => Statement::Hamiltonian(hamiltonian),
        None => Statement::Unrepresentable(Unrepresentable::UnsupportedDkhoOrder(order[1].to_string())),
    })
}

fn property(line: &Line, _: &ParserConfig) -> Option<Statement> {
    Property::from_command(&clean(&line.text).replace(' ', "")).map(Statement::Property)
}

fn molden_export(line: &Line, _: &ParserConfig) -> Option<Statement> {
    let key = MOLDEN.captures(&line.text)?;
    OrbitalType::from_key(&key[1]).map(Statement::OrbitalExport)
}

fn orbital_generator(line: &Line, _: &ParserConfig) -> Option<Statement> {
    OrbitalType::from_command(&clean(&line.text).replace(' ', "")).map(Statement::OrbitalGenerator)
}

fn inline_geometry(line: &Line, _: &ParserConfig) -> Option<Statement> {
    let open = GEOMETRY_INLINE.find(&line.raw)?;
    let body = &line.raw[open.end()..];
    let Some(close) = body.find('}') else {
        return Some(Statement::Unrepresentable(Unrepresentable::UnterminatedGroup(
            line.raw.clone(),
        )));
    };
    let atoms: Vec<&str> = body[..close]
        .split(';')
        .map(|l| strip_comment(l).trim())
        .filter(|l| !l.is_empty())
        .collect();
    Some(Statement::Geometry(Geometry::Inline(atoms.join("\n"))))
}

fn external_geometry(line: &Line, _: &ParserConfig) -> Option<Statement> {
    let reference = GEOMETRY_EXTERNAL.captures(&line.text)?;
    let reference = strip_comment(&reference[1]).trim();
    Some(if reference.is_empty() {
        Statement::Unrecognized
    } else {
        Statement::Geometry(Geometry::External(reference.to_string()))
    })
}

fn basis(line: &Line, _: &ParserConfig) -> Option<Statement> {
    if line.command == "basis" {
        return Some(Statement::Unrepresentable(Unrepresentable::BareBasis));
    }
    if !BASIS_INLINE.is_match(&line.text) {
        return BASIS_ANY.is_match(&line.text).then_some(Statement::Unrecognized);
    }
    let body = strip_comment(&line.text).replace('}', "");
    let body = BASIS_PREFIX.replace(&body, "");
    let mut fields = body.split(',');
    let default = fields.next().unwrap_or_default().trim();
    if default.is_empty() || default.contains('=') {
        return Some(Statement::Unrepresentable(Unrepresentable::MalformedBasis(
            line.text.clone(),
        )));
    }
    let mut basis = Basis::new(default);
    for field in fields.map(str::trim).filter(|f| !f.is_empty()) {
        match field.split_once('=') {
            Some((element, name)) if !element.trim().is_empty() => basis.set_element(element, name.trim()),
            _ => {
                return Some(Statement::Unrepresentable(Unrepresentable::MalformedBasis(
                    field.to_string(),
                )))
            }
        }
    }
    Some(Statement::Basis(basis))
}

fn variables(line: &Line, _: &ParserConfig) -> Option<Statement> {
    if !ASSIGNMENT.is_match(&line.text) {
        return None;
    }
    let mut body = clean(&SET_PREFIX.replace(&line.text, ""));
    loop {
        let protected = BRACKET_COMMA.replace_all(&body, "$1!").into_owned();
        if protected == body {
            break;
        }
        body = protected;
    }
    let mut assignments = Vec::new();
    for field in body.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        match field.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                assignments.push((name.trim().to_lowercase(), value.trim().replace('!', ",")))
            }
            _ => {
                return Some(Statement::Unrepresentable(Unrepresentable::MalformedAssignment(
                    field.replace('!', ","),
                )))
            }
        }
    }
    Some(Statement::Variables(assignments))
}

fn option_block(line: &Line, _: &ParserConfig) -> Option<Statement> {
    let block = OptionBlock::from_command(&line.command)?;
    let body = clean(&line.text).to_lowercase();
    let body = OPTION_PREFIX.replace(&body, "");
    let options = body
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|field| match field.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (field.to_string(), String::new()),
        })
        .filter(|(key, _)| !key.is_empty())
        .collect();
    Some(Statement::Options(block, options))
}

fn core(line: &Line, _: &ParserConfig) -> Option<Statement> {
    if line.command != "core" {
        return None;
    }
    let body = clean(&line.text);
    Some(
        body.split(',')
            .nth(1)
            .and_then(CoreCorrelation::from_keyword)
            .map(Statement::Core)
            .unwrap_or(Statement::Unrecognized),
    )
}

fn step(line: &Line, config: &ParserConfig) -> Option<Statement> {
    let command = line.command.as_str();
    let known = |c: &str| config.allows(c) || is_template_command(c);
    let recognised = known(command)
        || crate::keywords::FITTING_PREFIXES
            .iter()
            .any(|p| command.strip_prefix(p).is_some_and(known));
    if !recognised {
        return None;
    }

    let (name, fitting) = if let Some(base) = command.strip_prefix("df-") {
        (base, Fitting::Prefixed)
    } else if command.starts_with("pno-") || command.starts_with("ldf-") {
        (command, Fitting::Embedded)
    } else {
        (command, Fitting::Plain)
    };

    let head = line.text.split(';').next().unwrap_or_default().to_lowercase();
    let head = clean(&head);
    let options = head.split_once(',').map(|(_, o)| split_options(o)).unwrap_or_default();

    let directives = line
        .raw
        .replace('}', "")
        .split(';')
        .skip(1)
        .map(|d| strip_comment(d).trim().to_string())
        .filter(|d| !d.is_empty())
        .map(|d| match d.split_once(',') {
            Some((cmd, opts)) => Directive::new(cmd.trim()).with_options(split_options(opts)),
            None => Directive::new(d),
        })
        .collect();

    Some(Statement::Step(
        Step {
            command: name.to_string(),
            options,
            directives,
        },
        fitting,
    ))
}

fn postscript(line: &Line, _: &ParserConfig) -> Option<Statement> {
    POSTSCRIPT_COMMANDS
        .iter()
        .any(|p| line.command.starts_with(p))
        .then(|| Statement::Postscript(clean(&line.text).to_lowercase()))
}
