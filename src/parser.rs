//! Parsing Molpro input into an [`InputSpecification`].
//!
//! The pipeline is
//!
//! 1. [`lexer::normalise`](crate::lexer::normalise) turns the text into
//!    logical statements,
//! 2. [`classifier::classify`](crate::classifier::classify) tags each one,
//! 3. [`SpecificationBuilder`] applies the tagged statements in order.
//!
//! Input that uses constructs outside the guided subset is not guessed at:
//! the result is [`Parsed::Unrepresentable`] with the reason, and the caller
//! falls back to editing the raw text.
//!
//! # Examples
//!
//! ```
//! use mpspec::config::ParserConfig;
//! use mpspec::parser::{parse_input, Parsed, Unrepresentable};
//!
//! let config = ParserConfig::default();
//!
//! let spec = parse_input("geometry={He};rks,b3lyp", &config).into_specification().unwrap();
//! assert_eq!(spec.steps[0].command, "rks");
//! assert_eq!(spec.steps[0].options, vec!["b3lyp"]);
//!
//! let parsed = parse_input("geometry=a.xyz;geometry=b.xyz", &config);
//! assert_eq!(parsed, Parsed::Unrepresentable(Unrepresentable::MultipleGeometries));
//! ```

use crate::canonical::equivalent;
use crate::classifier::{classify, Fitting, Line, Statement};
use crate::config::ParserConfig;
use crate::keywords::{is_template_command, Hamiltonian};
use crate::lexer::normalise;
use crate::specification::{InputSpecification, Step};
use log::{debug, info};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Why an input cannot be held by the structured model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unrepresentable {
    /// More than one geometry statement
    #[error("more than one geometry")]
    MultipleGeometries,
    /// A geometry defined after a computational step
    #[error("geometry defined after a computational step")]
    GeometryAfterStep,
    /// A basis defined after a computational step
    #[error("basis defined after a computational step")]
    BasisAfterStep,
    /// Some steps use density fitting and others do not
    #[error("mixed density fitting policy at step '{0}'")]
    ConflictingDensityFitting(String),
    /// A `{` without a matching `}`
    #[error("unterminated group: {0}")]
    UnterminatedGroup(String),
    /// A basis field that is not `Element=basis`
    #[error("malformed basis field: {0}")]
    MalformedBasis(String),
    /// `basis` on its own line, a block form that was not closed
    #[error("bare basis keyword")]
    BareBasis,
    /// A field in an assignment list without `=`
    #[error("malformed assignment: {0}")]
    MalformedAssignment(String),
    /// `dkho` order other than 1 or 3
    #[error("unsupported Douglas-Kroll-Hess order: {0}")]
    UnsupportedDkhoOrder(String),
}

/// Outcome of parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// The input fits the guided model.
    Specification(InputSpecification),
    /// The input must be edited as raw text.
    Unrepresentable(Unrepresentable),
}

impl Parsed {
    /// Returns `true` for [`Parsed::Specification`].
    pub fn is_representable(&self) -> bool {
        matches!(self, Parsed::Specification(_))
    }

    /// The specification, if the input was representable.
    pub fn specification(&self) -> Option<&InputSpecification> {
        match self {
            Parsed::Specification(spec) => Some(spec),
            Parsed::Unrepresentable(_) => None,
        }
    }

    /// Consumes the result, keeping only the specification.
    pub fn into_specification(self) -> Option<InputSpecification> {
        match self {
            Parsed::Specification(spec) => Some(spec),
            Parsed::Unrepresentable(_) => None,
        }
    }
}

/// Error type for reading input from disk.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The input file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = std::result::Result<T, ReadError>;

/// Accumulates classified statements into a specification.
///
/// The builder enforces the ordering rules that [`classify`] cannot see on
/// a single line: one geometry, geometry and basis before any step, and a
/// single density fitting policy.
#[derive(Debug, Default)]
pub struct SpecificationBuilder {
    spec: InputSpecification,
    explicit_hamiltonian: bool,
    plain_steps: bool,
}

impl SpecificationBuilder {
    /// Starts from an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one statement.
    pub fn apply(&mut self, statement: Statement) -> std::result::Result<(), Unrepresentable> {
        let spec = &mut self.spec;
        match statement {
            Statement::Orientation(orientation) => spec.orientation = Some(orientation),
            Statement::Symmetry(symmetry) => spec.wave_fct_symm = symmetry,
            Statement::Hamiltonian(hamiltonian) => {
                spec.hamiltonian = hamiltonian;
                self.explicit_hamiltonian = true;
            }
            Statement::Property(property) => spec.properties.push(property),
            Statement::OrbitalExport(orbital) => spec.orbitals.push(orbital),
            Statement::OrbitalGenerator(orbital) => {
                debug!("Orbital generator for {} is regenerated from its export", orbital.key());
            }
            Statement::Geometry(geometry) => {
                if !spec.steps.is_empty() {
                    return Err(Unrepresentable::GeometryAfterStep);
                }
                if spec.geometry.is_some() {
                    return Err(Unrepresentable::MultipleGeometries);
                }
                spec.geometry = Some(geometry);
            }
            Statement::Basis(basis) => {
                if !spec.steps.is_empty() {
                    return Err(Unrepresentable::BasisAfterStep);
                }
                spec.basis = Some(basis);
            }
            Statement::Variables(assignments) => {
                for (name, value) in assignments {
                    if name == "dkho" {
                        // resolved once all statements are in
                        spec.variables.insert(name, value);
                    } else {
                        spec.set_variable(&name, &value);
                    }
                }
            }
            Statement::Options(block, options) => *spec.option_block_mut(block) = options,
            Statement::Core(core) => spec.core_correlation = Some(core),
            Statement::Step(step, fitting) => self.push_step(step, fitting)?,
            Statement::Postscript(text) => spec.postscripts.push(text),
            Statement::Unrepresentable(reason) => return Err(reason),
            Statement::Unrecognized => {}
        }
        Ok(())
    }

    fn push_step(&mut self, step: Step, fitting: Fitting) -> std::result::Result<(), Unrepresentable> {
        let spec = &mut self.spec;
        match fitting {
            Fitting::Prefixed | Fitting::Embedded => {
                if self.plain_steps {
                    return Err(Unrepresentable::ConflictingDensityFitting(step.command));
                }
                spec.density_fitting = true;
            }
            Fitting::Plain if !is_template_command(&step.command) => {
                if spec.density_fitting {
                    return Err(Unrepresentable::ConflictingDensityFitting(step.command));
                }
                self.plain_steps = true;
            }
            Fitting::Plain => {}
        }
        spec.steps.push(step);
        Ok(())
    }

    /// Resolves the Hamiltonian and returns the specification.
    ///
    /// A `dkho` assignment selects the Douglas-Kroll-Hess order unless a
    /// `dkho=` statement already did; otherwise the basis suffix decides.
    pub fn finish(mut self) -> std::result::Result<InputSpecification, Unrepresentable> {
        let dkho = self.spec.variables.shift_remove("dkho");
        if !self.explicit_hamiltonian {
            self.spec.hamiltonian = match dkho {
                Some(order) => Hamiltonian::from_dkho_order(&order)
                    .ok_or(Unrepresentable::UnsupportedDkhoOrder(order))?,
                None => self
                    .spec
                    .basis
                    .as_ref()
                    .map(|b| Hamiltonian::from_basis_name(&b.default))
                    .unwrap_or_default(),
            };
        }
        Ok(self.spec)
    }
}

/// Parses input text.
///
/// Never fails: input outside the guided subset gives
/// [`Parsed::Unrepresentable`].
pub fn parse_input(input: &str, config: &ParserConfig) -> Parsed {
    let mut builder = SpecificationBuilder::new();
    for logical in normalise(input) {
        if logical.unterminated {
            return Parsed::Unrepresentable(Unrepresentable::UnterminatedGroup(logical.text));
        }
        let line = Line::from(&logical);
        if let Err(reason) = builder.apply(classify(&line, config)) {
            debug!("Input not representable: {}", reason);
            return Parsed::Unrepresentable(reason);
        }
    }
    match builder.finish() {
        Ok(spec) => Parsed::Specification(spec),
        Err(reason) => Parsed::Unrepresentable(reason),
    }
}

/// Reads and parses an input file.
///
/// # Errors
///
/// Returns [`ReadError::Io`] if the file cannot be read. Unrepresentable
/// content is not an error.
pub fn parse_file(path: &Path, config: &ParserConfig) -> Result<Parsed> {
    let input = fs::read_to_string(path)?;
    info!("Parsing {}", path.display());
    Ok(parse_input(&input, config))
}

/// Parses input for guided editing.
///
/// Returns the specification only when it is representable and
/// regenerating it gives input equivalent to `input`; otherwise the guided
/// editor would silently change the job.
pub fn parse_guided(input: &str, config: &ParserConfig) -> Option<InputSpecification> {
    let spec = parse_input(input, config).into_specification()?;
    let regenerated = spec.to_input();
    if equivalent(input, &regenerated) {
        Some(spec)
    } else {
        debug!("Regenerated input differs from the original:\n{}", regenerated);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{Orientation, Property};
    use crate::specification::{Basis, Geometry};

    fn config() -> ParserConfig {
        ParserConfig::new(
            [
                "RHF", "CCSD", "RKS", "CASSCF", "MRCI", "UHF", "UKS", "OCC", "OPTG", "FREQUENCIES", "THERMO",
            ],
            ".",
        )
    }

    fn parse(input: &str) -> InputSpecification {
        parse_input(input, &config())
            .into_specification()
            .unwrap_or_else(|| panic!("not representable: {input}"))
    }

    #[test]
    fn test_end_to_end_example() {
        let spec = parse("geometry={He};rks,b3lyp");
        assert_eq!(spec.geometry, Some(Geometry::Inline("He".into())));
        assert_eq!(spec.steps, vec![Step::new("rks").with_options(["b3lyp"])]);
        assert_eq!(spec.hamiltonian, Hamiltonian::AE);
        assert!(spec.basis.is_none());
    }

    #[test]
    fn test_variables_and_comments() {
        let spec = parse(
            "spin=2,charge=1! comment\nset,occ=[3,1,1] ! comments\n;Geometry={F;H,F,1.7};basis={default=cc-pVTZ,h=cc-pVDZ}\n{ks,b3lyp}!some comment;ccsd\n",
        );
        assert_eq!(spec.variable("spin"), Some("2"));
        assert_eq!(spec.variable("charge"), Some("1"));
        assert_eq!(spec.variable("occ"), Some("[3,1,1]"));
        assert_eq!(spec.basis, Some(Basis::new("cc-pVTZ").with_element("H", "cc-pVDZ")));
        assert_eq!(spec.steps.len(), 2);
    }

    #[test]
    fn test_too_complex() {
        let cases = [
            ("geometry=a.xyz;geometry=b.xyz", Unrepresentable::MultipleGeometries),
            ("geometry=c.xyz;hf;basis=cc-pvtz;ccsd", Unrepresentable::BasisAfterStep),
            ("hf;geometry={He}", Unrepresentable::GeometryAfterStep),
            ("geometry={He};rhf;df-ccsd", Unrepresentable::ConflictingDensityFitting("ccsd".into())),
            ("geometry={He};df-rhf;ccsd", Unrepresentable::ConflictingDensityFitting("ccsd".into())),
            ("geometry={He\nrhf", Unrepresentable::UnterminatedGroup("geometry={He;rhf".into())),
            ("geometry={He};basis\ncc-pvdz", Unrepresentable::BareBasis),
            ("geometry={He};dkho=2", Unrepresentable::UnsupportedDkhoOrder("2".into())),
            ("geometry={He};set,dkho=4", Unrepresentable::UnsupportedDkhoOrder("4".into())),
        ];
        for (input, reason) in cases {
            assert_eq!(parse_input(input, &config()), Parsed::Unrepresentable(reason), "{input}");
        }
    }

    #[test]
    fn test_density_fitting() {
        let spec = parse("geometry={He};df-hf;df-ccsd;optg");
        assert!(spec.density_fitting);
        let commands: Vec<_> = spec.steps.iter().map(|s| s.command.as_str()).collect();
        assert_eq!(commands, vec!["rhf", "ccsd", "optg"]);
    }

    #[test]
    fn test_hamiltonian_resolution() {
        assert_eq!(parse("basis=cc-pVTZ-PP").hamiltonian, Hamiltonian::PP);
        assert_eq!(parse("basis=cc-pVTZ-DK;dkho=3").hamiltonian, Hamiltonian::DK3);
        let spec = parse("basis=cc-pVTZ;charge=1,dkho=1");
        assert_eq!(spec.hamiltonian, Hamiltonian::DK);
        assert!(spec.variable("dkho").is_none());
        assert_eq!(spec.variable("charge"), Some("1"));
    }

    #[test]
    fn test_second_basis_before_steps_overwrites() {
        let spec = parse("basis=cc-pVDZ;basis=cc-pVTZ;rhf");
        assert_eq!(spec.basis, Some(Basis::new("cc-pVTZ")));
    }

    #[test]
    fn test_misc_statements() {
        let spec = parse(
            "orient,mass\nnosym\ngeometry=h2o.xyz\ngexpec,dm\ngthresh,energy=1e-8\ncore,large\nrhf\nibba\nput,molden,ibo.molden\ntable,energy",
        );
        assert_eq!(spec.orientation, Some(Orientation::Mass));
        assert!(spec.geometry_external());
        assert_eq!(spec.properties, vec![Property::DipoleMoment]);
        assert_eq!(spec.thresholds.get("energy").map(String::as_str), Some("1e-8"));
        assert_eq!(spec.orbitals.len(), 1);
        assert_eq!(spec.postscripts, vec!["table,energy"]);
    }

    #[test]
    fn test_parse_file_matches_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test-molpro_input.inp");
        let text = "Geometry={F;H,F,1.7};basis=cc-pVTZ !some comment;rhf\nccsd\n";
        std::fs::write(&path, text).unwrap();
        assert_eq!(parse_file(&path, &config()).unwrap(), parse_input(text, &config()));
        assert!(parse_file(&dir.path().join("missing.inp"), &config()).is_err());
    }

    #[test]
    fn test_parse_guided() {
        assert!(parse_guided("geometry={He};rks,b3lyp", &config()).is_some());
        // the orbital generator is regenerated only with its export
        assert!(parse_guided("geometry={He};rhf;ibba", &config()).is_none());
        assert!(parse_guided("geometry=a.xyz;geometry=b.xyz", &config()).is_none());
    }
}
