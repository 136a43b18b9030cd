//! Structured model of a guided Molpro job.
//!
//! [`InputSpecification`] is what the guided editor binds its controls to.
//! It is produced by [`parse_input`](crate::parser::parse_input), turned back
//! into text by [`InputSpecification::to_input`], and queried through the
//! derived views in [`derived`](crate::derived).
//!
//! Maps use [`IndexMap`] so that variables and basis overrides keep the order
//! in which they were written.

use crate::elements::title_case;
use crate::keywords::{CoreCorrelation, Hamiltonian, OptionBlock, OrbitalType, Orientation, Property, WaveFunctionSymmetry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Molecular geometry, either written inline or referenced from a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Geometry {
    /// Atom lines from a `geometry={...}` block, one per line.
    Inline(String),
    /// File name from `geometry=<file>`, relative to the job directory.
    External(String),
}

impl Geometry {
    /// Returns `true` for a file reference.
    pub fn is_external(&self) -> bool {
        matches!(self, Geometry::External(_))
    }

    /// The inline text or the file name.
    pub fn text(&self) -> &str {
        match self {
            Geometry::Inline(text) | Geometry::External(text) => text,
        }
    }
}

/// Basis set: a default plus per-element overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Basis {
    /// Basis for every element without an override
    pub default: String,
    /// Element symbol (title case) to basis name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub elements: IndexMap<String, String>,
}

impl Basis {
    /// Creates a basis with no element overrides.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            elements: IndexMap::new(),
        }
    }

    /// Adds an element override. The symbol is stored in title case.
    pub fn with_element(mut self, element: &str, basis: impl Into<String>) -> Self {
        self.set_element(element, basis);
        self
    }

    /// Sets an element override, normalising the symbol to title case.
    pub fn set_element(&mut self, element: &str, basis: impl Into<String>) {
        self.elements.insert(title_case(element.trim()), basis.into());
    }

    /// The default basis followed by every override.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.default.as_str()).chain(self.elements.values().map(String::as_str))
    }
}

/// Sub-command inside a step group, e.g. `thermo,temp=298` in
/// `{frequencies;thermo,temp=298}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Directive name
    pub command: String,
    /// Comma-separated options following the name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Directive {
    /// Creates a directive without options.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            options: Vec::new(),
        }
    }

    /// Replaces the options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// One computational command with its options and directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Lower-case command, without any `df-` prefix
    pub command: String,
    /// Options after the command
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Directives grouped with the command
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

impl Step {
    /// Creates a bare step.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            options: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// Replaces the options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a directive.
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

/// The structured form of one job.
///
/// All fields are public so that the guided editor can bind to them
/// directly. A few invariants are kept by the setters rather than by the
/// type:
///
/// - element keys of [`Basis::elements`] are title case
/// - variables are stored with lower-case names, and an empty value or a zero
///   `charge` is never stored (the generator would drop it)
/// - the relativistic order lives in [`hamiltonian`](Self::hamiltonian), never
///   in `variables["dkho"]`
///
/// # Examples
///
/// ```
/// use mpspec::specification::{Basis, Geometry, InputSpecification, Step};
///
/// let mut spec = InputSpecification::new();
/// spec.geometry = Some(Geometry::Inline("He".into()));
/// spec.basis = Some(Basis::new("cc-pVTZ"));
/// spec.steps.push(Step::new("rhf"));
/// assert_eq!(spec.to_input(), "geometry={\nHe\n}\nbasis=cc-pVTZ\n{rhf}\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSpecification {
    /// Molecular orientation, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Wavefunction symmetry
    pub wave_fct_symm: WaveFunctionSymmetry,
    /// Molecular geometry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    /// Basis set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis: Option<Basis>,
    /// Relativistic treatment
    pub hamiltonian: Hamiltonian,
    /// Molpro variables in input order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, String>,
    /// Requested expectation values
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    /// `gparam` options
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, String>,
    /// `gthresh` options
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub thresholds: IndexMap<String, String>,
    /// `gprint` options
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub prints: IndexMap<String, String>,
    /// Frozen-core size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_correlation: Option<CoreCorrelation>,
    /// Computational steps in execution order
    pub steps: Vec<Step>,
    /// Orbital sets exported to molden files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orbitals: Vec<OrbitalType>,
    /// Trailing commands kept verbatim
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub postscripts: Vec<String>,
    /// Whether steps run with density fitting
    pub density_fitting: bool,
}

impl InputSpecification {
    /// Creates an empty specification for a fresh job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the geometry is a file reference.
    pub fn geometry_external(&self) -> bool {
        self.geometry.as_ref().is_some_and(Geometry::is_external)
    }

    /// Looks up a variable by (case-insensitive) name.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Sets a Molpro variable.
    ///
    /// An empty value, or a `charge` of `0`, removes the variable instead,
    /// since neither is written to the input. `dkho` is not a stored
    /// variable: orders 1 and 3 select the corresponding
    /// [`Hamiltonian`] and anything else is ignored.
    pub fn set_variable(&mut self, name: &str, value: &str) {
        let name = name.trim().to_lowercase();
        let value = value.trim();
        if name == "dkho" {
            if let Some(hamiltonian) = Hamiltonian::from_dkho_order(value) {
                self.hamiltonian = hamiltonian;
            }
            return;
        }
        if value.is_empty() || (name == "charge" && value == "0") {
            self.variables.shift_remove(&name);
        } else {
            self.variables.insert(name, value.to_string());
        }
    }

    /// Removes a variable, returning its old value.
    pub fn remove_variable(&mut self, name: &str) -> Option<String> {
        self.variables.shift_remove(&name.to_lowercase())
    }

    /// The options of one global block.
    pub fn option_block(&self, block: OptionBlock) -> &IndexMap<String, String> {
        match block {
            OptionBlock::Parameters => &self.parameters,
            OptionBlock::Thresholds => &self.thresholds,
            OptionBlock::Prints => &self.prints,
        }
    }

    /// Mutable access to one global block.
    pub fn option_block_mut(&mut self, block: OptionBlock) -> &mut IndexMap<String, String> {
        match block {
            OptionBlock::Parameters => &mut self.parameters,
            OptionBlock::Thresholds => &mut self.thresholds,
            OptionBlock::Prints => &mut self.prints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_variable_drops_defaults() {
        let mut spec = InputSpecification::new();
        spec.set_variable("Spin", "2");
        spec.set_variable("charge", "0");
        spec.set_variable("thing", "");
        assert_eq!(spec.variable("spin"), Some("2"));
        assert!(spec.variable("charge").is_none());
        assert!(spec.variable("thing").is_none());

        spec.set_variable("charge", "1");
        assert_eq!(spec.variable("CHARGE"), Some("1"));
        spec.set_variable("charge", "0");
        assert!(spec.variable("charge").is_none());
    }

    #[test]
    fn test_dkho_variable_selects_hamiltonian() {
        let mut spec = InputSpecification::new();
        spec.set_variable("dkho", "3");
        assert_eq!(spec.hamiltonian, Hamiltonian::DK3);
        assert!(spec.variables.is_empty());
        spec.set_variable("dkho", "7");
        assert_eq!(spec.hamiltonian, Hamiltonian::DK3);
    }

    #[test]
    fn test_basis_elements_are_title_case() {
        let basis = Basis::new("cc-pVDZ").with_element("zR", "cc-pVDZ(s)").with_element("h", "cc-pVTZ");
        let keys: Vec<_> = basis.elements.keys().cloned().collect();
        assert_eq!(keys, vec!["Zr", "H"]);
        assert_eq!(basis.names().count(), 3);
    }

    #[test]
    fn test_variables_keep_insertion_order() {
        let mut spec = InputSpecification::new();
        for (k, v) in [("spin", "2"), ("charge", "1"), ("occ", "[3,1,1]")] {
            spec.set_variable(k, v);
        }
        let keys: Vec<_> = spec.variables.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["spin", "charge", "occ"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut spec = InputSpecification::new();
        spec.geometry = Some(Geometry::External("h2o.xyz".into()));
        spec.properties.push(Property::DipoleMoment);
        spec.steps.push(Step::new("rks").with_options(["b3lyp"]));
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"Dipole moment\""));
        let back: InputSpecification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
