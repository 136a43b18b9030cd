//! Derived views over an [`InputSpecification`].
//!
//! The guided editor does not show steps and variables directly for the
//! common cases. It shows a method, a job type, a basis quality and a spin,
//! each computed from the underlying fields, and writes changes back
//! through the setters here.

use crate::geometry::{nuclear_charge, read_geometry};
use crate::keywords::{is_hartree_fock, is_template_command, Hamiltonian, JobType, Property};
use crate::specification::{Directive, Geometry, InputSpecification, Step};
use log::{debug, warn};
use std::path::Path;

/// Zeta letters in order of basis quality, starting at double zeta.
const ZETA_LETTERS: [char; 6] = ['d', 't', 'q', '5', '6', '7'];

/// Correlated methods that take `expec` directives for properties.
const EXPECTATION_METHODS: [&str; 3] = ["ccsd", "bccd", "qcisd"];

/// `hf` and `ks` count as precursors too, since they stand for `rhf` and
/// `rks`.
fn is_precursor(command: &str) -> bool {
    is_hartree_fock(command) || is_hartree_fock(&format!("r{}", command))
}

/// Quality rank of one basis name, 0 when it has no zeta letter after a
/// `v`.
fn zeta_rank(name: &str) -> u32 {
    let lower = name.to_lowercase();
    let Some(start) = lower.find('v') else {
        return 0;
    };
    let tail = &lower[start + 1..];
    ZETA_LETTERS
        .iter()
        .enumerate()
        .filter(|(_, letter)| tail.contains(**letter))
        .map(|(rank, _)| rank as u32 + 2)
        .max()
        .unwrap_or(0)
}

impl InputSpecification {
    /// Index of the single main method among the steps.
    ///
    /// Template steps are ignored, and a leading Hartree-Fock or Kohn-Sham
    /// step is a precursor when something follows it.
    fn method_index(&self) -> Option<usize> {
        let mut candidates: Vec<usize> = (0..self.steps.len())
            .filter(|&i| !is_template_command(&self.steps[i].command))
            .collect();
        if candidates.len() > 1 && is_precursor(&self.steps[candidates[0]].command) {
            candidates.remove(0);
        }
        match candidates.as_slice() {
            [index] => Some(*index),
            _ => None,
        }
    }

    /// The main method, or `None` when there is no single one.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpspec::specification::{InputSpecification, Step};
    ///
    /// let mut spec = InputSpecification::new();
    /// spec.steps = vec![Step::new("rhf"), Step::new("ccsd(t)"), Step::new("optg")];
    /// assert_eq!(spec.method().as_deref(), Some("ccsd(t)"));
    /// ```
    pub fn method(&self) -> Option<String> {
        self.method_index().map(|i| self.steps[i].command.clone())
    }

    /// Replaces the method steps with `method`.
    ///
    /// Methods that need orbitals get an `rhf` precursor, or `uhf` when the
    /// method name starts with `u`. Template steps stay at the end. Setting
    /// the current method changes nothing.
    pub fn set_method(&mut self, method: &str) {
        let method = method.trim().to_lowercase();
        if self.method().as_deref() == Some(method.as_str()) {
            return;
        }
        let mut steps = Vec::new();
        if !method.is_empty() {
            if !is_precursor(&method) {
                steps.push(Step::new(if method.starts_with('u') { "uhf" } else { "rhf" }));
            }
            steps.push(Step::new(method));
        }
        steps.extend(
            self.steps
                .drain(..)
                .filter(|s| is_template_command(&s.command)),
        );
        self.steps = steps;
    }

    /// Options of the main method; empty when there is no single method.
    pub fn method_options(&self) -> &[String] {
        match self.method_index() {
            Some(i) => &self.steps[i].options,
            None => &[],
        }
    }

    /// Replaces the options of the main method, if there is one.
    pub fn set_method_options(&mut self, options: Vec<String>) {
        if let Some(i) = self.method_index() {
            self.steps[i].options = options;
        }
    }

    /// Removes all options of the main method.
    pub fn clear_method_options(&mut self) {
        self.set_method_options(Vec::new());
    }

    /// Density functional of a Kohn-Sham method, upper case.
    pub fn density_functional(&self) -> Option<String> {
        let method = self.method()?;
        if !(is_precursor(&method) && method.contains("ks")) {
            return None;
        }
        self.method_options().first().map(|f| f.to_uppercase())
    }

    /// Sets the functional of a Kohn-Sham method, stored lower case.
    /// Ignored for other methods.
    pub fn set_density_functional(&mut self, functional: &str) {
        if self.method().is_some_and(|m| is_precursor(&m) && m.contains("ks")) {
            self.set_method_options(vec![functional.trim().to_lowercase()]);
        }
    }

    fn matches_template(&self, job_type: JobType) -> bool {
        let mut last: Option<usize> = None;
        for template in job_type.template() {
            match self.steps.iter().position(|s| s.command == template.command) {
                Some(i) if last.map_or(true, |l| i > l) => last = Some(i),
                _ => return false,
            }
        }
        true
    }

    /// The job type whose template steps appear in order among the steps.
    /// When several match, the last in [`JobType::ALL`] wins.
    pub fn job_type(&self) -> JobType {
        JobType::ALL
            .into_iter()
            .filter(|&j| self.matches_template(j))
            .last()
            .unwrap_or_default()
    }

    /// Replaces the template steps with those of `job_type`.
    ///
    /// Other steps keep their order and options. A template step that was
    /// already present keeps its options. Setting the current job type
    /// changes nothing.
    pub fn set_job_type(&mut self, job_type: JobType) {
        if self.job_type() == job_type {
            return;
        }
        let (templates, mut steps): (Vec<Step>, Vec<Step>) =
            self.steps.drain(..).partition(|s| is_template_command(&s.command));
        for mut step in job_type.template() {
            if let Some(old) = templates
                .iter()
                .find(|t| t.command == step.command && !t.options.is_empty())
            {
                step.options = old.options.clone();
            }
            steps.push(step);
        }
        debug!("Job type set to {}", job_type.label());
        self.steps = steps;
    }

    /// Zeta quality of the basis: 2 for double zeta up to 7.
    ///
    /// Returns 0 when there is no basis, when a name has no recognisable
    /// quality, or when the default and the element overrides disagree.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpspec::specification::{Basis, InputSpecification};
    ///
    /// let mut spec = InputSpecification::new();
    /// spec.basis = Some(Basis::new("aug-cc-pVTZ"));
    /// assert_eq!(spec.basis_quality(), 3);
    /// spec.basis = Some(Basis::new("cc-pVTZ").with_element("H", "cc-pVDZ"));
    /// assert_eq!(spec.basis_quality(), 0);
    /// ```
    pub fn basis_quality(&self) -> u32 {
        let Some(basis) = &self.basis else {
            return 0;
        };
        let mut ranks = basis.names().map(zeta_rank);
        let first = ranks.next().unwrap_or(0);
        if ranks.all(|r| r == first) {
            first
        } else {
            0
        }
    }

    /// Hamiltonian implied by the basis name.
    ///
    /// A `dkho` order, either as a variable or already folded into
    /// [`hamiltonian`](Self::hamiltonian), takes precedence over the
    /// suffix of the default basis.
    pub fn basis_hamiltonian(&self) -> Hamiltonian {
        if let Some(hamiltonian) = self.variable("dkho").and_then(Hamiltonian::from_dkho_order) {
            return hamiltonian;
        }
        if self.hamiltonian.dkho_order().is_some() {
            return self.hamiltonian;
        }
        self.basis
            .as_ref()
            .map(|b| Hamiltonian::from_basis_name(&b.default))
            .unwrap_or_default()
    }

    /// Parity of the electron count: nuclear charge minus `charge`.
    ///
    /// External geometries are read relative to `directory`. Any failure
    /// to read or interpret the geometry gives 0.
    pub fn open_shell_electrons(&self, directory: &Path) -> u32 {
        let text = match &self.geometry {
            Some(Geometry::Inline(text)) => text.clone(),
            Some(Geometry::External(reference)) => match read_geometry(directory, reference) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Cannot read geometry {}: {}", reference, e);
                    return 0;
                }
            },
            None => return 0,
        };
        let nuclear = match nuclear_charge(&text) {
            Ok(charge) => i64::from(charge),
            Err(e) => {
                warn!("Cannot evaluate nuclear charge: {}", e);
                return 0;
            }
        };
        let charge = self
            .variable("charge")
            .and_then(|c| c.trim().parse::<i64>().ok())
            .unwrap_or(0);
        (nuclear - charge).rem_euclid(2) as u32
    }

    /// Spin (2S) of the job.
    ///
    /// The `spin` variable when its parity matches the electron count,
    /// otherwise the lowest spin with the right parity.
    pub fn spin(&self, directory: &Path) -> i64 {
        let open = i64::from(self.open_shell_electrons(directory));
        match self.variable("spin").and_then(|s| s.trim().parse::<i64>().ok()) {
            Some(spin) if spin.rem_euclid(2) == open => spin,
            _ => open,
        }
    }

    /// Sets or clears the `spin` variable.
    ///
    /// A value with the wrong parity is replaced by the lowest spin with
    /// the right parity.
    pub fn set_spin(&mut self, spin: Option<i64>, directory: &Path) {
        let Some(spin) = spin else {
            self.remove_variable("spin");
            return;
        };
        let open = i64::from(self.open_shell_electrons(directory));
        let value = if spin.rem_euclid(2) == open {
            spin
        } else {
            debug!("Spin {} does not match the electron count, using {}", spin, open);
            open
        };
        self.set_variable("spin", &value.to_string());
    }

    /// Brings `expec` directives of correlated steps in line with
    /// [`properties`](Self::properties).
    ///
    /// Directives for properties that are no longer requested are removed
    /// and missing ones added. Other directives are left alone, and nothing
    /// changes while no property is requested.
    pub fn polish(&mut self) {
        if self.properties.is_empty() {
            return;
        }
        let requested = self.properties.clone();
        for step in self
            .steps
            .iter_mut()
            .filter(|s| EXPECTATION_METHODS.iter().any(|m| s.command.starts_with(m)))
        {
            step.directives.retain(|d| {
                d.command != "expec"
                    || d.options
                        .first()
                        .and_then(|op| Property::from_operator(op))
                        .map_or(true, |p| requested.contains(&p))
            });
            for property in &requested {
                let present = step.directives.iter().any(|d| {
                    d.command == "expec" && d.options.first().map(String::as_str) == Some(property.operator())
                });
                if !present {
                    step.directives
                        .push(Directive::new("expec").with_options([property.operator()]));
                }
            }
        }
    }
}
