//! Molpro input generation.
//!
//! [`InputSpecification::to_input`] writes statements in a fixed order:
//!
//! 1. orientation and symmetry
//! 2. geometry, then basis
//! 3. `dkho` for a Douglas-Kroll-Hess Hamiltonian, then the other variables
//! 4. `gexpec` properties, then `gparam`, `gthresh` and `gprint`
//! 5. `core`
//! 6. steps, each as a brace group
//! 7. orbital generators and their molden exports
//! 8. postscripts
//!
//! Parsing the generated text gives back the same specification.

use crate::keywords::{is_template_command, FITTING_PREFIXES};
use crate::specification::{Basis, Directive, Geometry, InputSpecification, Step};
use indexmap::IndexMap;

impl InputSpecification {
    /// Generates Molpro input text.
    ///
    /// The output always ends with exactly one newline. An empty
    /// specification gives `"\n"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpspec::specification::{Geometry, InputSpecification, Step};
    ///
    /// let mut spec = InputSpecification::new();
    /// spec.geometry = Some(Geometry::External("h2o.xyz".into()));
    /// spec.steps.push(Step::new("rks").with_options(["b3lyp"]));
    /// spec.density_fitting = true;
    /// assert_eq!(spec.to_input(), "geometry=h2o.xyz\n{df-rks,b3lyp}\n");
    /// ```
    pub fn to_input(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        if let Some(orientation) = self.orientation {
            lines.push(format!("orient,{}", orientation.keyword()));
        }
        if let Some(command) = self.wave_fct_symm.command() {
            lines.push(command.to_string());
        }
        match &self.geometry {
            Some(Geometry::Inline(text)) => {
                lines.push(format!("geometry={{\n{}\n}}", text.trim_end_matches([' ', '\n'])))
            }
            Some(Geometry::External(file)) => lines.push(format!("geometry={}", file)),
            None => {}
        }
        if let Some(basis) = &self.basis {
            lines.push(basis_line(basis));
        }
        if let Some(order) = self.hamiltonian.dkho_order() {
            lines.push(format!("dkho={}", order));
        }
        for (name, value) in &self.variables {
            if name == "dkho" || value.is_empty() || (name == "charge" && value == "0") {
                continue;
            }
            lines.push(format!("{}={}", name, value));
        }
        lines.extend(self.properties.iter().map(|p| p.command()));
        for (command, options) in [
            ("gparam", &self.parameters),
            ("gthresh", &self.thresholds),
            ("gprint", &self.prints),
        ] {
            if !options.is_empty() {
                lines.push(option_line(command, options));
            }
        }
        if let Some(core) = self.core_correlation {
            lines.push(format!("core,{}", core.keyword()));
        }
        for step in &self.steps {
            lines.push(step_group(step, self.density_fitting));
        }
        for orbital in &self.orbitals {
            if !orbital.command().is_empty() {
                lines.push(orbital.command().to_string());
            }
            lines.push(format!("put,molden,{}.molden", orbital.key()));
        }
        lines.extend(self.postscripts.iter().cloned());

        let mut text = lines.join("\n").trim_end_matches('\n').to_string();
        text.push('\n');
        text
    }
}

fn basis_line(basis: &Basis) -> String {
    let mut line = format!("basis={}", basis.default);
    for (element, name) in &basis.elements {
        line.push_str(&format!(",{}={}", element, name));
    }
    line
}

fn option_line(command: &str, options: &IndexMap<String, String>) -> String {
    let mut line = command.to_string();
    for (key, value) in options {
        if value.is_empty() {
            line.push_str(&format!(",{}", key));
        } else {
            line.push_str(&format!(",{}={}", key, value));
        }
    }
    line
}

fn with_options(command: &str, options: &[String]) -> String {
    if options.is_empty() {
        command.to_string()
    } else {
        format!("{},{}", command, options.join(","))
    }
}

/// `df-` is added to fitted steps unless the command is a template step or
/// already carries a fitting prefix.
fn fitted_command(step: &Step, density_fitting: bool) -> String {
    let prefixed = FITTING_PREFIXES.iter().any(|p| step.command.starts_with(p));
    if density_fitting && !prefixed && !is_template_command(&step.command) {
        format!("df-{}", step.command)
    } else {
        step.command.clone()
    }
}

fn step_group(step: &Step, density_fitting: bool) -> String {
    let mut group = format!("{{{}", with_options(&fitted_command(step, density_fitting), &step.options));
    for Directive { command, options } in &step.directives {
        group.push(';');
        group.push_str(&with_options(command, options));
    }
    group.push('}');
    group
}
