//! Keyword vocabularies of the guided input subset.
//!
//! Every enum here maps between a label shown by the guided editor, the
//! value stored in an [`InputSpecification`](crate::specification::InputSpecification)
//! and the Molpro command text that the generator writes. Parsing goes the
//! other way through the `from_*` constructors, which are case-insensitive.

use crate::specification::{Directive, Step};
use serde::{Deserialize, Serialize};

/// Hartree-Fock and Kohn-Sham commands that act as orbital precursors for
/// correlated methods.
pub const HARTREE_FOCK_METHODS: &[&str] = &["RHF", "RKS", "UHF", "UKS", "LDF-RHF", "LDF-UHF"];

/// Step commands that only ever appear as part of a job-type template.
pub const TEMPLATE_COMMANDS: &[&str] = &["optg", "frequencies"];

/// Prefixes that switch a step to density fitting.
pub const FITTING_PREFIXES: &[&str] = &["df-", "pno-", "ldf-"];

/// Returns `true` when `command` names one of the Hartree-Fock or
/// Kohn-Sham precursor methods.
pub fn is_hartree_fock(command: &str) -> bool {
    HARTREE_FOCK_METHODS
        .iter()
        .any(|m| m.eq_ignore_ascii_case(command))
}

/// Returns `true` when `command` is a step that belongs to a job-type
/// template (`optg` or `frequencies`).
pub fn is_template_command(command: &str) -> bool {
    TEMPLATE_COMMANDS
        .iter()
        .any(|c| c.eq_ignore_ascii_case(command))
}

/// Molecular orientation requested with `orient,<option>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Principal axes of inertia (`orient,mass`)
    Mass,
    /// Principal axes of the nuclear charge (`orient,charge`)
    Charge,
    /// Coordinates used as given (`orient,noorient`)
    #[serde(rename = "None")]
    NoOrient,
}

impl Orientation {
    /// All orientations in display order.
    pub const ALL: [Orientation; 3] = [Orientation::Mass, Orientation::Charge, Orientation::NoOrient];

    /// Label used by the guided editor.
    pub fn label(self) -> &'static str {
        match self {
            Orientation::Mass => "Mass",
            Orientation::Charge => "Charge",
            Orientation::NoOrient => "None",
        }
    }

    /// Option written after `orient,`.
    pub fn keyword(self) -> &'static str {
        match self {
            Orientation::Mass => "mass",
            Orientation::Charge => "charge",
            Orientation::NoOrient => "noorient",
        }
    }

    /// Looks up an orientation by its `orient` option.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.keyword().eq_ignore_ascii_case(keyword.trim()))
    }
}

/// Point-group symmetry used for the wavefunction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveFunctionSymmetry {
    /// Molpro chooses the largest abelian subgroup. Nothing is written.
    #[default]
    Automatic,
    /// Symmetry switched off with `symmetry,nosym`.
    NoSymmetry,
}

impl WaveFunctionSymmetry {
    /// Label used by the guided editor.
    pub fn label(self) -> &'static str {
        match self {
            WaveFunctionSymmetry::Automatic => "Automatic",
            WaveFunctionSymmetry::NoSymmetry => "No Symmetry",
        }
    }

    /// Command written for this setting, if any.
    pub fn command(self) -> Option<&'static str> {
        match self {
            WaveFunctionSymmetry::Automatic => None,
            WaveFunctionSymmetry::NoSymmetry => Some("symmetry,nosym"),
        }
    }
}

/// Treatment of core electrons and scalar relativity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hamiltonian {
    /// Non-relativistic all-electron
    #[default]
    AE,
    /// Effective core pseudopotential
    PP,
    /// Second-order Douglas-Kroll-Hess
    DK,
    /// Third-order Douglas-Kroll-Hess
    DK3,
}

impl Hamiltonian {
    /// All Hamiltonians in display order.
    pub const ALL: [Hamiltonian; 4] = [Hamiltonian::AE, Hamiltonian::PP, Hamiltonian::DK, Hamiltonian::DK3];

    /// Label used by the guided editor.
    pub fn text(self) -> &'static str {
        match self {
            Hamiltonian::AE => "All Electron",
            Hamiltonian::PP => "Pseudopotential",
            Hamiltonian::DK => "Douglas-Kroll-Hess",
            Hamiltonian::DK3 => "Douglas-Kroll-Hess 3",
        }
    }

    /// Suffix carried by basis set names built for this Hamiltonian.
    pub fn basis_suffix(self) -> &'static str {
        match self {
            Hamiltonian::AE => "",
            Hamiltonian::PP => "-PP",
            Hamiltonian::DK => "-DK",
            Hamiltonian::DK3 => "-DK3",
        }
    }

    /// Value of the `dkho` variable that selects this Hamiltonian.
    pub fn dkho_order(self) -> Option<u32> {
        match self {
            Hamiltonian::DK => Some(1),
            Hamiltonian::DK3 => Some(3),
            Hamiltonian::AE | Hamiltonian::PP => None,
        }
    }

    /// Maps a `dkho` value to a Hamiltonian. Only orders 1 and 3 exist in
    /// the guided vocabulary.
    pub fn from_dkho_order(order: &str) -> Option<Self> {
        match order.trim() {
            "1" => Some(Hamiltonian::DK),
            "3" => Some(Hamiltonian::DK3),
            _ => None,
        }
    }

    /// Infers the Hamiltonian from the suffix of a basis set name.
    ///
    /// The last matching suffix wins, so `cc-pVTZ-DK3` is `DK3` even though
    /// it also contains `-DK`.
    pub fn from_basis_name(basis: &str) -> Self {
        let upper = basis.to_uppercase();
        let mut result = Hamiltonian::AE;
        for hamiltonian in [Hamiltonian::PP, Hamiltonian::DK, Hamiltonian::DK3] {
            if upper.contains(hamiltonian.basis_suffix()) {
                result = hamiltonian;
            }
        }
        result
    }
}

/// Localisation scheme for exported orbitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbitalType {
    /// Canonical orbitals, exported as computed
    Canonical,
    /// Intrinsic bond orbitals
    Ibo,
    /// Pipek-Mezey localisation
    Pipek,
    /// Natural bond orbitals
    Nbo,
    /// Boys localisation
    Boys,
}

impl OrbitalType {
    /// All orbital types in display order.
    pub const ALL: [OrbitalType; 5] = [
        OrbitalType::Canonical,
        OrbitalType::Ibo,
        OrbitalType::Pipek,
        OrbitalType::Nbo,
        OrbitalType::Boys,
    ];

    /// Key used in the molden file name, `put,molden,<key>.molden`.
    pub fn key(self) -> &'static str {
        match self {
            OrbitalType::Canonical => "canonical",
            OrbitalType::Ibo => "ibo",
            OrbitalType::Pipek => "pipek",
            OrbitalType::Nbo => "nbo",
            OrbitalType::Boys => "boys",
        }
    }

    /// Label used by the guided editor.
    pub fn label(self) -> &'static str {
        match self {
            OrbitalType::Canonical => "Canonical",
            OrbitalType::Ibo => "Intrinsic Bond",
            OrbitalType::Pipek => "Pipek-Mezey",
            OrbitalType::Nbo => "NBO",
            OrbitalType::Boys => "Boys",
        }
    }

    /// Command that generates the orbitals; empty for canonical orbitals.
    pub fn command(self) -> &'static str {
        match self {
            OrbitalType::Canonical => "",
            OrbitalType::Ibo => "ibba",
            OrbitalType::Pipek => "locali,pipek",
            OrbitalType::Nbo => "nbo",
            OrbitalType::Boys => "locali",
        }
    }

    /// Looks up an orbital type by its molden key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.key().eq_ignore_ascii_case(key))
    }

    /// Looks up the orbital type whose (non-empty) generator command is
    /// exactly `command`.
    pub fn from_command(command: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|o| !o.command().is_empty() && o.command().eq_ignore_ascii_case(command))
    }
}

/// Expectation value requested through `gexpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    /// `gexpec,dm`
    #[serde(rename = "Dipole moment")]
    DipoleMoment,
    /// `gexpec,qm`
    #[serde(rename = "Quadrupole moment")]
    QuadrupoleMoment,
    /// `gexpec,sm`
    #[serde(rename = "Second moment")]
    SecondMoment,
    /// `gexpec,ekin`
    #[serde(rename = "Kinetic energy")]
    KineticEnergy,
    /// `gexpec,rel`
    #[serde(rename = "Cowan-Griffin")]
    CowanGriffin,
    /// `gexpec,massv`
    #[serde(rename = "Mass-velocity")]
    MassVelocity,
    /// `gexpec,darw`
    #[serde(rename = "Darwin")]
    Darwin,
}

impl Property {
    /// All properties in display order.
    pub const ALL: [Property; 7] = [
        Property::DipoleMoment,
        Property::QuadrupoleMoment,
        Property::SecondMoment,
        Property::KineticEnergy,
        Property::CowanGriffin,
        Property::MassVelocity,
        Property::Darwin,
    ];

    /// Label used by the guided editor.
    pub fn label(self) -> &'static str {
        match self {
            Property::DipoleMoment => "Dipole moment",
            Property::QuadrupoleMoment => "Quadrupole moment",
            Property::SecondMoment => "Second moment",
            Property::KineticEnergy => "Kinetic energy",
            Property::CowanGriffin => "Cowan-Griffin",
            Property::MassVelocity => "Mass-velocity",
            Property::Darwin => "Darwin",
        }
    }

    /// Operator name understood by `gexpec` and `expec`.
    pub fn operator(self) -> &'static str {
        match self {
            Property::DipoleMoment => "dm",
            Property::QuadrupoleMoment => "qm",
            Property::SecondMoment => "sm",
            Property::KineticEnergy => "ekin",
            Property::CowanGriffin => "rel",
            Property::MassVelocity => "massv",
            Property::Darwin => "darw",
        }
    }

    /// Full global command, e.g. `gexpec,dm`.
    pub fn command(self) -> String {
        format!("gexpec,{}", self.operator())
    }

    /// Looks up a property by its operator name.
    pub fn from_operator(operator: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.operator().eq_ignore_ascii_case(operator.trim()))
    }

    /// Looks up a property by its full `gexpec,<operator>` command.
    pub fn from_command(command: &str) -> Option<Self> {
        let lower = command.to_lowercase();
        Self::ALL.into_iter().find(|p| p.command() == lower)
    }
}

/// One of the three global option blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionBlock {
    /// `gparam`
    Parameters,
    /// `gthresh`
    Thresholds,
    /// `gprint`
    Prints,
}

impl OptionBlock {
    /// Blocks in generation order.
    pub const ALL: [OptionBlock; 3] = [OptionBlock::Parameters, OptionBlock::Thresholds, OptionBlock::Prints];

    /// Molpro command for the block.
    pub fn command(self) -> &'static str {
        match self {
            OptionBlock::Parameters => "gparam",
            OptionBlock::Thresholds => "gthresh",
            OptionBlock::Prints => "gprint",
        }
    }

    /// Looks up a block by its command.
    pub fn from_command(command: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.command().eq_ignore_ascii_case(command))
    }
}

/// Size of the frozen core in correlated calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreCorrelation {
    /// Large frozen core
    Large,
    /// Mixed frozen core
    Mixed,
    /// Small frozen core
    Small,
}

impl CoreCorrelation {
    const ALL: [CoreCorrelation; 3] = [CoreCorrelation::Large, CoreCorrelation::Mixed, CoreCorrelation::Small];

    /// Option written after `core,`.
    pub fn keyword(self) -> &'static str {
        match self {
            CoreCorrelation::Large => "large",
            CoreCorrelation::Mixed => "mixed",
            CoreCorrelation::Small => "small",
        }
    }

    /// Looks up a core size by its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.keyword().eq_ignore_ascii_case(keyword.trim()))
    }
}

/// Named job templates.
///
/// A job type is recognised from the presence of its template steps in the
/// step list; see [`InputSpecification::job_type`](crate::specification::InputSpecification::job_type).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    /// No template steps
    #[default]
    #[serde(rename = "Single point energy")]
    SinglePoint,
    /// `optg`
    #[serde(rename = "Geometry optimisation")]
    GeometryOptimisation,
    /// `frequencies` with thermochemistry
    #[serde(rename = "Hessian")]
    Hessian,
    /// `optg` followed by `frequencies`
    #[serde(rename = "Optimise + vib frequencies")]
    OptimiseFrequencies,
}

impl JobType {
    /// Templates in matching order. Later entries take precedence.
    pub const ALL: [JobType; 4] = [
        JobType::SinglePoint,
        JobType::GeometryOptimisation,
        JobType::Hessian,
        JobType::OptimiseFrequencies,
    ];

    /// Label used by the guided editor.
    pub fn label(self) -> &'static str {
        match self {
            JobType::SinglePoint => "Single point energy",
            JobType::GeometryOptimisation => "Geometry optimisation",
            JobType::Hessian => "Hessian",
            JobType::OptimiseFrequencies => "Optimise + vib frequencies",
        }
    }

    /// Looks up a job type by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|j| j.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Steps appended to the step list for this job type.
    pub fn template(self) -> Vec<Step> {
        let optimise = || Step::new("optg").with_options(["savexyz=optimised.xyz"]);
        let hessian = || Step::new("frequencies").with_directive(Directive::new("thermo"));
        match self {
            JobType::SinglePoint => Vec::new(),
            JobType::GeometryOptimisation => vec![optimise()],
            JobType::Hessian => vec![hessian()],
            JobType::OptimiseFrequencies => vec![optimise(), hessian()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamiltonian_from_basis_prefers_longest_suffix() {
        assert_eq!(Hamiltonian::from_basis_name("cc-pVTZ"), Hamiltonian::AE);
        assert_eq!(Hamiltonian::from_basis_name("cc-pVTZ-PP"), Hamiltonian::PP);
        assert_eq!(Hamiltonian::from_basis_name("cc-pwCVTZ-DK"), Hamiltonian::DK);
        assert_eq!(Hamiltonian::from_basis_name("cc-pVTZ-DK3"), Hamiltonian::DK3);
        assert_eq!(Hamiltonian::from_basis_name("cc-pvtz-pp"), Hamiltonian::PP);
    }

    #[test]
    fn test_dkho_orders() {
        assert_eq!(Hamiltonian::from_dkho_order("1"), Some(Hamiltonian::DK));
        assert_eq!(Hamiltonian::from_dkho_order("3"), Some(Hamiltonian::DK3));
        assert_eq!(Hamiltonian::from_dkho_order("2"), None);
        assert_eq!(Hamiltonian::DK3.dkho_order(), Some(3));
        assert_eq!(Hamiltonian::PP.dkho_order(), None);
    }

    #[test]
    fn test_property_lookup() {
        assert_eq!(Property::from_command("GEXPEC,DM"), Some(Property::DipoleMoment));
        assert_eq!(Property::from_operator("darw"), Some(Property::Darwin));
        assert_eq!(Property::from_command("gexpec,xx"), None);
        assert_eq!(Property::MassVelocity.command(), "gexpec,massv");
    }

    #[test]
    fn test_orbital_lookup() {
        assert_eq!(OrbitalType::from_key("IBO"), Some(OrbitalType::Ibo));
        assert_eq!(OrbitalType::from_command("locali,pipek"), Some(OrbitalType::Pipek));
        assert_eq!(OrbitalType::from_command("locali"), Some(OrbitalType::Boys));
        assert_eq!(OrbitalType::from_command(""), None);
    }

    #[test]
    fn test_job_templates() {
        assert!(JobType::SinglePoint.template().is_empty());
        let steps = JobType::OptimiseFrequencies.template();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].command, "optg");
        assert_eq!(steps[0].options, vec!["savexyz=optimised.xyz"]);
        assert_eq!(steps[1].directives[0].command, "thermo");
        assert_eq!(JobType::from_label("hessian"), Some(JobType::Hessian));
    }

    #[test]
    fn test_precursor_and_template_commands() {
        assert!(is_hartree_fock("rks"));
        assert!(is_hartree_fock("LDF-RHF"));
        assert!(!is_hartree_fock("ks"));
        assert!(is_template_command("OPTG"));
        assert!(!is_template_command("ccsd"));
    }
}
