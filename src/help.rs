//! Built-in help for mpspec.
//!
//! Documents the statements of the guided Molpro subset, the methods
//! offered by default, the derived views and the command line.

use crate::config::DEFAULT_METHODS;
use crate::keywords::{JobType, OrbitalType, Property};

/// Category for organizing statements in the help system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Molecule definition: orientation, symmetry, geometry, basis.
    Structure,
    /// Variable assignments such as charge and spin.
    Variables,
    /// Global options and property requests.
    Options,
    /// Computational steps and their directives.
    Steps,
    /// Orbital exports and trailing commands.
    Output,
}

impl KeywordCategory {
    /// Categories in the order they are printed, which is also the order
    /// the generator writes statements.
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::Structure,
        KeywordCategory::Variables,
        KeywordCategory::Options,
        KeywordCategory::Steps,
        KeywordCategory::Output,
    ];

    fn header(self) -> &'static str {
        match self {
            KeywordCategory::Structure => "MOLECULE",
            KeywordCategory::Variables => "VARIABLES",
            KeywordCategory::Options => "GLOBAL OPTIONS",
            KeywordCategory::Steps => "COMPUTATIONAL STEPS",
            KeywordCategory::Output => "OUTPUT",
        }
    }
}

/// Documentation entry for one statement of the guided subset.
#[derive(Debug, Clone)]
pub struct Keyword {
    /// Statement name as written in the input (e.g. "geometry", "gthresh").
    pub name: &'static str,
    /// The category to which this statement belongs.
    pub category: KeywordCategory,
    /// A brief description of what the statement does.
    pub description: &'static str,
    /// Example usage.
    pub example: Option<&'static str>,
}

/// Information about a method family offered as a computational step.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// Family name (e.g. "Coupled cluster").
    pub name: &'static str,
    /// Commands of the family.
    pub commands: &'static [&'static str],
    /// A brief description.
    pub description: &'static str,
    /// Example step.
    pub example: Option<&'static str>,
}

/// All statement documentation.
pub const KEYWORDS: &[Keyword] = &[
    Keyword {
        name: "orient",
        category: KeywordCategory::Structure,
        description: "Orientation of the molecule: mass, charge or noorient",
        example: Some("orient,mass"),
    },
    Keyword {
        name: "symmetry",
        category: KeywordCategory::Structure,
        description: "Switch off point-group symmetry (nosym is accepted as shorthand)",
        example: Some("symmetry,nosym"),
    },
    Keyword {
        name: "geometry",
        category: KeywordCategory::Structure,
        description: "Inline Z-matrix or XYZ block, or a file next to the input. Only one geometry, before any step",
        example: Some("geometry={F;H,F,1.7}\ngeometry=h2o.xyz"),
    },
    Keyword {
        name: "basis",
        category: KeywordCategory::Structure,
        description: "Default basis followed by per-element overrides. Must precede all steps",
        example: Some("basis=cc-pVTZ,H=cc-pVDZ\nbasis={default=cc-pVTZ,h=cc-pVDZ}"),
    },
    Keyword {
        name: "dkho",
        category: KeywordCategory::Variables,
        description: "Douglas-Kroll-Hess order, 1 or 3; other orders are not representable",
        example: Some("dkho=3"),
    },
    Keyword {
        name: "set",
        category: KeywordCategory::Variables,
        description: "Assign Molpro variables; charge and spin feed the spin view",
        example: Some("set,charge=1,spin=2\nocc=[3,1,1]"),
    },
    Keyword {
        name: "gexpec",
        category: KeywordCategory::Options,
        description: "Request an expectation value: dm, qm, sm, ekin, rel, massv, darw",
        example: Some("gexpec,dm"),
    },
    Keyword {
        name: "gparam / gthresh / gprint",
        category: KeywordCategory::Options,
        description: "Global parameter, threshold and print options as key=value lists",
        example: Some("gthresh,energy=1e-8,orbital=1e-6"),
    },
    Keyword {
        name: "core",
        category: KeywordCategory::Options,
        description: "Frozen-core size: large, mixed or small",
        example: Some("core,small"),
    },
    Keyword {
        name: "{step}",
        category: KeywordCategory::Steps,
        description: "A method command with options, grouped with its directives. df-, pno- and ldf- select density fitting for the whole job",
        example: Some("{rks,b3lyp}\n{df-ccsd(t);expec,dm}"),
    },
    Keyword {
        name: "optg / frequencies",
        category: KeywordCategory::Steps,
        description: "Job-type steps: geometry optimisation and vibrational frequencies",
        example: Some("{optg,savexyz=optimised.xyz}\n{frequencies;thermo}"),
    },
    Keyword {
        name: "put,molden",
        category: KeywordCategory::Output,
        description: "Export orbitals; localised sets are preceded by their generator (ibba, locali, nbo)",
        example: Some("ibba\nput,molden,ibo.molden"),
    },
    Keyword {
        name: "put / table / noorbitals / nobasis",
        category: KeywordCategory::Output,
        description: "Trailing commands kept verbatim",
        example: Some("put,xyz,final.xyz"),
    },
];

const METHODS: &[MethodInfo] = &[
    MethodInfo {
        name: "Hartree-Fock and Kohn-Sham",
        commands: &["rhf", "uhf", "rks", "uks", "ldf-rhf", "ldf-uhf"],
        description: "Self-consistent field; a Kohn-Sham step takes the functional as its option",
        example: Some("{rks,b3lyp}"),
    },
    MethodInfo {
        name: "Perturbation theory",
        commands: &["mp2", "rmp2", "ump2", "mp3", "mp4", "lmp2", "pno-lmp2"],
        description: "Moller-Plesset perturbation theory; an rhf or uhf precursor is added automatically",
        example: Some("{rhf}\n{mp2}"),
    },
    MethodInfo {
        name: "Coupled cluster",
        commands: &["ccsd", "ccsd(t)", "uccsd(t)", "bccd(t)", "qcisd(t)", "pno-lccsd(t)"],
        description: "Single-reference coupled cluster and quadratic CI",
        example: Some("{rhf}\n{ccsd(t);expec,dm}"),
    },
    MethodInfo {
        name: "Multireference",
        commands: &["casscf", "multi", "mrci", "rs2", "rs2c", "rs3"],
        description: "CASSCF and internally contracted MRCI and CASPT2",
        example: Some("{casscf;closed,2;occ,5}"),
    },
];

/// Returns the documented method families.
pub fn get_methods() -> &'static [MethodInfo] {
    METHODS
}

/// Print global help
pub fn print_global_help() {
    println!("mpspec - guided editing of Molpro input");
    println!();
    println!("USAGE:");
    println!("    mpspec <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    parse <input_file>");
    println!("                        Parse input and print the structured form as JSON");
    println!();
    println!("    generate <json_file>");
    println!("                        Generate Molpro input from a structured form");
    println!();
    println!("    canon <input_file>");
    println!("                        Print the canonical form used for comparison");
    println!();
    println!("    equiv <first_file> <second_file>");
    println!("                        Check whether two inputs are equivalent");
    println!();
    println!("    guided <input_file>");
    println!("                        Check whether the input can be edited in guided mode");
    println!("                        and print the derived views");
    println!();
    println!("    ci mpspec_config.cfg");
    println!("                        Create a configuration template file");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help [topic]   Show help. Topics: keywords, methods, features, examples");
    println!();
    println!("CONFIGURATION FILE:");
    println!("    mpspec uses 'mpspec_config.cfg' for program configuration.");
    println!("    Create template:     mpspec ci mpspec_config.cfg");
    println!("    Supported locations:");
    println!("      - ./mpspec_config.cfg (local, highest priority)");
    println!("      - ~/.config/mpspec/mpspec_config.cfg (user)");
    println!("      - /etc/mpspec/mpspec_config.cfg (system)");
    println!("    Features: allowed methods, geometry directory, logging level");
    println!();
}

/// Print help for 'ci' command
pub fn print_ci_help() {
    println!("Create Settings Template (ci) Command");
    println!("═════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    mpspec ci mpspec_config.cfg");
    println!();
    println!("DESCRIPTION:");
    println!("    Writes a commented configuration file with every option at its");
    println!("    default value into the current directory.");
    println!();
}

/// Print statement reference
pub fn print_keyword_help() {
    println!("STATEMENT REFERENCE");
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();

    for category in KeywordCategory::ALL {
        println!("{}", category.header());
        println!("{}", "─".repeat(76));
        println!();
        for keyword in KEYWORDS.iter().filter(|k| k.category == category) {
            print_keyword(keyword);
            println!();
        }
    }
    println!("Anything else makes the input unrepresentable; it can still be edited as text.");
    println!();
}

/// Print method reference
pub fn print_method_help() {
    println!("METHOD REFERENCE");
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();

    for method in get_methods() {
        println!("{}", method.name);
        println!("    {}", method.description);
        println!("    Commands: {}", method.commands.join(", "));
        if let Some(example) = method.example {
            print_example(example);
        }
        println!();
    }

    println!("DEFAULT ALLOWED LIST");
    println!("{}", "─".repeat(76));
    println!();
    for chunk in DEFAULT_METHODS.chunks(8) {
        println!("    {}", chunk.join(", "));
    }
    println!();
    println!("Override with [methods] allowed = ... in mpspec_config.cfg");
    println!();
}

/// Print the derived views
pub fn print_feature_help() {
    println!("DERIVED VIEWS");
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();
    println!("method");
    println!("    The single step that is not a job-type step and not a leading");
    println!("    Hartree-Fock precursor. Absent when there are several.");
    println!();
    println!("job type");
    for job_type in JobType::ALL {
        let commands: Vec<String> = job_type.template().into_iter().map(|s| s.command).collect();
        println!("    {:<28} [{}]", job_type.label(), commands.join(", "));
    }
    println!();
    println!("basis quality");
    println!("    2 for double zeta up to 7, from the letter after 'V' in every basis");
    println!("    name; 0 when names disagree.");
    println!();
    println!("spin");
    println!("    The spin variable when its parity matches the electron count,");
    println!("    otherwise 0 or 1. Values of the wrong parity are corrected.");
    println!();
    println!("properties");
    for property in Property::ALL {
        println!("    {:<28} {}", property.label(), property.command());
    }
    println!();
    println!("orbitals");
    for orbital in OrbitalType::ALL {
        println!("    {:<28} put,molden,{}.molden", orbital.label(), orbital.key());
    }
    println!();
}

/// Print example usages
pub fn print_examples() {
    println!("USAGE EXAMPLES");
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();
    println!("1. Inspect an input:");
    println!("   $ mpspec parse hf.inp");
    println!();
    println!("2. Check that guided editing would not change the job:");
    println!("   $ mpspec guided hf.inp");
    println!();
    println!("3. Compare two inputs:");
    println!("   $ mpspec equiv old.inp new.inp");
    println!();
    println!("GUIDED INPUT EXAMPLE");
    println!("{}", "─".repeat(76));
    println!();
    println!("geometry={{");
    println!("F");
    println!("H,F,1.7");
    println!("}}");
    println!("basis=cc-pVTZ");
    println!("charge=1");
    println!("spin=1");
    println!("gexpec,dm");
    println!("{{rhf}}");
    println!("{{ccsd(t);expec,dm}}");
    println!("{{optg,savexyz=optimised.xyz}}");
    println!();
    println!("NOT REPRESENTABLE");
    println!("{}", "─".repeat(76));
    println!();
    println!("geometry=a.xyz;geometry=b.xyz      two geometries");
    println!("geometry=c.xyz;hf;basis=cc-pvtz    basis after a step");
    println!("df-hf;ccsd                         mixed density fitting");
    println!("dkho=2                             unsupported relativistic order");
    println!();
}

fn print_example(example: &str) {
    for (i, line) in example.lines().enumerate() {
        if i == 0 {
            println!("    Example:  {}", line);
        } else {
            println!("              {}", line);
        }
    }
}

/// Print single keyword
fn print_keyword(keyword: &Keyword) {
    println!("{}", keyword.name);
    println!("    {}", keyword.description);
    if let Some(example) = keyword.example {
        print_example(example);
    }
}
