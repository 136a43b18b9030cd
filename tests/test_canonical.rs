use mpspec::canonical::{canonicalise, equivalent};
use mpspec::keywords::{CoreCorrelation, Hamiltonian, JobType, OrbitalType, Orientation, Property, WaveFunctionSymmetry};
use mpspec::parser::parse_input;
use mpspec::specification::{Basis, Geometry, InputSpecification, Step};
use mpspec::ParserConfig;
use proptest::prelude::*;
use proptest::sample::{select, subsequence};

#[test]
fn test_canonicalise() {
    for (given, expected) in [
        ("geometry={\nHe\n}", "geometry={he}\n"),
        ("a\n\n\nb\n", "{a}\n{b}\n"),
        ("basis={\ndefault=cc-pVTZ,h=cc-pVDZ\n} !some comment", "basis=cc-pvtz,h=cc-pvdz\n"),
    ] {
        assert_eq!(canonicalise(given), expected, "input {:?}", given);
    }
}

#[test]
fn test_generated_input_is_equivalent() {
    let config = ParserConfig::default();
    let spec = parse_input("geometry={He}", &config).into_specification().unwrap();
    assert!(equivalent("geometry={He}", &spec.to_input()));
}

#[test]
fn test_layout_differences_are_equivalent() {
    assert!(equivalent("geometry={He};hf;ccsd", "geometry={\n  He\n}\n{rhf}\n\n{CCSD}\n"));
    assert!(equivalent("spin=2;geometry={He};rhf", "geometry={He}\nset, spin = 2\nrhf"));
    assert!(equivalent("geometry={He};basis,cc-pVDZ;rhf", "geometry={He}\nbasis={default=cc-pVDZ}\nrhf"));
    assert!(equivalent("geometry={He};rhf;{optg}", "geometry={He};rhf;optg ! relax"));
}

#[test]
fn test_job_changes_are_not_equivalent() {
    assert!(!equivalent("geometry={He};rhf", "geometry={He};uhf"));
    assert!(!equivalent("geometry={He};rhf;ccsd", "geometry={He};ccsd;rhf"));
    assert!(!equivalent("geometry={He};spin=2", "geometry={He};spin=0"));
    assert!(!equivalent("basis=cc-pVDZ", "basis=cc-pVDZ,h=cc-pVTZ"));
}

fn method_step(command: &str) -> Step {
    match command {
        "rks" | "uks" => Step::new(command).with_options(["b3lyp"]),
        _ => Step::new(command),
    }
}

prop_compose! {
    fn structure()(
        orientation in proptest::option::of(select(Orientation::ALL.to_vec())),
        symmetry in select(vec![WaveFunctionSymmetry::Automatic, WaveFunctionSymmetry::NoSymmetry]),
        geometry in proptest::option::of(prop_oneof![
            select(vec!["He", "F\nH,F,1.7", "O\nH1,O,0.96\nH2,O,0.96,H1,104.5"])
                .prop_map(|atoms| Geometry::Inline(atoms.to_string())),
            Just(Geometry::External("h2o.xyz".to_string())),
        ]),
        basis in proptest::option::of((
            select(vec!["cc-pVDZ", "cc-pVTZ-PP", "aug-cc-pVQZ", "def2-TZVP"]),
            any::<bool>(),
        )),
        relativistic in select(vec![None, Some(Hamiltonian::DK), Some(Hamiltonian::DK3)]),
    ) -> InputSpecification {
        let mut spec = InputSpecification::new();
        spec.orientation = orientation;
        spec.wave_fct_symm = symmetry;
        spec.geometry = geometry;
        spec.basis = basis.map(|(default, hydrogen)| {
            let basis = Basis::new(default);
            if hydrogen { basis.with_element("h", "cc-pVDZ") } else { basis }
        });
        spec.hamiltonian = relativistic.unwrap_or_else(|| {
            spec.basis
                .as_ref()
                .map(|b| Hamiltonian::from_basis_name(&b.default))
                .unwrap_or_default()
        });
        spec
    }
}

prop_compose! {
    fn specification()(
        mut spec in structure(),
        variables in subsequence(vec![("spin", "2"), ("charge", "1"), ("occ", "[3,1,1]")], 0..=3),
        properties in subsequence(Property::ALL.to_vec(), 0..=2),
        thresholds in any::<bool>(),
        prints in any::<bool>(),
        core in proptest::option::of(select(vec![CoreCorrelation::Large, CoreCorrelation::Mixed, CoreCorrelation::Small])),
        methods in proptest::collection::vec(
            select(vec!["rhf", "uhf", "rks", "uks", "mp2", "ccsd", "ccsd(t)", "casscf"]),
            1..4,
        ),
        job_type in select(JobType::ALL.to_vec()),
        density_fitting in any::<bool>(),
        orbitals in subsequence(OrbitalType::ALL.to_vec(), 0..=2),
        postscripts in subsequence(vec!["table,energy", "put,xyz,final.xyz"], 0..=2),
    ) -> InputSpecification {
        for (name, value) in variables {
            spec.set_variable(name, value);
        }
        spec.properties = properties;
        if thresholds {
            spec.thresholds.insert("energy".into(), "1e-8".into());
            spec.thresholds.insert("gradient".into(), "1e-5".into());
        }
        if prints {
            spec.prints.insert("orbitals".into(), String::new());
        }
        spec.core_correlation = core;
        spec.steps = methods.into_iter().map(method_step).collect();
        spec.set_job_type(job_type);
        spec.density_fitting = density_fitting;
        spec.orbitals = orbitals;
        spec.postscripts = postscripts.into_iter().map(String::from).collect();
        spec
    }
}

proptest! {
    #[test]
    fn test_generated_input_parses_back(spec in specification()) {
        let input = spec.to_input();
        let parsed = parse_input(&input, &ParserConfig::default()).into_specification();
        prop_assert_eq!(parsed, Some(spec), "generated input:\n{}", input);
    }

    #[test]
    fn test_canonical_form_is_stable(spec in specification()) {
        let canonical = canonicalise(&spec.to_input());
        prop_assert_eq!(canonicalise(&canonical), canonical.clone());
        prop_assert!(canonical.ends_with('\n'));
    }
}
