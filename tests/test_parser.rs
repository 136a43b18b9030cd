use mpspec::canonical::{canonicalise, equivalent};
use mpspec::keywords::Hamiltonian;
use mpspec::parser::{parse_file, parse_input, Parsed, Unrepresentable};
use mpspec::specification::{Basis, Geometry, InputSpecification, Step};
use mpspec::ParserConfig;
use std::fs::File;
use std::io::Write;

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
        .unwrap_or_else(|| panic!("not representable: {:?}", input))
}

/// Parses, regenerates and parses again; both parses must agree.
fn regenerate(input: &str) -> (InputSpecification, String) {
    let specification = parse(input);
    let regenerated = specification.to_input();
    assert_eq!(parse(&regenerated), specification, "input {:?} gave {:?}", input, regenerated);
    (specification, regenerated)
}

#[test]
fn test_create_input_from_structure() {
    let mut specification = InputSpecification::new();
    specification.geometry = Some(Geometry::Inline("F\nH,F,1.7".into()));
    specification.basis = Some(Basis::new("cc-pVTZ"));
    specification.steps = vec![Step::new("rks").with_options(["b3lyp"]), Step::new("ccsd")];
    specification.hamiltonian = Hamiltonian::AE;

    let input = specification.to_input();
    assert_eq!(input, "geometry={\nF\nH,F,1.7\n}\nbasis=cc-pVTZ\n{rks,b3lyp}\n{ccsd}\n");
    assert_eq!(parse(&input), specification);
}

#[test]
fn test_regenerated_input_is_equivalent() {
    for input in [
        "Geometry={F;H,F,1.7};basis={default=cc-pVTZ,h=cc-pVDZ} !some comment;{ks,b3lyp};{ccsd}\n",
        "Geometry={F;H,F,1.7};basis={default=cc-pVTZ,h=cc-pVDZ} !some comment;{ks,b3lyp};ccsd\n",
        "Geometry={\nF;H,F,1.7};basis={default=cc-pVTZ,h=cc-pVDZ} !some comment;{ks,b3lyp};ccsd\n",
        "Geometry={\nF;H,F,1.7\n};basis={default=cc-pVTZ,h=cc-pVDZ} !some comment;{ks,b3lyp};ccsd\n",
        "Geometry={\nF\nH,F,1.7\n};basis={default=cc-pVTZ,h=cc-pVDZ} !some comment;{ks,b3lyp};ccsd\n",
        "geometry={\nHe\n}\nhf",
        "geometry={\nHe\n}\nhf\nccsd",
        "geometry=thing.xyz",
        "geometry={H};uhf",
        "geometry={H};{uhf}",
        "geometry={H};{rhf}",
        "geometry={H};{hf}",
        "geometry={H};{uks,b3lyp};ccsd",
        "geometry={H};{rks,b3lyp};ccsd",
        "geometry={H};{ks,b3lyp};ccsd",
        "geometry={H};uks,b3lyp;ccsd",
        "geometry={H};uks,b3lyp",
        "geometry={H};rks,b3lyp",
        "geometry={H};ks,b3lyp",
        "geometry={H};ccsd,option1,option2=thing,,",
        "geometry={H};ks,b3lyp,option1,option2,,",
    ] {
        let (_, regenerated) = regenerate(input);
        assert!(
            equivalent(&regenerated, input),
            "{:?} and {:?} canonicalise to {:?} and {:?}",
            input,
            regenerated,
            canonicalise(input),
            canonicalise(&regenerated)
        );
    }
}

#[test]
fn test_recreate_input() {
    for input in [
        "geometry={\nHe\n}\nhf",
        "geometry={\nHe\n}\nhf\nccsd",
        "geometry={\nHe\n}\nhf\nccsd\n\n",
        "geometry={He}\nhf\nccsd\n\n",
        "geometry={He};rks,b3lyp",
        "geometry={He};{rks,b3lyp}",
        "geometry=newnewnew.xyz\nbasis=cc-pVTZ-PP\nrhf",
        "geometry=wed.xyz\nbasis=cc-pVTZ-PP\nset,charge=1,spin=1,thing=whatsit\nxx=yy,p=q\nrhf",
        "geometry={Ne};{rhf};ccsd;{frequencies;thermo,temp=298;another}",
    ] {
        let (_, regenerated) = regenerate(input);
        assert_eq!(canonicalise(&regenerated), canonicalise(input), "input {:?}", input);
    }
}

#[test]
fn test_recreated_details() {
    let (spec, _) = regenerate("geometry=wed.xyz\nbasis=cc-pVTZ-PP\nset,charge=1,spin=1,thing=whatsit\nxx=yy,p=q\nrhf");
    assert_eq!(spec.hamiltonian, Hamiltonian::PP);
    let names: Vec<&str> = spec.variables.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["charge", "spin", "thing", "xx", "p"]);

    let (spec, regenerated) = regenerate("geometry={Ne};{rhf};ccsd;{frequencies;thermo,temp=298;another}");
    let frequencies = &spec.steps[2];
    assert_eq!(frequencies.command, "frequencies");
    assert_eq!(frequencies.directives.len(), 2);
    assert_eq!(frequencies.directives[0].options, vec!["temp=298"]);
    assert!(regenerated.ends_with("{frequencies;thermo,temp=298;another}\n"));
}

#[test]
fn test_variables() {
    let text = "spin=2,charge=1! comment\nset,occ=[3,1,1] ! comments\n;Geometry={F;H,F,1.7};basis={default=cc-pVTZ,h=cc-pVDZ}\n{ks,b3lyp}!some comment;ccsd\n";
    let (specification, _) = regenerate(text);
    assert_eq!(specification.variable("spin"), Some("2"));
    assert_eq!(specification.variable("occ"), Some("[3,1,1]"));
    assert_eq!(specification.variable("charge"), Some("1"));
}

#[test]
fn test_too_complex() {
    assert_eq!(
        parse_input("geometry=c.xyz;hf;basis=cc-pvtz;ccsd", &config()),
        Parsed::Unrepresentable(Unrepresentable::BasisAfterStep)
    );
    assert_eq!(
        parse_input("geometry=a.xyz;geometry=b.xyz", &config()),
        Parsed::Unrepresentable(Unrepresentable::MultipleGeometries)
    );
    assert_eq!(
        parse_input("hf;geometry=b.xyz", &config()),
        Parsed::Unrepresentable(Unrepresentable::GeometryAfterStep)
    );
    assert!(!parse_input("geometry={He};{ccsd;expec,dm", &config()).is_representable());
}

#[test]
fn test_file_and_text_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test-molpro_input.inp");
    let text = "Geometry={F;H,F,1.7};geometry=hf.xyz;basis=cc-pVTZ !some comment;rhf\nccsd\n";
    let mut file = File::create(&path).unwrap();
    write!(file, "{}", text).unwrap();

    let from_file = parse_file(&path, &config()).unwrap();
    assert_eq!(from_file, parse_input(text, &config()));
    assert_eq!(from_file, Parsed::Unrepresentable(Unrepresentable::MultipleGeometries));
}

#[test]
fn test_basis_variants() {
    for (input, expected) in [
        ("basis=cc-pVDZ", "basis=cc-pVDZ"),
        ("basis,cc-pVDZ", "basis=cc-pVDZ"),
        ("basis=default=cc-pVDZ", "basis=cc-pVDZ"),
        ("basis={default=cc-pVDZ}", "basis=cc-pVDZ"),
        ("basis={cc-pVDZ}", "basis=cc-pVDZ"),
        ("basis,default=cc-pVDZ", "basis=cc-pVDZ"),
        ("basis,cc-pVDZ,h=cc-pVDZ(s)", "basis=cc-pVDZ,H=cc-pVDZ(s)"),
        ("basis,cc-pVDZ,zR=cc-pVDZ(s),h=cc-pVTZ", "basis=cc-pVDZ,Zr=cc-pVDZ(s),H=cc-pVTZ"),
        ("basis={cc-pVDZ,zR=cc-pVDZ(s),h=cc-pVTZ}", "basis=cc-pVDZ,Zr=cc-pVDZ(s),H=cc-pVTZ"),
    ] {
        assert_eq!(parse(input).to_input(), format!("{}\n", expected), "input {:?}", input);
    }
}

#[test]
fn test_density_fitting_round_trip() {
    let (spec, regenerated) = regenerate("geometry={He};{df-hf};df-ccsd;optg");
    assert!(spec.density_fitting);
    assert_eq!(regenerated, "geometry={\nHe\n}\n{df-rhf}\n{df-ccsd}\n{optg}\n");

    assert_eq!(
        parse_input("geometry={He};df-hf;ccsd", &config()),
        Parsed::Unrepresentable(Unrepresentable::ConflictingDensityFitting("ccsd".into()))
    );
}
