//! Periodic table lookup.
//!
//! The table is a fixed array of element symbols indexed by atomic number
//! minus one, which is all the open-shell electron count needs.

/// Element symbols in order of atomic number, hydrogen first.
pub const PERIODIC_TABLE: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", // 1-10
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", // 11-20
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", // 21-30
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", // 31-40
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", // 41-50
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", // 51-60
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", // 61-70
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", // 71-80
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", // 81-90
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", // 91-100
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", // 101-110
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og", // 111-118
];

/// Returns the atomic number for an element symbol.
///
/// The comparison is exact; callers normalise the spelling first with
/// [`title_case`].
///
/// # Examples
///
/// ```
/// use mpspec::elements::atomic_number;
///
/// assert_eq!(atomic_number("He"), Some(2));
/// assert_eq!(atomic_number("Xx"), None);
/// ```
pub fn atomic_number(symbol: &str) -> Option<u32> {
    PERIODIC_TABLE
        .iter()
        .position(|s| *s == symbol)
        .map(|index| index as u32 + 1)
}

/// Upper-cases the first character and lower-cases the rest.
///
/// Used for element symbols, which Molpro accepts in any case.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_bounds() {
        assert_eq!(atomic_number("H"), Some(1));
        assert_eq!(atomic_number("Og"), Some(118));
        assert_eq!(atomic_number("h"), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("zR"), "Zr");
        assert_eq!(title_case("h"), "H");
        assert_eq!(title_case(""), "");
    }
}
