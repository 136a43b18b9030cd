//! Nuclear charge of a geometry.
//!
//! Geometries come either inline from the input or from an external file
//! next to it. Both Z-matrix lines (`H,F,1.7`) and XYZ files (atom count,
//! comment line, then `El x y z`) are understood; only the leading element
//! symbol of each line matters.

use crate::elements::{atomic_number, title_case};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for geometry evaluation.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// The external geometry file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A line whose leading word is not an element symbol
    #[error("Unknown element: {0}")]
    UnknownElement(String),
}

/// Type alias for geometry results.
type Result<T> = std::result::Result<T, GeometryError>;

/// Reads an external geometry file relative to `directory`.
pub fn read_geometry(directory: &Path, reference: &str) -> Result<String> {
    Ok(fs::read_to_string(directory.join(reference.trim()))?)
}

/// Sums the atomic numbers of all atoms in a geometry.
///
/// Lines are separated by newlines or `;`. When the first line is a bare
/// atom count the next line is a comment and both are skipped, as in an XYZ
/// file. Blank lines, comments and variable definitions such as `r=1.7`
/// are ignored. Atom labels may carry a numeric suffix (`C1`, `H12`).
///
/// # Examples
///
/// ```
/// use mpspec::geometry::nuclear_charge;
///
/// assert_eq!(nuclear_charge("Be;H,Be,1").unwrap(), 5);
/// assert_eq!(nuclear_charge("2\nwater fragment\nO 0 0 0\nH1 0 0 1").unwrap(), 9);
/// assert!(nuclear_charge("Xx,1").is_err());
/// ```
pub fn nuclear_charge(geometry: &str) -> Result<u32> {
    let lines: Vec<&str> = geometry.split(['\n', ';']).map(str::trim).collect();
    let skip = match lines.first() {
        Some(first) if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) => 2,
        _ => 0,
    };

    let mut charge = 0;
    for line in lines.into_iter().skip(skip) {
        let word = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .next()
            .unwrap_or_default();
        if word.is_empty() || word.starts_with('!') || word.contains('=') {
            continue;
        }
        let symbol: String = title_case(word).chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        charge += atomic_number(&symbol).ok_or_else(|| GeometryError::UnknownElement(word.to_string()))?;
    }
    Ok(charge)
}
