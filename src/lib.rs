#![deny(missing_docs)]

//! mpspec - guided editing of Molpro input
//!
//! Molpro jobs are written in a small command language. A guided editor
//! shows the common part of that language as a form, while the text stays
//! the authoritative copy. This crate keeps the two views in step:
//!
//! - [`parser`] turns text into an [`InputSpecification`], or reports why
//!   the text is outside the guided subset
//! - [`InputSpecification::to_input`] writes the text back
//! - [`canonical`] decides whether two texts describe the same job
//! - [`derived`] computes the views the form shows: method, job type, basis
//!   quality, spin
//!
//! # Quick Start
//!
//! ```
//! use mpspec::config::ParserConfig;
//! use mpspec::keywords::JobType;
//! use mpspec::parser::parse_guided;
//!
//! let config = ParserConfig::default();
//! let mut spec = parse_guided("geometry={He};basis=cc-pVTZ;rks,b3lyp", &config)
//!     .expect("guided subset");
//!
//! assert_eq!(spec.density_functional().as_deref(), Some("B3LYP"));
//! assert_eq!(spec.basis_quality(), 3);
//!
//! spec.set_job_type(JobType::GeometryOptimisation);
//! assert_eq!(
//!     spec.to_input(),
//!     "geometry={\nHe\n}\nbasis=cc-pVTZ\n{rks,b3lyp}\n{optg,savexyz=optimised.xyz}\n"
//! );
//! ```
//!
//! # Processing Pipeline
//!
//! ```text
//! text ─ lexer ─ classifier ─ parser ─> InputSpecification ─ generator ─> text
//!                                              │
//!                                           derived views
//!
//! text₁ ─ canonical ─┐
//!                    ├─ equal? ─> equivalent
//! text₂ ─ canonical ─┘
//! ```
//!
//! Every parse takes a [`ParserConfig`](config::ParserConfig) with the
//! commands accepted as steps and the directory for external geometries.
//! Nothing is global, so independent inputs can be parsed on different
//! threads.
//!
//! # Modules
//!
//! - [`elements`] - Periodic table lookup
//! - [`keywords`] - Keyword vocabularies (orientation, Hamiltonian, properties, job types)
//! - [`config`] - Parser configuration
//! - [`settings`] - Configuration files
//! - [`specification`] - The structured model
//! - [`lexer`] - Statement splitting
//! - [`classifier`] - Statement classification rules
//! - [`parser`] - Parsing
//! - [`generator`] - Input generation
//! - [`canonical`] - Canonical form and equivalence
//! - [`geometry`] - Nuclear charge of a geometry
//! - [`derived`] - Derived views
//! - [`help`] - Built-in help system

/// Canonical form and equivalence of inputs
pub mod canonical;
/// Statement classification rules
pub mod classifier;
pub mod config;
/// Derived views over a specification
pub mod derived;
pub mod elements;
/// Input generation
pub mod generator;
pub mod geometry;
/// Built-in help system
pub mod help;
pub mod keywords;
pub mod lexer;
pub mod parser;
/// Configuration management system
pub mod settings;
pub mod specification;

pub use canonical::{canonicalise, equivalent};
pub use config::ParserConfig;
pub use parser::{parse_guided, parse_input, Parsed, Unrepresentable};
pub use specification::InputSpecification;
