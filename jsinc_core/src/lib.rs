//! `jsinc_core` is the core library for the jsinc source-inclusion
//! preprocessor. It scans JavaScript files for `// #include` directives,
//! resolves them into a dependency graph, flattens the graph into fully
//! expanded output files, and writes the results to disk.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Start path
//!   → Discovery (walks directory tree, finds `*.compile.js` roots + destinations)
//!   → DirectiveParser (recursive descent, cycle detection, arena of nodes)
//!   → Graph builder (folds roots into one registry with per-node levels)
//!   → Substitution (expands buffers in descending level order)
//!   → Writer (persists each root's finished text)
//! ```
//!
//! ## Modules
//!
//! - [`parser`] — Directive recognition, include path validation and
//!   resolution, and recursive parsing into the node arena.
//! - [`graph`] — The dependency node arena and the leveled registry that
//!   encodes the substitution schedule.
//! - [`compiler`] — Buffer materialization and the ordered substitution
//!   pass, plus output writing.
//! - [`discovery`] — Compilation root enumeration and destination
//!   resolution.
//! - [`config`] — Configuration loading from `jsinc.toml`.
//!
//! ## Key Types
//!
//! - [`DependencyArena`] — Sole owner of every [`DependencyNode`], keyed by
//!   canonical path.
//! - [`Registry`] — Per-node inclusion levels; longest chain from any root.
//! - [`CompileRoot`] — A discovered entry point and its destination.
//! - [`CompileRun`] — The finished outputs of a full compile.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use jsinc_core::CompileOptions;
//! use jsinc_core::DiscoverOptions;
//! use jsinc_core::compile_roots;
//! use jsinc_core::discover_roots;
//! use jsinc_core::write_outputs;
//!
//! let roots = discover_roots(Path::new("."), &DiscoverOptions::default()).unwrap();
//! let run = compile_roots(&roots, &CompileOptions::default()).unwrap();
//! write_outputs(&run.outputs).unwrap();
//! ```

pub use compiler::*;
pub use config::*;
pub use discovery::*;
pub use error::*;
pub use graph::*;
pub use parser::*;

pub mod compiler;
pub mod config;
pub mod discovery;
mod error;
pub mod graph;
pub mod parser;

#[cfg(test)]
mod __fixtures;
