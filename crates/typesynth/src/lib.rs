//! Typesynth: declaration synthesis for component library metadata
//!
//! Component libraries describe their classes with metadata (properties,
//! aggregations, associations, events) rather than with the constructor and
//! event types a type checker needs. This crate derives those types: a
//! settings interface per instantiable class, a parameters interface and an
//! event alias per event, and retyped `attach`/`detach`/`fire` methods.
//!
//! # Architecture
//!
//! - `ir`: symbol graph and structural type expressions
//! - `synth`: the synthesizers and the two-pass driver
//! - `codegen`: TypeScript declaration output
//! - `config`: naming and base-type conventions
//! - `diagnostics`: errors and anomaly reporting
//!
//! # Usage
//!
//! ```rust,ignore
//! use typesynth::{Library, SynthConfig, Synthesizer, DtsGenerator};
//!
//! let mut primary = Library::from_json_file("sap.m.api.json")?;
//! let mut deps = vec![Library::from_json_file("sap.ui.core.api.json")?];
//!
//! let report = Synthesizer::new(SynthConfig::default()).run(&mut primary, &mut deps)?;
//! println!("{}", report.anomalies.summary());
//! println!("{}", DtsGenerator::new(&primary).generate());
//! ```

pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod ir;
pub mod synth;

// Re-export commonly used types
pub use codegen::DtsGenerator;
pub use config::SynthConfig;
pub use diagnostics::{Anomaly, AnomalyKind, AnomalyLog, Severity, SynthError, SynthResult};
pub use ir::{
    ClassSymbol, Event, InterfaceSymbol, Library, LibraryValidationError, Method, Parameter,
    Symbol, SymbolInfo, TypeExpr, TypedefSymbol,
};
pub use synth::{SymbolUniverse, SynthesisMode, SynthesisReport, Synthesizer};
