//! Code generation for synthesized libraries
//!
//! This module provides generators for:
//! - TypeScript declaration files (.d.ts)

pub mod dts;

pub use dts::DtsGenerator;
