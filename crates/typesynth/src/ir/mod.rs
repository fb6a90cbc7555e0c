//! Intermediate Representation (IR) for component library metadata
//!
//! This module provides the symbol graph and structural type expressions
//! that metadata documents are loaded into and that synthesized
//! declarations are expressed in.

pub mod library;
pub mod symbol;
pub mod types;

pub use library::*;
pub use symbol::*;
pub use types::*;
