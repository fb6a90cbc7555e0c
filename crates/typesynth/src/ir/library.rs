//! Library metadata documents
//!
//! A `Library` is one parsed metadata document: the symbols a single
//! component library declares, plus the names of the libraries it depends on.

use crate::diagnostics::{SynthError, SynthResult};
use crate::ir::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Metadata for an entire component library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Library name (e.g., "sap.m")
    pub name: String,

    /// Library version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Names of the libraries this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// All symbols in this library, in document order
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

impl Library {
    /// Create a new, empty library
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            dependencies: Vec::new(),
            symbols: Vec::new(),
        }
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Declare a dependency
    pub fn depends_on(mut self, library: impl Into<String>) -> Self {
        self.dependencies.push(library.into());
        self
    }

    /// Add a symbol
    pub fn symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    /// Parse a library from its JSON metadata document
    pub fn from_json_str(json: &str) -> SynthResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a library metadata file
    pub fn from_json_file(path: impl AsRef<Path>) -> SynthResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SynthError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Serialize back to pretty-printed JSON
    pub fn to_json_string(&self) -> SynthResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a symbol by FQN
    pub fn find(&self, fqn: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name() == fqn)
    }

    /// Validate the identity fields of every symbol
    pub fn validate(&self) -> Result<(), LibraryValidationError> {
        if self.name.is_empty() {
            return Err(LibraryValidationError::EmptyName);
        }

        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            let info = symbol.info();
            if info.name.is_empty() || info.basename.is_empty() {
                return Err(LibraryValidationError::MissingIdentity {
                    library: self.name.clone(),
                    kind: symbol.kind_name(),
                });
            }
            if !seen.insert(info.name.as_str()) {
                return Err(LibraryValidationError::DuplicateSymbol {
                    library: self.name.clone(),
                    name: info.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Errors that can occur during library validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryValidationError {
    /// Library name is empty
    #[error("library name cannot be empty")]
    EmptyName,
    /// A symbol lacks its FQN or basename
    #[error("{kind} symbol without name or basename in library {library}")]
    MissingIdentity { library: String, kind: &'static str },
    /// Two symbols share an FQN
    #[error("duplicate symbol {name} in library {library}")]
    DuplicateSymbol { library: String, name: String },
}
