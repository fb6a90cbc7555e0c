//! Merged symbol lookup across a library and its dependencies

use crate::ir::{ClassSymbol, Library, Symbol};
use std::collections::{HashMap, HashSet};

/// FQN -> symbol table over the primary library and every dependency.
///
/// Symbols are borrowed; the universe must be dropped before the libraries
/// it was built from are modified.
#[derive(Debug, Default)]
pub struct SymbolUniverse<'a> {
    symbols: HashMap<&'a str, &'a Symbol>,
}

impl<'a> SymbolUniverse<'a> {
    /// Insert `primary`, then each dependency in order. On an FQN collision
    /// the later insertion wins, so dependencies shadow the primary library.
    pub fn build(primary: &'a [Symbol], dependencies: &[&'a [Symbol]]) -> Self {
        let mut universe = Self::default();
        universe.insert_all(primary);
        for symbols in dependencies {
            universe.insert_all(symbols);
        }
        tracing::debug!("symbol universe built with {} symbols", universe.len());
        universe
    }

    /// Build from parsed libraries
    pub fn from_libraries(primary: &'a Library, dependencies: &'a [Library]) -> Self {
        let deps: Vec<&'a [Symbol]> = dependencies.iter().map(|l| l.symbols.as_slice()).collect();
        Self::build(&primary.symbols, &deps)
    }

    fn insert_all(&mut self, symbols: &'a [Symbol]) {
        for symbol in symbols {
            if self.symbols.insert(symbol.name(), symbol).is_some() {
                tracing::debug!("symbol {} redefined, later definition wins", symbol.name());
            }
        }
    }

    pub fn get(&self, fqn: &str) -> Option<&'a Symbol> {
        self.symbols.get(fqn).copied()
    }

    /// Look up a class by FQN
    pub fn class(&self, fqn: &str) -> Option<&'a ClassSymbol> {
        self.get(fqn).and_then(Symbol::as_class)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Walk the `extends` chain of `fqn`, nearest ancestor first
    pub fn ancestors(&self, fqn: &str) -> Ancestors<'_, 'a> {
        let mut visited = HashSet::new();
        visited.insert(fqn.to_string());
        Ancestors {
            universe: self,
            next: self.class(fqn).and_then(|c| c.extends.as_deref()),
            visited,
            hit_cycle: false,
        }
    }

    /// Whether `fqn` is `base` or transitively extends it.
    ///
    /// The last link may name a symbol missing from the universe; it still
    /// counts when its name is `base`.
    pub fn is_subtype_of(&self, fqn: &str, base: &str) -> bool {
        if fqn == base {
            return true;
        }
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(fqn);
        let mut current = self.class(fqn).and_then(|c| c.extends.as_deref());
        while let Some(name) = current {
            if name == base {
                return true;
            }
            if !visited.insert(name) {
                tracing::warn!("inheritance cycle through {} while checking {}", name, fqn);
                return false;
            }
            current = self.class(name).and_then(|c| c.extends.as_deref());
        }
        false
    }
}

/// Iterator over the resolvable ancestors of a class
pub struct Ancestors<'u, 'a> {
    universe: &'u SymbolUniverse<'a>,
    next: Option<&'a str>,
    visited: HashSet<String>,
    hit_cycle: bool,
}

impl<'a> Ancestors<'_, 'a> {
    /// Whether the walk stopped because the chain looped back
    pub fn hit_cycle(&self) -> bool {
        self.hit_cycle
    }
}

impl<'a> Iterator for Ancestors<'_, 'a> {
    type Item = &'a ClassSymbol;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.next.take()?;
        if !self.visited.insert(name.to_string()) {
            self.hit_cycle = true;
            return None;
        }
        let class = self.universe.class(name)?;
        self.next = class.extends.as_deref();
        Some(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ClassSymbol, Event};

    fn chain() -> Vec<Symbol> {
        vec![
            ClassSymbol::new("lib.A").extends("base.EventProvider").into(),
            ClassSymbol::new("lib.B").extends("lib.A").into(),
            ClassSymbol::new("lib.C").extends("lib.B").into(),
        ]
    }

    #[test]
    fn test_subtype_walk() {
        let symbols = chain();
        let universe = SymbolUniverse::build(&symbols, &[]);

        assert!(universe.is_subtype_of("lib.C", "lib.A"));
        assert!(universe.is_subtype_of("lib.C", "lib.C"));
        // the root itself is not loaded, the last link still matches
        assert!(universe.is_subtype_of("lib.C", "base.EventProvider"));
        assert!(!universe.is_subtype_of("lib.A", "lib.C"));
        assert!(!universe.is_subtype_of("lib.Unknown", "lib.A"));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let symbols = chain();
        let universe = SymbolUniverse::build(&symbols, &[]);
        let names: Vec<&str> = universe.ancestors("lib.C").map(|c| c.name()).collect();
        assert_eq!(names, vec!["lib.B", "lib.A"]);
        assert_eq!(universe.ancestors("lib.A").count(), 0);
    }

    #[test]
    fn test_cycle_terminates() {
        let symbols: Vec<Symbol> = vec![
            ClassSymbol::new("x.A").extends("x.B").into(),
            ClassSymbol::new("x.B").extends("x.A").into(),
        ];
        let universe = SymbolUniverse::build(&symbols, &[]);
        assert!(!universe.is_subtype_of("x.A", "x.Root"));

        let mut walk = universe.ancestors("x.A");
        assert_eq!(walk.next().map(|c| c.name()), Some("x.B"));
        assert!(walk.next().is_none());
        assert!(walk.hit_cycle());
    }

    #[test]
    fn test_dependency_overrides_primary() {
        let primary: Vec<Symbol> = vec![ClassSymbol::new("lib.A").event(Event::new("primary")).into()];
        let dependency: Vec<Symbol> = vec![ClassSymbol::new("lib.A").event(Event::new("dependency")).into()];
        let universe = SymbolUniverse::build(&primary, &[dependency.as_slice()]);

        assert_eq!(universe.len(), 1);
        let class = universe.class("lib.A").unwrap();
        assert_eq!(class.events[0].name, "dependency");
    }
}
