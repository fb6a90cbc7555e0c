//! Deterministic names for synthesized declarations
//!
//! Every synthesized name is a pure function of the declaring class and the
//! event name, so repeated runs produce identical output and classes can
//! refer to their ancestors' synthesized types without looking them up.

use crate::config::SynthConfig;
use crate::ir::{basename_of, namespace_of};

/// Names of the declarations synthesized for one event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventNames {
    /// `<ClassFqn>$<Event>EventParameters`
    pub parameters_fqn: String,
    /// `<ClassBasename>$<Event>EventParameters`
    pub parameters_basename: String,
    /// `<ClassFqn>$<Event>Event`
    pub alias_fqn: String,
    /// `<ClassBasename>$<Event>Event`
    pub alias_basename: String,
}

impl EventNames {
    /// Build the four names for `event` declared on `class_fqn`
    pub fn new(class_fqn: &str, event: &str) -> Self {
        let class_basename = basename_of(class_fqn);
        let event = capitalize(event);
        Self {
            parameters_fqn: format!("{}${}EventParameters", class_fqn, event),
            parameters_basename: format!("{}${}EventParameters", class_basename, event),
            alias_fqn: format!("{}${}Event", class_fqn, event),
            alias_basename: format!("{}${}Event", class_basename, event),
        }
    }
}

/// FQN and basename of a class's settings interface (`sap.m.$ButtonSettings`)
pub fn settings_names(class_fqn: &str) -> (String, String) {
    let basename = format!("${}Settings", basename_of(class_fqn));
    let namespace = namespace_of(class_fqn);
    let fqn = if namespace.is_empty() {
        basename.clone()
    } else {
        format!("{}.{}", namespace, basename)
    };
    (fqn, basename)
}

/// Names of the subscribe, unsubscribe and emit methods of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMethodNames {
    pub subscribe: String,
    pub unsubscribe: String,
    pub emit: String,
}

impl EventMethodNames {
    pub fn new(config: &SynthConfig, event: &str) -> Self {
        let event = capitalize(event);
        Self {
            subscribe: format!("{}{}", config.subscribe_prefix, event),
            unsubscribe: format!("{}{}", config.unsubscribe_prefix, event),
            emit: format!("{}{}", config.emit_prefix, event),
        }
    }
}

/// Uppercase the first character (`press` -> `Press`)
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
