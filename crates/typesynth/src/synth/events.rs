//! Event parameter interfaces and event aliases
//!
//! For every event of an event-capable class this module builds
//!
//! - `<Class>$<Event>EventParameters`: the payload delivered to listeners,
//!   extending the nearest ancestor's same-named event parameters and
//!   omitting every field some ancestor already declares, and
//! - `<Class>$<Event>Event`: `Event<<Class>$<Event>EventParameters, <Class>>`.
//!
//! There is no override marker in the metadata: an ancestor event with the
//! same name is treated as the event being redeclared.

use crate::config::SynthConfig;
use crate::diagnostics::{Anomaly, AnomalyKind, AnomalyLog};
use crate::ir::{
    ClassSymbol, Event, InterfaceProperty, InterfaceSymbol, Parameter, SymbolInfo, TypeExpr,
    TypedefSymbol,
};
use crate::synth::names::EventNames;
use crate::synth::{SymbolUniverse, SynthesisMode};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Declarations synthesized for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSynthesis {
    /// FQN of the declaring class
    pub class: String,
    /// Event name as declared
    pub event: String,
    pub names: EventNames,
    pub parameters: InterfaceSymbol,
    pub alias: TypedefSymbol,
}

impl EventSynthesis {
    /// Number of payload fields not inherited from an ancestor
    pub fn own_parameter_count(&self) -> usize {
        self.parameters.properties.len()
    }
}

/// Synthesize parameter interfaces and aliases for every event of `class`.
///
/// Returns nothing for classes that are not event-capable. Anomalies are
/// recorded in `log`; none of them stops the remaining events.
pub fn synthesize_events(
    class: &ClassSymbol,
    universe: &SymbolUniverse<'_>,
    config: &SynthConfig,
    mode: SynthesisMode,
    log: &mut AnomalyLog,
) -> Vec<EventSynthesis> {
    if class.events.is_empty() || !universe.is_subtype_of(class.name(), &config.event_provider) {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut synthesized = Vec::with_capacity(class.events.len());
    for event in &class.events {
        if !seen.insert(event.name.as_str()) {
            log.record(
                Anomaly::new(
                    AnomalyKind::DuplicateEvent,
                    class.name(),
                    "event declared more than once, later declaration skipped",
                )
                .for_event(&event.name),
            );
            continue;
        }
        synthesized.push(synthesize_event(class, event, universe, config, mode, log));
    }
    synthesized
}

fn synthesize_event(
    class: &ClassSymbol,
    event: &Event,
    universe: &SymbolUniverse<'_>,
    config: &SynthConfig,
    mode: SynthesisMode,
    log: &mut AnomalyLog,
) -> EventSynthesis {
    let names = EventNames::new(class.name(), &event.name);

    let mut parameters = InterfaceSymbol::new(SymbolInfo {
        basename: names.parameters_basename.clone(),
        module: class.info.module.clone(),
        library: class.info.library.clone(),
        visibility: event.visibility,
        annotations: event.annotations.clone(),
        doc: Some(format!(
            "Parameters of the {}#{} event.",
            class.info.basename, event.name
        )),
        ..SymbolInfo::new(names.parameters_fqn.clone())
    });

    let alias = TypedefSymbol {
        info: SymbolInfo {
            basename: names.alias_basename.clone(),
            module: class.info.module.clone(),
            library: class.info.library.clone(),
            visibility: event.visibility,
            annotations: event.annotations.clone(),
            doc: Some(format!(
                "Event object of the {}#{} event.",
                class.info.basename, event.name
            )),
            ..SymbolInfo::new(names.alias_fqn.clone())
        },
        ty: TypeExpr::generic(
            &config.base_event,
            vec![
                TypeExpr::reference(&names.parameters_fqn),
                TypeExpr::reference(class.name()),
            ],
        ),
    };

    if mode == SynthesisMode::Full {
        let (fields, extends) = own_fields(class, event, universe, config, log);
        parameters.extends.extend(extends);
        parameters.properties = fields.into_values().map(to_property).collect();
        tracing::debug!(
            "{}#{}: {} own parameter(s)",
            class.name(),
            event.name,
            parameters.properties.len()
        );
    }

    EventSynthesis {
        class: class.name().to_string(),
        event: event.name.clone(),
        names,
        parameters,
        alias,
    }
}

/// Walk the ancestor chain: returns the payload fields not declared by any
/// ancestor's same-named event, and the parameters interface of the nearest
/// ancestor declaring that event.
fn own_fields<'e>(
    class: &ClassSymbol,
    event: &'e Event,
    universe: &SymbolUniverse<'_>,
    config: &SynthConfig,
    log: &mut AnomalyLog,
) -> (IndexMap<&'e str, &'e Parameter>, Option<String>) {
    let mut fields: IndexMap<&str, &Parameter> = event
        .payload()
        .iter()
        .map(|p| (p.name.as_str(), p))
        .collect();
    let mut extends = None;

    let mut ancestors = universe.ancestors(class.name());
    for ancestor in ancestors.by_ref() {
        if !universe.is_subtype_of(ancestor.name(), &config.event_provider) {
            continue;
        }

        let matching: Vec<&Event> = ancestor.events_named(&event.name).collect();
        let inherited = match matching.as_slice() {
            [] => continue,
            [inherited] => *inherited,
            _ => {
                log.record(
                    Anomaly::new(
                        AnomalyKind::DuplicateAncestorEvent,
                        class.name(),
                        format!(
                            "ancestor {} declares {} events with this name, ancestor skipped",
                            ancestor.name(),
                            matching.len()
                        ),
                    )
                    .for_event(&event.name),
                );
                continue;
            }
        };

        if extends.is_none() {
            extends = Some(EventNames::new(ancestor.name(), &event.name).parameters_fqn);
        }

        for field in inherited.payload() {
            if let Some(own) = fields.shift_remove(field.name.as_str()) {
                if own.ty != field.ty {
                    // redeclared with a narrower type; the inherited field stands
                    tracing::debug!(
                        "{}#{}: parameter {} redeclared as {} (inherited {} from {})",
                        class.name(),
                        event.name,
                        field.name,
                        own.ty,
                        field.ty,
                        ancestor.name()
                    );
                }
            }
        }
    }

    if ancestors.hit_cycle() {
        log.record(
            Anomaly::new(
                AnomalyKind::InheritanceCycle,
                class.name(),
                "extends chain loops back, ancestor walk stopped",
            )
            .for_event(&event.name),
        );
    }

    (fields, extends)
}

fn to_property(param: &Parameter) -> InterfaceProperty {
    InterfaceProperty {
        name: param.name.clone(),
        ty: param.ty.clone(),
        optional: param.optional,
        annotations: param.annotations.clone(),
        doc: param.doc.clone(),
    }
}
