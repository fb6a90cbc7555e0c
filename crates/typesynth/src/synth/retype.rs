//! Event method retyping
//!
//! Once an event has a parameters interface and an alias, the generic
//! placeholders in its `attach<Event>`, `detach<Event>` and `fire<Event>`
//! methods and in the settings handler slot are replaced with references to
//! them. Rewrites are planned into a `RewriteTable` first and applied in a
//! separate step, so no symbol is modified while the symbol list is walked.

use crate::config::SynthConfig;
use crate::diagnostics::{Anomaly, AnomalyKind, AnomalyLog};
use crate::ir::{ClassSymbol, FunctionParam, InterfaceSymbol, Method, Symbol, TypeExpr};
use crate::synth::events::EventSynthesis;
use crate::synth::names::EventMethodNames;

/// Location of a type to rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteTarget {
    /// Parameter `parameter` of method `method` on class `class`
    MethodParameter {
        class: String,
        method: usize,
        parameter: usize,
    },
    /// Field `field` of the synthesized settings interface `settings`
    SettingsField { settings: String, field: String },
}

/// One planned type replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub target: RewriteTarget,
    pub new_type: TypeExpr,
}

/// Side table of planned rewrites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteTable {
    rewrites: Vec<Rewrite>,
}

impl RewriteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: RewriteTarget, new_type: TypeExpr) {
        self.rewrites.push(Rewrite { target, new_type });
    }

    pub fn len(&self) -> usize {
        self.rewrites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rewrite> {
        self.rewrites.iter()
    }

    /// Apply every rewrite. Method targets are looked up in `existing`,
    /// settings targets in `synthesized`. Returns the number applied.
    pub fn apply(self, existing: &mut [Symbol], synthesized: &mut [Symbol]) -> usize {
        let mut applied = 0;
        for rewrite in self.rewrites {
            let slot = match &rewrite.target {
                RewriteTarget::MethodParameter {
                    class,
                    method,
                    parameter,
                } => existing
                    .iter_mut()
                    .find(|s| s.name() == class)
                    .and_then(Symbol::as_class_mut)
                    .and_then(|c| c.methods.get_mut(*method))
                    .and_then(|m| m.parameters.get_mut(*parameter))
                    .map(|p| &mut p.ty),
                RewriteTarget::SettingsField { settings, field } => synthesized
                    .iter_mut()
                    .find(|s| s.name() == settings)
                    .and_then(Symbol::as_interface_mut)
                    .and_then(|i| i.property_mut(field))
                    .map(|p| &mut p.ty),
            };
            match slot {
                Some(ty) => {
                    *ty = rewrite.new_type;
                    applied += 1;
                }
                None => tracing::warn!("rewrite target vanished: {:?}", rewrite.target),
            }
        }
        applied
    }
}

/// Plan the rewrites for one synthesized event.
///
/// Nothing is planned for events without own parameters. Missing methods
/// and unexpected shapes are recorded in `log` and skipped.
pub fn plan_event_rewrites(
    class: &ClassSymbol,
    synthesis: &EventSynthesis,
    settings: Option<&InterfaceSymbol>,
    config: &SynthConfig,
    table: &mut RewriteTable,
    log: &mut AnomalyLog,
) {
    if synthesis.own_parameter_count() == 0 {
        return;
    }

    let planner = Planner {
        class,
        synthesis,
        config,
    };
    let methods = EventMethodNames::new(config, &synthesis.event);

    planner.plan_listener_methods(&methods.subscribe, table, log);
    planner.plan_listener_methods(&methods.unsubscribe, table, log);
    planner.plan_emit_methods(&methods.emit, table, log);
    if let Some(settings) = settings {
        planner.plan_settings_field(settings, table, log);
    }
}

struct Planner<'p> {
    class: &'p ClassSymbol,
    synthesis: &'p EventSynthesis,
    config: &'p SynthConfig,
}

impl Planner<'_> {
    fn anomaly(&self, kind: AnomalyKind, message: String) -> Anomaly {
        Anomaly::new(kind, self.class.name(), message).for_event(&self.synthesis.event)
    }

    fn alias(&self) -> TypeExpr {
        TypeExpr::reference(&self.synthesis.names.alias_fqn)
    }

    /// Every overload of `name`, or a missing-method anomaly
    fn overloads(&self, name: &str, log: &mut AnomalyLog) -> Vec<(usize, &Method)> {
        let found: Vec<(usize, &Method)> = self
            .class
            .method_indices(name)
            .into_iter()
            .map(|i| (i, &self.class.methods[i]))
            .collect();
        if found.is_empty() {
            log.record(self.anomaly(AnomalyKind::MissingMethod, format!("no method {}", name)));
        }
        found
    }

    fn method_target(&self, method: usize, parameter: usize) -> RewriteTarget {
        RewriteTarget::MethodParameter {
            class: self.class.name().to_string(),
            method,
            parameter,
        }
    }

    fn plan_listener_methods(&self, name: &str, table: &mut RewriteTable, log: &mut AnomalyLog) {
        for (index, method) in self.overloads(name, log) {
            let callback = method
                .parameters
                .iter()
                .position(|p| p.ty.is_callable(&self.config.callable_placeholder));
            let Some(position) = callback else {
                log.record(self.anomaly(
                    AnomalyKind::UnexpectedParameterShape,
                    format!("{} has no callback parameter", name),
                ));
                continue;
            };

            let ty = &method.parameters[position].ty;
            let new_type = if ty.is_reference_to(&self.config.callable_placeholder) {
                TypeExpr::function(vec![FunctionParam::new(
                    &self.config.listener_parameter_name,
                    self.alias(),
                )])
            } else if ty.is_single_param_function_of(&self.config.base_event) {
                self.with_alias_param(ty)
            } else {
                log.record(self.anomaly(
                    AnomalyKind::UnexpectedParameterShape,
                    format!(
                        "{} callback parameter {} has unexpected type {}",
                        name, method.parameters[position].name, ty
                    ),
                ));
                continue;
            };
            table.push(self.method_target(index, position), new_type);
        }
    }

    fn plan_emit_methods(&self, name: &str, table: &mut RewriteTable, log: &mut AnomalyLog) {
        for (index, method) in self.overloads(name, log) {
            match method.parameters.first() {
                Some(first)
                    if self.config.is_emit_parameter_name(&first.name)
                        && first.ty.is_object_keyword() =>
                {
                    table.push(
                        self.method_target(index, 0),
                        TypeExpr::reference(&self.synthesis.names.parameters_fqn),
                    );
                }
                Some(first) => log.record(self.anomaly(
                    AnomalyKind::UnexpectedParameterShape,
                    format!(
                        "{} first parameter is {}: {}, expected an untyped parameter record",
                        name, first.name, first.ty
                    ),
                )),
                None => log.record(self.anomaly(
                    AnomalyKind::UnexpectedParameterShape,
                    format!("{} takes no parameters", name),
                )),
            }
        }
    }

    fn plan_settings_field(
        &self,
        settings: &InterfaceSymbol,
        table: &mut RewriteTable,
        log: &mut AnomalyLog,
    ) {
        let Some(field) = settings.property(&self.synthesis.event) else {
            return;
        };
        if field.ty.is_single_param_function_of(&self.config.base_event) {
            table.push(
                RewriteTarget::SettingsField {
                    settings: settings.info.name.clone(),
                    field: field.name.clone(),
                },
                self.with_alias_param(&field.ty),
            );
        } else {
            log.record(self.anomaly(
                AnomalyKind::SettingsFieldCollision,
                format!(
                    "settings field {} of {} is not an event handler ({}), left untouched",
                    field.name, settings.info.name, field.ty
                ),
            ));
        }
    }

    /// Copy of a single-parameter function type with the parameter typed as the alias
    fn with_alias_param(&self, ty: &TypeExpr) -> TypeExpr {
        let mut ty = ty.clone();
        if let Some(param) = ty.as_function_mut().and_then(|f| f.single_param_mut()) {
            param.ty = self.alias();
        }
        ty
    }
}
