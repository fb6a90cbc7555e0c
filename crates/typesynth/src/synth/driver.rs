//! Two-pass synthesis over a library and its dependencies
//!
//! Dependencies are processed first with shallow stubs so the primary
//! library's synthesized declarations can extend and reference them. The
//! primary library then gets the full treatment: members, inheritance
//! de-duplication and method retyping.

use crate::config::SynthConfig;
use crate::diagnostics::{Anomaly, AnomalyKind, AnomalyLog, SynthResult};
use crate::ir::{Library, Symbol};
use crate::synth::events::synthesize_events;
use crate::synth::retype::{plan_event_rewrites, RewriteTable};
use crate::synth::settings::synthesize_settings;
use crate::synth::{SymbolUniverse, SynthesisMode};
use std::collections::HashSet;

/// What a synthesized declaration is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesizedKind {
    Settings,
    EventParameters,
    EventAlias,
}

/// Declarations counted by kind
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KindCounts {
    pub settings_interfaces: usize,
    pub parameter_interfaces: usize,
    pub event_aliases: usize,
}

impl KindCounts {
    fn add(&mut self, kind: SynthesizedKind) {
        match kind {
            SynthesizedKind::Settings => self.settings_interfaces += 1,
            SynthesizedKind::EventParameters => self.parameter_interfaces += 1,
            SynthesizedKind::EventAlias => self.event_aliases += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.settings_interfaces + self.parameter_interfaces + self.event_aliases
    }
}

/// Output of one pass over a symbol list, not yet applied
#[derive(Debug, Default)]
pub struct SynthesisPass {
    /// Synthesized declarations, in the order they will be appended
    pub symbols: Vec<Symbol>,
    /// Kind of each entry in `symbols`
    kinds: Vec<SynthesizedKind>,
    /// Declarations synthesized so far, by kind
    pub counts: KindCounts,
    pub rewrites: RewriteTable,
    pub anomalies: AnomalyLog,
}

impl SynthesisPass {
    fn push(&mut self, kind: SynthesizedKind, symbol: impl Into<Symbol>) {
        self.symbols.push(symbol.into());
        self.kinds.push(kind);
        self.counts.add(kind);
    }
}

/// Summary of a complete run
#[derive(Debug, Default)]
pub struct SynthesisReport {
    /// Symbols appended to dependency libraries
    pub dependency_stubs: usize,
    /// Settings interfaces appended to the primary library
    pub settings_interfaces: usize,
    /// Event parameter interfaces appended to the primary library
    pub parameter_interfaces: usize,
    /// Event aliases appended to the primary library
    pub event_aliases: usize,
    pub rewrites_applied: usize,
    pub anomalies: AnomalyLog,
}

/// Synthesis engine
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Run both passes: shallow over every dependency, then full over
    /// `primary`. Libraries are validated up front; anomalies never fail
    /// the run.
    pub fn run(
        &self,
        primary: &mut Library,
        dependencies: &mut [Library],
    ) -> SynthResult<SynthesisReport> {
        primary.validate()?;
        for dependency in dependencies.iter() {
            dependency.validate()?;
        }

        let mut report = SynthesisReport::default();

        for index in 0..dependencies.len() {
            let pass = {
                let all: Vec<&[Symbol]> = dependencies.iter().map(|l| l.symbols.as_slice()).collect();
                let universe = SymbolUniverse::build(&[], &all);
                self.synthesize(&dependencies[index].symbols, &universe, SynthesisMode::Shallow)
            };
            let mut anomalies = AnomalyLog::new();
            let (appended, _) = self.commit(&mut dependencies[index], pass, &mut anomalies);
            tracing::info!(
                "{}: {} stub declaration(s) synthesized",
                dependencies[index].name,
                appended.total()
            );
            report.dependency_stubs += appended.total();
            report.anomalies.extend(anomalies);
        }

        let pass = {
            let universe = SymbolUniverse::from_libraries(primary, dependencies);
            self.synthesize(&primary.symbols, &universe, SynthesisMode::Full)
        };
        let mut anomalies = AnomalyLog::new();
        let (appended, rewrites_applied) = self.commit(primary, pass, &mut anomalies);
        report.settings_interfaces = appended.settings_interfaces;
        report.parameter_interfaces = appended.parameter_interfaces;
        report.event_aliases = appended.event_aliases;
        report.rewrites_applied = rewrites_applied;
        report.anomalies.extend(anomalies);

        tracing::info!(
            "{}: {} settings interface(s), {} parameter interface(s), {} event alias(es), {} rewrite(s); {}",
            primary.name,
            report.settings_interfaces,
            report.parameter_interfaces,
            report.event_aliases,
            report.rewrites_applied,
            report.anomalies.summary()
        );
        Ok(report)
    }

    /// Synthesize declarations for every class in `symbols`.
    ///
    /// Only reads; the returned pass is applied with `commit` once the
    /// universe has been dropped. Rewrites are planned in full mode only.
    pub fn synthesize(
        &self,
        symbols: &[Symbol],
        universe: &SymbolUniverse<'_>,
        mode: SynthesisMode,
    ) -> SynthesisPass {
        let mut pass = SynthesisPass::default();

        for class in symbols.iter().filter_map(Symbol::as_class) {
            let settings = synthesize_settings(class, universe, &self.config, mode);
            let events = synthesize_events(class, universe, &self.config, mode, &mut pass.anomalies);

            if mode == SynthesisMode::Full {
                for event in &events {
                    plan_event_rewrites(
                        class,
                        event,
                        settings.as_ref(),
                        &self.config,
                        &mut pass.rewrites,
                        &mut pass.anomalies,
                    );
                }
            }

            if let Some(settings) = settings {
                pass.push(SynthesizedKind::Settings, settings);
            }
            for event in events {
                pass.push(SynthesizedKind::EventParameters, event.parameters);
                pass.push(SynthesizedKind::EventAlias, event.alias);
            }
        }

        tracing::debug!(
            "{:?} pass: {} declaration(s), {} planned rewrite(s)",
            mode,
            pass.symbols.len(),
            pass.rewrites.len()
        );
        pass
    }

    /// Apply the pass's rewrites and append its declarations to `library`.
    ///
    /// A declaration whose name is already taken is dropped with a
    /// name-collision anomaly. Returns the appended declarations by kind and
    /// the number of rewrites applied.
    fn commit(
        &self,
        library: &mut Library,
        pass: SynthesisPass,
        anomalies: &mut AnomalyLog,
    ) -> (KindCounts, usize) {
        let SynthesisPass {
            mut symbols,
            kinds,
            rewrites,
            anomalies: recorded,
            ..
        } = pass;
        anomalies.extend(recorded);

        let applied = rewrites.apply(&mut library.symbols, &mut symbols);

        let mut taken: HashSet<String> = library.symbols.iter().map(|s| s.name().to_string()).collect();
        let mut appended = KindCounts::default();
        for (symbol, kind) in symbols.into_iter().zip(kinds) {
            if !taken.insert(symbol.name().to_string()) {
                anomalies.record(Anomaly::new(
                    AnomalyKind::NameCollision,
                    symbol.name(),
                    format!("{} already exists in {}, not appended", symbol.name(), library.name),
                ));
                continue;
            }
            appended.add(kind);
            library.symbols.push(symbol);
        }
        (appended, applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{SynthError, Severity};
    use crate::ir::{
        ClassSymbol, Event, FunctionParam, Keyword, Method, Parameter, Property, SymbolInfo,
        TypeExpr, TypedefSymbol,
    };
    use pretty_assertions::assert_eq;

    const MO: &str = "sap.ui.base.ManagedObject";
    const EP: &str = "sap.ui.base.EventProvider";

    fn core() -> Library {
        Library::new("core")
            .symbol(ClassSymbol::new(MO).extends(EP))
            .symbol(
            ClassSymbol::new("core.Control")
                .extends(MO)
                .property(Property::new("visible", TypeExpr::keyword(Keyword::Boolean)))
                .event(Event::new("press").param(Parameter::new("x", TypeExpr::string())))
                .method(
                    Method::new("attachPress")
                        .param(Parameter::new("fnFunction", TypeExpr::reference("Function"))),
                ),
            )
    }

    fn primary() -> Library {
        Library::new("lib").depends_on("core").symbol(
            ClassSymbol::new("lib.Button")
                .extends("core.Control")
                .property(Property::new("text", TypeExpr::string()))
                .event(
                    Event::new("press")
                        .param(Parameter::new("x", TypeExpr::string()))
                        .param(Parameter::new("y", TypeExpr::string())),
                )
                .event(Event::new("tap"))
                .method(
                    Method::new("attachPress")
                        .param(Parameter::new("oData", TypeExpr::object()).optional())
                        .param(Parameter::new("fnFunction", TypeExpr::reference("Function"))),
                )
                .method(
                    Method::new("firePress")
                        .param(Parameter::new("mParameters", TypeExpr::object()).optional()),
                ),
        )
    }

    fn names(library: &Library) -> Vec<&str> {
        library.symbols.iter().map(Symbol::name).collect()
    }

    #[test]
    fn test_two_pass_run() {
        let mut lib = primary();
        let mut deps = vec![core()];
        let report = Synthesizer::default().run(&mut lib, &mut deps).unwrap();

        assert_eq!(
            names(&deps[0]),
            vec![
                "sap.ui.base.ManagedObject",
                "core.Control",
                "sap.ui.base.$ManagedObjectSettings",
                "core.$ControlSettings",
                "core.Control$PressEventParameters",
                "core.Control$PressEvent",
            ]
        );
        // dependency stubs are identity-only and methods stay untouched
        let stub = deps[0].symbols[4].as_interface().unwrap();
        assert!(stub.properties.is_empty());
        assert!(stub.extends.is_empty());
        assert_eq!(
            deps[0].symbols[1].as_class().unwrap().methods[0].parameters[0].ty,
            TypeExpr::reference("Function")
        );

        assert_eq!(
            names(&lib),
            vec![
                "lib.Button",
                "lib.$ButtonSettings",
                "lib.Button$PressEventParameters",
                "lib.Button$PressEvent",
                "lib.Button$TapEventParameters",
                "lib.Button$TapEvent",
            ]
        );

        let settings = lib.symbols[1].as_interface().unwrap();
        assert_eq!(settings.extends, vec!["core.$ControlSettings"]);
        assert_eq!(settings.property_names(), vec!["text", "tap"]);

        let press = lib.symbols[2].as_interface().unwrap();
        assert_eq!(press.extends, vec!["core.Control$PressEventParameters"]);
        assert_eq!(press.property_names(), vec!["y"]);

        let button = lib.symbols[0].as_class().unwrap();
        assert_eq!(
            button.methods[0].parameters[1].ty.to_typescript(),
            "(evt: lib.Button$PressEvent) => void"
        );
        assert_eq!(
            button.methods[1].parameters[0].ty.to_typescript(),
            "lib.Button$PressEventParameters"
        );

        assert_eq!(report.dependency_stubs, 4);
        assert_eq!(report.settings_interfaces, 1);
        assert_eq!(report.parameter_interfaces, 2);
        assert_eq!(report.event_aliases, 2);
        assert_eq!(report.rewrites_applied, 2);
        // detachPress is missing; tap has no parameters and is not retyped
        let missing: Vec<&Anomaly> = report.anomalies.of_kind(AnomalyKind::MissingMethod).collect();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].message.contains("detachPress"));
        assert!(!report.anomalies.has_errors());
    }

    #[test]
    fn test_missing_fire_method_is_not_fatal() {
        let mut lib = Library::new("lib").symbol(
            ClassSymbol::new("lib.Foo")
                .extends(EP)
                .event(Event::new("click").param(Parameter::new("x", TypeExpr::string())))
                .method(
                    Method::new("attachClick")
                        .param(Parameter::new("fnFunction", TypeExpr::reference("Function"))),
                )
                .method(Method::new("detachClick").param(Parameter::new(
                    "fnFunction",
                    TypeExpr::function(vec![FunctionParam::new(
                        "oEvent",
                        TypeExpr::reference("sap.ui.base.Event"),
                    )]),
                ))),
        );
        let report = Synthesizer::default().run(&mut lib, &mut []).unwrap();

        assert!(lib.find("lib.Foo$ClickEvent").is_some());
        assert!(lib.find("lib.Foo$ClickEventParameters").is_some());
        // not instantiable
        assert_eq!(report.settings_interfaces, 0);
        assert_eq!(report.rewrites_applied, 2);
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies.count(Severity::Info), 1);
        assert!(report.anomalies.anomalies()[0].message.contains("fireClick"));
    }

    #[test]
    fn test_run_is_deterministic() {
        let run = || {
            let mut lib = primary();
            let mut deps = vec![core()];
            Synthesizer::default().run(&mut lib, &mut deps).unwrap();
            (lib.to_json_string().unwrap(), deps[0].to_json_string().unwrap())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_existing_name_is_not_overwritten() {
        let existing = TypedefSymbol {
            info: SymbolInfo::new("lib.Button$TapEvent"),
            ty: TypeExpr::string(),
        };
        let mut lib = primary().symbol(existing.clone());
        let mut deps = vec![core()];
        let report = Synthesizer::default().run(&mut lib, &mut deps).unwrap();

        let aliases: Vec<&Symbol> = lib
            .symbols
            .iter()
            .filter(|s| s.name() == "lib.Button$TapEvent")
            .collect();
        assert_eq!(aliases, vec![&Symbol::TypedefAlias(existing)]);
        assert_eq!(report.event_aliases, 1);
        assert_eq!(report.anomalies.of_kind(AnomalyKind::NameCollision).count(), 1);
    }

    #[test]
    fn test_settings_never_extend_undeclared_names() {
        let mut lib = Library::new("lib").symbol(
            ClassSymbol::new("lib.Widget")
                .extends(MO)
                .property(Property::new("text", TypeExpr::string())),
        );
        let report = Synthesizer::default().run(&mut lib, &mut []).unwrap();
        assert_eq!(report.settings_interfaces, 1);

        let declared: HashSet<&str> = lib.symbols.iter().map(Symbol::name).collect();
        for interface in lib.symbols.iter().filter_map(Symbol::as_interface) {
            for parent in &interface.extends {
                assert!(declared.contains(parent.as_str()), "{} extends {}", interface.info.name, parent);
            }
        }
        let settings = lib.find("lib.$WidgetSettings").and_then(Symbol::as_interface).unwrap();
        assert!(settings.extends.is_empty());
    }

    #[test]
    fn test_counts_follow_appended_kinds() {
        // an existing declaration takes the settings name, so only event
        // declarations are appended
        let existing = TypedefSymbol {
            info: SymbolInfo::new("lib.$ButtonSettings"),
            ty: TypeExpr::object(),
        };
        let mut lib = primary().symbol(existing);
        let mut deps = vec![core()];
        let report = Synthesizer::default().run(&mut lib, &mut deps).unwrap();

        assert_eq!(report.settings_interfaces, 0);
        assert_eq!(report.parameter_interfaces, 2);
        assert_eq!(report.event_aliases, 2);
        assert_eq!(report.dependency_stubs, 4);
        assert_eq!(report.anomalies.of_kind(AnomalyKind::NameCollision).count(), 1);
    }

    #[test]
    fn test_invalid_library_is_fatal() {
        let mut lib = primary();
        let mut deps = vec![Library::new("")];
        let err = Synthesizer::default().run(&mut lib, &mut deps).unwrap_err();
        assert!(matches!(err, SynthError::InvalidLibrary(_)));
        // nothing was synthesized
        assert_eq!(lib.symbols.len(), 1);
    }

    #[test]
    fn test_shallow_pass_plans_no_rewrites() {
        let lib = primary();
        let deps = vec![core()];
        let universe = SymbolUniverse::from_libraries(&lib, &deps);
        let synthesizer = Synthesizer::default();

        let shallow = synthesizer.synthesize(&lib.symbols, &universe, SynthesisMode::Shallow);
        assert!(shallow.rewrites.is_empty());
        assert_eq!(shallow.symbols.len(), 5);
        assert_eq!(
            shallow.counts,
            KindCounts {
                settings_interfaces: 1,
                parameter_interfaces: 2,
                event_aliases: 2,
            }
        );
        assert!(shallow.symbols.iter().all(|s| match s {
            Symbol::Interface(i) => i.properties.is_empty() && i.extends.is_empty(),
            _ => true,
        }));

        let full = synthesizer.synthesize(&lib.symbols, &universe, SynthesisMode::Full);
        assert_eq!(full.rewrites.len(), 2);
        assert_eq!(full.symbols.len(), 5);
    }

    #[test]
    fn test_mode_from_add_details() {
        assert_eq!(SynthesisMode::from_add_details(true), SynthesisMode::Full);
        assert_eq!(SynthesisMode::from_add_details(false), SynthesisMode::Shallow);
    }
}
