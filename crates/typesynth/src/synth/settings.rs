//! Settings interface synthesis
//!
//! Every instantiable class gets a `$<Class>Settings` interface describing the
//! record accepted by its constructor: one optional field per property,
//! aggregation, association and event. The interface extends the parent
//! class's settings interface and omits every field the parent chain
//! already declares.

use crate::config::SynthConfig;
use crate::ir::{
    Cardinality, ClassSymbol, FunctionParam, InterfaceProperty, InterfaceSymbol, Keyword,
    SymbolInfo, TypeExpr,
};
use crate::synth::names::settings_names;
use crate::synth::{SymbolUniverse, SynthesisMode};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Placeholder accepted wherever a binding expression string may appear
const BINDING_STRING: &str = "{${string}}";

/// Build the settings interface of `class`, or `None` if the class is not
/// instantiable.
pub fn synthesize_settings(
    class: &ClassSymbol,
    universe: &SymbolUniverse<'_>,
    config: &SynthConfig,
    mode: SynthesisMode,
) -> Option<InterfaceSymbol> {
    if !universe.is_subtype_of(class.name(), &config.managed_object) {
        return None;
    }

    let (fqn, basename) = settings_names(class.name());
    let mut settings = InterfaceSymbol::new(SymbolInfo {
        basename,
        module: class.info.module.clone(),
        library: class.info.library.clone(),
        visibility: class.info.visibility,
        annotations: class.info.annotations.clone(),
        doc: Some(format!(
            "Describes the settings that can be provided to the {} constructor.",
            class.info.basename
        )),
        ..SymbolInfo::new(fqn)
    });

    if mode == SynthesisMode::Shallow {
        return Some(settings);
    }

    let mut fields = configurable_fields(class, config);

    if let Some(parent) = instantiable_parent(class, universe, config) {
        settings.extends.push(settings_names(parent).0);
        let inherited = inherited_field_names(parent, universe, config);
        fields.retain(|name, _| {
            let keep = !inherited.contains(name.as_str());
            if !keep {
                tracing::debug!("{}: settings field {} inherited from {}", class.name(), name, parent);
            }
            keep
        });
    }

    settings.properties = fields.into_values().collect();
    tracing::debug!(
        "{}: settings interface with {} field(s)",
        class.name(),
        settings.properties.len()
    );
    Some(settings)
}

/// The parent class FQN, if the parent is a loaded instantiable class and
/// therefore has a settings interface of its own
fn instantiable_parent<'c>(
    class: &'c ClassSymbol,
    universe: &SymbolUniverse<'_>,
    config: &SynthConfig,
) -> Option<&'c str> {
    let parent = class.extends.as_deref()?;
    if universe.class(parent).is_none() {
        tracing::debug!("{}: parent {} not loaded, settings extend nothing", class.name(), parent);
        return None;
    }
    universe
        .is_subtype_of(parent, &config.managed_object)
        .then_some(parent)
}

/// Names of every field declared on the settings interfaces of `parent` and
/// its instantiable ancestors
fn inherited_field_names(
    parent: &str,
    universe: &SymbolUniverse<'_>,
    config: &SynthConfig,
) -> HashSet<String> {
    let mut names = HashSet::new();
    let chain = universe
        .class(parent)
        .into_iter()
        .chain(universe.ancestors(parent));
    for ancestor in chain {
        if !universe.is_subtype_of(ancestor.name(), &config.managed_object) {
            break;
        }
        names.extend(configurable_fields(ancestor, config).into_keys());
    }
    names
}

/// Own configurable members of a class as settings fields, keyed by name.
///
/// When two members share a name the first one wins; properties come first,
/// then aggregations, associations and events.
pub fn configurable_fields(
    class: &ClassSymbol,
    config: &SynthConfig,
) -> IndexMap<String, InterfaceProperty> {
    let mut fields: IndexMap<String, InterfaceProperty> = IndexMap::new();
    let mut add = |field: InterfaceProperty| {
        if fields.contains_key(&field.name) {
            tracing::debug!("{}: duplicate member name {}, keeping first", class.name(), field.name);
        } else {
            fields.insert(field.name.clone(), field);
        }
    };

    for property in class.properties.iter().filter(|p| p.visibility.is_exposed()) {
        add(InterfaceProperty {
            annotations: property.annotations.clone(),
            doc: property.doc.clone(),
            ..InterfaceProperty::optional(&property.name, property_type(&property.ty, config))
        });
    }

    for aggregation in class.aggregations.iter().filter(|a| a.visibility.is_exposed()) {
        add(InterfaceProperty {
            annotations: aggregation.annotations.clone(),
            doc: aggregation.doc.clone(),
            ..InterfaceProperty::optional(
                &aggregation.name,
                aggregation_type(&aggregation.ty, aggregation.cardinality, config),
            )
        });
    }

    for association in class.associations.iter().filter(|a| a.visibility.is_exposed()) {
        add(InterfaceProperty {
            annotations: association.annotations.clone(),
            doc: association.doc.clone(),
            ..InterfaceProperty::optional(
                &association.name,
                association_type(&association.ty, association.cardinality),
            )
        });
    }

    for event in class.events.iter().filter(|e| e.visibility.is_exposed()) {
        add(InterfaceProperty {
            annotations: event.annotations.clone(),
            doc: event.doc.clone(),
            ..InterfaceProperty::optional(&event.name, handler_type(config))
        });
    }

    fields
}

/// `T | PropertyBindingInfo | `{${string}}`` (no template for string properties)
fn property_type(ty: &TypeExpr, config: &SynthConfig) -> TypeExpr {
    let Some(binding) = &config.property_binding_info else {
        return ty.clone();
    };
    let mut members = vec![ty.clone(), TypeExpr::reference(binding)];
    if *ty != TypeExpr::Keyword(Keyword::String) {
        members.push(TypeExpr::template(BINDING_STRING));
    }
    TypeExpr::union(members)
}

/// `T[] | T | AggregationBindingInfo | `{${string}}`` for multiple, `T` for single
fn aggregation_type(ty: &TypeExpr, cardinality: Cardinality, config: &SynthConfig) -> TypeExpr {
    match cardinality {
        Cardinality::ZeroOrOne => ty.clone(),
        Cardinality::ZeroOrMore => {
            let mut members = vec![TypeExpr::array(ty.clone()), ty.clone()];
            if let Some(binding) = &config.aggregation_binding_info {
                members.push(TypeExpr::reference(binding));
                members.push(TypeExpr::template(BINDING_STRING));
            }
            TypeExpr::union(members)
        }
    }
}

/// Associations accept the object or its ID
fn association_type(ty: &TypeExpr, cardinality: Cardinality) -> TypeExpr {
    let single = TypeExpr::union(vec![ty.clone(), TypeExpr::string()]);
    match cardinality {
        Cardinality::ZeroOrOne => single,
        Cardinality::ZeroOrMore => TypeExpr::array(single),
    }
}

/// `(oEvent: Event) => void`
fn handler_type(config: &SynthConfig) -> TypeExpr {
    TypeExpr::function(vec![FunctionParam::new(
        &config.handler_parameter_name,
        TypeExpr::reference(&config.base_event),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Aggregation, Association, Event, Notice, Property, Symbol};
    use pretty_assertions::assert_eq;

    const MO: &str = "sap.ui.base.ManagedObject";

    fn universe_of(symbols: &[Symbol]) -> SymbolUniverse<'_> {
        SymbolUniverse::build(symbols, &[])
    }

    fn names(settings: &InterfaceSymbol) -> Vec<&str> {
        settings.property_names()
    }

    #[test]
    fn test_non_instantiable_class_has_no_settings() {
        let symbols: Vec<Symbol> = vec![ClassSymbol::new("lib.Helper").into()];
        let universe = universe_of(&symbols);
        let class = symbols[0].as_class().unwrap();
        let config = SynthConfig::default();
        assert!(synthesize_settings(class, &universe, &config, SynthesisMode::Full).is_none());
    }

    #[test]
    fn test_collects_every_member_kind() {
        let symbols: Vec<Symbol> = vec![ClassSymbol::new("lib.Widget")
            .extends(MO)
            .property(Property::new("text", TypeExpr::string()))
            .property(Property::new("enabled", TypeExpr::keyword(Keyword::Boolean)))
            .aggregation(Aggregation::new(
                "items",
                TypeExpr::reference("lib.Item"),
                Cardinality::ZeroOrMore,
            ))
            .aggregation(Aggregation::new(
                "header",
                TypeExpr::reference("lib.Item"),
                Cardinality::ZeroOrOne,
            ))
            .association(Association::new(
                "label",
                TypeExpr::reference("lib.Label"),
                Cardinality::ZeroOrOne,
            ))
            .event(Event::new("press"))
            .into()];
        let universe = universe_of(&symbols);
        let class = symbols[0].as_class().unwrap();
        let config = SynthConfig::default();

        let settings = synthesize_settings(class, &universe, &config, SynthesisMode::Full).unwrap();
        assert_eq!(settings.info.name, "lib.$WidgetSettings");
        assert_eq!(settings.info.basename, "$WidgetSettings");
        assert_eq!(
            names(&settings),
            vec!["text", "enabled", "items", "header", "label", "press"]
        );
        assert!(settings.properties.iter().all(|p| p.optional));

        let ty = |name: &str| settings.property(name).unwrap().ty.to_typescript();
        assert_eq!(ty("text"), "string | sap.ui.base.ManagedObject.PropertyBindingInfo");
        assert_eq!(
            ty("enabled"),
            "boolean | sap.ui.base.ManagedObject.PropertyBindingInfo | `{${string}}`"
        );
        assert_eq!(
            ty("items"),
            "lib.Item[] | lib.Item | sap.ui.base.ManagedObject.AggregationBindingInfo | `{${string}}`"
        );
        assert_eq!(ty("header"), "lib.Item");
        assert_eq!(ty("label"), "lib.Label | string");
        assert_eq!(ty("press"), "(oEvent: sap.ui.base.Event) => void");

        // the root is not loaded, so there is no settings interface to extend
        assert!(settings.extends.is_empty());
    }

    #[test]
    fn test_extends_loaded_root_settings() {
        let symbols: Vec<Symbol> = vec![
            ClassSymbol::new(MO)
                .property(Property::new("id", TypeExpr::string()))
                .into(),
            ClassSymbol::new("lib.Widget")
                .extends(MO)
                .property(Property::new("id", TypeExpr::string()))
                .property(Property::new("text", TypeExpr::string()))
                .into(),
        ];
        let universe = universe_of(&symbols);
        let widget = symbols[1].as_class().unwrap();
        let config = SynthConfig::default();

        let settings = synthesize_settings(widget, &universe, &config, SynthesisMode::Full).unwrap();
        assert_eq!(
            settings.extends,
            vec!["sap.ui.base.$ManagedObjectSettings".to_string()]
        );
        assert_eq!(names(&settings), vec!["text"]);
    }

    #[test]
    fn test_extends_parent_and_removes_inherited_names() {
        let symbols: Vec<Symbol> = vec![
            ClassSymbol::new("lib.Base")
                .extends(MO)
                .property(Property::new("visible", TypeExpr::keyword(Keyword::Boolean)))
                .into(),
            ClassSymbol::new("lib.Mid")
                .extends("lib.Base")
                .property(Property::new("width", TypeExpr::string()))
                .into(),
            ClassSymbol::new("lib.Leaf")
                .extends("lib.Mid")
                // redeclared with another type: removed by name regardless
                .property(Property::new("visible", TypeExpr::string()))
                .property(Property::new("width", TypeExpr::string()))
                .property(Property::new("icon", TypeExpr::string()))
                .into(),
        ];
        let universe = universe_of(&symbols);
        let leaf = symbols[2].as_class().unwrap();
        let config = SynthConfig::default();

        let settings = synthesize_settings(leaf, &universe, &config, SynthesisMode::Full).unwrap();
        assert_eq!(settings.extends, vec!["lib.$MidSettings".to_string()]);
        assert_eq!(names(&settings), vec!["icon"]);
    }

    #[test]
    fn test_shallow_pass_is_identity_only() {
        let symbols: Vec<Symbol> = vec![
            ClassSymbol::new("lib.Base").extends(MO).into(),
            ClassSymbol::new("lib.Leaf")
                .extends("lib.Base")
                .property(Property::new("icon", TypeExpr::string()))
                .deprecated(Notice::new("gone"))
                .into(),
        ];
        let universe = universe_of(&symbols);
        let leaf = symbols[1].as_class().unwrap();
        let config = SynthConfig::default();

        let settings =
            synthesize_settings(leaf, &universe, &config, SynthesisMode::Shallow).unwrap();
        assert_eq!(settings.info.name, "lib.$LeafSettings");
        assert!(settings.properties.is_empty());
        assert!(settings.extends.is_empty());
        assert_eq!(settings.info.annotations.deprecated, Some(Notice::new("gone")));
    }

    #[test]
    fn test_hidden_members_and_duplicate_names() {
        let mut hidden = Property::new("secret", TypeExpr::string());
        hidden.visibility = crate::ir::Visibility::Hidden;
        let symbols: Vec<Symbol> = vec![ClassSymbol::new("lib.Widget")
            .extends(MO)
            .property(hidden)
            .property(Property::new("select", TypeExpr::string()))
            .event(Event::new("select"))
            .into()];
        let universe = universe_of(&symbols);
        let class = symbols[0].as_class().unwrap();
        let config = SynthConfig::default();

        let settings = synthesize_settings(class, &universe, &config, SynthesisMode::Full).unwrap();
        assert_eq!(names(&settings), vec!["select"]);
        assert!(!settings
            .property("select")
            .unwrap()
            .ty
            .is_single_param_function_of(&config.base_event));
    }

    #[test]
    fn test_without_binding_info() {
        let config = SynthConfig {
            property_binding_info: None,
            aggregation_binding_info: None,
            ..SynthConfig::default()
        };
        let ty = TypeExpr::reference("lib.Item");
        assert_eq!(property_type(&ty, &config), ty);
        assert_eq!(
            aggregation_type(&ty, Cardinality::ZeroOrMore, &config).to_typescript(),
            "lib.Item[] | lib.Item"
        );
        assert_eq!(
            association_type(&ty, Cardinality::ZeroOrMore).to_typescript(),
            "(lib.Item | string)[]"
        );
    }
}
