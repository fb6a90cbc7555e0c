//! Symbol metadata for classes, interfaces, typedefs and enums
//!
//! This module provides the symbol graph the synthesis engine walks. Every
//! symbol is identified by its fully-qualified name (FQN), e.g.
//! `sap.m.Button`; members reference other symbols by FQN only.

use crate::ir::TypeExpr;
use serde::{Deserialize, Serialize};

/// Visibility of a symbol or member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    /// Visible to a restricted set of consumers only
    Restricted,
    Private,
    /// Present in the metadata but never exposed
    Hidden,
}

impl Visibility {
    /// Whether members with this visibility belong in generated declarations
    pub fn is_exposed(&self) -> bool {
        matches!(
            self,
            Visibility::Public | Visibility::Protected | Visibility::Restricted
        )
    }
}

/// A deprecation or experimental notice
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Version since which the notice applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Notice {
    /// Create a notice with an explanation
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            since: None,
            text: Some(text.into()),
        }
    }

    /// Set the version
    pub fn since(mut self, version: impl Into<String>) -> Self {
        self.since = Some(version.into());
        self
    }
}

/// Optional deprecation and experimental annotations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Notice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<Notice>,
}

impl Annotations {
    /// Check if neither annotation is present
    pub fn is_empty(&self) -> bool {
        self.deprecated.is_none() && self.experimental.is_none()
    }
}

/// Identity fields shared by every symbol kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Fully-qualified name
    pub name: String,
    /// Short name (last FQN segment)
    pub basename: String,
    /// Declaring module (e.g., "sap/m/Button")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Declaring library (e.g., "sap.m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(flatten)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl SymbolInfo {
    /// Create identity fields from an FQN, deriving the basename
    pub fn new(fqn: impl Into<String>) -> Self {
        let name = fqn.into();
        let basename = basename_of(&name).to_string();
        Self {
            name,
            basename,
            module: None,
            library: None,
            visibility: Visibility::Public,
            annotations: Annotations::default(),
            doc: None,
        }
    }

    /// Namespace part of the FQN (empty for top-level names)
    pub fn namespace(&self) -> &str {
        namespace_of(&self.name)
    }
}

/// Cardinality of an aggregation or association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cardinality {
    #[serde(rename = "0..1")]
    ZeroOrOne,
    #[default]
    #[serde(rename = "0..n")]
    ZeroOrMore,
}

/// A simple configurable property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(flatten)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
            annotations: Annotations::default(),
            doc: None,
        }
    }
}

/// A child-object slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub name: String,
    /// Type of a single child
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(flatten)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Aggregation {
    pub fn new(name: impl Into<String>, ty: TypeExpr, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            ty,
            cardinality,
            visibility: Visibility::Public,
            annotations: Annotations::default(),
            doc: None,
        }
    }
}

/// A reference to another object by name (ID)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub name: String,
    /// Type of the referenced object
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(flatten)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Association {
    pub fn new(name: impl Into<String>, ty: TypeExpr, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            ty,
            cardinality,
            visibility: Visibility::Public,
            annotations: Annotations::default(),
            doc: None,
        }
    }
}

/// A method or event parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
    #[serde(flatten)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Nested fields when this parameter is a structured wrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Parameter>>,
}

impl Parameter {
    /// Create a new required parameter
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            annotations: Annotations::default(),
            doc: None,
            properties: None,
        }
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark as deprecated
    pub fn deprecated(mut self, notice: Notice) -> Self {
        self.annotations.deprecated = Some(notice);
        self
    }

    /// Turn into a structured wrapper holding `fields`
    pub fn with_properties(mut self, fields: Vec<Parameter>) -> Self {
        self.properties = Some(fields);
        self
    }

    /// Get TypeScript parameter declaration
    pub fn to_typescript_param(&self) -> String {
        let optional = if self.optional { "?" } else { "" };
        format!("{}{}: {}", self.name, optional, self.ty.to_typescript())
    }
}

/// An event declared by a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(flatten)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            visibility: Visibility::Public,
            annotations: Annotations::default(),
            doc: None,
        }
    }

    /// Add a payload parameter
    pub fn param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Mark as deprecated
    pub fn deprecated(mut self, notice: Notice) -> Self {
        self.annotations.deprecated = Some(notice);
        self
    }

    /// Mark as experimental
    pub fn experimental(mut self, notice: Notice) -> Self {
        self.annotations.experimental = Some(notice);
        self
    }

    /// The payload fields delivered to listeners.
    ///
    /// A single structured parameter is a wrapper level; its own fields are
    /// the payload.
    pub fn payload(&self) -> &[Parameter] {
        match self.parameters.as_slice() {
            [wrapper] => match &wrapper.properties {
                Some(fields) => fields,
                None => &self.parameters,
            },
            _ => &self.parameters,
        }
    }
}

/// A method declared by a class or interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeExpr>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            visibility: Visibility::Public,
            is_static: false,
            annotations: Annotations::default(),
            doc: None,
        }
    }

    /// Add a parameter
    pub fn param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Set return type
    pub fn returns(mut self, ty: TypeExpr) -> Self {
        self.return_type = Some(ty);
        self
    }
}

/// A class: the only symbol kind that declares events and configurable members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSymbol {
    #[serde(flatten)]
    pub info: SymbolInfo,
    /// FQN of the single base class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// FQNs of implemented interfaces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
    #[serde(default)]
    pub associations: Vec<Association>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl ClassSymbol {
    pub fn new(fqn: impl Into<String>) -> Self {
        Self {
            info: SymbolInfo::new(fqn),
            extends: None,
            implements: Vec::new(),
            is_abstract: false,
            properties: Vec::new(),
            aggregations: Vec::new(),
            associations: Vec::new(),
            events: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set the base class
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    pub fn association(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }

    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Mark as deprecated
    pub fn deprecated(mut self, notice: Notice) -> Self {
        self.info.annotations.deprecated = Some(notice);
        self
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Events declared with exactly this name
    pub fn events_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.name == name)
    }

    /// Indices of methods (overloads included) declared with exactly this name
    pub fn method_indices(&self, name: &str) -> Vec<usize> {
        self.methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.name == name)
            .map(|(i, _)| i)
            .collect()
    }
}

/// A property of an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
    #[serde(flatten)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl InterfaceProperty {
    /// Create an optional property
    pub fn optional(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
            annotations: Annotations::default(),
            doc: None,
        }
    }

    /// Get TypeScript field declaration
    pub fn to_typescript_field(&self) -> String {
        let optional = if self.optional { "?" } else { "" };
        format!("{}{}: {}", self.name, optional, self.ty.to_typescript())
    }
}

/// An interface: record types, including every synthesized record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceSymbol {
    #[serde(flatten)]
    pub info: SymbolInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    #[serde(default)]
    pub properties: Vec<InterfaceProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<Method>,
}

impl InterfaceSymbol {
    pub fn new(info: SymbolInfo) -> Self {
        Self {
            info,
            extends: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&InterfaceProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut InterfaceProperty> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }
}

/// A named type alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedefSymbol {
    #[serde(flatten)]
    pub info: SymbolInfo,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

/// Enum value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// An enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumSymbol {
    #[serde(flatten)]
    pub info: SymbolInfo,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

/// Any symbol of the metadata graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Symbol {
    Class(ClassSymbol),
    Interface(InterfaceSymbol),
    #[serde(rename = "typedef")]
    TypedefAlias(TypedefSymbol),
    Enum(EnumSymbol),
}

impl Symbol {
    /// Identity fields
    pub fn info(&self) -> &SymbolInfo {
        match self {
            Symbol::Class(c) => &c.info,
            Symbol::Interface(i) => &i.info,
            Symbol::TypedefAlias(t) => &t.info,
            Symbol::Enum(e) => &e.info,
        }
    }

    /// FQN
    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// Display name of the variant
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Class(_) => "class",
            Symbol::Interface(_) => "interface",
            Symbol::TypedefAlias(_) => "typedef",
            Symbol::Enum(_) => "enum",
        }
    }

    pub fn as_class(&self) -> Option<&ClassSymbol> {
        match self {
            Symbol::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassSymbol> {
        match self {
            Symbol::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceSymbol> {
        match self {
            Symbol::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_interface_mut(&mut self) -> Option<&mut InterfaceSymbol> {
        match self {
            Symbol::Interface(i) => Some(i),
            _ => None,
        }
    }
}

impl From<ClassSymbol> for Symbol {
    fn from(class: ClassSymbol) -> Self {
        Symbol::Class(class)
    }
}

impl From<InterfaceSymbol> for Symbol {
    fn from(interface: InterfaceSymbol) -> Self {
        Symbol::Interface(interface)
    }
}

impl From<TypedefSymbol> for Symbol {
    fn from(typedef: TypedefSymbol) -> Self {
        Symbol::TypedefAlias(typedef)
    }
}

// Helper functions

/// Last segment of a dotted name (`sap.m.Button` -> `Button`)
pub fn basename_of(fqn: &str) -> &str {
    fqn.rsplit_once('.').map_or(fqn, |(_, base)| base)
}

/// Everything before the last segment (`sap.m.Button` -> `sap.m`)
pub fn namespace_of(fqn: &str) -> &str {
    fqn.rsplit_once('.').map_or("", |(ns, _)| ns)
}
