//! Structural type expressions
//!
//! This module provides `TypeExpr`, the structural type representation used
//! for every typed member of the metadata: properties, aggregations,
//! associations, method and event parameters, and the bodies of type aliases.
//!
//! # Shapes
//!
//! | Variant | TypeScript | Notes |
//! |---------|------------|-------|
//! | `Keyword(Keyword::String)` | `string` | Built-in keyword types |
//! | `Keyword(Keyword::Object)` | `object` | Untyped record placeholder |
//! | `Reference { name, args }` | `sap.m.Button`, `Event<P, C>` | Named types, generic arguments |
//! | `Reference { name: "Function" }` | `Function` | Untyped callable placeholder |
//! | `Function(..)` | `(oEvent: Event) => void` | Callables with typed parameters |
//! | `Union(..)` | `A \| B` | Unions |
//! | `Array(..)` | `T[]` | Arrays |
//! | `Literal(..)` | `"value"` | String literal types |
//! | `Template(..)` | `` `{${string}}` `` | Template literal types |
//!
//! The synthesis engine never infers types; it only recognizes a handful of
//! placeholder shapes and replaces them with references to synthesized
//! declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Keyword {
    Any,
    Unknown,
    String,
    Number,
    Boolean,
    Void,
    Object,
    Null,
    Undefined,
    Never,
}

impl Keyword {
    /// Convert to TypeScript type string
    pub fn to_typescript(&self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::Object => "object",
            Keyword::Null => "null",
            Keyword::Undefined => "undefined",
            Keyword::Never => "never",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_typescript())
    }
}

/// A parameter of a function type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionParam {
    /// Parameter name
    pub name: String,
    /// Parameter type
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    /// Whether the parameter may be omitted
    #[serde(default)]
    pub optional: bool,
}

impl FunctionParam {
    /// Create a new required parameter
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// Get TypeScript parameter declaration
    pub fn to_typescript(&self) -> String {
        let optional = if self.optional { "?" } else { "" };
        format!("{}{}: {}", self.name, optional, self.ty.to_typescript())
    }
}

/// A callable shape with typed parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionType {
    /// Ordered parameters
    #[serde(default)]
    pub params: Vec<FunctionParam>,
    /// Return type, `void` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeExpr>,
}

impl FunctionType {
    /// Get the single parameter, if the function takes exactly one
    pub fn single_param(&self) -> Option<&FunctionParam> {
        match self.params.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Mutable variant of [`FunctionType::single_param`]
    pub fn single_param_mut(&mut self) -> Option<&mut FunctionParam> {
        match self.params.as_mut_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Structural type expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeExpr {
    /// Built-in keyword type
    Keyword(Keyword),

    /// Named type, optionally with generic arguments
    Reference {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeExpr>,
    },

    /// Function type
    Function(Box<FunctionType>),

    /// Union of types
    Union(Vec<TypeExpr>),

    /// Array of a type
    Array(Box<TypeExpr>),

    /// String literal type
    Literal(String),

    /// Template literal type (body without backticks)
    Template(String),
}

impl Default for TypeExpr {
    fn default() -> Self {
        TypeExpr::Keyword(Keyword::Any)
    }
}

impl TypeExpr {
    /// Convert to TypeScript type string
    pub fn to_typescript(&self) -> String {
        match self {
            TypeExpr::Keyword(k) => k.to_typescript().to_string(),

            TypeExpr::Reference { name, args } => {
                if args.is_empty() {
                    name.clone()
                } else {
                    let args: Vec<String> = args.iter().map(|t| t.to_typescript()).collect();
                    format!("{}<{}>", name, args.join(", "))
                }
            }

            TypeExpr::Function(func) => {
                let params: Vec<String> = func.params.iter().map(|p| p.to_typescript()).collect();
                let ret = func
                    .return_type
                    .as_ref()
                    .map(|t| t.to_typescript())
                    .unwrap_or_else(|| "void".to_string());
                format!("({}) => {}", params.join(", "), ret)
            }

            TypeExpr::Union(members) => {
                let members: Vec<String> = members
                    .iter()
                    .map(|t| t.to_typescript_with_parens())
                    .collect();
                members.join(" | ")
            }

            TypeExpr::Array(inner) => format!("{}[]", inner.to_typescript_with_parens()),

            TypeExpr::Literal(value) => format!("\"{}\"", value),

            TypeExpr::Template(body) => format!("`{}`", body),
        }
    }

    /// Convert to TypeScript with parentheses if needed (array elements, union members)
    fn to_typescript_with_parens(&self) -> String {
        match self {
            TypeExpr::Function(_) | TypeExpr::Union(_) => format!("({})", self.to_typescript()),
            _ => self.to_typescript(),
        }
    }

    /// Check if this is a plain (non-generic) reference to `name`
    pub fn is_reference_to(&self, name: &str) -> bool {
        matches!(self, TypeExpr::Reference { name: n, args } if n == name && args.is_empty())
    }

    /// Check if this is the untyped record placeholder
    pub fn is_object_keyword(&self) -> bool {
        matches!(self, TypeExpr::Keyword(Keyword::Object))
    }

    /// Check if this type can be called: a function type or the named callable placeholder
    pub fn is_callable(&self, callable_placeholder: &str) -> bool {
        matches!(self, TypeExpr::Function(_)) || self.is_reference_to(callable_placeholder)
    }

    /// Borrow the function type, if this is one
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            TypeExpr::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Mutably borrow the function type, if this is one
    pub fn as_function_mut(&mut self) -> Option<&mut FunctionType> {
        match self {
            TypeExpr::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Check if this is a function with exactly one parameter typed as `name`
    pub fn is_single_param_function_of(&self, name: &str) -> bool {
        self.as_function()
            .and_then(FunctionType::single_param)
            .is_some_and(|p| p.ty.is_reference_to(name))
    }

    /// Create a keyword type
    pub fn keyword(keyword: Keyword) -> Self {
        TypeExpr::Keyword(keyword)
    }

    /// Create a string type
    pub fn string() -> Self {
        TypeExpr::Keyword(Keyword::String)
    }

    /// Create a void type
    pub fn void() -> Self {
        TypeExpr::Keyword(Keyword::Void)
    }

    /// Create the untyped record type
    pub fn object() -> Self {
        TypeExpr::Keyword(Keyword::Object)
    }

    /// Create a reference to a named type
    pub fn reference(name: impl Into<String>) -> Self {
        TypeExpr::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Create a reference to a generic type
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Reference {
            name: name.into(),
            args,
        }
    }

    /// Create a function type returning `void`
    pub fn function(params: Vec<FunctionParam>) -> Self {
        TypeExpr::Function(Box::new(FunctionType {
            params,
            return_type: Some(TypeExpr::void()),
        }))
    }

    /// Create a union type; a single member collapses to itself
    pub fn union(mut members: Vec<TypeExpr>) -> Self {
        if members.len() == 1 {
            members.remove(0)
        } else {
            TypeExpr::Union(members)
        }
    }

    /// Create an array type
    pub fn array(inner: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(inner))
    }

    /// Create a template literal type
    pub fn template(body: impl Into<String>) -> Self {
        TypeExpr::Template(body.into())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_typescript())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_typescript() {
        assert_eq!(Keyword::String.to_typescript(), "string");
        assert_eq!(Keyword::Object.to_typescript(), "object");
    }

    #[test]
    fn test_composite_types() {
        let generic = TypeExpr::generic(
            "sap.ui.base.Event",
            vec![
                TypeExpr::reference("Button$PressEventParameters"),
                TypeExpr::reference("Button"),
            ],
        );
        assert_eq!(
            generic.to_typescript(),
            "sap.ui.base.Event<Button$PressEventParameters, Button>"
        );

        let func = TypeExpr::function(vec![FunctionParam::new(
            "oEvent",
            TypeExpr::reference("sap.ui.base.Event"),
        )]);
        assert_eq!(func.to_typescript(), "(oEvent: sap.ui.base.Event) => void");

        let union = TypeExpr::union(vec![func.clone(), TypeExpr::string()]);
        assert_eq!(
            union.to_typescript(),
            "((oEvent: sap.ui.base.Event) => void) | string"
        );

        let array = TypeExpr::array(TypeExpr::union(vec![
            TypeExpr::reference("sap.ui.core.Control"),
            TypeExpr::string(),
        ]));
        assert_eq!(array.to_typescript(), "(sap.ui.core.Control | string)[]");

        assert_eq!(TypeExpr::template("{${string}}").to_typescript(), "`{${string}}`");
    }

    #[test]
    fn test_shape_queries() {
        let placeholder = TypeExpr::reference("Function");
        assert!(placeholder.is_callable("Function"));
        assert!(!TypeExpr::object().is_callable("Function"));
        assert!(TypeExpr::object().is_object_keyword());

        let handler = TypeExpr::function(vec![FunctionParam::new(
            "oEvent",
            TypeExpr::reference("sap.ui.base.Event"),
        )]);
        assert!(handler.is_single_param_function_of("sap.ui.base.Event"));
        assert!(!handler.is_single_param_function_of("sap.ui.base.Object"));
        assert!(!TypeExpr::union(vec![TypeExpr::string()]).is_single_param_function_of("x"));
    }

    #[test]
    fn test_json_shape() {
        let ty: TypeExpr =
            serde_json::from_str(r#"{"reference":{"name":"sap.m.Button"}}"#).unwrap();
        assert!(ty.is_reference_to("sap.m.Button"));

        let ty: TypeExpr = serde_json::from_str(r#"{"keyword":"object"}"#).unwrap();
        assert!(ty.is_object_keyword());
    }
}
