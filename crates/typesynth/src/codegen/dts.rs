//! TypeScript declaration (.d.ts) generator
//!
//! Prints a library's symbols, synthesized ones included, grouped into one
//! `declare namespace` block per namespace in document order.

use crate::ir::{
    Annotations, ClassSymbol, EnumSymbol, InterfaceSymbol, Library, Method, Symbol, TypedefSymbol,
    Visibility,
};
use crate::synth::settings_names;
use indexmap::IndexMap;

const INDENT: &str = "  ";

/// Generator for TypeScript declaration files
pub struct DtsGenerator<'a> {
    library: &'a Library,
}

impl<'a> DtsGenerator<'a> {
    /// Create a new declaration generator for a library
    pub fn new(library: &'a Library) -> Self {
        Self { library }
    }

    /// Generate the complete .d.ts source
    pub fn generate(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("// Type declarations for {}", self.library.name));
        if let Some(ref version) = self.library.version {
            output.push_str(&format!(" {}", version));
        }
        output.push_str("\n\n");

        for (namespace, symbols) in self.namespaces() {
            if namespace.is_empty() {
                for symbol in symbols {
                    output.push_str(&self.generate_symbol(symbol, "", "declare "));
                    output.push('\n');
                }
                continue;
            }

            output.push_str(&format!("declare namespace {} {{\n", namespace));
            for (i, symbol) in symbols.iter().enumerate() {
                if i > 0 {
                    output.push('\n');
                }
                output.push_str(&self.generate_symbol(symbol, INDENT, "export "));
            }
            output.push_str("}\n\n");
        }

        output
    }

    /// Exposed symbols grouped by namespace, in order of first appearance
    fn namespaces(&self) -> IndexMap<&'a str, Vec<&'a Symbol>> {
        let mut groups: IndexMap<&str, Vec<&Symbol>> = IndexMap::new();
        for symbol in &self.library.symbols {
            if !symbol.info().visibility.is_exposed() {
                continue;
            }
            groups.entry(symbol.info().namespace()).or_default().push(symbol);
        }
        groups
    }

    fn generate_symbol(&self, symbol: &Symbol, indent: &str, export: &str) -> String {
        match symbol {
            Symbol::Class(c) => self.generate_class(c, indent, export),
            Symbol::Interface(i) => self.generate_interface(i, indent, export),
            Symbol::TypedefAlias(t) => self.generate_type_alias(t, indent, export),
            Symbol::Enum(e) => self.generate_enum(e, indent, export),
        }
    }

    /// Generate a class with a settings constructor when one is declared
    fn generate_class(&self, class: &ClassSymbol, indent: &str, export: &str) -> String {
        let mut output = jsdoc(indent, class.info.doc.as_deref(), &class.info.annotations);

        let abstract_keyword = if class.is_abstract { "abstract " } else { "" };
        output.push_str(&format!(
            "{}{}{}class {}",
            indent, export, abstract_keyword, class.info.basename
        ));
        if let Some(ref base) = class.extends {
            output.push_str(&format!(" extends {}", base));
        }
        if !class.implements.is_empty() {
            output.push_str(&format!(" implements {}", class.implements.join(", ")));
        }
        output.push_str(" {\n");

        let member_indent = format!("{}{}", indent, INDENT);
        let (settings_fqn, _) = settings_names(class.name());
        if self.library.find(&settings_fqn).is_some() {
            output.push_str(&format!(
                "{}constructor(mSettings?: {});\n",
                member_indent, settings_fqn
            ));
        }

        for method in class.methods.iter().filter(|m| m.visibility.is_exposed()) {
            output.push_str(&generate_method(method, &member_indent, true));
        }

        output.push_str(&format!("{}}}\n", indent));
        output
    }

    /// Generate an interface with its fields and method signatures
    fn generate_interface(&self, interface: &InterfaceSymbol, indent: &str, export: &str) -> String {
        let mut output = jsdoc(indent, interface.info.doc.as_deref(), &interface.info.annotations);

        output.push_str(&format!("{}{}interface {}", indent, export, interface.info.basename));
        if !interface.extends.is_empty() {
            output.push_str(&format!(" extends {}", interface.extends.join(", ")));
        }
        output.push_str(" {\n");

        let member_indent = format!("{}{}", indent, INDENT);
        for field in &interface.properties {
            output.push_str(&jsdoc(&member_indent, field.doc.as_deref(), &field.annotations));
            output.push_str(&format!("{}{};\n", member_indent, field.to_typescript_field()));
        }
        for method in interface.methods.iter().filter(|m| m.visibility.is_exposed()) {
            output.push_str(&generate_method(method, &member_indent, false));
        }

        output.push_str(&format!("{}}}\n", indent));
        output
    }

    fn generate_type_alias(&self, alias: &TypedefSymbol, indent: &str, export: &str) -> String {
        let mut output = jsdoc(indent, alias.info.doc.as_deref(), &alias.info.annotations);
        output.push_str(&format!(
            "{}{}type {} = {};\n",
            indent,
            export,
            alias.info.basename,
            alias.ty.to_typescript()
        ));
        output
    }

    fn generate_enum(&self, e: &EnumSymbol, indent: &str, export: &str) -> String {
        let mut output = jsdoc(indent, e.info.doc.as_deref(), &e.info.annotations);
        output.push_str(&format!("{}{}enum {} {{\n", indent, export, e.info.basename));
        for value in &e.values {
            if let Some(ref doc) = value.doc {
                output.push_str(&format!("{}{}/** {} */\n", indent, INDENT, doc));
            }
            let literal = value.value.as_ref().unwrap_or(&value.name);
            output.push_str(&format!("{}{}{} = \"{}\",\n", indent, INDENT, value.name, literal));
        }
        output.push_str(&format!("{}}}\n", indent));
        output
    }
}

/// Method declaration; classes get modifiers, interfaces plain signatures
fn generate_method(method: &Method, indent: &str, with_modifiers: bool) -> String {
    let mut output = jsdoc(indent, method.doc.as_deref(), &method.annotations);

    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| p.to_typescript_param())
        .collect();
    let return_type = method
        .return_type
        .as_ref()
        .map_or_else(|| "void".to_string(), |ty| ty.to_typescript());

    let mut modifiers = String::new();
    if with_modifiers {
        if method.visibility == Visibility::Protected {
            modifiers.push_str("protected ");
        }
        if method.is_static {
            modifiers.push_str("static ");
        }
    }

    output.push_str(&format!(
        "{}{}{}({}): {};\n",
        indent,
        modifiers,
        method.name,
        params.join(", "),
        return_type
    ));
    output
}

/// JSDoc block for a doc string and its annotations, empty when there is nothing to say
fn jsdoc(indent: &str, doc: Option<&str>, annotations: &Annotations) -> String {
    let mut lines: Vec<String> = doc
        .map(|d| d.lines().map(str::to_string).collect())
        .unwrap_or_default();

    for (tag, notice) in [
        ("@deprecated", &annotations.deprecated),
        ("@experimental", &annotations.experimental),
    ] {
        let Some(notice) = notice else { continue };
        let mut line = tag.to_string();
        if let Some(ref since) = notice.since {
            line.push_str(&format!(" (since {})", since));
        }
        if let Some(ref text) = notice.text {
            line.push(' ');
            line.push_str(text);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut output = format!("{}/**\n", indent);
    for line in lines {
        output.push_str(&format!("{} * {}\n", indent, line).replace(" * \n", " *\n"));
    }
    output.push_str(&format!("{} */\n", indent));
    output
}
