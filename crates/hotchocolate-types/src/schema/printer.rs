//! SDL rendering of a completed schema.

use std::fmt::Write;

use indexmap::IndexMap;

use crate::language::DirectiveNode;

use super::Schema;
use super::named_type::{Argument, NamedType};

/// Scalars every GraphQL server provides; they are never printed.
const SPEC_SCALARS: [&str; 5] = ["String", "Boolean", "Int", "Float", "ID"];

pub(crate) fn print_schema(schema: &Schema) -> String {
    let mut blocks = Vec::new();

    let custom_roots = schema.query_type_name() != "Query"
        || schema.mutation_type_name().is_some_and(|name| name != "Mutation")
        || schema
            .subscription_type_name()
            .is_some_and(|name| name != "Subscription");
    if custom_roots {
        let mut block = String::from("schema {\n");
        let _ = writeln!(block, "  query: {}", schema.query_type_name());
        if let Some(mutation) = schema.mutation_type_name() {
            let _ = writeln!(block, "  mutation: {mutation}");
        }
        if let Some(subscription) = schema.subscription_type_name() {
            let _ = writeln!(block, "  subscription: {subscription}");
        }
        block.push('}');
        blocks.push(block);
    }

    for named_type in schema.types() {
        if matches!(named_type, NamedType::Scalar(_)) && SPEC_SCALARS.contains(&named_type.name()) {
            continue;
        }
        blocks.push(print_type(named_type));
    }

    let mut sdl = blocks.join("\n\n");
    sdl.push('\n');
    sdl
}

fn print_type(named_type: &NamedType) -> String {
    let mut out = String::new();
    print_description(&mut out, named_type.description(), "");

    match named_type {
        NamedType::Scalar(scalar) => {
            let _ = write!(out, "scalar {}", scalar.name());
        }
        NamedType::Object(object) => {
            let _ = write!(out, "type {}", object.name);
            if !object.interfaces.is_empty() {
                let _ = write!(out, " implements {}", object.interfaces.join(" & "));
            }
            print_directives(&mut out, &object.directives);
            out.push_str(" {\n");
            for field in object.fields.values() {
                print_description(&mut out, field.description.as_deref(), "  ");
                let _ = write!(out, "  {}", field.name);
                print_arguments(&mut out, &field.arguments);
                let _ = write!(out, ": {}", field.ty);
                print_directives(&mut out, &field.directives);
                out.push('\n');
            }
            out.push('}');
        }
        NamedType::Interface(interface) => {
            let _ = write!(out, "interface {}", interface.name);
            print_directives(&mut out, &interface.directives);
            out.push_str(" {\n");
            for field in interface.fields.values() {
                print_description(&mut out, field.description.as_deref(), "  ");
                let _ = write!(out, "  {}", field.name);
                print_arguments(&mut out, &field.arguments);
                let _ = writeln!(out, ": {}", field.ty);
            }
            out.push('}');
        }
        NamedType::Union(union) => {
            let _ = write!(out, "union {}", union.name);
            print_directives(&mut out, &union.directives);
            let _ = write!(out, " = {}", union.types.join(" | "));
        }
        NamedType::Enum(enum_type) => {
            let _ = write!(out, "enum {}", enum_type.name);
            print_directives(&mut out, &enum_type.directives);
            out.push_str(" {\n");
            for value in &enum_type.values {
                print_description(&mut out, value.description.as_deref(), "  ");
                let _ = writeln!(out, "  {}", value.name);
            }
            out.push('}');
        }
        NamedType::InputObject(input) => {
            let _ = write!(out, "input {}", input.name);
            print_directives(&mut out, &input.directives);
            out.push_str(" {\n");
            for field in input.fields.values() {
                print_description(&mut out, field.description.as_deref(), "  ");
                out.push_str("  ");
                print_input_value(&mut out, field);
                out.push('\n');
            }
            out.push('}');
        }
    }
    out
}

fn print_description(out: &mut String, description: Option<&str>, indent: &str) {
    let Some(description) = description else {
        return;
    };
    if description.contains('\n') || description.contains('"') {
        let _ = writeln!(out, "{indent}\"\"\"");
        for line in description.lines() {
            let _ = writeln!(out, "{indent}{line}");
        }
        let _ = writeln!(out, "{indent}\"\"\"");
    } else {
        let _ = writeln!(out, "{indent}\"{description}\"");
    }
}

fn print_arguments(out: &mut String, arguments: &IndexMap<String, Argument>) {
    if arguments.is_empty() {
        return;
    }
    out.push('(');
    for (index, argument) in arguments.values().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        print_input_value(out, argument);
    }
    out.push(')');
}

fn print_input_value(out: &mut String, value: &Argument) {
    let _ = write!(out, "{}: {}", value.name, value.ty);
    if let Some(default_value) = &value.default_value {
        let _ = write!(out, " = {default_value}");
    }
    print_directives(out, &value.directives);
}

fn print_directives(out: &mut String, directives: &[DirectiveNode]) {
    for directive in directives {
        let _ = write!(out, " @{}", directive.name);
        if directive.arguments.is_empty() {
            continue;
        }
        let arguments: Vec<String> = directive
            .arguments
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        let _ = write!(out, "({})", arguments.join(", "));
    }
}
