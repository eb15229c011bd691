//! GraphQL literal values and directive syntax.
//!
//! Literals keep the source text of numbers so that `Int` and `Float` values
//! round-trip without reformatting. Values coming from parsed SDL documents
//! are converted from `async_graphql_value::ConstValue`.

use std::fmt;

use async_graphql_parser::types::ConstDirective;
use async_graphql_parser::{Pos, Positioned};
use async_graphql_value::ConstValue;
use indexmap::IndexMap;

/// The kind of a literal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Int,
    Float,
    String,
    Enum,
    List,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Enum => "Enum",
            Self::List => "List",
            Self::Object => "Object",
        };
        f.write_str(name)
    }
}

/// A GraphQL literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueNode {
    Null,
    Boolean(bool),
    /// Integer literal, kept as its decimal digit string.
    Int(String),
    /// Float literal, kept as its source text.
    Float(String),
    String(String),
    Enum(String),
    List(Vec<ValueNode>),
    Object(IndexMap<String, ValueNode>),
}

impl ValueNode {
    /// Creates an integer literal.
    pub fn int(value: impl Into<i128>) -> Self {
        Self::Int(value.into().to_string())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Enum(_) => ValueKind::Enum,
            Self::List(_) => ValueKind::List,
            Self::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Int(text) | Self::Float(text) | Self::Enum(text) => f.write_str(text),
            Self::String(value) => write_string(f, value),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(fields) => {
                if fields.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (index, (name, value)) in fields.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl From<&ConstValue> for ValueNode {
    fn from(value: &ConstValue) -> Self {
        match value {
            ConstValue::Null => Self::Null,
            ConstValue::Boolean(b) => Self::Boolean(*b),
            ConstValue::Number(n) if n.is_i64() || n.is_u64() => Self::Int(n.to_string()),
            ConstValue::Number(n) => Self::Float(n.to_string()),
            ConstValue::String(s) => Self::String(s.clone()),
            ConstValue::Binary(bytes) => Self::String(String::from_utf8_lossy(bytes).into_owned()),
            ConstValue::Enum(name) => Self::Enum(name.to_string()),
            ConstValue::List(items) => Self::List(items.iter().map(Self::from).collect()),
            ConstValue::Object(fields) => Self::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.to_string(), Self::from(value)))
                    .collect(),
            ),
        }
    }
}

/// A line/column position in an SDL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxLocation {
    pub line: usize,
    pub column: usize,
}

impl From<Pos> for SyntaxLocation {
    fn from(pos: Pos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl fmt::Display for SyntaxLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A directive applied to a type system member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveNode {
    pub name: String,
    pub arguments: Vec<(String, ValueNode)>,
    pub location: Option<SyntaxLocation>,
}

impl DirectiveNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            location: None,
        }
    }

    #[must_use]
    pub fn argument(mut self, name: impl Into<String>, value: ValueNode) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    /// Returns the first argument with the given name.
    pub fn get_argument(&self, name: &str) -> Option<&ValueNode> {
        self.arguments
            .iter()
            .find(|(argument, _)| argument == name)
            .map(|(_, value)| value)
    }
}

impl From<&Positioned<ConstDirective>> for DirectiveNode {
    fn from(directive: &Positioned<ConstDirective>) -> Self {
        Self {
            name: directive.node.name.node.to_string(),
            arguments: directive
                .node
                .arguments
                .iter()
                .map(|(name, value)| (name.node.to_string(), ValueNode::from(&value.node)))
                .collect(),
            location: Some(directive.pos.into()),
        }
    }
}
