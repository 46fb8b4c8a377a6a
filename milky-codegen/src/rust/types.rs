//! Rust type and identifier mapping.

use milky_schema::TypeName;
use serde_json::Value;

/// Keywords that need a raw identifier.
const RAW_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Turns a field or operation name into a Rust identifier.
#[must_use]
pub fn rust_ident(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if RESERVED_KEYWORDS.contains(&sanitized.as_str()) {
        format!("{sanitized}_")
    } else if RAW_KEYWORDS.contains(&sanitized.as_str()) {
        format!("r#{sanitized}")
    } else if sanitized.starts_with(|c: char| c.is_ascii_digit()) || sanitized.is_empty() {
        format!("_{sanitized}")
    } else {
        sanitized
    }
}

/// Rust type of a client method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RustType {
    /// `&str` at top level, `String` when nested.
    Text,
    /// `i64`.
    Int64,
    /// `f64`.
    Float64,
    /// `bool`.
    Bool,
    /// `Vec<T>`.
    Vec(Box<RustType>),
    /// `serde_json::Value`.
    Json,
}

impl RustType {
    /// Maps a resolved type name.
    #[must_use]
    pub fn from_type_name(type_name: &TypeName) -> Self {
        match type_name {
            TypeName::Text => Self::Text,
            TypeName::Int64 => Self::Int64,
            TypeName::Float64 => Self::Float64,
            TypeName::Bool => Self::Bool,
            TypeName::Sequence(element) => Self::Vec(Box::new(Self::from_type_name(element))),
            TypeName::Record | TypeName::Any | TypeName::Named(_) | TypeName::Either(_) => {
                Self::Json
            }
        }
    }

    /// Returns the type as written in a method signature.
    #[must_use]
    pub fn parameter(&self) -> String {
        match self {
            Self::Text => "&str".to_string(),
            other => other.nested(),
        }
    }

    /// Returns the type as written inside a container.
    #[must_use]
    pub fn nested(&self) -> String {
        match self {
            Self::Text => "String".to_string(),
            Self::Int64 => "i64".to_string(),
            Self::Float64 => "f64".to_string(),
            Self::Bool => "bool".to_string(),
            Self::Vec(element) => format!("Vec<{}>", element.nested()),
            Self::Json => "Value".to_string(),
        }
    }

    /// Renders a default value as a Rust literal of this type, if the value
    /// is a scalar of matching kind.
    #[must_use]
    pub fn literal(&self, value: &Value) -> Option<String> {
        match (self, value) {
            (Self::Text, Value::String(s)) => Some(format!("{s:?}")),
            (Self::Int64, Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|v| is_integral(*v)).map(|v| v as i64))
                .map(|v| v.to_string()),
            (Self::Float64, Value::Number(n)) => n.as_f64().map(|v| format!("{v:?}")),
            (Self::Bool, Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }
}

fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64
}

/// Renders a JSON value as the argument of a `json!` invocation, with every
/// string written as a Rust string literal.
#[must_use]
pub fn json_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(json_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{key:?}: {}", json_literal(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}
