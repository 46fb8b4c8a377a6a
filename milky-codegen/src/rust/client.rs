//! Client method code generation.
//!
//! Renders one `async fn` per operation into an `impl MilkyClient` block.
//! Every method forwards its arguments as a JSON object to
//! `MilkyClient::call`.

use super::types::{RustType, json_literal, rust_ident};
use crate::returns::{DescribedOperation, ReturnDoc};
use milky_schema::Operation;
use milky_schema::ir::Parameter;
use milky_schema::types::render_literal;

const HEADER: &str = "//! Generated API methods of [`MilkyClient`].
//!
//! This file is generated by `milky-gen-client` from `openapi.json`.
//! Do not edit it by hand.

#![allow(unused_imports)]
#![allow(clippy::too_many_arguments)]

use serde_json::{Value, json};

use crate::{ClientError, MessageContent, MilkyClient};
";

/// Generator for the client method surface.
pub struct ClientEmitter<'a> {
    operations: &'a [DescribedOperation<'a>],
}

impl<'a> ClientEmitter<'a> {
    /// Creates a new client emitter.
    #[must_use]
    pub fn new(operations: &'a [DescribedOperation<'a>]) -> Self {
        Self { operations }
    }

    /// Generates the complete source file.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::from(HEADER);
        output.push('\n');
        output.push_str("impl MilkyClient {\n");

        for (i, described) in self.operations.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&self.generate_method(described));
        }

        output.push_str("}\n");
        output
    }

    /// Generates one method.
    fn generate_method(&self, described: &DescribedOperation<'_>) -> String {
        let op = described.operation;
        let mut output = String::new();

        output.push_str(&generate_docs(op, &described.returns));

        if op.parameters.is_empty() {
            output.push_str(&format!(
                "    pub async fn {}(&self) -> Result<Value, ClientError> {{\n",
                rust_ident(&op.name)
            ));
        } else {
            output.push_str(&format!("    pub async fn {}(\n", rust_ident(&op.name)));
            output.push_str("        &self,\n");
            for param in &op.parameters {
                output.push_str(&format!(
                    "        {}: {},\n",
                    rust_ident(&param.name),
                    parameter_type(param)
                ));
            }
            output.push_str("    ) -> Result<Value, ClientError> {\n");
        }

        for param in &op.parameters {
            if let Some(line) = normalization(param) {
                output.push_str(&format!("        {line}\n"));
            }
        }

        if op.parameters.is_empty() {
            output.push_str(&format!(
                "        self.call({:?}, json!({{}})).await\n",
                op.name
            ));
        } else {
            output.push_str("        self.call(\n");
            output.push_str(&format!("            {:?},\n", op.name));
            output.push_str("            json!({\n");
            for param in &op.parameters {
                output.push_str(&format!(
                    "                {:?}: {},\n",
                    param.name,
                    rust_ident(&param.name)
                ));
            }
            output.push_str("            }),\n");
            output.push_str("        )\n");
            output.push_str("        .await\n");
        }

        output.push_str("    }\n");
        output
    }
}

/// Generates the doc comment of a method.
fn generate_docs(op: &Operation, returns: &ReturnDoc) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(summary) = op.summary.as_deref().filter(|s| !s.is_empty()) {
        lines.push(summary.to_string());
    } else {
        lines.push(format!("Calls `{}`.", op.name));
    }

    if !op.parameters.is_empty() {
        lines.push(String::new());
        lines.push("# Arguments".to_string());
        for param in &op.parameters {
            lines.push(argument_doc(param));
        }
    }

    match returns {
        ReturnDoc::Fields(fields) => {
            lines.push(String::new());
            lines.push("# Returns".to_string());
            lines.push("An object with the following fields:".to_string());
            for field in fields {
                lines.push(described_item(
                    &field.name,
                    &field.display_type.to_string(),
                    &field.description,
                ));
            }
        }
        ReturnDoc::Value {
            display_type,
            description,
        } => {
            lines.push(String::new());
            lines.push("# Returns".to_string());
            if description.is_empty() {
                lines.push(format!("A `{display_type}` value."));
            } else {
                lines.push(format!("{description} (`{display_type}`)"));
            }
        }
        ReturnDoc::Absent | ReturnDoc::Degraded { .. } => {}
    }

    lines.push(String::new());
    lines.push("# Errors".to_string());
    lines.push(
        "Returns `ClientError` if the request fails or the API reports a failure.".to_string(),
    );

    let mut docs = String::new();
    for line in &lines {
        if line.is_empty() {
            docs.push_str("    ///\n");
            continue;
        }
        for piece in line.lines() {
            let piece = piece.trim_end();
            if piece.is_empty() {
                docs.push_str("    ///\n");
            } else {
                docs.push_str(&format!("    /// {piece}\n"));
            }
        }
    }
    docs
}

fn argument_doc(param: &Parameter) -> String {
    let mut doc = format!("* `{}`", param.name);
    if !param.description.is_empty() {
        doc.push_str(&format!(" - {}", param.description));
    }
    if let Some(default) = &param.default {
        doc.push_str(&format!(" (default: `{}`)", render_literal(default)));
    }
    doc
}

fn described_item(name: &str, type_name: &str, description: &str) -> String {
    if description.is_empty() {
        format!("* `{name}` (`{type_name}`)")
    } else {
        format!("* `{name}` (`{type_name}`) - {description}")
    }
}

/// Returns the Rust type of a parameter as it appears in the signature.
fn parameter_type(param: &Parameter) -> String {
    match (param.message_content, param.required) {
        (true, true) => "impl Into<MessageContent>".to_string(),
        (true, false) => "Option<MessageContent>".to_string(),
        (false, true) => RustType::from_type_name(&param.value_type).parameter(),
        (false, false) => format!(
            "Option<{}>",
            RustType::from_type_name(&param.value_type).parameter()
        ),
    }
}

/// Returns the statement that normalizes a parameter before the call, if any.
fn normalization(param: &Parameter) -> Option<String> {
    let ident = rust_ident(&param.name);
    if param.message_content {
        return Some(if param.required {
            format!("let {ident} = Into::<MessageContent>::into({ident}).into_segments();")
        } else {
            format!("let {ident} = {ident}.map(MessageContent::into_segments);")
        });
    }
    if param.required {
        return None;
    }
    let default = param.default.as_ref()?;
    Some(match RustType::from_type_name(&param.value_type).literal(default) {
        Some(literal) => format!("let {ident} = {ident}.unwrap_or({literal});"),
        None => format!(
            "let {ident} = {ident}.map_or_else(|| json!({}), |{ident}| json!({ident}));",
            json_literal(default)
        ),
    })
}
