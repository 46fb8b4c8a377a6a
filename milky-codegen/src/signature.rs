//! Neutral method signatures.
//!
//! Signatures use the type notation of [`milky_schema::TypeName`], e.g.
//! `send_group_message(group_id: int64, message: sequence<Segment> | text)`.

use milky_schema::Operation;
use milky_schema::ir::Parameter;
use milky_schema::types::render_literal;

/// Placeholder for an optional parameter without a default.
pub const NO_DEFAULT: &str = "none";

/// Renders one parameter: `name: type` or `name: type = default`.
#[must_use]
pub fn parameter_signature(parameter: &Parameter) -> String {
    if parameter.required {
        return format!("{}: {}", parameter.name, parameter.display_type);
    }
    let default = parameter
        .default
        .as_ref()
        .map_or_else(|| NO_DEFAULT.to_string(), render_literal);
    format!("{}: {} = {default}", parameter.name, parameter.display_type)
}

/// Renders the signature of an operation.
#[must_use]
pub fn signature(operation: &Operation) -> String {
    let parameters = operation
        .parameters
        .iter()
        .map(parameter_signature)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({parameters})", operation.name)
}
