//! Markdown documentation generation modules.

pub mod api;
pub mod structs;

pub use api::ApiDocEmitter;
pub use structs::StructsDocEmitter;

/// Escapes a value for use inside a table cell.
#[must_use]
pub fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Formats a field list entry: quoted name, description, then type.
#[must_use]
pub fn field_item(name: &str, description: &str, type_name: &str) -> String {
    if description.is_empty() {
        format!("`{name}`: ({type_name})")
    } else {
        format!("`{name}`: {description} ({type_name})")
    }
}
