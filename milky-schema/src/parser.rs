//! API description loader.
//!
//! This module decodes an OpenAPI JSON document into [`Document`]. Decoding
//! errors carry the JSON path of the value that failed.

use crate::error::ParseError;
use crate::types::Document;
use std::path::Path;

/// Parses an API description from a JSON string.
///
/// # Arguments
/// * `json` - Document content
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed or does not match the
/// expected document shape.
pub fn parse_document(json: &str) -> Result<Document, ParseError> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);
    let document = serde_path_to_error::deserialize(deserializer)?;
    Ok(document)
}

/// Reads and parses an API description file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or parsed.
pub fn parse_document_file(path: &Path) -> Result<Document, ParseError> {
    let json = std::fs::read_to_string(path)?;
    parse_document(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SchemaKind;

    const SIMPLE_DOCUMENT: &str = r##"{
  "openapi": "3.1.0",
  "info": {"title": "Milky", "version": "1.0"},
  "paths": {
    "/api/get_login_info": {
      "post": {
        "operationId": "get_login_info",
        "summary": "Get login info",
        "tags": ["System"],
        "responses": {
          "200": {
            "content": {
              "application/json": {
                "schema": {"$ref": "#/components/schemas/LoginInfo"}
              }
            }
          }
        }
      }
    }
  },
  "components": {
    "schemas": {
      "LoginInfo": {
        "type": "object",
        "properties": {
          "uin": {"type": "integer", "description": "Login account"},
          "nickname": {"type": "string"}
        },
        "required": ["uin", "nickname"]
      }
    }
  }
}"##;

    #[test]
    fn test_parse_simple_document() {
        let document = parse_document(SIMPLE_DOCUMENT).expect("Failed to parse document");

        assert_eq!(document.info.title.as_deref(), Some("Milky"));
        assert_eq!(document.paths.len(), 1);
        assert!(document.has_definition("LoginInfo"));

        let login = document.definition("LoginInfo").unwrap();
        assert_eq!(login.kind, Some(SchemaKind::Object));
        let names: Vec<&str> = login.properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["uin", "nickname"]);
    }

    #[test]
    fn test_parse_error_reports_path() {
        let json = r#"{"components": {"schemas": {"Bad": {"type": "decimal"}}}}"#;
        let err = parse_document(json).unwrap_err();
        match err {
            ParseError::Json { path, .. } => {
                assert!(path.starts_with("components.schemas.Bad"), "path: {path}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse_document("{\"paths\": "),
            Err(ParseError::Json { .. })
        ));
    }

    #[test]
    fn test_parse_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_document_file(&dir.path().join("openapi.json")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
