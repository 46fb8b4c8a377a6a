//! Generation entry point.
//!
//! A run loads and validates the document, renders every requested artifact
//! in memory, and only then writes them. Each file is written through a
//! temporary file in the target directory and renamed into place.

use crate::error::CodegenError;
use crate::markdown::{ApiDocEmitter, StructsDocEmitter};
use crate::returns::{ReturnDescriber, Warning};
use crate::rust::ClientEmitter;
use milky_schema::ir::DEFAULT_PATH_PREFIX;
use milky_schema::{Document, Resolver, parse_document_file, validate_document};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// File name of the API description.
pub const DOCUMENT_NAME: &str = "openapi.json";

/// Client method file, relative to the document's directory.
pub const CLIENT_OUTPUT: &str = "milky-client/src/api.rs";

/// API reference page, relative to the document's directory.
pub const API_DOC_OUTPUT: &str = "docs/api.md";

/// Data structure reference page, relative to the document's directory.
pub const STRUCTS_DOC_OUTPUT: &str = "docs/structs.md";

/// One generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Client method surface.
    Client,
    /// API reference page.
    ApiDoc,
    /// Data structure reference page.
    StructsDoc,
}

impl Artifact {
    /// Every artifact, in generation order.
    pub const ALL: [Artifact; 3] = [Self::Client, Self::ApiDoc, Self::StructsDoc];
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// API description to read.
    pub input: PathBuf,
    /// Target of [`Artifact::Client`].
    pub client_output: PathBuf,
    /// Target of [`Artifact::ApiDoc`].
    pub api_doc_output: PathBuf,
    /// Target of [`Artifact::StructsDoc`].
    pub structs_doc_output: PathBuf,
    /// Path prefix of callable operations.
    pub path_prefix: String,
}

impl GeneratorConfig {
    /// Creates a configuration with outputs next to the input document.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let root = input
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self {
            client_output: root.join(CLIENT_OUTPUT),
            api_doc_output: root.join(API_DOC_OUTPUT),
            structs_doc_output: root.join(STRUCTS_DOC_OUTPUT),
            input,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
        }
    }

    /// Looks for [`DOCUMENT_NAME`] in `start_dir`, then in its parent.
    #[must_use]
    pub fn discover(start_dir: &Path) -> Option<Self> {
        let candidates = [Some(start_dir), start_dir.parent()];
        candidates
            .into_iter()
            .flatten()
            .map(|dir| dir.join(DOCUMENT_NAME))
            .find(|path| path.is_file())
            .map(Self::new)
    }

    /// Sets the path prefix of callable operations.
    #[must_use]
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Returns the target path of an artifact.
    #[must_use]
    pub fn output(&self, artifact: Artifact) -> &Path {
        match artifact {
            Artifact::Client => &self.client_output,
            Artifact::ApiDoc => &self.api_doc_output,
            Artifact::StructsDoc => &self.structs_doc_output,
        }
    }
}

/// Rendered artifacts, not yet written.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// Artifact contents, in request order.
    pub artifacts: Vec<(Artifact, String)>,
    /// Warnings raised while rendering.
    pub warnings: Vec<Warning>,
}

impl Rendered {
    /// Returns the content of an artifact.
    #[must_use]
    pub fn get(&self, artifact: Artifact) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|(a, _)| *a == artifact)
            .map(|(_, content)| content.as_str())
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Files written, in request order.
    pub written: Vec<PathBuf>,
    /// Warnings raised while rendering.
    pub warnings: Vec<Warning>,
}

/// Renders and writes artifacts.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a new generator.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Loads the input document and renders the requested artifacts.
    ///
    /// # Errors
    /// Returns `CodegenError` if the document cannot be loaded or validated.
    pub fn render(&self, artifacts: &[Artifact]) -> Result<Rendered, CodegenError> {
        let document = parse_document_file(&self.config.input)?;
        render_document(&document, &self.config.path_prefix, artifacts)
    }

    /// Renders the requested artifacts, then writes them.
    ///
    /// # Errors
    /// Returns `CodegenError` if rendering fails, in which case nothing is
    /// written, or if a file cannot be written.
    pub fn run(&self, artifacts: &[Artifact]) -> Result<GenerationReport, CodegenError> {
        let rendered = self.render(artifacts)?;
        let mut written = Vec::with_capacity(rendered.artifacts.len());

        for (artifact, content) in &rendered.artifacts {
            let path = self.config.output(*artifact);
            write_atomic(path, content)?;
            info!(path = %path.display(), bytes = content.len(), "generated {artifact:?}");
            written.push(path.to_path_buf());
        }

        Ok(GenerationReport {
            written,
            warnings: rendered.warnings,
        })
    }
}

/// Renders artifacts from an already loaded document.
///
/// # Errors
/// Returns `CodegenError` if the document fails validation.
pub fn render_document(
    document: &Document,
    path_prefix: &str,
    artifacts: &[Artifact],
) -> Result<Rendered, CodegenError> {
    let ir = validate_document(document, path_prefix)?;
    debug!(operations = ir.operations.len(), "document validated");

    let resolver = Resolver::new(document);
    let (described, warnings) = ReturnDescriber::new(resolver).describe_all(&ir);

    let mut rendered = Rendered {
        artifacts: Vec::with_capacity(artifacts.len()),
        warnings,
    };
    for &artifact in artifacts {
        let content = match artifact {
            Artifact::Client => ClientEmitter::new(&described).generate(),
            Artifact::ApiDoc => ApiDocEmitter::new(&described)
                .with_version(ir.version.as_deref())
                .generate(),
            Artifact::StructsDoc => StructsDocEmitter::new(document).generate()?,
        };
        rendered.artifacts.push((artifact, content));
    }
    Ok(rendered)
}

/// Writes a file through a temporary sibling and renames it into place.
///
/// # Errors
/// Returns `CodegenError` if the directory or temporary file cannot be
/// created, or the rename fails. No partial file is left behind.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), CodegenError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    file.persist(path)
        .map_err(|err| CodegenError::persist(path, err.error))?;
    Ok(())
}
