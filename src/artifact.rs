//! Rendering and persisting the generated Go source file

use crate::aggregate::TldList;
use crate::error::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name the artifact template is registered under
const TEMPLATE_NAME: &str = "tlds";

/// The artifact layout. Block tags share their line with text so the output
/// does not depend on standalone-line whitespace handling.
const TLDS_TEMPLATE: &str = "// Generated by tldsgen

package {{package}}

// TLDs is a sorted list of all public top-level domains.
//
// Sources:{{#each sources}}
//   - {{this}}{{/each}}
var TLDs = []string{ {{~#each tlds}}
\t`{{this}}`,{{/each}}
}
";

/// Mode for a freshly generated artifact
#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o644;

#[derive(Serialize)]
struct TemplateData<'a> {
    package: &'a str,
    sources: &'a [String],
    tlds: &'a [String],
}

/// The compiled artifact template
///
/// Built once at startup and handed to the [`ArtifactWriter`].
pub struct Template {
    registry: Handlebars<'static>,
}

impl Template {
    /// Compile the standard `tlds.go` template
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the template fails to parse.
    pub fn new() -> Result<Self> {
        Self::from_source(TLDS_TEMPLATE)
    }

    /// Compile a template from custom source
    ///
    /// The template sees `package`, `sources` and `tlds`. Unknown variables
    /// are render errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the source fails to parse.
    pub fn from_source(source: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        registry.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self { registry })
    }

    /// Render the artifact text for `list`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if rendering fails.
    pub fn render(&self, package: &str, list: &TldList) -> Result<String> {
        let data = TemplateData {
            package,
            sources: &list.sources,
            tlds: &list.tlds,
        };
        Ok(self.registry.render(TEMPLATE_NAME, &data)?)
    }
}

/// Writes the rendered artifact to its destination
pub struct ArtifactWriter {
    template: Template,
    package: String,
    atomic: bool,
}

impl ArtifactWriter {
    /// Create a writer emitting Go package `package`
    ///
    /// Writes are atomic unless turned off with [`ArtifactWriter::atomic`].
    pub fn new(template: Template, package: impl Into<String>) -> Self {
        Self {
            template,
            package: package.into(),
            atomic: true,
        }
    }

    /// Choose between temp-file-and-rename (`true`) and truncate-in-place
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Render `list` and replace `destination` with the result
    ///
    /// The text is rendered in memory before the destination is touched, so
    /// a template failure leaves any previous artifact intact. With atomic
    /// writes an I/O failure does too; without them the destination may be
    /// left truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if rendering fails and [`Error::Artifact`]
    /// if the destination cannot be written.
    pub async fn write(&self, list: &TldList, destination: &Path) -> Result<()> {
        info!("Generating {}...", destination.display());

        let rendered = self.template.render(&self.package, list)?;
        debug!(
            path = %destination.display(),
            bytes = rendered.len(),
            tlds = list.tlds.len(),
            atomic = self.atomic,
            "rendered artifact"
        );

        if self.atomic {
            let destination = destination.to_path_buf();
            tokio::task::spawn_blocking(move || write_atomic(&destination, rendered.as_bytes()))
                .await??;
        } else {
            write_in_place(destination, rendered.as_bytes()).await?;
        }
        Ok(())
    }
}

async fn write_in_place(destination: &Path, content: &[u8]) -> Result<()> {
    use tokio::io::AsyncWriteExt;

    let artifact_error = |source| Error::Artifact {
        path: destination.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(destination)
        .await
        .map_err(artifact_error)?;
    file.write_all(content).await.map_err(artifact_error)?;
    file.flush().await.map_err(artifact_error)?;
    Ok(())
}

fn write_atomic(destination: &Path, content: &[u8]) -> Result<()> {
    let artifact_error = |source| Error::Artifact {
        path: destination.to_path_buf(),
        source,
    };

    let dir = parent_dir(destination);
    let mut staged = tempfile::Builder::new()
        .prefix(".tldsgen-")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(artifact_error)?;

    staged.write_all(content).map_err(artifact_error)?;
    staged.as_file().sync_all().map_err(artifact_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(ARTIFACT_MODE))
            .map_err(artifact_error)?;
    }

    // On failure the staged file is dropped and removed.
    staged
        .persist(destination)
        .map_err(|e| artifact_error(e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
