//! Synthesis output.
//!
//! A finished stack becomes a [`StackArtifact`]. Where it goes is decided by a
//! [`TemplateSink`]: a cloud assembly directory, a writer such as stdout, or
//! memory for tests.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use acctform_core::AcctFormResult;
use acctform_model::Template;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Manifest schema version written by [`DirectorySink`].
pub const MANIFEST_VERSION: &str = "1.0.0";

/// File name of the assembly manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// A synthesized stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackArtifact {
    /// Stack name.
    pub stack_name: String,
    /// Target in `aws://<account>/<region>` form.
    pub environment: String,
    /// The CloudFormation template.
    pub template: Template,
}

impl StackArtifact {
    /// File name of the template inside an assembly directory.
    #[must_use]
    pub fn template_file(&self) -> String {
        format!("{}.template.json", self.stack_name)
    }

    /// Template as pretty-printed JSON.
    pub fn to_json(&self) -> AcctFormResult<String> {
        Ok(serde_json::to_string_pretty(&self.template)?)
    }
}

/// Entry for one stack in [`AssemblyManifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactEntry {
    /// Always `aws:cloudformation:stack`.
    #[serde(rename = "type")]
    pub artifact_type: String,
    /// Deployment target.
    pub environment: String,
    /// Where the template lives.
    pub properties: ArtifactProperties,
}

/// Template location of an [`ArtifactEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactProperties {
    /// Template file, relative to the manifest.
    pub template_file: String,
}

/// `manifest.json` of a cloud assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyManifest {
    /// Schema version.
    pub version: String,
    /// Artifacts by stack name.
    pub artifacts: BTreeMap<String, ArtifactEntry>,
}

impl AssemblyManifest {
    /// Manifest describing a single stack.
    #[must_use]
    pub fn for_artifact(artifact: &StackArtifact) -> Self {
        let entry = ArtifactEntry {
            artifact_type: "aws:cloudformation:stack".to_owned(),
            environment: artifact.environment.clone(),
            properties: ArtifactProperties {
                template_file: artifact.template_file(),
            },
        };
        Self {
            version: MANIFEST_VERSION.to_owned(),
            artifacts: BTreeMap::from([(artifact.stack_name.clone(), entry)]),
        }
    }
}

/// Destination for synthesized stacks.
pub trait TemplateSink {
    /// Write out `artifact`.
    fn emit(&mut self, artifact: &StackArtifact) -> AcctFormResult<()>;
}

/// Writes `<stack>.template.json` and `manifest.json` into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    out_dir: PathBuf,
}

impl DirectorySink {
    /// Sink rooted at `out_dir`, created on first emit.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// The output directory.
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl TemplateSink for DirectorySink {
    fn emit(&mut self, artifact: &StackArtifact) -> AcctFormResult<()> {
        fs::create_dir_all(&self.out_dir)?;

        let template_path = self.out_dir.join(artifact.template_file());
        fs::write(&template_path, artifact.to_json()?)?;

        let manifest = AssemblyManifest::for_artifact(artifact);
        let manifest_path = self.out_dir.join(MANIFEST_FILE);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

        info!(
            stack = %artifact.stack_name,
            template = %template_path.display(),
            manifest = %manifest_path.display(),
            "wrote cloud assembly"
        );
        Ok(())
    }
}

/// Writes the template JSON to any [`Write`].
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give the writer back.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TemplateSink for WriterSink<W> {
    fn emit(&mut self, artifact: &StackArtifact) -> AcctFormResult<()> {
        writeln!(self.writer, "{}", artifact.to_json()?)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps emitted artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Everything emitted so far, in order.
    pub artifacts: Vec<StackArtifact>,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateSink for MemorySink {
    fn emit(&mut self, artifact: &StackArtifact) -> AcctFormResult<()> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}
