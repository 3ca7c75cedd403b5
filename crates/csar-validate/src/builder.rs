//! Fluent construction of manifest text.
//!
//! Used by tests and tooling to produce manifests in the layout the parser
//! reads back, without hand-assembling whitespace.
//!
//! ```
//! use csar_validate::ManifestBuilder;
//!
//! let text = ManifestBuilder::new()
//!     .with_metadata("pnfd_name", "myPnf")
//!     .with_source("Definitions/MainServiceTemplate.yaml")
//!     .with_non_mano_artifact("onap_pm_dictionary", "Files/Measurements/pmEvents.yaml")
//!     .build();
//! assert!(text.starts_with("metadata:\n"));
//! ```

/// Builder for manifest text.
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    metadata: Vec<(String, String)>,
    sources: Vec<(String, Option<(String, String)>)>,
    non_mano: Vec<(String, Vec<String>)>,
    signature: Option<String>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a metadata entry. Entries are written in insertion order.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    pub fn with_source(mut self, path: impl Into<String>) -> Self {
        self.sources.push((path.into(), None));
        self
    }

    /// Append a source followed by its `Algorithm:`/`Hash:` lines.
    pub fn with_signed_source(
        mut self,
        path: impl Into<String>,
        algorithm: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        self.sources
            .push((path.into(), Some((algorithm.into(), digest.into()))));
        self
    }

    /// Append a non-MANO artifact. Artifacts of the same type share a set.
    pub fn with_non_mano_artifact(
        mut self,
        artifact_type: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let artifact_type = artifact_type.into();
        let path = path.into();
        match self.non_mano.iter_mut().find(|(t, _)| *t == artifact_type) {
            Some((_, paths)) => paths.push(path),
            None => self.non_mano.push((artifact_type, vec![path])),
        }
        self
    }

    /// Close the manifest with a CMS signature block holding `body`.
    pub fn with_cms_signature(mut self, body: impl Into<String>) -> Self {
        self.signature = Some(body.into());
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::from("metadata:\n");
        for (key, value) in &self.metadata {
            out.push_str(&format!("    {key}: {value}\n"));
        }

        for (path, signature) in &self.sources {
            out.push('\n');
            out.push_str(&format!("Source: {path}\n"));
            if let Some((algorithm, digest)) = signature {
                out.push_str(&format!("Algorithm: {algorithm}\n"));
                out.push_str(&format!("Hash: {digest}\n"));
            }
        }

        if !self.non_mano.is_empty() {
            out.push_str("\nnon_mano_artifact_sets:\n");
            for (artifact_type, paths) in &self.non_mano {
                out.push_str(&format!("    {artifact_type}:\n"));
                for path in paths {
                    out.push_str(&format!("        Source: {path}\n"));
                }
            }
        }

        if let Some(body) = &self.signature {
            out.push_str("\n-----BEGIN CMS-----\n");
            for line in body.lines() {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("-----END CMS-----\n");
        }
        out
    }
}
