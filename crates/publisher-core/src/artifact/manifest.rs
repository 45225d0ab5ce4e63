// UploadManifest – the fixed list of local artifacts and their destination keys.

use publisher_sdk::{IOUtil, KeyUtil};
use std::path::{Path, PathBuf};

use crate::artifact::layout::{ArtifactKind, KeyLayout};
use crate::config::{DEFAULT_EXTRACTION_PACKAGE, DEFAULT_LAYER_PACKAGE, DEFAULT_TEMPLATE};
use crate::error::PublishError;

/// A single local file to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub kind: ArtifactKind,
    pub local_path: PathBuf,
    pub destination_key: String,
    /// A missing required file aborts the run before any storage call.
    pub required: bool,
}

impl ArtifactFile {
    pub fn new(kind: ArtifactKind, local_path: impl Into<PathBuf>, destination_key: &str) -> Self {
        Self {
            kind,
            local_path: local_path.into(),
            destination_key: destination_key.to_string(),
            required: true,
        }
    }

    /// The `/`-terminated prefix the destination key lives under.
    pub fn destination_prefix(&self) -> String {
        match self.destination_key.rsplit_once('/') {
            Some((dir, _)) => KeyUtil::as_prefix(dir),
            None => String::new(),
        }
    }

    /// Content type sent with the upload, derived from the file extension.
    pub fn content_type(&self) -> &'static str {
        content_type_for(&self.local_path)
    }
}

/// File names of the three artifacts inside the artifacts directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub extraction_package: String,
    pub dependency_layer: String,
    pub infrastructure_template: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            extraction_package: DEFAULT_EXTRACTION_PACKAGE.to_string(),
            dependency_layer: DEFAULT_LAYER_PACKAGE.to_string(),
            infrastructure_template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl ArtifactNames {
    pub fn name_for(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::ExtractionPackage => &self.extraction_package,
            ArtifactKind::DependencyLayer => &self.dependency_layer,
            ArtifactKind::InfrastructureTemplate => &self.infrastructure_template,
        }
    }
}

/// Ordered artifact-to-key mapping for one publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadManifest {
    entries: Vec<ArtifactFile>,
}

impl UploadManifest {
    /// The standard triplet: extraction package, dependency layer and
    /// infrastructure template, read from `artifacts_dir`.
    ///
    /// Names may carry directories (`build/layer.zip`); only the file name is
    /// used in the destination key.
    pub fn standard(artifacts_dir: &Path, names: &ArtifactNames, layout: &KeyLayout) -> Self {
        let entries = ArtifactKind::ALL
            .iter()
            .map(|&kind| {
                let name = names.name_for(kind);
                let local_path = artifacts_dir.join(name);
                let file_name = local_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| name.to_string());
                ArtifactFile::new(kind, local_path, &layout.key_for(kind, &file_name))
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ArtifactFile] {
        &self.entries
    }

    /// Fails with the first required entry whose local file is absent.
    pub fn validate(&self) -> Result<(), PublishError> {
        match self
            .entries
            .iter()
            .find(|e| e.required && !IOUtil::is_existing_file(&e.local_path))
        {
            Some(missing) => Err(PublishError::MissingArtifact {
                path: missing.local_path.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Distinct destination prefixes, in manifest order.
    pub fn destination_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let prefix = entry.destination_prefix();
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
        prefixes
    }
}

/// Content type for an artifact path, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "zip" => "application/zip",
        "yml" | "yaml" => "application/x-yaml",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}
