// Fixed bucket layout for published artifacts.
//
//   <bucket>/[<root>/]lambda/<extraction-package>
//   <bucket>/[<root>/]layers/<dependency-layer-package>
//   <bucket>/[<root>/]plantillas/<infrastructure-template>

use publisher_sdk::KeyUtil;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three artifacts downstream provisioning consumes by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Packaged extraction function code.
    ExtractionPackage,
    /// Dependency bundle published as a function layer.
    DependencyLayer,
    /// Infrastructure template referencing the two packages above.
    InfrastructureTemplate,
}

impl ArtifactKind {
    /// Manifest order.
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::ExtractionPackage,
        ArtifactKind::DependencyLayer,
        ArtifactKind::InfrastructureTemplate,
    ];

    /// Top-level directory inside the bucket (or under the root prefix).
    pub fn destination_dir(&self) -> &'static str {
        match self {
            ArtifactKind::ExtractionPackage => "lambda",
            ArtifactKind::DependencyLayer => "layers",
            ArtifactKind::InfrastructureTemplate => "plantillas",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::ExtractionPackage => "extraction package",
            ArtifactKind::DependencyLayer => "dependency layer",
            ArtifactKind::InfrastructureTemplate => "infrastructure template",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps artifact kinds to object keys, optionally under a shared root prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyLayout {
    root: String,
}

impl KeyLayout {
    /// A layout rooted at `root_prefix`; `None` or an empty prefix writes to
    /// the bucket root.
    pub fn new(root_prefix: Option<&str>) -> Self {
        Self {
            root: KeyUtil::join(&[root_prefix.unwrap_or_default()]),
        }
    }

    /// Listing prefix for a kind, always ending in `/`.
    pub fn prefix_for(&self, kind: ArtifactKind) -> String {
        KeyUtil::as_prefix(&KeyUtil::join(&[&self.root, kind.destination_dir()]))
    }

    /// Full object key for `file_name` published as `kind`.
    pub fn key_for(&self, kind: ArtifactKind, file_name: &str) -> String {
        KeyUtil::join(&[&self.root, kind.destination_dir(), file_name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_root_layout() {
        let layout = KeyLayout::default();
        assert_eq!(
            layout.key_for(ArtifactKind::ExtractionPackage, "artefactos.zip"),
            "lambda/artefactos.zip"
        );
        assert_eq!(
            layout.key_for(ArtifactKind::DependencyLayer, "layer.zip"),
            "layers/layer.zip"
        );
        assert_eq!(
            layout.key_for(ArtifactKind::InfrastructureTemplate, "template.yml"),
            "plantillas/template.yml"
        );
        assert_eq!(layout.prefix_for(ArtifactKind::InfrastructureTemplate), "plantillas/");
    }

    #[test]
    fn rooted_layout_normalises_slashes() {
        let layout = KeyLayout::new(Some("/tfm/deploy/"));
        assert_eq!(
            layout.key_for(ArtifactKind::DependencyLayer, "layer.zip"),
            "tfm/deploy/layers/layer.zip"
        );
        assert_eq!(layout.prefix_for(ArtifactKind::ExtractionPackage), "tfm/deploy/lambda/");
    }

    #[test]
    fn empty_prefix_is_bucket_root() {
        assert_eq!(KeyLayout::new(Some("")), KeyLayout::default());
        assert_eq!(KeyLayout::new(Some("///")), KeyLayout::default());
    }

    #[test]
    fn kinds_are_in_manifest_order() {
        let dirs: Vec<_> = ArtifactKind::ALL.iter().map(|k| k.destination_dir()).collect();
        assert_eq!(dirs, vec!["lambda", "layers", "plantillas"]);
    }
}
