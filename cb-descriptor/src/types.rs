use serde::{Deserialize, Serialize};

/// File names looked up inside a content block directory.
pub const PACKAGE_DESCRIPTOR_FILE: &str = "composer.json";
pub const EDITOR_INTERFACE_FILE: &str = "EditorInterface.yaml";
pub const LANGUAGE_DIR: &str = "src/Language/";
pub const DEFAULT_TRANSLATION_FILE: &str = "Default.xlf";
pub const EDITOR_INTERFACE_TRANSLATION_FILE: &str = "EditorInterface.xlf";
pub const FRONTEND_TRANSLATION_FILE: &str = "Frontend.xlf";
pub const ICON_BASENAME: &str = "ContentBlockIcon";

/// Icon extensions in lookup priority order.
pub const ICON_EXTENSIONS: [&str; 3] = ["svg", "png", "gif"];

/// Prefix of the content type id of blocks without a package descriptor.
pub const NO_VENDOR_PREFIX: &str = "cb_novendor_";

/// How the block icon has to be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconProviderKind {
    /// svg
    Vector,
    /// png, gif
    Raster,
}

impl IconProviderKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Vector),
            "png" | "gif" => Some(Self::Raster),
            _ => None,
        }
    }
}

/// Normalized configuration of one content block directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlockDescriptor {
    /// Canonical absolute path of the block root, with trailing separator
    pub path: String,

    /// Icon path relative to the public root
    pub icon: String,

    pub icon_provider: IconProviderKind,

    pub content_type_id: String,

    /// Translation file for editor labels, relative to the public root
    pub editor_interface_translation_path: String,

    /// Translation file for frontend labels, relative to the public root
    pub frontend_translation_path: String,

    /// Parsed `EditorInterface.yaml`
    pub editor_interface: serde_yaml_ng::Value,
}
