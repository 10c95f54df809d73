//! Turns one content block directory into a [`ContentBlockDescriptor`].
//!
//! Resolution order:
//! 1. `composer.json` yields the content type id (`vendor_package`), or
//!    `cb_novendor_<dir>` when the block ships without one.
//! 2. `EditorInterface.yaml` is mandatory and parsed as-is.
//! 3. `src/Language/Default.xlf` serves both editor and frontend labels when
//!    present; otherwise `EditorInterface.xlf` and `Frontend.xlf` are recorded
//!    without checking that they exist.
//! 4. The first of `ContentBlockIcon.svg`, `.png`, `.gif` is the icon.
//! 5. The assembled descriptor is validated.
//!
//! Paths handed to the frontend (icon, translations) are relative to the
//! public root and always use `/`.

use serde_json::Value as JsonValue;
use std::path::{Path, MAIN_SEPARATOR};
use tracing::{debug, instrument, warn};

use cb_core::error::{CbError, Result};
use cb_core::file_system::FileSystem;
use cb_core::paths::ContentBlockPaths;

use crate::types::{
    ContentBlockDescriptor, IconProviderKind, DEFAULT_TRANSLATION_FILE, EDITOR_INTERFACE_FILE,
    EDITOR_INTERFACE_TRANSLATION_FILE, FRONTEND_TRANSLATION_FILE, ICON_BASENAME, ICON_EXTENSIONS,
    LANGUAGE_DIR, NO_VENDOR_PREFIX, PACKAGE_DESCRIPTOR_FILE,
};
use crate::validation::{DescriptorValidator, StructuralValidator};

pub struct DescriptorResolver<'a, F: FileSystem> {
    fs: &'a F,
    paths: &'a ContentBlockPaths,
    validator: &'a dyn DescriptorValidator,
}

impl<'a, F: FileSystem> DescriptorResolver<'a, F> {
    /// Resolver using the [`StructuralValidator`].
    pub fn new(fs: &'a F, paths: &'a ContentBlockPaths) -> Self {
        Self {
            fs,
            paths,
            validator: &StructuralValidator,
        }
    }

    pub fn with_validator(mut self, validator: &'a dyn DescriptorValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Resolve the descriptor of the content block rooted at `dir`.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub fn resolve(&self, dir: &Path) -> Result<ContentBlockDescriptor> {
        let dir_name = dir.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            CbError::Filesystem(format!(
                "Content block directory has no usable name: {}",
                dir.display()
            ))
        })?;

        let real_path = self.fs.canonicalize(dir)?;
        let real_path_str = real_path.to_str().ok_or_else(|| {
            CbError::Filesystem(format!(
                "Content block path is not valid UTF-8: {}",
                real_path.display()
            ))
        })?;
        let mut block_path = real_path_str.to_string();
        if !block_path.ends_with(MAIN_SEPARATOR) {
            block_path.push(MAIN_SEPARATOR);
        }

        let relative_path = self.paths.relative_block_path(dir_name);

        let content_type_id = self.resolve_content_type_id(&real_path, dir_name)?;
        let editor_interface = self.load_editor_interface(&real_path)?;
        let (editor_interface_translation_path, frontend_translation_path) =
            self.resolve_translation_paths(&real_path, &relative_path);
        let (icon, icon_provider) = self.resolve_icon(&real_path, &relative_path, &content_type_id)?;

        let descriptor = ContentBlockDescriptor {
            path: block_path,
            icon,
            icon_provider,
            content_type_id,
            editor_interface_translation_path,
            frontend_translation_path,
            editor_interface,
        };

        let report = self.validator.validate(&descriptor);
        for warning in &report.warnings {
            warn!(content_type_id = %descriptor.content_type_id, "{}", warning);
        }
        report.into_result()?;

        debug!(content_type_id = %descriptor.content_type_id, "Resolved content block");
        Ok(descriptor)
    }

    fn resolve_content_type_id(&self, real_path: &Path, dir_name: &str) -> Result<String> {
        let package_path = real_path.join(PACKAGE_DESCRIPTOR_FILE);
        let fallback = || format!("{}{}", NO_VENDOR_PREFIX, dir_name);

        if !self.fs.is_readable(&package_path) {
            debug!("No {} found, using directory name", PACKAGE_DESCRIPTOR_FILE);
            return Ok(fallback());
        }

        let content = self.fs.read_to_string(&package_path)?;
        if content.trim().is_empty() {
            debug!("{} is empty, using directory name", PACKAGE_DESCRIPTOR_FILE);
            return Ok(fallback());
        }

        let package: JsonValue = serde_json::from_str(&content).map_err(|e| {
            CbError::Serialization(format!(
                "Failed to parse {}: {}",
                package_path.display(),
                e
            ))
        })?;

        if package.is_null() {
            debug!("{} decodes to null, using directory name", PACKAGE_DESCRIPTOR_FILE);
            return Ok(fallback());
        }

        let name = package
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| {
                CbError::InvalidDescriptor(format!(
                    "{} has no 'name' field",
                    package_path.display()
                ))
            })?;

        content_type_id_from_package_name(name).ok_or_else(|| {
            CbError::InvalidDescriptor(format!(
                "Package name '{}' in {} is not of the form 'vendor/package'",
                name,
                package_path.display()
            ))
        })
    }

    fn load_editor_interface(&self, real_path: &Path) -> Result<serde_yaml_ng::Value> {
        let yaml_path = real_path.join(EDITOR_INTERFACE_FILE);

        if !self.fs.is_readable(&yaml_path) {
            return Err(CbError::MissingRequiredFile(format!(
                "{} not found",
                yaml_path.display()
            )));
        }

        let content = self.fs.read_to_string(&yaml_path)?;
        serde_yaml_ng::from_str(&content).map_err(|e| {
            CbError::Serialization(format!("Failed to parse {}: {}", yaml_path.display(), e))
        })
    }

    /// Returns `(editor interface translation, frontend translation)`.
    fn resolve_translation_paths(&self, real_path: &Path, relative_path: &str) -> (String, String) {
        let language_path = format!("{}{}", relative_path, LANGUAGE_DIR);

        if self
            .fs
            .is_readable(&real_path.join(LANGUAGE_DIR).join(DEFAULT_TRANSLATION_FILE))
        {
            let default = format!("{}{}", language_path, DEFAULT_TRANSLATION_FILE);
            return (default.clone(), default);
        }

        (
            format!("{}{}", language_path, EDITOR_INTERFACE_TRANSLATION_FILE),
            format!("{}{}", language_path, FRONTEND_TRANSLATION_FILE),
        )
    }

    fn resolve_icon(
        &self,
        real_path: &Path,
        relative_path: &str,
        content_type_id: &str,
    ) -> Result<(String, IconProviderKind)> {
        for ext in ICON_EXTENSIONS {
            let file_name = format!("{}.{}", ICON_BASENAME, ext);
            if self.fs.is_readable(&real_path.join(&file_name)) {
                let provider = if ext == "svg" {
                    IconProviderKind::Vector
                } else {
                    IconProviderKind::Raster
                };
                return Ok((format!("{}{}", relative_path, file_name), provider));
            }
        }

        Err(CbError::MissingRequiredFile(format!(
            "No icon found for content block {} (expected {}.svg, .png or .gif in {})",
            content_type_id,
            ICON_BASENAME,
            real_path.display()
        )))
    }
}

/// `vendor/package` becomes `vendor_package`. Anything else is rejected.
pub fn content_type_id_from_package_name(name: &str) -> Option<String> {
    let (vendor, package) = name.split_once('/')?;
    if vendor.is_empty() || package.is_empty() || package.contains('/') {
        return None;
    }
    Some(format!("{}_{}", vendor, package))
}
