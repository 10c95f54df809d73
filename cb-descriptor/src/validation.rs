use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use cb_core::error::CbError;

use crate::types::{ContentBlockDescriptor, IconProviderKind, DEFAULT_TRANSLATION_FILE};

/// Ids made of these characters are safe to use as database values and CSS
/// class names; anything else only earns a warning.
static PORTABLE_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$")
        .expect("Content type id regex should compile - this is a static pattern")
});

/// A descriptor field that breaks a structural rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
    pub fix: Option<&'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(fix) = self.fix {
            write!(f, " ({})", fix)?;
        }
        Ok(())
    }
}

/// Findings for one content block
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub content_type_id: String,
    pub block_path: String,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn for_descriptor(descriptor: &ContentBlockDescriptor) -> Self {
        Self {
            content_type_id: descriptor.content_type_id.clone(),
            block_path: descriptor.path.clone(),
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.reject_with_fix(field, message, None);
    }

    pub fn reject_with_fix(
        &mut self,
        field: &'static str,
        message: impl Into<String>,
        fix: Option<&'static str>,
    ) {
        self.errors.push(ValidationError {
            field,
            message: message.into(),
            fix,
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// `Ok(self)` when nothing was rejected, otherwise an `InvalidDescriptor`
    /// naming the block and every rejected field.
    pub fn into_result(self) -> Result<Self, CbError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(CbError::InvalidDescriptor(self.to_string()))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.content_type_id, self.block_path)?;
        for (i, error) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, error)?;
        }
        Ok(())
    }
}

/// Checks an assembled descriptor before it is handed out.
pub trait DescriptorValidator {
    fn validate(&self, descriptor: &ContentBlockDescriptor) -> ValidationReport;
}

/// Checks the keys and shapes every content block must have.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl DescriptorValidator for StructuralValidator {
    fn validate(&self, descriptor: &ContentBlockDescriptor) -> ValidationReport {
        let mut report = ValidationReport::for_descriptor(descriptor);

        check_content_type_id(&descriptor.content_type_id, &mut report);
        check_path(&descriptor.path, &mut report);
        check_icon(&descriptor.icon, descriptor.icon_provider, &mut report);
        check_editor_interface(&descriptor.editor_interface, &mut report);
        check_translations(descriptor, &mut report);

        report
    }
}

fn check_content_type_id(id: &str, report: &mut ValidationReport) {
    if id.trim().is_empty() {
        report.reject_with_fix(
            "content_type_id",
            "Content type id cannot be empty",
            Some("set a 'name' like 'vendor/package' in composer.json"),
        );
    } else if !PORTABLE_ID_REGEX.is_match(id) {
        report.warn(format!(
            "Content type id '{}' contains characters other than ASCII letters, digits, '.', '-' and '_'",
            id
        ));
    }
}

fn check_path(path: &str, report: &mut ValidationReport) {
    if !path.ends_with(std::path::MAIN_SEPARATOR) {
        report.reject("path", "block path must end with a path separator");
    }
}

fn check_icon(icon: &str, provider: IconProviderKind, report: &mut ValidationReport) {
    let kind = icon
        .rsplit_once('.')
        .and_then(|(_, ext)| IconProviderKind::from_extension(ext));

    match kind {
        None => report.reject_with_fix(
            "icon",
            format!("Unsupported icon file '{}'", icon),
            Some("provide ContentBlockIcon.svg, .png or .gif"),
        ),
        Some(kind) if kind != provider => report.reject(
            "icon",
            format!("Icon '{}' does not match icon provider {:?}", icon, provider),
        ),
        Some(_) => {}
    }
}

fn check_editor_interface(value: &serde_yaml_ng::Value, report: &mut ValidationReport) {
    use serde_yaml_ng::Value;

    const FIX: Option<&str> = Some("describe the block fields as a YAML mapping");

    match value {
        Value::Mapping(map) if map.is_empty() => {
            report.warn("EditorInterface.yaml is empty. The block will have no editable fields.")
        }
        Value::Mapping(_) | Value::Sequence(_) => {}
        Value::Null => {
            report.reject_with_fix("editor_interface", "EditorInterface.yaml has no content", FIX)
        }
        _ => report.reject_with_fix(
            "editor_interface",
            "EditorInterface.yaml must contain a mapping or a list",
            FIX,
        ),
    }
}

fn check_translations(descriptor: &ContentBlockDescriptor, report: &mut ValidationReport) {
    let editor = &descriptor.editor_interface_translation_path;
    let frontend = &descriptor.frontend_translation_path;

    if editor.is_empty() || frontend.is_empty() {
        report.reject("translations", "Translation paths cannot be empty");
        return;
    }

    if !editor.ends_with(DEFAULT_TRANSLATION_FILE) && editor != frontend {
        report.warn(format!(
            "No {} found; separate translation files are used without checking they exist",
            DEFAULT_TRANSLATION_FILE
        ));
    }
}
