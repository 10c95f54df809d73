use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use cb_core::error::CbError;
use cb_core::file_system::LocalFileSystem;
use cb_core::paths::ContentBlockPaths;
use cb_descriptor::{DescriptorResolver, IconProviderKind};

fn create_block(base_dir: &Path, name: &str, package_name: Option<&str>) -> anyhow::Result<PathBuf> {
    let dir = base_dir.join(name);
    fs::create_dir_all(dir.join("src").join("Language"))?;

    if let Some(package_name) = package_name {
        fs::write(
            dir.join("composer.json"),
            format!(r#"{{"name": "{}", "type": "typo3-contentblock"}}"#, package_name),
        )?;
    }

    let editor_interface = r#"title: Hero banner
fields:
  - identifier: header
    type: Text
  - identifier: image
    type: Image
    properties:
      maxItems: 1
"#;
    fs::write(dir.join("EditorInterface.yaml"), editor_interface)?;
    fs::write(dir.join("ContentBlockIcon.png"), [0x89, b'P', b'N', b'G'])?;
    fs::write(dir.join("src").join("Language").join("Default.xlf"), "<xliff/>")?;

    Ok(dir)
}

#[test]
fn test_resolve_complete_block() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = ContentBlockPaths::new(temp_dir.path());
    let dir = create_block(&paths.base_dir(), "hero", Some("acme/hero-banner"))?;

    let descriptor = DescriptorResolver::new(&LocalFileSystem, &paths).resolve(&dir)?;

    assert_eq!(descriptor.content_type_id, "acme_hero-banner");
    assert_eq!(descriptor.icon, "typo3conf/contentBlocks/hero/ContentBlockIcon.png");
    assert_eq!(descriptor.icon_provider, IconProviderKind::Raster);
    assert_eq!(
        descriptor.frontend_translation_path,
        "typo3conf/contentBlocks/hero/src/Language/Default.xlf"
    );

    let fields = descriptor.editor_interface["fields"]
        .as_sequence()
        .expect("fields should be a list");
    assert_eq!(fields.len(), 2);
    assert_eq!(descriptor.editor_interface["title"].as_str(), Some("Hero banner"));
    Ok(())
}

#[test]
fn test_resolve_through_symlink_records_real_path() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = ContentBlockPaths::new(temp_dir.path());
    let target = create_block(&temp_dir.path().join("vendor"), "hero", None)?;
    fs::create_dir_all(paths.base_dir())?;

    let link = paths.base_dir().join("hero");
    #[cfg(unix)]
    std::os::unix::fs::symlink(&target, &link)?;
    #[cfg(windows)]
    std::os::windows::fs::symlink_dir(&target, &link)?;

    let descriptor = DescriptorResolver::new(&LocalFileSystem, &paths).resolve(&link)?;

    assert!(descriptor
        .path
        .starts_with(fs::canonicalize(&target)?.to_str().unwrap()));
    assert_eq!(descriptor.content_type_id, "cb_novendor_hero");
    assert_eq!(descriptor.icon, "typo3conf/contentBlocks/hero/ContentBlockIcon.png");
    Ok(())
}

#[test]
fn test_missing_directory_is_filesystem_error() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ContentBlockPaths::new(temp_dir.path());

    let result = DescriptorResolver::new(&LocalFileSystem, &paths)
        .resolve(&paths.base_dir().join("does-not-exist"));
    assert!(matches!(result, Err(CbError::Filesystem(_))));
}
