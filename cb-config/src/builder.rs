//! Configuration of all content blocks below the base directory.
//!
//! The configuration is built once and then served from the cache until the
//! cache entry is invalidated. A build is all-or-nothing: the first block
//! that fails to resolve aborts it and nothing is cached.

use indexmap::IndexMap;
use tracing::{debug, info, instrument, warn};

use cb_core::error::Result;
use cb_core::file_system::{FileSystem, LocalFileSystem};
use cb_core::paths::ContentBlockPaths;
use cb_descriptor::{
    ContentBlockDescriptor, DescriptorResolver, DescriptorValidator, StructuralValidator,
};

use crate::cache::{CacheLifetime, CacheStore};

/// Cache key of the built configuration
pub const CACHE_CONFIGURATION_ENTRY: &str = "content_blocks_configuration";

/// Content block descriptors keyed by content type id
pub type ConfigurationMap = IndexMap<String, ContentBlockDescriptor>;

pub struct ConfigurationBuilder<F: FileSystem, C: CacheStore> {
    fs: F,
    cache: C,
    paths: ContentBlockPaths,
    validator: Box<dyn DescriptorValidator>,
}

impl<C: CacheStore> ConfigurationBuilder<LocalFileSystem, C> {
    /// Builder over the local filesystem with paths taken from the environment.
    pub fn from_env(cache: C) -> Self {
        Self::new(LocalFileSystem, cache, ContentBlockPaths::from_env())
    }
}

impl<F: FileSystem, C: CacheStore> ConfigurationBuilder<F, C> {
    pub fn new(fs: F, cache: C, paths: ContentBlockPaths) -> Self {
        Self {
            fs,
            cache,
            paths,
            validator: Box::new(StructuralValidator),
        }
    }

    /// Replace the validator run over every resolved descriptor.
    pub fn with_validator(mut self, validator: impl DescriptorValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn paths(&self) -> &ContentBlockPaths {
        &self.paths
    }

    /// Return the cached configuration, building and caching it on a miss.
    #[instrument(skip(self))]
    pub fn get_configuration(&self) -> Result<ConfigurationMap> {
        if let Some(cached) = self.cache.get(CACHE_CONFIGURATION_ENTRY) {
            match serde_yaml_ng::from_str::<ConfigurationMap>(&cached) {
                Ok(configuration) => {
                    debug!(
                        "Configuration found in cache ({} content blocks)",
                        configuration.len()
                    );
                    return Ok(configuration);
                }
                Err(e) => warn!("Discarding unreadable cached configuration: {}", e),
            }
        }

        debug!("Configuration not in cache, scanning filesystem");
        let configuration = self.build_configuration()?;

        let serialized = serde_yaml_ng::to_string(&configuration)?;
        self.cache.set(
            CACHE_CONFIGURATION_ENTRY,
            serialized,
            CacheLifetime::Indefinite,
        );

        Ok(configuration)
    }

    /// Scan the base directory and resolve every content block, bypassing the cache.
    #[instrument(skip(self), fields(base_dir = ?self.paths.base_dir()))]
    pub fn build_configuration(&self) -> Result<ConfigurationMap> {
        let base_dir = self.paths.base_dir();
        let resolver =
            DescriptorResolver::new(&self.fs, &self.paths).with_validator(&*self.validator);

        let mut configuration = ConfigurationMap::new();
        for dir in self.fs.list_dirs(&base_dir)? {
            let descriptor = resolver.resolve(&dir)?;
            let path = descriptor.path.clone();

            if let Some(previous) = configuration.insert(descriptor.content_type_id.clone(), descriptor)
            {
                warn!(
                    "Content type '{}' in {} replaces the one in {}",
                    previous.content_type_id, path, previous.path
                );
            }
        }

        info!("Built configuration for {} content blocks", configuration.len());
        Ok(configuration)
    }

    /// Drop the cached configuration so the next access rebuilds it.
    pub fn clear_cache(&self) {
        info!("Clearing cached content block configuration");
        self.cache.invalidate(CACHE_CONFIGURATION_ENTRY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use cb_core::error::CbError;
    use cb_descriptor::ValidationReport;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_block(base_dir: &Path, name: &str, package_name: Option<&str>) {
        let dir = base_dir.join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(package_name) = package_name {
            fs::write(
                dir.join("composer.json"),
                format!(r#"{{"name": "{}"}}"#, package_name),
            )
            .unwrap();
        }
        fs::write(dir.join("EditorInterface.yaml"), format!("title: {}\n", name)).unwrap();
        fs::write(dir.join("ContentBlockIcon.svg"), "<svg/>").unwrap();
    }

    fn setup() -> (TempDir, ContentBlockPaths) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = ContentBlockPaths::new(temp_dir.path());
        fs::create_dir_all(paths.base_dir()).unwrap();
        (temp_dir, paths)
    }

    #[test]
    fn test_empty_base_directory() -> anyhow::Result<()> {
        let (_temp, paths) = setup();
        let builder = ConfigurationBuilder::new(LocalFileSystem, MemoryCache::new(), paths);

        assert!(builder.build_configuration()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_base_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ContentBlockPaths::new(temp_dir.path());
        let builder = ConfigurationBuilder::new(LocalFileSystem, MemoryCache::new(), paths);

        assert!(matches!(
            builder.build_configuration(),
            Err(CbError::Filesystem(_))
        ));
    }

    #[test]
    fn test_keys_are_content_type_ids() -> anyhow::Result<()> {
        let (_temp, paths) = setup();
        create_block(&paths.base_dir(), "widget", Some("acme/widget"));
        create_block(&paths.base_dir(), "teaser", None);
        fs::write(paths.base_dir().join("notes.txt"), "ignored")?;

        let builder = ConfigurationBuilder::new(LocalFileSystem, MemoryCache::new(), paths);
        let configuration = builder.build_configuration()?;

        let keys: Vec<_> = configuration.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["cb_novendor_teaser", "acme_widget"]);
        Ok(())
    }

    #[test]
    fn test_duplicate_id_last_one_wins() -> anyhow::Result<()> {
        let (_temp, paths) = setup();
        create_block(&paths.base_dir(), "a-widget", Some("acme/widget"));
        create_block(&paths.base_dir(), "b-widget", Some("acme/widget"));

        let builder = ConfigurationBuilder::new(LocalFileSystem, MemoryCache::new(), paths);
        let configuration = builder.build_configuration()?;

        assert_eq!(configuration.len(), 1);
        let descriptor = &configuration["acme_widget"];
        assert_eq!(descriptor.editor_interface["title"].as_str(), Some("b-widget"));
        Ok(())
    }

    #[test]
    fn test_failed_build_caches_nothing() {
        let (_temp, paths) = setup();
        create_block(&paths.base_dir(), "good", Some("acme/good"));
        fs::create_dir_all(paths.base_dir().join("broken")).unwrap();

        let cache = Arc::new(MemoryCache::new());
        let builder = ConfigurationBuilder::new(LocalFileSystem, Arc::clone(&cache), paths);

        let err = builder.get_configuration().unwrap_err();
        assert!(matches!(err, CbError::MissingRequiredFile(_)));
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_custom_validator_aborts_build() {
        struct NoTeasers;

        impl DescriptorValidator for NoTeasers {
            fn validate(&self, descriptor: &ContentBlockDescriptor) -> ValidationReport {
                let mut report = ValidationReport::for_descriptor(descriptor);
                if descriptor.content_type_id.contains("teaser") {
                    report.reject("content_type_id", "teasers are retired");
                }
                report
            }
        }

        let (_temp, paths) = setup();
        create_block(&paths.base_dir(), "teaser", None);

        let builder = ConfigurationBuilder::new(LocalFileSystem, MemoryCache::new(), paths)
            .with_validator(NoTeasers);
        let err = builder.build_configuration().unwrap_err();
        assert!(matches!(err, CbError::InvalidDescriptor(_)));
        assert!(err.to_string().contains("teasers are retired"));
    }

    #[test]
    fn test_clear_cache_forces_rebuild() -> anyhow::Result<()> {
        let (_temp, paths) = setup();
        create_block(&paths.base_dir(), "widget", Some("acme/widget"));

        let cache = Arc::new(MemoryCache::new());
        let builder =
            ConfigurationBuilder::new(LocalFileSystem, Arc::clone(&cache), paths.clone());
        assert_eq!(builder.get_configuration()?.len(), 1);

        create_block(&paths.base_dir(), "teaser", None);
        assert_eq!(builder.get_configuration()?.len(), 1);

        builder.clear_cache();
        assert_eq!(builder.get_configuration()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_unreadable_cache_entry_is_rebuilt() -> anyhow::Result<()> {
        let (_temp, paths) = setup();
        create_block(&paths.base_dir(), "widget", Some("acme/widget"));

        let cache = Arc::new(MemoryCache::new());
        cache.set(
            CACHE_CONFIGURATION_ENTRY,
            "- not a configuration".to_string(),
            CacheLifetime::Indefinite,
        );

        let builder = ConfigurationBuilder::new(LocalFileSystem, Arc::clone(&cache), paths);
        let configuration = builder.get_configuration()?;
        assert!(configuration.contains_key("acme_widget"));

        let cached = cache.get(CACHE_CONFIGURATION_ENTRY).unwrap_or_default();
        assert!(cached.contains("acme_widget"));
        Ok(())
    }
}
