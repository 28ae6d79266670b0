/// Resource identifiers and the asset catalog
///
/// Controllers refer to sounds by raw numeric ids. The catalog maps those
/// ids to audio files and keeps the decoded-ready bytes in memory.
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{AudioError, ConfigError};

/// Validated identifier of a decodable audio asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(NonZeroU32);

impl ResourceId {
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for ResourceId {
    type Error = AudioError;

    /// Zero is never a valid asset id.
    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(raw)
            .map(ResourceId)
            .ok_or(AudioError::InvalidResource(raw))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource #{}", self.0)
    }
}

/// Maps resource ids to audio files, caching file contents after first use
#[derive(Debug, Default)]
pub struct AssetCatalog {
    paths: HashMap<ResourceId, PathBuf>,
    cache: Mutex<HashMap<ResourceId, Arc<Vec<u8>>>>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from the configured asset list.
    ///
    /// Relative paths are resolved against `base_dir`.
    pub fn from_config(config: &Config, base_dir: &Path) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut catalog = Self::new();
        for entry in &config.assets {
            let id = ResourceId::try_from(entry.id)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            catalog.register(id, base_dir.join(&entry.path));
        }

        tracing::debug!("Asset catalog built with {} entries", catalog.len());
        Ok(catalog)
    }

    /// Register (or re-point) an asset. Drops any cached bytes for the id.
    pub fn register(&mut self, id: ResourceId, path: impl AsRef<Path>) {
        self.paths.insert(id, path.as_ref().to_path_buf());
        self.cache.get_mut().remove(&id);
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.paths.contains_key(&id)
    }

    pub fn path(&self, id: ResourceId) -> Option<&Path> {
        self.paths.get(&id).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Return the asset bytes, reading the file on first access
    pub fn load(&self, id: ResourceId) -> Result<Arc<Vec<u8>>, AudioError> {
        if let Some(data) = self.cache.lock().get(&id) {
            return Ok(Arc::clone(data));
        }

        let path = self.paths.get(&id).ok_or(AudioError::UnknownResource(id))?;
        let data = std::fs::read(path).map_err(|e| AudioError::ResourceCreation {
            resource: id,
            source: Box::new(e),
        })?;
        if data.is_empty() {
            return Err(AudioError::ResourceCreation {
                resource: id,
                source: format!("audio file is empty: {}", path.display()).into(),
            });
        }

        tracing::info!(
            "Preloaded audio for {}: {} ({} bytes)",
            id,
            path.display(),
            data.len()
        );

        let data = Arc::new(data);
        self.cache.lock().insert(id, Arc::clone(&data));
        Ok(data)
    }

    /// Warm the cache for every registered asset.
    ///
    /// Returns how many assets loaded; failures are logged and skipped.
    pub fn preload_all(&self) -> usize {
        let mut loaded = 0;
        for &id in self.paths.keys() {
            match self.load(id) {
                Ok(_) => loaded += 1,
                Err(e) => tracing::warn!("Skipping {}: {}", id, e),
            }
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_temp_asset(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_zero_id_rejected() {
        assert!(matches!(
            ResourceId::try_from(0),
            Err(AudioError::InvalidResource(0))
        ));
        assert_eq!(ResourceId::try_from(42).unwrap().get(), 42);
    }

    #[test]
    fn test_resource_display() {
        let id = ResourceId::try_from(7).unwrap();
        assert_eq!(id.to_string(), "resource #7");
    }

    #[test]
    fn test_unknown_resource() {
        let catalog = AssetCatalog::new();
        let id = ResourceId::try_from(3).unwrap();
        assert!(matches!(
            catalog.load(id),
            Err(AudioError::UnknownResource(_))
        ));
    }

    #[test]
    fn test_missing_file_is_creation_failure() {
        let mut catalog = AssetCatalog::new();
        let id = ResourceId::try_from(5).unwrap();
        catalog.register(id, "/nonexistent/fortune-sounds/missing.mp3");

        let err = catalog.load(id).unwrap_err();
        assert!(err.is_creation_failure());
        assert!(matches!(err, AudioError::ResourceCreation { .. }));
    }

    #[test]
    fn test_load_caches_bytes() {
        let path = write_temp_asset("fortune_sounds_catalog_cache.bin", &[1, 2, 3, 4]);
        let mut catalog = AssetCatalog::new();
        let id = ResourceId::try_from(11).unwrap();
        catalog.register(id, &path);

        let first = catalog.load(id).unwrap();
        let _ = std::fs::remove_file(&path);
        let second = catalog.load(id).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.preload_all(), 1);
    }

    #[test]
    fn test_empty_file_rejected() {
        let path = write_temp_asset("fortune_sounds_catalog_empty.bin", &[]);
        let mut catalog = AssetCatalog::new();
        let id = ResourceId::try_from(12).unwrap();
        catalog.register(id, &path);

        let result = catalog.load(id);
        let _ = std::fs::remove_file(path);
        assert!(result.is_err());
    }
}
