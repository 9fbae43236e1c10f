//! Asset management system
//!
//! Name-keyed caches of shared handles. Loading itself is the platform's
//! business: callers pass a loader closure, and a failed load is logged and
//! left uncached so the entity that wanted it simply goes without.

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::render::{Material, Model, ShaderProgram, Texture};

/// Asset errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),
}

/// Cache of shared handles keyed by name or path
pub struct ResourceCache<T: ?Sized> {
    entries: HashMap<String, Rc<T>>,
}

impl<T: ?Sized> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: ?Sized> ResourceCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached handle for `name`
    pub fn get(&self, name: &str) -> Result<Rc<T>, AssetError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Whether `name` is cached
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Cache an already-loaded resource, replacing any previous entry
    pub fn insert(&mut self, name: impl Into<String>, resource: Rc<T>) -> Rc<T> {
        let name = name.into();
        log::debug!("Cached asset '{}'", name);
        self.entries.insert(name, Rc::clone(&resource));
        resource
    }

    /// Cached handle, or the result of `loader` (cached only on success)
    pub fn get_or_load<F>(&mut self, name: &str, loader: F) -> Result<Rc<T>, AssetError>
    where
        F: FnOnce(&str) -> Result<Rc<T>, AssetError>,
    {
        if let Some(resource) = self.entries.get(name) {
            return Ok(Rc::clone(resource));
        }
        match loader(name) {
            Ok(resource) => Ok(self.insert(name, resource)),
            Err(err) => {
                log::warn!("Failed to load '{}': {}", name, err);
                Err(err)
            }
        }
    }

    /// Drop entries nothing outside the cache holds; returns how many
    pub fn release_unused(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|name, resource| {
            let used = Rc::strong_count(resource) > 1;
            if !used {
                log::debug!("Released asset '{}'", name);
            }
            used
        });
        before - self.entries.len()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Caches for every resource kind the scene core consumes
///
/// Passed explicitly to whatever builds the scene; there is no global instance.
#[derive(Default)]
pub struct AssetManager {
    /// Shader programs
    pub shaders: ResourceCache<dyn ShaderProgram>,
    /// Drawable models
    pub models: ResourceCache<dyn Model>,
    /// Textures
    pub textures: ResourceCache<dyn Texture>,
    /// Materials
    pub materials: ResourceCache<Material>,
}

impl AssetManager {
    /// Create an empty asset manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Release unused entries from every cache
    pub fn release_unused(&mut self) -> usize {
        let released = self.shaders.release_unused()
            + self.models.release_unused()
            + self.textures.release_unused()
            + self.materials.release_unused();
        if released > 0 {
            log::info!("Released {} unused asset(s)", released);
        }
        released
    }

    /// Total cached entries
    pub fn len(&self) -> usize {
        self.shaders.len() + self.models.len() + self.textures.len() + self.materials.len()
    }

    /// True when every cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
