use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use facetdoc_core::config::IndexSettings;
use facetdoc_core::traits::{IndexProvider, SearchIndex};
use facetdoc_core::{Error, Result};

use crate::index::{IndexOptions, TantivyIndex};
use crate::validate;

/// Opens indexes by name and keeps one handle per name.
///
/// With a root directory each index lives in `root/<name>`; without one
/// indexes are held in RAM for the life of the provider.
pub struct TantivyIndexes {
    root: Option<PathBuf>,
    options: IndexOptions,
    open: Mutex<HashMap<String, Arc<TantivyIndex>>>,
}

impl TantivyIndexes {
    pub fn in_memory(options: IndexOptions) -> Self {
        Self { root: None, options, open: Mutex::new(HashMap::new()) }
    }

    pub fn in_dir(root: impl Into<PathBuf>, options: IndexOptions) -> Self {
        Self { root: Some(root.into()), options, open: Mutex::new(HashMap::new()) }
    }

    /// `base` resolves a relative `settings.dir`.
    pub fn from_settings(settings: &IndexSettings, base: &Path) -> Self {
        let options = IndexOptions::from(settings);
        match settings.resolved_dir(base) {
            Some(root) => Self::in_dir(root, options),
            None => Self::in_memory(options),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

impl IndexProvider for TantivyIndexes {
    fn open(&self, name: &str) -> Result<Arc<dyn SearchIndex>> {
        validate::index_name(name)?;
        let mut open = self
            .open
            .lock()
            .map_err(|_| Error::IndexOpen("index registry is poisoned".to_string()))?;
        if let Some(index) = open.get(name) {
            return Ok(Arc::clone(index) as Arc<dyn SearchIndex>);
        }
        let index = Arc::new(match &self.root {
            Some(root) => TantivyIndex::open_in_dir(name, &root.join(name), self.options)?,
            None => TantivyIndex::create_in_ram(name, self.options)?,
        });
        open.insert(name.to_string(), Arc::clone(&index));
        Ok(index)
    }
}
