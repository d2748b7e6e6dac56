//! Directory-backed catalog source
//!
//! Resources live in `index.md` / `index.mdx` files with a YAML frontmatter
//! block. The collection comes from the nearest ancestor directory named after
//! a collection, so nested layouts such as `domains/Orders/services/Api/` work.
//! Anything below a `versioned/` directory is an archived version.

use super::{apply_options, CatalogSource, QueryOptions};
use crate::error::{CatalogError, CatalogResult};
use crate::resources::{
    Channel, Container, DataProduct, Domain, Entity, Message, MessageKind, Resource, ResourceKind,
    Service,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

const INDEX_FILES: [&str; 2] = ["index.md", "index.mdx"];
const ARCHIVE_DIR: &str = "versioned";

/// Every resource found under one catalog root
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    resources: Vec<Resource>,
}

impl CatalogIndex {
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    fn collect<T>(&self, pick: impl Fn(&Resource) -> Option<&T>) -> Vec<T>
    where
        T: Clone,
    {
        self.resources.iter().filter_map(pick).cloned().collect()
    }
}

/// Read-through cache of scanned catalogs, keyed by catalog root
///
/// Shared by reference between sources. Writers outside this crate call
/// [`CatalogIndexCache::invalidate`] after changing files on disk.
#[derive(Debug, Default)]
pub struct CatalogIndexCache {
    entries: RwLock<HashMap<PathBuf, Arc<CatalogIndex>>>,
}

impl CatalogIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, root: &Path) -> Option<Arc<CatalogIndex>> {
        self.entries.read().get(root).cloned()
    }

    pub fn insert(&self, root: PathBuf, index: CatalogIndex) -> Arc<CatalogIndex> {
        let index = Arc::new(index);
        self.entries.write().insert(root, Arc::clone(&index));
        index
    }

    /// Drop every cached index
    pub fn invalidate(&self) {
        self.entries.write().clear();
    }

    /// Drop the index of one catalog root
    pub fn invalidate_root(&self, root: &Path) {
        self.entries.write().remove(root);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Catalog read from a directory tree
#[derive(Debug)]
pub struct FileCatalog {
    root: PathBuf,
    cache: Arc<CatalogIndexCache>,
    scan_lock: tokio::sync::Mutex<()>,
}

impl FileCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_cache(root, Arc::new(CatalogIndexCache::new()))
    }

    pub fn with_cache(root: impl Into<PathBuf>, cache: Arc<CatalogIndexCache>) -> Self {
        Self {
            root: root.into(),
            cache,
            scan_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache(&self) -> &Arc<CatalogIndexCache> {
        &self.cache
    }

    /// The cached index, scanning the directory on a miss
    pub async fn index(&self) -> CatalogResult<Arc<CatalogIndex>> {
        if let Some(index) = self.cache.get(&self.root) {
            return Ok(index);
        }

        let _guard = self.scan_lock.lock().await;
        if let Some(index) = self.cache.get(&self.root) {
            return Ok(index);
        }

        let root = self.root.clone();
        let index = tokio::task::spawn_blocking(move || scan_catalog(&root))
            .await
            .map_err(|e| CatalogError::Source(format!("catalog scan task failed: {e}")))??;
        Ok(self.cache.insert(self.root.clone(), index))
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn services(&self, options: &QueryOptions) -> CatalogResult<Vec<Service>> {
        let index = self.index().await?;
        let services = index.collect(|r| match r {
            Resource::Service(service) => Some(service),
            _ => None,
        });
        Ok(apply_options(services, options))
    }

    async fn messages(&self, kind: MessageKind, options: &QueryOptions) -> CatalogResult<Vec<Message>> {
        let index = self.index().await?;
        let messages = index.collect(|r| match r {
            Resource::Message(message) if message.kind == kind => Some(message),
            _ => None,
        });
        Ok(apply_options(messages, options))
    }

    async fn channels(&self, options: &QueryOptions) -> CatalogResult<Vec<Channel>> {
        let index = self.index().await?;
        let channels = index.collect(|r| match r {
            Resource::Channel(channel) => Some(channel),
            _ => None,
        });
        Ok(apply_options(channels, options))
    }

    async fn containers(&self, options: &QueryOptions) -> CatalogResult<Vec<Container>> {
        let index = self.index().await?;
        let containers = index.collect(|r| match r {
            Resource::Container(container) => Some(container),
            _ => None,
        });
        Ok(apply_options(containers, options))
    }

    async fn domains(&self, options: &QueryOptions) -> CatalogResult<Vec<Domain>> {
        let index = self.index().await?;
        let domains = index.collect(|r| match r {
            Resource::Domain(domain) => Some(domain),
            _ => None,
        });
        Ok(apply_options(domains, options))
    }

    async fn data_products(&self, options: &QueryOptions) -> CatalogResult<Vec<DataProduct>> {
        let index = self.index().await?;
        let products = index.collect(|r| match r {
            Resource::DataProduct(product) => Some(product),
            _ => None,
        });
        Ok(apply_options(products, options))
    }

    async fn entities(&self, options: &QueryOptions) -> CatalogResult<Vec<Entity>> {
        let index = self.index().await?;
        let entities = index.collect(|r| match r {
            Resource::Entity(entity) => Some(entity),
            _ => None,
        });
        Ok(apply_options(entities, options))
    }
}

/// Walk a catalog directory and parse every resource file
pub fn scan_catalog(root: &Path) -> CatalogResult<CatalogIndex> {
    if !root.is_dir() {
        return Err(CatalogError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "catalog root is not a directory"),
        ));
    }

    let mut resources = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !INDEX_FILES.contains(&file_name.as_ref()) {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let Some(kind) = collection_of(relative) else {
            tracing::debug!(path = %path.display(), "index file outside any collection");
            continue;
        };

        let mut resource = read_resource(path, kind)?;
        if is_archived(relative) {
            resource.meta_mut().archived = true;
        }
        resources.push(resource);
    }

    tracing::info!(root = %root.display(), resources = resources.len(), "indexed catalog");
    Ok(CatalogIndex { resources })
}

fn read_resource(path: &Path, kind: ResourceKind) -> CatalogResult<Resource> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let frontmatter =
        extract_frontmatter(&content).ok_or_else(|| CatalogError::MissingFrontmatter(path.to_path_buf()))?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(frontmatter).map_err(|source| CatalogError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;
    Resource::from_frontmatter(kind, value).map_err(|source| CatalogError::Frontmatter {
        path: path.to_path_buf(),
        source,
    })
}

/// Nearest ancestor directory naming a collection
fn collection_of(relative: &Path) -> Option<ResourceKind> {
    let parent = relative.parent()?;
    parent
        .components()
        .rev()
        .filter_map(|component| match component {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .find_map(ResourceKind::from_collection)
}

fn is_archived(relative: &Path) -> bool {
    relative
        .components()
        .any(|component| component.as_os_str() == ARCHIVE_DIR)
}

/// The YAML between the opening and closing `---` lines
fn extract_frontmatter(content: &str) -> Option<&str> {
    let rest = content.trim_start_matches('\u{feff}').strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;
    if rest.starts_with("---") {
        return Some("");
    }
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}
