//! In-memory reference [`Container`].
//!
//! [`MemoryContainer`] is a complete host for embedding and tests: renderers
//! are registered per Rust type, plugin content is merged into one content
//! tree, and compiled templates are cached by descriptor name.
//!
//! ```rust
//! use entity_list_spi::{Container, EntityRenderer, EntityType, MemoryContainer};
//!
//! struct Light { name: String }
//!
//! let container = MemoryContainer::new();
//! container.register_renderer::<Light>(
//!     EntityRenderer::for_type(|l: &Light| Ok(l.name.clone())).with_styles(["css/light.css"]),
//! );
//!
//! let renderer = container.get_entity_renderer(EntityType::of::<Light>()).unwrap();
//! assert_eq!(renderer.styles, vec!["css/light.css"]);
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::container::{Container, ContentSource};
use crate::entity::EntityType;
use crate::error::ContainerError;
use crate::renderer::EntityRenderer;
use crate::template::{CompiledTemplate, MiniJinjaTemplate, TemplateInfo};

/// Thread-safe in-memory host.
#[derive(Default)]
pub struct MemoryContainer {
    content: RwLock<ContentSource>,
    renderers: RwLock<HashMap<EntityType, EntityRenderer>>,
    templates: RwLock<HashMap<&'static str, CompiledTemplate>>,
    // Bumped under the content write lock on every `provide_content`.
    generation: AtomicU64,
}

impl MemoryContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `renderer` to entities of type `T`, replacing any earlier binding.
    pub fn register_renderer<T: Any>(&self, renderer: EntityRenderer) {
        self.register_renderer_for(EntityType::of::<T>(), renderer);
    }

    /// Binds `renderer` to an explicit entity type tag.
    pub fn register_renderer_for(&self, entity_type: EntityType, renderer: EntityRenderer) {
        write_lock(&self.renderers).insert(entity_type, renderer);
    }

    /// Drops every cached compiled template, forcing recompilation.
    pub fn clear_template_cache(&self) {
        write_lock(&self.templates).clear();
    }

    /// Content registered at `path`, if any.
    pub fn content(&self, path: &str) -> Option<String> {
        read_lock(&self.content).get(path).map(str::to_string)
    }

    /// Compiles `info` against the current content, returning the content
    /// generation the sources were read from.
    fn compile(&self, info: &TemplateInfo) -> Result<(CompiledTemplate, u64), ContainerError> {
        let content = read_lock(&self.content);
        let generation = self.generation.load(Ordering::Acquire);
        let sources = info
            .paths
            .iter()
            .map(|path| {
                content
                    .get(path)
                    .map(|source| (path.to_string(), source.to_string()))
                    .ok_or_else(|| ContainerError::ContentNotFound {
                        path: path.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        drop(content);

        let instance = MiniJinjaTemplate::compile(info, sources)?;
        debug!(template = info.name, entry = instance.entry(), "compiled template");
        Ok((CompiledTemplate::new(Arc::new(instance), info), generation))
    }

    /// Caches `compiled` unless content changed since it was compiled.
    fn cache(&self, info: &TemplateInfo, compiled: &CompiledTemplate, generation: u64) -> bool {
        let mut templates = write_lock(&self.templates);
        if self.generation.load(Ordering::Acquire) != generation {
            debug!(template = info.name, "content changed during compile, not caching");
            return false;
        }
        templates.insert(info.name, compiled.clone());
        true
    }
}

impl Container for MemoryContainer {
    fn provide_content(&self, content: ContentSource) {
        debug!(files = content.len(), "content provided");
        let mut current = write_lock(&self.content);
        current.merge(content);
        self.generation.fetch_add(1, Ordering::AcqRel);
        drop(current);
        // New content may change what a cached template would compile to.
        self.clear_template_cache();
    }

    fn get_template(&self, info: &TemplateInfo) -> Result<CompiledTemplate, ContainerError> {
        if let Some(compiled) = read_lock(&self.templates).get(info.name) {
            return Ok(compiled.clone());
        }
        let (compiled, generation) = self.compile(info)?;
        self.cache(info, &compiled, generation);
        Ok(compiled)
    }

    fn get_entity_renderer(
        &self,
        entity_type: EntityType,
    ) -> Result<EntityRenderer, ContainerError> {
        read_lock(&self.renderers)
            .get(&entity_type)
            .cloned()
            .ok_or_else(|| ContainerError::RendererNotFound {
                entity_type: entity_type.name().to_string(),
            })
    }
}

// A panic while holding one of these locks cannot leave the maps in a
// half-written state, so poisoning is ignored.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
