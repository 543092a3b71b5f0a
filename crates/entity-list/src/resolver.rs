//! Per-call renderer resolution.
//!
//! [`RenderContext`] lives for exactly one list render. It caches the
//! renderer of every entity type it has seen and, on the first lookup of a
//! type, feeds that renderer's stylesheets and scripts into the pass's
//! [`Dependencies`]. Later lookups of the same type are served from the cache
//! without touching the container or the dependency lists.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use entity_list_spi::{CompiledTemplate, Container, Entity, EntityRenderer, EntityType, ListError};
use tracing::{debug, error};

use crate::dependencies::Dependencies;

/// Renderer cache and dependency aggregator for one render pass.
pub struct RenderContext<'c> {
    container: &'c dyn Container,
    renderers: HashMap<EntityType, EntityRenderer>,
    dependencies: Dependencies,
}

impl<'c> RenderContext<'c> {
    /// Starts a pass seeded with `template`'s declared dependencies.
    pub fn new(container: &'c dyn Container, template: &CompiledTemplate) -> Self {
        Self::with_dependencies(
            container,
            Dependencies::seeded(&template.styles, &template.scripts),
        )
    }

    /// Starts a pass from an already seeded aggregator.
    pub fn with_dependencies(container: &'c dyn Container, dependencies: Dependencies) -> Self {
        Self {
            container,
            renderers: HashMap::new(),
            dependencies,
        }
    }

    /// Returns the renderer for `entity`'s concrete type.
    ///
    /// Pointer wrappers are already transparent at the [`Entity`] level, so
    /// `Arc<T>` and `T` share one cache entry.
    pub fn resolve(&mut self, entity: &dyn Entity) -> Result<EntityRenderer, ListError> {
        let entity_type = entity.entity_type();

        match self.renderers.entry(entity_type) {
            Entry::Occupied(cached) => Ok(cached.get().clone()),
            Entry::Vacant(slot) => {
                let renderer = self
                    .container
                    .get_entity_renderer(entity_type)
                    .map_err(|source| {
                        error!(entity_type = entity_type.name(), %source, "renderer lookup failed");
                        ListError::Renderer {
                            entity_type: entity_type.name().to_string(),
                            source,
                        }
                    })?;

                debug!(
                    entity_type = entity_type.name(),
                    styles = renderer.styles.len(),
                    scripts = renderer.scripts.len(),
                    "resolved entity renderer"
                );
                self.dependencies.append_styles(&renderer.styles);
                self.dependencies.append_scripts(&renderer.scripts);
                Ok(slot.insert(renderer).clone())
            }
        }
    }

    /// Number of distinct types resolved so far.
    pub fn resolved_types(&self) -> usize {
        self.renderers.len()
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// Ends the pass, keeping only the aggregated dependencies.
    pub fn into_dependencies(self) -> Dependencies {
        self.dependencies
    }
}
