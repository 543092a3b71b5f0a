//! The host container and the plugin lifecycle.
//!
//! A host owns a [`Container`]: it keeps the content plugins provide, compiles
//! templates, and maps entity types to renderers. Plugins implement
//! [`Plugin`] (and [`RenderPlugin`] when they render entity lists) and only
//! ever talk to the host through the container handed to them in
//! [`Plugin::init`].

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use crate::entity::{Entity, EntityType};
use crate::error::{ContainerError, ListError};
use crate::renderer::EntityRenderer;
use crate::template::{CompiledTemplate, TemplateInfo};

/// Files a plugin contributes to the host, keyed by content path
/// (`templates/entity_list.html.j2`, `static/css/entity_list.css`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSource {
    files: BTreeMap<String, String>,
}

impl ContentSource {
    /// Creates an empty content source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any previous content at the same path.
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Looks up a file by path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|s| s.as_str())
    }

    /// Iterates paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    /// Moves every file of `other` into `self`.
    pub fn merge(&mut self, other: ContentSource) {
        self.files.extend(other.files);
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no files are registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Services a host offers to its plugins.
///
/// Lookups are synchronous and may be called from several render calls at
/// once; any caching or locking is the implementation's business.
pub trait Container: Send + Sync {
    /// Registers content (templates, stylesheets) a plugin ships with.
    fn provide_content(&self, content: ContentSource);

    /// Returns the compiled form of a template descriptor.
    fn get_template(&self, info: &TemplateInfo) -> Result<CompiledTemplate, ContainerError>;

    /// Returns the renderer bound to a concrete entity type.
    fn get_entity_renderer(&self, entity_type: EntityType)
        -> Result<EntityRenderer, ContainerError>;
}

/// Lifecycle every plugin goes through.
pub trait Plugin {
    /// Hands the plugin its container. Called once, before `start`.
    fn init(&mut self, container: Arc<dyn Container>);

    /// Called when the host starts serving.
    fn start(&mut self);

    /// Called when the host shuts down.
    fn stop(&mut self);
}

/// Options for a list render call.
#[derive(Clone, Default)]
pub struct RenderListOptions {
    /// Page title; empty selects the plugin's fallback title.
    pub title: String,
    /// Entity shown above the items, if any.
    pub header: Option<Arc<dyn Entity>>,
}

impl RenderListOptions {
    /// Options with a title and no header.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            header: None,
        }
    }

    /// Sets the header entity.
    pub fn with_header(mut self, header: Arc<dyn Entity>) -> Self {
        self.header = Some(header);
        self
    }
}

impl std::fmt::Debug for RenderListOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderListOptions")
            .field("title", &self.title)
            .field("header", &self.header.as_ref().map(|h| h.entity_type()))
            .finish()
    }
}

/// A plugin able to render a list of heterogeneous entities.
pub trait RenderPlugin: Plugin {
    /// Renders `items` (and the optional header) as one page fragment into
    /// `sink`.
    fn render_list(
        &self,
        sink: &mut dyn Write,
        options: RenderListOptions,
        items: Vec<Arc<dyn Entity>>,
    ) -> Result<(), ListError>;
}
