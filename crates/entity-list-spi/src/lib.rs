//! # Entity List SPI - Host/Plugin Contract
//!
//! `entity-list-spi` defines what a host application and a list-rendering
//! plugin agree on:
//!
//! - [`Entity`] / [`EntityType`]: renderable domain values and the explicit
//!   type tag renderers are bound to
//! - [`EntityRenderer`]: per-type render function plus stylesheet and script
//!   dependencies
//! - [`TemplateInfo`] / [`CompiledTemplate`]: template descriptors and their
//!   executable form ([`TemplateInstance`], default [`MiniJinjaTemplate`])
//! - [`Container`]: the host services a plugin calls into
//! - [`Plugin`] / [`RenderPlugin`]: plugin lifecycle and the list entry point
//! - [`MemoryContainer`]: a complete in-memory host
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use entity_list_spi::{
//!     Container, ContentSource, Entity, EntityRenderer, MemoryContainer, TemplateInfo,
//! };
//!
//! struct Light { name: String }
//! impl Entity for Light {}
//!
//! let container = Arc::new(MemoryContainer::new());
//! container.register_renderer::<Light>(EntityRenderer::for_type(|l: &Light| {
//!     Ok(format!("<li>{}</li>", l.name))
//! }));
//! container.provide_content(
//!     ContentSource::new().with_file("templates/title.html.j2", "<h1>{{ title }}</h1>"),
//! );
//!
//! let info = TemplateInfo {
//!     name: "title",
//!     paths: &["templates/title.html.j2"],
//!     styles: &[],
//!     scripts: &[],
//!     functions: &[],
//! };
//! let compiled = container.get_template(&info).unwrap();
//!
//! let mut out = Vec::new();
//! compiled.execute(&mut out, entity_list_spi::minijinja::context! { title => "Lights" }).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "<h1>Lights</h1>");
//!
//! let light: Arc<dyn Entity> = Arc::new(Light { name: "porch".into() });
//! let renderer = container.get_entity_renderer(light.entity_type()).unwrap();
//! assert_eq!(renderer.render(light.as_any()).unwrap(), "<li>porch</li>");
//! ```

mod container;
mod entity;
mod error;
mod memory;
mod renderer;
mod template;

pub use container::{Container, ContentSource, Plugin, RenderListOptions, RenderPlugin};
pub use entity::{AsAnyEntity, Entity, EntityType};
pub use error::{ContainerError, ListError, RenderError};
pub use memory::MemoryContainer;
pub use renderer::{EntityRenderFn, EntityRenderer};
pub use template::{
    CompiledTemplate, MiniJinjaTemplate, TemplateFunction, TemplateInfo, TemplateInstance,
};

// Template functions and contexts are expressed in minijinja types.
pub use minijinja;
