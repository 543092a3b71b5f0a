//! # Entity List - Heterogeneous List Widget
//!
//! `entity-list` renders a collection of unrelated domain objects as one
//! HTML fragment. Each object is rendered by the renderer its host registered
//! for its concrete type, and every renderer's stylesheets and scripts are
//! gathered into one ordered list for the page.
//!
//! ## Core Concepts
//!
//! - [`EntityListPlugin`]: the plugin a host initializes and calls
//!   [`render_list`](entity_list_spi::RenderPlugin::render_list) on
//! - [`RenderContext`]: per-call renderer cache; one container lookup per type
//! - [`Dependencies`]: ordered, append-only stylesheet and script references
//! - [`WrappedItem`]: an entity bound to its renderer, rendered lazily by the
//!   template through `RenderItem(item)`
//! - [`ListPayload`] / [`PayloadBuilder`]: what the list template sees
//! - [`PluginConfig`]: fallback title, item failure policy, extra dependencies
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use entity_list::{EntityListPlugin, PluginConfig};
//! use entity_list_spi::{
//!     Entity, EntityRenderer, MemoryContainer, Plugin, RenderListOptions, RenderPlugin,
//! };
//!
//! struct Light { name: String, on: bool }
//! impl Entity for Light {}
//!
//! struct Thermostat { celsius: f32 }
//! impl Entity for Thermostat {}
//!
//! let container = Arc::new(MemoryContainer::new());
//! container.register_renderer::<Light>(
//!     EntityRenderer::for_type(|l: &Light| {
//!         Ok(format!("{} is {}", l.name, if l.on { "on" } else { "off" }))
//!     })
//!     .with_styles(["css/light.css"]),
//! );
//! container.register_renderer::<Thermostat>(EntityRenderer::for_type(|t: &Thermostat| {
//!     Ok(format!("{:.1} °C", t.celsius))
//! }));
//!
//! let mut plugin = EntityListPlugin::new(PluginConfig::default());
//! plugin.init(container);
//! plugin.start();
//!
//! let items: Vec<Arc<dyn Entity>> = vec![
//!     Arc::new(Light { name: "porch".into(), on: true }),
//!     Arc::new(Thermostat { celsius: 21.5 }),
//! ];
//!
//! let mut html = Vec::new();
//! plugin
//!     .render_list(&mut html, RenderListOptions::titled("Devices"), items)
//!     .unwrap();
//!
//! let html = String::from_utf8(html).unwrap();
//! assert!(html.contains("<h1>Devices</h1>"));
//! assert!(html.contains("porch is on"));
//! assert!(html.contains("21.5 °C"));
//! assert!(html.contains(r#"href="css&#x2f;light.css""#));
//! ```
//!
//! ## Failure Handling
//!
//! A missing template or renderer is reported as a resolution failure before
//! anything is written. A renderer failing while the template runs aborts the
//! whole list by default; with [`ItemErrorPolicy::Placeholder`] the failure
//! is logged and an error placeholder is rendered for that item instead.

mod config;
mod dependencies;
mod item;
mod payload;
mod plugin;
mod resolver;

pub use config::{ConfigError, ItemErrorPolicy, PluginConfig, DEFAULT_TITLE};
pub use dependencies::Dependencies;
pub use item::{render_item, WrappedItem};
pub use payload::{ListPayload, PayloadBuilder};
pub use plugin::{
    content, Clock, EntityListPlugin, LIST_STYLESHEET_PATH, LIST_TEMPLATE, LIST_TEMPLATE_PATH,
};
pub use resolver::RenderContext;
