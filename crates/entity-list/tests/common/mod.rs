//! Shared fixtures: sample entities and a container that counts lookups.
#![allow(dead_code)]

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use entity_list::{EntityListPlugin, PluginConfig};
use entity_list_spi::{
    CompiledTemplate, Container, ContainerError, ContentSource, Entity, EntityRenderer,
    EntityType, MemoryContainer, Plugin, TemplateInfo,
};

#[derive(Debug, Clone)]
pub struct Light {
    pub name: String,
}
impl Entity for Light {}

#[derive(Debug, Clone)]
pub struct Sensor {
    pub reading: i32,
}
impl Entity for Sensor {}

#[derive(Debug, Clone)]
pub struct Camera {
    pub id: u32,
}
impl Entity for Camera {}

#[derive(Debug, Clone)]
pub struct Summary {
    pub text: String,
}
impl Entity for Summary {}

pub fn light(name: &str) -> Arc<dyn Entity> {
    Arc::new(Light { name: name.into() })
}

pub fn sensor(reading: i32) -> Arc<dyn Entity> {
    Arc::new(Sensor { reading })
}

pub fn camera(id: u32) -> Arc<dyn Entity> {
    Arc::new(Camera { id })
}

pub fn summary(text: &str) -> Arc<dyn Entity> {
    Arc::new(Summary { text: text.into() })
}

pub fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
}

/// Delegates to a [`MemoryContainer`] while counting every lookup.
#[derive(Default)]
pub struct CountingContainer {
    inner: MemoryContainer,
    renderer_lookups: Mutex<HashMap<EntityType, usize>>,
    template_lookups: AtomicUsize,
}

impl CountingContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container with renderers for `Light`, `Sensor` and `Summary`, but not
    /// `Camera`.
    pub fn with_home_renderers() -> Self {
        let container = Self::new();
        container.register::<Light>(
            EntityRenderer::for_type(|l: &Light| Ok(format!("<span class=\"light\">{}</span>", l.name)))
                .with_styles(["css/light.css"]),
        );
        container.register::<Sensor>(
            EntityRenderer::for_type(|s: &Sensor| Ok(format!("<span class=\"sensor\">{}</span>", s.reading)))
                .with_styles(["css/sensor.css"])
                .with_scripts(["js/sensor.js"]),
        );
        container.register::<Summary>(
            EntityRenderer::for_type(|s: &Summary| Ok(format!("<p>{}</p>", s.text)))
                .with_styles(["css/summary.css"]),
        );
        container
    }

    pub fn register<T: Any>(&self, renderer: EntityRenderer) {
        self.inner.register_renderer::<T>(renderer);
    }

    pub fn lookups_for<T: Any>(&self) -> usize {
        self.renderer_lookups
            .lock()
            .unwrap()
            .get(&EntityType::of::<T>())
            .copied()
            .unwrap_or(0)
    }

    pub fn total_renderer_lookups(&self) -> usize {
        self.renderer_lookups.lock().unwrap().values().sum()
    }

    pub fn template_lookups(&self) -> usize {
        self.template_lookups.load(Ordering::SeqCst)
    }
}

impl Container for CountingContainer {
    fn provide_content(&self, content: ContentSource) {
        self.inner.provide_content(content);
    }

    fn get_template(&self, info: &TemplateInfo) -> Result<CompiledTemplate, ContainerError> {
        self.template_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_template(info)
    }

    fn get_entity_renderer(
        &self,
        entity_type: EntityType,
    ) -> Result<EntityRenderer, ContainerError> {
        *self
            .renderer_lookups
            .lock()
            .unwrap()
            .entry(entity_type)
            .or_insert(0) += 1;
        self.inner.get_entity_renderer(entity_type)
    }
}

/// An initialized plugin with a pinned clock, plus its container.
pub fn plugin_with(
    container: CountingContainer,
    config: PluginConfig,
) -> (EntityListPlugin, Arc<CountingContainer>) {
    let container = Arc::new(container);
    let mut plugin = EntityListPlugin::new(config).with_clock(fixed_clock);
    plugin.init(container.clone());
    (plugin, container)
}

pub fn plugin() -> (EntityListPlugin, Arc<CountingContainer>) {
    plugin_with(
        CountingContainer::with_home_renderers(),
        PluginConfig::default(),
    )
}
