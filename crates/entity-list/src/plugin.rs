//! The entity list plugin.
//!
//! [`EntityListPlugin`] ships the list template and stylesheet, hands them to
//! its container on [`init`](Plugin::init), and implements
//! [`RenderPlugin::render_list`]:
//!
//! 1. capture the current time once for the whole call
//! 2. fetch the compiled [`LIST_TEMPLATE`] from the container
//! 3. build the [`ListPayload`](crate::ListPayload) (header, then items)
//! 4. execute the template into the caller's sink
//!
//! Steps 2 and 3 fail before anything is written. Step 4 streams, so a
//! failing item render under [`ItemErrorPolicy::Abort`](crate::ItemErrorPolicy)
//! leaves whatever was already written in the sink.

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use entity_list_spi::{
    Container, ContentSource, Entity, ListError, Plugin, RenderListOptions, RenderPlugin,
    TemplateFunction, TemplateInfo,
};
use tracing::{error, info};

use crate::config::PluginConfig;
use crate::item::render_item;
use crate::payload::PayloadBuilder;

/// Content path of the list template.
pub const LIST_TEMPLATE_PATH: &str = "templates/entity_list.html.j2";

/// Content path of the list stylesheet.
pub const LIST_STYLESHEET_PATH: &str = "static/css/entity_list.css";

/// The list template descriptor published to the host.
pub const LIST_TEMPLATE: TemplateInfo = TemplateInfo {
    name: "entity_list",
    paths: &[LIST_TEMPLATE_PATH],
    styles: &["css/entity_list.css"],
    scripts: &[],
    functions: &[("RenderItem", render_item as TemplateFunction)],
};

/// Template and stylesheet shipped with the plugin.
pub fn content() -> ContentSource {
    ContentSource::new()
        .with_file(
            LIST_TEMPLATE_PATH,
            include_str!("../content/templates/entity_list.html.j2"),
        )
        .with_file(
            LIST_STYLESHEET_PATH,
            include_str!("../content/static/css/entity_list.css"),
        )
}

/// Source of the per-call capture time.
pub type Clock = fn() -> DateTime<Utc>;

/// Renders heterogeneous entity lists through per-type renderers.
pub struct EntityListPlugin {
    container: Option<Arc<dyn Container>>,
    config: PluginConfig,
    clock: Clock,
    running: bool,
}

impl EntityListPlugin {
    pub fn new(config: PluginConfig) -> Self {
        Self {
            container: None,
            config,
            clock: Utc::now,
            running: false,
        }
    }

    /// Replaces the clock, e.g. to pin timestamps in tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Whether `start` has been called without a matching `stop`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Renders into a `String` instead of a caller-supplied sink.
    pub fn render_list_to_string(
        &self,
        options: RenderListOptions,
        items: Vec<Arc<dyn Entity>>,
    ) -> Result<String, ListError> {
        let mut out = Vec::new();
        self.render_list(&mut out, options, items)?;
        String::from_utf8(out).map_err(|err| {
            ListError::Execute(entity_list_spi::RenderError::Template(err.to_string()))
        })
    }
}

impl Default for EntityListPlugin {
    fn default() -> Self {
        Self::new(PluginConfig::default())
    }
}

impl Plugin for EntityListPlugin {
    fn init(&mut self, container: Arc<dyn Container>) {
        container.provide_content(content());
        self.container = Some(container);
        info!(template = LIST_TEMPLATE.name, "entity list plugin initialized");
    }

    fn start(&mut self) {
        self.running = true;
        info!("entity list plugin starting");
    }

    fn stop(&mut self) {
        self.running = false;
        info!("entity list plugin stopping");
    }
}

impl RenderPlugin for EntityListPlugin {
    fn render_list(
        &self,
        sink: &mut dyn Write,
        options: RenderListOptions,
        items: Vec<Arc<dyn Entity>>,
    ) -> Result<(), ListError> {
        let current_time = (self.clock)();
        let container = self.container.as_deref().ok_or(ListError::NotInitialized)?;

        let template = container.get_template(&LIST_TEMPLATE).map_err(|source| {
            error!(template = LIST_TEMPLATE.name, %source, "unable to load list template");
            ListError::Template {
                name: LIST_TEMPLATE.name.to_string(),
                source,
            }
        })?;

        let payload =
            PayloadBuilder::new(container, &self.config, current_time).build(&template, options, items)?;

        template.execute(sink, payload.into_context()).map_err(|err| {
            error!(error = %err, "unable to execute list template");
            ListError::Execute(err)
        })
    }
}
