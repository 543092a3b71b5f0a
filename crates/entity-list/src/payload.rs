//! List payload assembly.
//!
//! [`PayloadBuilder`] runs the resolution half of a list render: it seeds a
//! [`RenderContext`] from the compiled template, wraps the header (if any)
//! and then every item in input order, and collects the aggregated
//! dependencies. The resulting [`ListPayload`] is what the list template is
//! executed against.
//!
//! Any resolution failure aborts the build before a payload exists, so
//! nothing reaches the output sink.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use entity_list_spi::{CompiledTemplate, Container, Entity, ListError, RenderListOptions};
use minijinja::Value;
use tracing::debug;

use crate::config::PluginConfig;
use crate::dependencies::Dependencies;
use crate::item::WrappedItem;
use crate::resolver::RenderContext;

/// Everything the list template renders.
#[derive(Debug, Clone)]
pub struct ListPayload {
    /// Capture time shared by the header and every item.
    pub current_time: DateTime<Utc>,
    /// Page title, already defaulted.
    pub title: String,
    /// The header, possibly absent.
    pub header: WrappedItem,
    /// Items in input order.
    pub items: Vec<WrappedItem>,
    /// Stylesheets: template defaults, configured extras, then renderer
    /// contributions in first-resolution order.
    pub styles: Vec<String>,
    /// Scripts, ordered like `styles`.
    pub scripts: Vec<String>,
}

impl ListPayload {
    /// Converts the payload into the template context.
    ///
    /// Keys: `current_time`, `title`, `header`, `items`, `styles`, `scripts`.
    pub fn into_context(self) -> Value {
        let items: Vec<Value> = self.items.into_iter().map(Value::from_object).collect();
        minijinja::context! {
            current_time => self.current_time.to_rfc3339(),
            title => self.title,
            header => Value::from_object(self.header),
            items => Value::from(items),
            styles => self.styles,
            scripts => self.scripts,
        }
    }
}

/// Builds a [`ListPayload`] for one render call.
pub struct PayloadBuilder<'a> {
    container: &'a dyn Container,
    config: &'a PluginConfig,
    current_time: DateTime<Utc>,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(
        container: &'a dyn Container,
        config: &'a PluginConfig,
        current_time: DateTime<Utc>,
    ) -> Self {
        Self {
            container,
            config,
            current_time,
        }
    }

    /// Resolves the header and items and assembles the payload.
    ///
    /// The header is resolved before any item, so its renderer's
    /// dependencies precede theirs.
    pub fn build(
        &self,
        template: &CompiledTemplate,
        options: RenderListOptions,
        items: Vec<Arc<dyn Entity>>,
    ) -> Result<ListPayload, ListError> {
        let mut ctx = if self.config.extra_styles.is_empty() && self.config.extra_scripts.is_empty() {
            RenderContext::new(self.container, template)
        } else {
            let mut dependencies = Dependencies::seeded(&template.styles, &template.scripts);
            dependencies.append_styles(&self.config.extra_styles);
            dependencies.append_scripts(&self.config.extra_scripts);
            RenderContext::with_dependencies(self.container, dependencies)
        };

        let header = match options.header {
            Some(header) => self.wrap(&mut ctx, header)?,
            None => WrappedItem::absent(self.current_time),
        };

        let items = items
            .into_iter()
            .map(|item| self.wrap(&mut ctx, item))
            .collect::<Result<Vec<_>, _>>()?;

        let resolved_types = ctx.resolved_types();
        let (styles, scripts) = ctx.into_dependencies().into_parts();
        debug!(
            items = items.len(),
            header = header.is_present(),
            resolved_types,
            styles = styles.len(),
            scripts = scripts.len(),
            "assembled list payload"
        );

        Ok(ListPayload {
            current_time: self.current_time,
            title: self.config.title_or_default(options.title),
            header,
            items,
            styles,
            scripts,
        })
    }

    fn wrap(&self, ctx: &mut RenderContext<'_>, entity: Arc<dyn Entity>) -> Result<WrappedItem, ListError> {
        let renderer = ctx.resolve(entity.as_ref())?;
        Ok(WrappedItem::new(entity, &renderer, self.current_time)
            .with_error_policy(self.config.on_item_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use entity_list_spi::{EntityRenderer, EntityType, MemoryContainer, TemplateInstance};

    struct Light;
    impl Entity for Light {}

    struct Sensor;
    impl Entity for Sensor {}

    struct Panel;
    impl Entity for Panel {}

    struct NoopTemplate;

    impl TemplateInstance for NoopTemplate {
        fn execute(
            &self,
            _sink: &mut dyn std::io::Write,
            _context: Value,
        ) -> Result<(), entity_list_spi::RenderError> {
            Ok(())
        }
    }

    fn template() -> CompiledTemplate {
        CompiledTemplate {
            instance: Arc::new(NoopTemplate),
            styles: vec!["base.css".into()],
            scripts: vec!["base.js".into()],
        }
    }

    fn container() -> MemoryContainer {
        let container = MemoryContainer::new();
        container.register_renderer::<Light>(
            EntityRenderer::new(|_| Ok("light".into())).with_styles(["light.css"]),
        );
        container.register_renderer::<Sensor>(
            EntityRenderer::new(|_| Ok("sensor".into())).with_scripts(["sensor.js"]),
        );
        container.register_renderer::<Panel>(
            EntityRenderer::new(|_| Ok("panel".into())).with_styles(["panel.css"]),
        );
        container
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_header_dependencies_precede_items() {
        let container = container();
        let config = PluginConfig::default();
        let builder = PayloadBuilder::new(&container, &config, now());

        let payload = builder
            .build(
                &template(),
                RenderListOptions::titled("Home").with_header(Arc::new(Panel)),
                vec![Arc::new(Light) as Arc<dyn Entity>, Arc::new(Sensor), Arc::new(Light)],
            )
            .unwrap();

        assert_eq!(payload.title, "Home");
        assert!(payload.header.is_present());
        assert_eq!(payload.styles, vec!["base.css", "panel.css", "light.css"]);
        assert_eq!(payload.scripts, vec!["base.js", "sensor.js"]);
        assert_eq!(
            payload
                .items
                .iter()
                .map(|i| i.entity_type().unwrap())
                .collect::<Vec<_>>(),
            vec![
                EntityType::of::<Light>(),
                EntityType::of::<Sensor>(),
                EntityType::of::<Light>()
            ]
        );
    }

    #[test]
    fn test_config_extras_follow_template_defaults() {
        let container = container();
        let config = PluginConfig {
            extra_styles: vec!["site.css".into()],
            extra_scripts: vec!["site.js".into()],
            ..PluginConfig::default()
        };
        let builder = PayloadBuilder::new(&container, &config, now());

        let payload = builder
            .build(&template(), RenderListOptions::default(), vec![Arc::new(Sensor) as Arc<dyn Entity>])
            .unwrap();

        assert_eq!(payload.styles, vec!["base.css", "site.css"]);
        assert_eq!(payload.scripts, vec!["base.js", "site.js", "sensor.js"]);
        assert_eq!(payload.title, "Entity List");
        assert!(!payload.header.is_present());
    }

    #[test]
    fn test_items_carry_error_policy_and_time() {
        let container = container();
        let config = PluginConfig::default();
        let payload = PayloadBuilder::new(&container, &config, now())
            .build(&template(), RenderListOptions::default(), vec![Arc::new(Light) as Arc<dyn Entity>])
            .unwrap();

        assert_eq!(payload.current_time, now());
        assert_eq!(payload.items[0].captured_at(), now());
        assert_eq!(payload.header.captured_at(), now());
    }

    #[test]
    fn test_into_context_exposes_keys() {
        let container = container();
        let config = PluginConfig::default();
        let payload = PayloadBuilder::new(&container, &config, now())
            .build(
                &template(),
                RenderListOptions::titled("Devices"),
                vec![Arc::new(Light) as Arc<dyn Entity>, Arc::new(Sensor)],
            )
            .unwrap();

        let env = minijinja::Environment::new();
        let out = env
            .render_str(
                "{{ title }}|{{ current_time }}|{{ header.present }}|{% for i in items %}{{ i.render() }},{% endfor %}|{{ styles|join(' ') }}|{{ scripts|length }}",
                payload.into_context(),
            )
            .unwrap();
        assert_eq!(
            out,
            "Devices|2024-01-02T03:04:05+00:00|False|light,sensor,|base.css light.css|2"
        );
    }

    #[test]
    fn test_dependency_refs_escaped_by_template() {
        let container = container();
        let config = PluginConfig {
            extra_styles: vec![r#"css/site.css?v="2""#.into()],
            ..PluginConfig::default()
        };
        let payload = PayloadBuilder::new(&container, &config, now())
            .build(&template(), RenderListOptions::default(), Vec::new())
            .unwrap();

        let mut env = minijinja::Environment::new();
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::Html);
        env.add_template("list.html", r#"{% for s in styles %}<link href="{{ s }}">{% endfor %}"#)
            .unwrap();
        let out = env
            .get_template("list.html")
            .unwrap()
            .render(payload.into_context())
            .unwrap();
        assert_eq!(
            out,
            r#"<link href="base.css"><link href="css&#x2f;site.css?v=&quot;2&quot;">"#
        );
    }
}
