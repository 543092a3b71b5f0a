//! Wrapped items: an entity bound to its resolved renderer.
//!
//! Building a payload never renders anything. Each entity is paired with the
//! render function resolved for its type, and markup is produced only when
//! the template calls `RenderItem(item)` (or `item.render()`), so the
//! template decides where each fragment lands.
//!
//! In templates a wrapped item exposes:
//!
//! | Attribute / method | Value |
//! |--------------------|-------|
//! | `present` / `is_present()` | whether an entity is wrapped |
//! | `entity_type` | short type name, or none when absent |
//! | `captured_at` | RFC 3339 capture time of the render call |
//! | `render()` | the entity's markup (safe, not escaped) |

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use entity_list_spi::{Entity, EntityRenderFn, EntityRenderer, EntityType, RenderError};
use minijinja::value::{Enumerator, Object};
use minijinja::{Error, ErrorKind, HtmlEscape, State, Value};
use tracing::warn;

use crate::config::ItemErrorPolicy;

/// An entity and the render function for its type, invoked lazily.
#[derive(Clone)]
pub struct WrappedItem {
    bound: Option<(Arc<dyn Entity>, EntityRenderFn)>,
    captured_at: DateTime<Utc>,
    on_error: ItemErrorPolicy,
}

impl WrappedItem {
    /// Binds `entity` to `renderer`'s render function.
    pub fn new(entity: Arc<dyn Entity>, renderer: &EntityRenderer, captured_at: DateTime<Utc>) -> Self {
        Self {
            bound: Some((entity, renderer.render_fn.clone())),
            captured_at,
            on_error: ItemErrorPolicy::default(),
        }
    }

    /// A wrapper holding nothing, used when no header was supplied.
    pub fn absent(captured_at: DateTime<Utc>) -> Self {
        Self {
            bound: None,
            captured_at,
            on_error: ItemErrorPolicy::default(),
        }
    }

    /// Sets how a failing render is reported to the template.
    pub fn with_error_policy(mut self, policy: ItemErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Whether an entity is wrapped.
    pub fn is_present(&self) -> bool {
        self.bound.is_some()
    }

    /// The wrapped entity.
    pub fn entity(&self) -> Option<&Arc<dyn Entity>> {
        self.bound.as_ref().map(|(entity, _)| entity)
    }

    /// Concrete type of the wrapped entity.
    pub fn entity_type(&self) -> Option<EntityType> {
        self.entity().map(|entity| entity.entity_type())
    }

    /// Capture time of the render call that produced this item.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Runs the bound render function.
    ///
    /// An absent item renders as empty markup.
    pub fn invoke(&self) -> Result<String, RenderError> {
        match &self.bound {
            Some((entity, render)) => render(entity.as_any()),
            None => Ok(String::new()),
        }
    }

    fn invoke_for_template(&self) -> Result<Value, Error> {
        match self.invoke() {
            Ok(markup) => Ok(Value::from_safe_string(markup)),
            Err(err) => {
                let type_name = self.entity_type().map(|t| t.name()).unwrap_or("<absent>");
                match self.on_error {
                    ItemErrorPolicy::Abort => Err(Error::new(
                        ErrorKind::InvalidOperation,
                        format!("failed to render entity of type {}", type_name),
                    )
                    .with_source(err)),
                    ItemErrorPolicy::Placeholder => {
                        warn!(entity_type = type_name, error = %err, "entity render failed, using placeholder");
                        Ok(Value::from_safe_string(placeholder(&err)))
                    }
                }
            }
        }
    }
}

impl fmt::Debug for WrappedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedItem")
            .field("entity_type", &self.entity_type())
            .field("captured_at", &self.captured_at)
            .field("on_error", &self.on_error)
            .finish()
    }
}

impl Object for WrappedItem {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "present" => Some(Value::from(self.is_present())),
            "entity_type" => Some(match self.entity_type() {
                Some(entity_type) => Value::from(entity_type.short_name()),
                None => Value::from(()),
            }),
            "captured_at" => Some(Value::from(self.captured_at.to_rfc3339())),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&["present", "entity_type", "captured_at"])
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State,
        method: &str,
        _args: &[Value],
    ) -> Result<Value, Error> {
        match method {
            "is_present" => Ok(Value::from(self.is_present())),
            "render" => self.invoke_for_template(),
            _ => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("wrapped item has no method named {}", method),
            )),
        }
    }
}

/// Template function published as `RenderItem`: renders one wrapped item.
pub fn render_item(item: Value) -> Result<Value, Error> {
    match item.downcast_object_ref::<WrappedItem>() {
        Some(wrapped) => wrapped.invoke_for_template(),
        None => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("RenderItem expects a wrapped item, got {}", item.kind()),
        )),
    }
}

fn placeholder(err: &RenderError) -> String {
    format!(
        "<div class=\"entity-list-error\">{}</div>",
        HtmlEscape(&err.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Light {
        name: String,
    }
    impl Entity for Light {}

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn light_renderer() -> EntityRenderer {
        EntityRenderer::for_type(|l: &Light| Ok(format!("<b>{}</b>", l.name)))
    }

    fn failing_renderer() -> EntityRenderer {
        EntityRenderer::new(|_| Err(RenderError::entity("sensor <offline>")))
    }

    fn light(name: &str) -> Arc<dyn Entity> {
        Arc::new(Light { name: name.into() })
    }

    #[test]
    fn test_absent_item() {
        let item = WrappedItem::absent(at());
        assert!(!item.is_present());
        assert!(item.entity_type().is_none());
        assert_eq!(item.invoke().unwrap(), "");
        assert_eq!(item.captured_at(), at());
    }

    #[test]
    fn test_present_item_invokes_renderer() {
        let item = WrappedItem::new(light("porch"), &light_renderer(), at());
        assert!(item.is_present());
        assert_eq!(item.entity_type(), Some(EntityType::of::<Light>()));
        assert_eq!(item.invoke().unwrap(), "<b>porch</b>");
    }

    #[test]
    fn test_invocation_is_deferred() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let renderer = EntityRenderer::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(String::new())
        });

        let item = WrappedItem::new(light("porch"), &renderer, at());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        item.invoke().unwrap();
        item.invoke().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_template_object_attributes() {
        let env = minijinja::Environment::new();
        let item = Value::from_object(WrappedItem::new(light("porch"), &light_renderer(), at()));
        let absent = Value::from_object(WrappedItem::absent(at()));

        let out = env
            .render_str(
                "{{ item.present }} {{ item.entity_type }} {{ item.captured_at }} {{ absent.is_present() }}",
                minijinja::context! { item => item, absent => absent },
            )
            .unwrap();
        assert_eq!(out, "True Light 2024-05-01T12:00:00+00:00 False");
    }

    #[test]
    fn test_render_item_function_is_not_escaped() {
        let mut env = minijinja::Environment::new();
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::Html);
        env.add_function("RenderItem", render_item);

        let item = Value::from_object(WrappedItem::new(light("porch"), &light_renderer(), at()));
        let out = env
            .render_str(
                "{{ RenderItem(item) }}|{{ item.render() }}",
                minijinja::context! { item => item },
            )
            .unwrap();
        assert_eq!(out, "<b>porch</b>|<b>porch</b>");
    }

    #[test]
    fn test_render_item_rejects_plain_values() {
        let mut env = minijinja::Environment::new();
        env.add_function("RenderItem", render_item);
        let err = env.render_str("{{ RenderItem(42) }}", ()).unwrap_err();
        assert!(err.to_string().contains("wrapped item"));
    }

    #[test]
    fn test_abort_policy_fails_template() {
        let mut env = minijinja::Environment::new();
        env.add_function("RenderItem", render_item);

        let item = Value::from_object(WrappedItem::new(light("porch"), &failing_renderer(), at()));
        let err = env
            .render_str("{{ RenderItem(item) }}", minijinja::context! { item => item })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_placeholder_policy_escapes_message() {
        let mut env = minijinja::Environment::new();
        env.add_function("RenderItem", render_item);

        let item = Value::from_object(
            WrappedItem::new(light("porch"), &failing_renderer(), at())
                .with_error_policy(ItemErrorPolicy::Placeholder),
        );
        let out = env
            .render_str("{{ RenderItem(item) }}", minijinja::context! { item => item })
            .unwrap();
        assert_eq!(
            out,
            "<div class=\"entity-list-error\">sensor &lt;offline&gt;</div>"
        );
    }
}
