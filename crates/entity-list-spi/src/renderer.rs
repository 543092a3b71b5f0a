//! Entity renderer descriptors.
//!
//! An [`EntityRenderer`] is what a host hands back for one entity type: the
//! function turning a value into a markup fragment, plus the stylesheets and
//! scripts that fragment needs on the page.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::entity::EntityType;
use crate::error::RenderError;

/// Shared render function. Receives the underlying entity value.
pub type EntityRenderFn = Arc<dyn Fn(&dyn Any) -> Result<String, RenderError> + Send + Sync>;

/// Render function and page dependencies for one entity type.
///
/// Cloning is cheap; the function is shared.
///
/// # Example
///
/// ```rust
/// use entity_list_spi::EntityRenderer;
///
/// struct Light { name: String, on: bool }
///
/// let renderer = EntityRenderer::for_type(|light: &Light| {
///     Ok(format!("<span>{}: {}</span>", light.name, if light.on { "on" } else { "off" }))
/// })
/// .with_styles(["css/light.css"])
/// .with_scripts(["js/light.js"]);
///
/// let markup = renderer.render(&Light { name: "porch".into(), on: true }).unwrap();
/// assert_eq!(markup, "<span>porch: on</span>");
/// assert_eq!(renderer.styles, vec!["css/light.css"]);
/// ```
#[derive(Clone)]
pub struct EntityRenderer {
    /// Produces markup for one value.
    pub render_fn: EntityRenderFn,
    /// Stylesheet references, in page order.
    pub styles: Vec<String>,
    /// Script references, in page order.
    pub scripts: Vec<String>,
}

impl EntityRenderer {
    /// Wraps an untyped render function with no dependencies.
    pub fn new<F>(render_fn: F) -> Self
    where
        F: Fn(&dyn Any) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        Self {
            render_fn: Arc::new(render_fn),
            styles: Vec::new(),
            scripts: Vec::new(),
        }
    }

    /// Builds a renderer from a closure over the concrete type.
    ///
    /// Handing the resulting function a value of any other type yields
    /// [`RenderError::TypeMismatch`].
    pub fn for_type<T, F>(render: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        Self::new(move |value: &dyn Any| match value.downcast_ref::<T>() {
            Some(typed) => render(typed),
            None => Err(RenderError::TypeMismatch {
                expected: EntityType::of::<T>().name(),
            }),
        })
    }

    /// Sets the stylesheet references.
    pub fn with_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles = styles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the script references.
    pub fn with_scripts<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts = scripts.into_iter().map(Into::into).collect();
        self
    }

    /// Calls the render function.
    pub fn render(&self, value: &dyn Any) -> Result<String, RenderError> {
        (self.render_fn)(value)
    }
}

impl fmt::Debug for EntityRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRenderer")
            .field("styles", &self.styles)
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}
