//! Error types shared by hosts and plugins.
//!
//! - [`ContainerError`]: a host could not supply a template or a renderer.
//! - [`RenderError`]: a single entity could not be turned into markup, or the
//!   output sink failed.
//! - [`ListError`]: what a list render call reports to its caller.

use thiserror::Error;

/// Lookup failures reported by a [`Container`](crate::Container).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// No template content is registered under the requested path.
    #[error("template content not found: {path}")]
    ContentNotFound { path: String },

    /// A template descriptor listed no template paths.
    #[error("template \"{name}\" declares no template paths")]
    NoTemplatePaths { name: String },

    /// Template source failed to compile.
    #[error("failed to compile template \"{name}\": {message}")]
    Compile { name: String, message: String },

    /// No renderer is registered for an entity type.
    #[error("no renderer registered for entity type {entity_type}")]
    RendererNotFound { entity_type: String },
}

/// Failure producing markup for one entity.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer ran and reported a failure.
    #[error("{0}")]
    Entity(String),

    /// The renderer was handed a value of a type it does not render.
    #[error("renderer expected a value of type {expected}")]
    TypeMismatch { expected: &'static str },

    /// Template execution failed.
    #[error("template error: {0}")]
    Template(String),

    /// Writing to the output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Convenience constructor for renderer-reported failures.
    pub fn entity(message: impl Into<String>) -> Self {
        RenderError::Entity(message.into())
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use std::error::Error as _;

        // A failing sink surfaces as I/O; anything else keeps the whole
        // cause chain, which includes item render failures.
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(inner) = source {
            if let Some(io) = inner.downcast_ref::<std::io::Error>() {
                return RenderError::Io(std::io::Error::new(io.kind(), io.to_string()));
            }
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        RenderError::Template(message)
    }
}

/// Errors returned from a list render call.
///
/// Resolution failures ([`ListError::Template`], [`ListError::Renderer`])
/// are reported before anything is written to the output sink. Execution
/// failures happen while markup is streaming, so the sink may hold a partial
/// fragment.
#[derive(Debug, Error)]
pub enum ListError {
    /// The plugin was asked to render before the host initialized it.
    #[error("plugin has not been initialized with a container")]
    NotInitialized,

    /// The list template could not be obtained.
    #[error("unable to load list template \"{name}\": {source}")]
    Template {
        name: String,
        #[source]
        source: ContainerError,
    },

    /// No renderer could be obtained for an entity's type.
    #[error("unable to get renderer for entity type {entity_type}: {source}")]
    Renderer {
        entity_type: String,
        #[source]
        source: ContainerError,
    },

    /// Template execution failed, including a failing item render.
    #[error("unable to execute list template: {0}")]
    Execute(#[source] RenderError),
}

impl ListError {
    /// True for failures to look up the template or a renderer.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, ListError::Template { .. } | ListError::Renderer { .. })
    }

    /// True when markup production failed after execution began.
    pub fn is_invocation_failure(&self) -> bool {
        matches!(self, ListError::Execute(_))
    }
}
