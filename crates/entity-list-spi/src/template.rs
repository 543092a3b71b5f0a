//! Template descriptors and compiled templates.
//!
//! A plugin publishes a [`TemplateInfo`] describing its template files,
//! stylesheets and the functions the template may call. The host compiles it
//! into a [`CompiledTemplate`], whose [`TemplateInstance`] streams markup into
//! an output sink.
//!
//! The default instance is [`MiniJinjaTemplate`]: Jinja2 syntax, HTML
//! auto-escaping for every template, and direct streaming through
//! `render_captured_to` with no intermediate buffer.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, Value};

use crate::error::{ContainerError, RenderError};

/// A function a template can call by name.
pub type TemplateFunction = fn(Value) -> Result<Value, minijinja::Error>;

/// Everything a host needs to compile a plugin's template.
///
/// `paths` are content paths; the first one is the entry template and the
/// rest are available to it through `{% include %}` / `{% extends %}`.
#[derive(Debug, Clone, Copy)]
pub struct TemplateInfo {
    /// Logical name, used for caching and error messages.
    pub name: &'static str,
    /// Template content paths, entry template first.
    pub paths: &'static [&'static str],
    /// Stylesheets every page using this template needs.
    pub styles: &'static [&'static str],
    /// Scripts every page using this template needs.
    pub scripts: &'static [&'static str],
    /// Named functions registered with the template environment.
    pub functions: &'static [(&'static str, TemplateFunction)],
}

/// Executes a compiled template against a context value.
pub trait TemplateInstance: Send + Sync {
    /// Writes the rendered template to `sink`.
    ///
    /// Output is streamed; on failure the sink may hold a partial result.
    fn execute(&self, sink: &mut dyn Write, context: Value) -> Result<(), RenderError>;
}

/// A template ready to execute, with its declared page dependencies.
#[derive(Clone)]
pub struct CompiledTemplate {
    /// The executable template.
    pub instance: Arc<dyn TemplateInstance>,
    /// Stylesheets declared by the template descriptor.
    pub styles: Vec<String>,
    /// Scripts declared by the template descriptor.
    pub scripts: Vec<String>,
}

impl CompiledTemplate {
    /// Pairs an instance with the dependencies declared by `info`.
    pub fn new(instance: Arc<dyn TemplateInstance>, info: &TemplateInfo) -> Self {
        Self {
            instance,
            styles: info.styles.iter().map(|s| s.to_string()).collect(),
            scripts: info.scripts.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Executes the template into `sink`.
    pub fn execute(&self, sink: &mut dyn Write, context: Value) -> Result<(), RenderError> {
        self.instance.execute(sink, context)
    }
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("styles", &self.styles)
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}

/// MiniJinja-backed [`TemplateInstance`].
pub struct MiniJinjaTemplate {
    env: Environment<'static>,
    entry: String,
}

impl MiniJinjaTemplate {
    /// Compiles the templates named by `info` from `(path, source)` pairs.
    ///
    /// `sources` must be in the same order as `info.paths`.
    pub fn compile(info: &TemplateInfo, sources: Vec<(String, String)>) -> Result<Self, ContainerError> {
        let entry = match sources.first() {
            Some((path, _)) => path.clone(),
            None => {
                return Err(ContainerError::NoTemplatePaths {
                    name: info.name.to_string(),
                })
            }
        };

        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        for (name, function) in info.functions {
            env.add_function(*name, *function);
        }
        for (path, source) in sources {
            env.add_template_owned(path, source)
                .map_err(|err| ContainerError::Compile {
                    name: info.name.to_string(),
                    message: err.to_string(),
                })?;
        }

        Ok(Self { env, entry })
    }

    /// Path of the entry template.
    pub fn entry(&self) -> &str {
        &self.entry
    }
}

impl TemplateInstance for MiniJinjaTemplate {
    fn execute(&self, sink: &mut dyn Write, context: Value) -> Result<(), RenderError> {
        let template = self.env.get_template(&self.entry)?;
        template.render_captured_to(context, sink)?;
        Ok(())
    }
}
