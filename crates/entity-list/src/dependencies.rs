//! Stylesheet and script aggregation for one render pass.

/// Room reserved for renderer contributions beyond the template defaults.
const EXPECTED_EXTRA: usize = 25;

/// Ordered, append-only stylesheet and script references.
///
/// Entries are never reordered or deduplicated here. The resolver appends a
/// renderer's lists only on the first lookup of its type, so the same type
/// never contributes twice; two different types that share a reference will
/// both contribute it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    styles: Vec<String>,
    scripts: Vec<String>,
}

impl Dependencies {
    /// Starts from a template's declared defaults.
    pub fn seeded(styles: &[String], scripts: &[String]) -> Self {
        let mut deps = Self {
            styles: Vec::with_capacity(styles.len() + EXPECTED_EXTRA),
            scripts: Vec::with_capacity(scripts.len() + EXPECTED_EXTRA),
        };
        deps.append_styles(styles);
        deps.append_scripts(scripts);
        deps
    }

    /// Appends stylesheet references in order.
    pub fn append_styles(&mut self, styles: &[String]) {
        self.styles.extend_from_slice(styles);
    }

    /// Appends script references in order.
    pub fn append_scripts(&mut self, scripts: &[String]) {
        self.scripts.extend_from_slice(scripts);
    }

    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Splits into `(styles, scripts)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.styles, self.scripts)
    }
}
