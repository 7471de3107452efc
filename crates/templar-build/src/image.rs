use std::fmt;

use templar_core::Mode;

/// A tagged image reference, `{registry}/{id}:{tag}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    name: String,
    tag: String,
}

impl ImageRef {
    /// Image for template `id`, tagged according to `mode`.
    ///
    /// ```
    /// use templar_build::ImageRef;
    /// use templar_core::Mode;
    ///
    /// let image = ImageRef::for_template("gcr.io/acme", "foo", Mode::Development);
    /// assert_eq!(image.to_string(), "gcr.io/acme/foo:dev");
    /// ```
    pub fn for_template(registry: &str, id: &str, mode: Mode) -> Self {
        Self::new(registry, id, mode.image_tag())
    }

    pub fn new(registry: &str, id: &str, tag: &str) -> Self {
        Self {
            name: format!("{}/{id}", registry.trim_end_matches('/')),
            tag: tag.to_owned(),
        }
    }

    /// Repository name without the tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}
