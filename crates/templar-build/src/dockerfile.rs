use templar_core::EnvConfig;

/// Generates the thin Dockerfile that bakes env vars into a custom env image.
///
/// The runner inside the container reads `start_cmd` from the environment,
/// so it is layered on top of the user's image as an `ENV` directive.
pub struct EnvDockerfile<'a> {
    base_image: &'a str,
    config: &'a EnvConfig,
}

impl<'a> EnvDockerfile<'a> {
    pub fn new(base_image: &'a str, config: &'a EnvConfig) -> Self {
        Self { base_image, config }
    }

    pub fn render(&self) -> String {
        let root_dir = match &self.config.root_dir {
            Some(dir) => format!("ENV root_dir=\"{}\"\n", escape(dir)),
            None => String::new(),
        };

        format!(
            r#"FROM "{base}"

ENV start_cmd="{start_cmd}"
{root_dir}"#,
            base = self.base_image,
            start_cmd = escape(&self.config.start_cmd),
            root_dir = root_dir,
        )
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
