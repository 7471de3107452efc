use std::fmt;
use std::str::FromStr;

/// Publish mode, selected explicitly by the caller.
///
/// Development builds are tagged `:dev` and never upload a manifest.
/// Production builds are tagged `:latest` and publish the manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    Development,
    #[default]
    Production,
}

impl Mode {
    /// Image tag used for this mode.
    pub fn image_tag(self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Production => "latest",
        }
    }

    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown mode {0:?} (expected `dev` or `prod`)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_follow_mode() {
        assert_eq!(Mode::Development.image_tag(), "dev");
        assert_eq!(Mode::Production.image_tag(), "latest");
    }

    #[test]
    fn default_is_production() {
        assert_eq!(Mode::default(), Mode::Production);
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("dev".parse::<Mode>().unwrap(), Mode::Development);
        assert_eq!("Development".parse::<Mode>().unwrap(), Mode::Development);
        assert_eq!("prod".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!(" production ".parse::<Mode>().unwrap(), Mode::Production);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "staging".parse::<Mode>().unwrap_err().to_string();
        assert!(err.contains("staging"), "got: {err}");
    }
}
