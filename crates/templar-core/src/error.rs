use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── templar.toml ──
    #[error("failed to load config from {path}")]
    ToolConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ToolConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── template.toml / dbk.toml ──
    #[error("failed to read template config {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing template config on path {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(
        "invalid template id {id:?} in {path}: id must start with a letter and contain only lowercase letters, numbers, or a dash '-'"
    )]
    InvalidTemplateId { id: String, path: PathBuf },

    // ── Discovery ──
    #[error("failed to list template directories in {path}")]
    Discovery {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to stat template directory entry {path}")]
    DiscoveryStat {
        path: PathBuf,
        source: std::io::Error,
    },
}
