use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::palette::DEFAULT_PALETTE;

pub const CONFIG_PATH_VAR: &str = "SCHOOLD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "schoold.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Hashing {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    /// Credential requests hashed at the same time.
    pub workers: usize,
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Opened at startup when set; otherwise the client selects one.
    pub workspace: Option<PathBuf>,
    /// Replaced wholesale by a file or `SCHOOLD_PALETTE`, never merged.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    pub hashing: Hashing,
}

impl Settings {
    /// Defaults, then the file named by `SCHOOLD_CONFIG` (or `schoold.toml` if
    /// present), then `SCHOOLD_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_VAR) {
            Some(p) => Self::load_from(Some(Path::new(&p)), true),
            None => Self::load_from(Some(Path::new(DEFAULT_CONFIG_FILE)), false),
        }
    }

    pub fn load_from(file: Option<&Path>, required: bool) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("hashing.memory_kib", 19_456_i64)?
            .set_default("hashing.iterations", 2_i64)?
            .set_default("hashing.parallelism", 1_i64)?
            .set_default("hashing.workers", 2_i64)?;

        if let Some(path) = file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        builder
            .add_source(
                Environment::with_prefix("SCHOOLD")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("palette")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
