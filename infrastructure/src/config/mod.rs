//! Configuration file loading for finadvisor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FINADVISOR_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./finadvisor.toml` or `./.finadvisor.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/finadvisor/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileKnowledgeConfig, FileLoggingConfig, FileOutputConfig,
    FileParticipantsConfig, FileProfileConfig, FileProviderConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
