//! Configuration for multikv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a multikv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Backend Configuration
    // -------------------------------------------------------------------------
    /// Which storage medium holds the keys
    pub backend: BackendKind,

    /// Root directory for the local backend
    /// Internal structure:
    ///   {root_dir}/
    ///     └── <key path>/
    ///           ├── info
    ///           └── data
    pub root_dir: PathBuf,

    /// Create `root_dir` when it does not exist yet
    pub create_root: bool,
}

/// Storage medium selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// Files and directories under `root_dir`
    Local,

    /// Objects in a bucket of a process-local object store
    Memory { bucket: String },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            root_dir: PathBuf::from("./multikv_data"),
            create_root: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backend kind
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the local root directory
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Whether a missing root directory is created on open
    pub fn create_root(mut self, create: bool) -> Self {
        self.config.create_root = create;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
