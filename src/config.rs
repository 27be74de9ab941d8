use std::path::{Path, PathBuf};

use facet::Facet;

use crate::error::VmBatchError;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "vmbatch.toml";

#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct Config {
    /// Number of VMs to provision in one run.
    #[facet(default = 25)]
    pub count: u32,
    /// Domain names are `<name_prefix><index>`, index starting at 1.
    #[facet(default = "vm_")]
    pub name_prefix: String,
    #[facet(default)]
    pub resources: ResourcesConfig,
    #[facet(default)]
    pub disk: DiskConfig,
    #[facet(default)]
    pub advanced: AdvancedConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 25,
            name_prefix: "vm_".into(),
            resources: ResourcesConfig::default(),
            disk: DiskConfig::default(),
            advanced: AdvancedConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct ResourcesConfig {
    #[facet(default = 512)]
    pub memory_mb: u64,
    #[facet(default = 1)]
    pub vcpus: u32,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            memory_mb: 512,
            vcpus: 1,
        }
    }
}

#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct DiskConfig {
    #[facet(default = "/var/lib/libvirt/images/")]
    pub image_dir: String,
    #[facet(default = 10)]
    pub size_gb: u64,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            image_dir: "/var/lib/libvirt/images/".into(),
            size_gb: 10,
        }
    }
}

#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct AdvancedConfig {
    #[facet(default = "qemu:///system")]
    pub libvirt_uri: String,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            libvirt_uri: "qemu:///system".into(),
        }
    }
}

impl Config {
    pub fn image_dir(&self) -> &Path {
        Path::new(&self.disk.image_dir)
    }

    pub fn libvirt_uri(&self) -> &str {
        &self.advanced.libvirt_uri
    }

    /// Domain name for the 1-based batch index.
    pub fn vm_name(&self, index: u32) -> String {
        format!("{}{index}", self.name_prefix)
    }
}

/// Per-run values taken from the command line. `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub count: Option<u32>,
    pub image_dir: Option<PathBuf>,
    pub memory_mb: Option<u64>,
    pub vcpus: Option<u32>,
    pub disk_size_gb: Option<u64>,
    pub libvirt_uri: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: Config) -> Result<Config, VmBatchError> {
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(dir) = self.image_dir {
            config.disk.image_dir = dir.display().to_string();
        }
        if let Some(memory_mb) = self.memory_mb {
            config.resources.memory_mb = memory_mb;
        }
        if let Some(vcpus) = self.vcpus {
            config.resources.vcpus = vcpus;
        }
        if let Some(size_gb) = self.disk_size_gb {
            config.disk.size_gb = size_gb;
        }
        if let Some(uri) = self.libvirt_uri {
            config.advanced.libvirt_uri = uri;
        }
        validate_config(&config)?;
        Ok(config)
    }
}

// ── validation ────────────────────────────────────────────

fn validate_config(config: &Config) -> Result<(), VmBatchError> {
    if config.count < 1 {
        return Err(VmBatchError::Validation {
            message: "count must be at least 1".into(),
        });
    }
    if config.resources.vcpus < 1 {
        return Err(VmBatchError::Validation {
            message: "vcpus must be at least 1".into(),
        });
    }
    if config.resources.memory_mb < 1 {
        return Err(VmBatchError::Validation {
            message: "memory_mb must be at least 1".into(),
        });
    }
    if config.disk.size_gb < 1 {
        return Err(VmBatchError::Validation {
            message: "size_gb must be at least 1".into(),
        });
    }
    if config.disk.image_dir.is_empty() {
        return Err(VmBatchError::Validation {
            message: "image_dir must not be empty".into(),
        });
    }
    if config.advanced.libvirt_uri.is_empty() {
        return Err(VmBatchError::Validation {
            message: "libvirt_uri must not be empty".into(),
        });
    }
    validate_prefix(&config.name_prefix)
}

fn validate_prefix(prefix: &str) -> Result<(), VmBatchError> {
    let mut chars = prefix.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
    if !valid {
        return Err(VmBatchError::Validation {
            message: format!("name_prefix must match [a-zA-Z0-9][a-zA-Z0-9._-]* (got '{prefix}')"),
        });
    }
    Ok(())
}

// ── public API ────────────────────────────────────────────

pub fn load_config(path: &Path) -> Result<Config, VmBatchError> {
    let contents = std::fs::read_to_string(path).map_err(|source| VmBatchError::ConfigLoad {
        path: path.display().to_string(),
        source,
    })?;

    let config: Config = facet_toml::from_str(&contents).map_err(|e| VmBatchError::ConfigParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Load the explicit config file, or `vmbatch.toml` if present, or defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<Config, VmBatchError> {
    match path {
        Some(p) => load_config(p),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                load_config(fallback)
            } else {
                tracing::debug!("no config file, using defaults");
                Ok(Config::default())
            }
        }
    }
}
