use rtp_core::CalibratorConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_rtp")]
    pub rtp: f64,
    #[serde(default = "default_partition_size")]
    pub partition_size: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Fixed seed for a reproducible outcome sequence. Draws are serialized
    /// through one generator when set.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Apply command-line flags on top of the file values.
    pub fn with_overrides(
        mut self,
        rtp: Option<f64>,
        listen_addr: Option<String>,
        seed: Option<u64>,
    ) -> Self {
        if let Some(rtp) = rtp {
            self.generator.rtp = rtp;
        }
        if let Some(addr) = listen_addr {
            self.server.listen_addr = addr;
        }
        if seed.is_some() {
            self.generator.seed = seed;
        }
        self
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl GeneratorConfig {
    pub fn calibrator(&self) -> CalibratorConfig {
        CalibratorConfig {
            max_iterations: self.max_iterations,
            ..CalibratorConfig::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rtp: default_rtp(),
            partition_size: default_partition_size(),
            max_iterations: default_max_iterations(),
            seed: None,
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:64333".to_string()
}
fn default_request_timeout_ms() -> u64 {
    5000
}
fn default_rtp() -> f64 {
    0.5
}
fn default_partition_size() -> usize {
    10_000
}
fn default_max_iterations() -> usize {
    rtp_core::calibrate::DEFAULT_MAX_ITERATIONS
}
