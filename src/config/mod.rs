use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port).parse().unwrap()
    }
}

/// Locations of the persisted training artifacts. The files are produced by an
/// offline training pipeline; this process only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    pub base_path: PathBuf,
    pub interactions_file: String,
    pub user_index_file: String,
    pub item_index_file: String,
    pub model_file: String,
}

impl ArtifactsConfig {
    pub fn interactions_path(&self) -> PathBuf {
        self.base_path.join(&self.interactions_file)
    }

    pub fn user_index_path(&self) -> PathBuf {
        self.base_path.join(&self.user_index_file)
    }

    pub fn item_index_path(&self) -> PathBuf {
        self.base_path.join(&self.item_index_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.base_path.join(&self.model_file)
    }

    pub fn with_base_path<P: AsRef<Path>>(mut self, base_path: P) -> Self {
        self.base_path = base_path.as_ref().to_path_buf();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Result length used when the request does not specify one.
    pub default_n: usize,
    /// Upper bound on the requested result length.
    pub max_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: num_cpus::get(),
            },
            artifacts: ArtifactsConfig {
                base_path: PathBuf::from("artifacts"),
                interactions_file: "interactions.json".to_string(),
                user_index_file: "user_index.json".to_string(),
                item_index_file: "item_index.json".to_string(),
                model_file: "model.json".to_string(),
            },
            recommendation: RecommendationConfig {
                default_n: 10,
                max_n: 20,
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("FACTOREC"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
