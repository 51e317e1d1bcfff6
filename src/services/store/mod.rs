use crate::algorithms::AlsModel;
use crate::config::Config;
use crate::models::{CsrMatrix, IdIndex, ModelParameters};
use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The three data artifacts, loaded and validated together.
#[derive(Debug)]
pub struct InteractionData {
    pub interactions: CsrMatrix,
    pub users: IdIndex,
    pub items: IdIndex,
}

/// Read-only access to the persisted training artifacts. Each artifact group
/// is read from disk at most once per process; repeated calls hand back the
/// cached value. A failed load is fatal to startup, never retried lazily.
pub struct ArtifactStore {
    config: Arc<Config>,
    data: OnceCell<Arc<InteractionData>>,
    model: OnceCell<Arc<AlsModel>>,
}

impl ArtifactStore {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            data: OnceCell::new(),
            model: OnceCell::new(),
        }
    }

    /// Interaction matrix plus both ID indexes. First call reads and
    /// validates the files; later calls return the same `Arc`.
    pub fn load_data(&self) -> Result<Arc<InteractionData>> {
        self.data
            .get_or_try_init(|| {
                let artifacts = &self.config.artifacts;

                let interactions: CsrMatrix = read_artifact(&artifacts.interactions_path())?;
                interactions
                    .validate()
                    .context("invalid interaction matrix")?;

                let users: IdIndex = read_artifact(&artifacts.user_index_path())?;
                users.validate().context("invalid user index")?;

                let items: IdIndex = read_artifact(&artifacts.item_index_path())?;
                items.validate().context("invalid item index")?;

                // Every matrix row/column must have a reverse mapping. The
                // indexes may be wider than the matrix; the matrix may not be
                // wider than the indexes.
                if interactions.n_rows > users.len() {
                    return Err(anyhow!(
                        "matrix has {} rows but user index only covers {}",
                        interactions.n_rows,
                        users.len()
                    ));
                }
                if interactions.n_cols > items.len() {
                    return Err(anyhow!(
                        "matrix has {} columns but item index only covers {}",
                        interactions.n_cols,
                        items.len()
                    ));
                }

                info!(
                    "Loaded interaction data: {} users, {} items, {} interactions",
                    users.len(),
                    items.len(),
                    interactions.nnz()
                );

                Ok(Arc::new(InteractionData {
                    interactions,
                    users,
                    items,
                }))
            })
            .cloned()
    }

    /// The trained factorization model. Same once-per-process contract as
    /// `load_data`.
    pub fn load_model(&self) -> Result<Arc<AlsModel>> {
        self.model
            .get_or_try_init(|| {
                let path = self.config.artifacts.model_path();
                let params: ModelParameters = read_artifact(&path)?;
                let model = AlsModel::from_parameters(params)
                    .with_context(|| format!("invalid model artifact {}", path.display()))?;

                info!(
                    "Loaded model version {} ({} factors, {} users, {} items)",
                    model.version(),
                    model.factors(),
                    model.num_users(),
                    model.num_items()
                );

                Ok(Arc::new(model))
            })
            .cloned()
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("failed to open artifact {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse artifact {}", path.display()))
}
