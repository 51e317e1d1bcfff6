pub mod ranking;

use crate::models::{ModelParameters, SparseRow};
use anyhow::{anyhow, Result};
use nalgebra::{DMatrix, DVector};
use std::collections::HashSet;

/// The one condition a query must survive: a resolved index that falls outside
/// the factor tables the model was trained with. Callers translate this into
/// an empty "no recommendations" result instead of failing the process.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("index {index} out of range for {bound} factor rows")]
    IndexOutOfRange { index: usize, bound: usize },
}

/// Top-N retrieval seam. `recalculate_user` asks the model to derive the
/// user's latent vector from the supplied interaction row instead of its
/// stored factors, so interactions newer than training still score correctly.
/// Implementations skip items already present in the supplied row and return
/// `(internal item index, score)` pairs in descending score order. A
/// substitute model library plugged in behind this trait must preserve the
/// recalculate semantics or document its absence.
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(
        &self,
        user_index: usize,
        interactions: SparseRow<'_>,
        n: usize,
        recalculate_user: bool,
    ) -> Result<Vec<(usize, f32)>, RetrievalError>;
}

/// Implicit-feedback alternating-least-squares factorization model, restored
/// from trained parameters. Holds dense user and item factor tables plus the
/// precomputed item Gram matrix used by the per-query user solve.
#[derive(Debug, Clone)]
pub struct AlsModel {
    version: String,
    factors: usize,
    regularization: f32,
    alpha: f32,
    user_factors: DMatrix<f32>,
    item_factors: DMatrix<f32>,
    yty: DMatrix<f32>,
}

impl AlsModel {
    pub fn from_parameters(params: ModelParameters) -> Result<Self> {
        if params.factors == 0 {
            return Err(anyhow!("model factor dimension must be positive"));
        }
        if !params.regularization.is_finite() || params.regularization < 0.0 {
            return Err(anyhow!("model regularization must be finite and non-negative"));
        }
        if !params.alpha.is_finite() || params.alpha < 0.0 {
            return Err(anyhow!("model alpha must be finite and non-negative"));
        }

        let user_factors = factor_table(&params.user_factors, params.factors, "user")?;
        let item_factors = factor_table(&params.item_factors, params.factors, "item")?;
        let yty = item_factors.transpose() * &item_factors;

        Ok(Self {
            version: params.version,
            factors: params.factors,
            regularization: params.regularization,
            alpha: params.alpha,
            user_factors,
            item_factors,
            yty,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn factors(&self) -> usize {
        self.factors
    }

    pub fn num_users(&self) -> usize {
        self.user_factors.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.item_factors.nrows()
    }

    fn stored_user_vector(&self, user_index: usize) -> Result<DVector<f32>, RetrievalError> {
        if user_index >= self.user_factors.nrows() {
            return Err(RetrievalError::IndexOutOfRange {
                index: user_index,
                bound: self.user_factors.nrows(),
            });
        }
        Ok(self.user_factors.row(user_index).transpose())
    }

    /// Least-squares solve of the implicit-feedback normal equations
    /// `(YᵀY + Yᵀ(Cᵤ−I)Y + λI)·xᵤ = YᵀCᵤp(u)` with confidence
    /// `c = 1 + α·w` per observed interaction.
    fn recalculate_user(&self, interactions: SparseRow<'_>) -> Result<DVector<f32>, RetrievalError> {
        let bound = self.item_factors.nrows();
        let mut a = self.yty.clone();
        for i in 0..self.factors {
            a[(i, i)] += self.regularization;
        }

        let mut b = DVector::zeros(self.factors);
        for (item_index, weight) in interactions.iter() {
            if item_index >= bound {
                return Err(RetrievalError::IndexOutOfRange {
                    index: item_index,
                    bound,
                });
            }

            let y = self.item_factors.row(item_index).transpose();
            let confidence = 1.0 + self.alpha * weight;
            a += (&y * y.transpose()) * (confidence - 1.0);
            b += y * confidence;
        }

        // The system is positive definite for λ > 0; a degenerate model
        // (λ = 0 and no interactions) falls back to the zero vector.
        match a.cholesky() {
            Some(cholesky) => Ok(cholesky.solve(&b)),
            None => Ok(DVector::zeros(self.factors)),
        }
    }
}

#[async_trait::async_trait]
impl Recommender for AlsModel {
    async fn recommend(
        &self,
        user_index: usize,
        interactions: SparseRow<'_>,
        n: usize,
        recalculate_user: bool,
    ) -> Result<Vec<(usize, f32)>, RetrievalError> {
        let user_vector = if recalculate_user {
            self.recalculate_user(interactions)?
        } else {
            self.stored_user_vector(user_index)?
        };

        let scores = &self.item_factors * &user_vector;
        let interacted: HashSet<usize> = interactions.iter().map(|(index, _)| index).collect();

        Ok(ranking::top_n_scored(scores.as_slice(), n, &interacted))
    }
}

fn factor_table(rows: &[Vec<f32>], factors: usize, what: &str) -> Result<DMatrix<f32>> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != factors {
            return Err(anyhow!(
                "{} factor row {} has dimension {} (expected {})",
                what,
                i,
                row.len(),
                factors
            ));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(anyhow!("{} factor row {} contains NaN or infinity", what, i));
        }
    }

    let data: Vec<f32> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(rows.len(), factors, &data))
}
