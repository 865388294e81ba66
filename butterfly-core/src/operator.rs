// src/operator.rs
use log::debug;
use num_complex::Complex32;

use crate::batch::Batch;
use crate::config::EvalConfig;
use crate::error::ButterflyError;
use crate::factor::Factor;
use crate::ops::butterfly::validate::validate_factors;
use crate::ops::butterfly::{bp_mul_op_with_config, butterfly_mul_op_with_config};
use crate::permutation::Permutation;
use crate::types::DType;

/// A fixed butterfly operator: an owned factor sequence, an optional input
/// permutation and the evaluation options.
///
/// The factor sequence is checked once at construction, so `apply` only has to
/// check the batch against it.
#[derive(Debug, Clone)]
pub struct ButterflyOperator {
    factors: Vec<Factor>,
    perm: Option<Permutation>,
    config: EvalConfig,
    dim: usize,
    dtype: DType,
}

impl ButterflyOperator {
    /// Creates an operator of dimension `n = 2 * factors[0].m()`.
    ///
    /// # Errors
    /// `ShapeMismatch` if `factors` is empty or the trailing dimensions do not
    /// halve from one factor to the next; `DataTypeMismatch` if the factors mix
    /// real and complex.
    pub fn new(factors: Vec<Factor>) -> Result<Self, ButterflyError> {
        let first = factors.first().ok_or_else(|| {
            ButterflyError::shape_mismatch("at least one factor", 0, "ButterflyOperator::new")
        })?;
        let dtype = first.dtype();
        let dim = 2 * first.m();
        // The first factor fixes n; the rest are checked against a zero-row batch of width n.
        let probe = match dtype {
            DType::C64 => Batch::new_c64(Vec::new(), vec![0, dim])?,
            _ => Batch::new(Vec::new(), vec![0, dim])?,
        };
        validate_factors(&factors, &probe, "ButterflyOperator::new")?;

        debug!("ButterflyOperator: n = {}, {} factors, {:?}", dim, factors.len(), dtype);
        Ok(ButterflyOperator {
            factors,
            perm: None,
            config: EvalConfig::default(),
            dim,
            dtype,
        })
    }

    /// Attaches a permutation applied to every input row before the factors.
    pub fn with_permutation(mut self, perm: Permutation) -> Result<Self, ButterflyError> {
        if perm.len() != self.dim {
            return Err(ButterflyError::shape_mismatch(
                self.dim,
                perm.len(),
                "ButterflyOperator::with_permutation",
            ));
        }
        self.perm = Some(perm);
        Ok(self)
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Applies the operator to every row of `input`.
    pub fn apply(&self, input: &Batch) -> Result<Batch, ButterflyError> {
        match &self.perm {
            Some(perm) => bp_mul_op_with_config(&self.factors, perm, input, &self.config),
            None => butterfly_mul_op_with_config(&self.factors, input, &self.config),
        }
    }

    /// Materializes the `n x n` matrix `M` such that `apply(x)` equals `x · Mᵀ` row-wise.
    ///
    /// Costs `n² log n`; meant for inspection and tests.
    pub fn to_dense(&self) -> Result<Batch, ButterflyError> {
        let eye = match self.dtype {
            DType::C64 => Batch::eye::<Complex32>(self.dim)?,
            _ => Batch::eye::<f32>(self.dim)?,
        };
        // Row i of apply(I) is M e_i, i.e. column i of M.
        let columns = self.apply(&eye)?;
        match self.dtype {
            DType::C64 => transpose_square(&columns.get_c64_data()?, self.dim)
                .and_then(|data| Batch::new_c64(data, vec![self.dim, self.dim])),
            _ => transpose_square(&columns.get_f32_data()?, self.dim)
                .and_then(|data| Batch::new(data, vec![self.dim, self.dim])),
        }
    }

    /// Operator dimension `n`.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn num_factors(&self) -> usize {
        self.factors.len()
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn permutation(&self) -> Option<&Permutation> {
        self.perm.as_ref()
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }
}

fn transpose_square<T: Copy>(data: &[T], n: usize) -> Result<Vec<T>, ButterflyError> {
    if data.len() != n * n {
        return Err(ButterflyError::shape_mismatch(n * n, data.len(), "transpose_square"));
    }
    let mut out = Vec::with_capacity(n * n);
    for i in 0..n {
        out.extend((0..n).map(|j| data[j * n + i]));
    }
    Ok(out)
}
