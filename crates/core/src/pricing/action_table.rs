//! Base discount actions keyed by discretized (days-to-expiry, stock) state.
//!
//! The table is hand-authored configuration, not a trained model: the default
//! is regenerated from a fixed rule and stays immutable once built.

use serde::{Deserialize, Serialize};

use super::discretizer::{StateBin, BIN_COUNT};
use crate::errors::DomainError;

pub const ACTION_COUNT: usize = 3;
/// Discount percentage represented by each step of the action index.
pub const ACTION_STEP_PCT: f64 = 10.0;

type Weights = [[[f64; ACTION_COUNT]; BIN_COUNT]; BIN_COUNT];

const FAVOR_DEEP: [f64; ACTION_COUNT] = [0.1, 0.3, 0.6];
const FAVOR_MODERATE: [f64; ACTION_COUNT] = [0.3, 0.5, 0.2];
const FAVOR_NONE: [f64; ACTION_COUNT] = [0.8, 0.15, 0.05];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Vec<f64>>>", into = "Vec<Vec<Vec<f64>>>")]
pub struct ActionTable {
    weights: Weights,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::generate_default()
    }
}

impl ActionTable {
    pub fn generate_default() -> Self {
        let mut weights = [[[0.0; ACTION_COUNT]; BIN_COUNT]; BIN_COUNT];
        for (days, row) in weights.iter_mut().enumerate() {
            for (stock, cell) in row.iter_mut().enumerate() {
                *cell = if days <= 2 && stock >= 3 {
                    FAVOR_DEEP
                } else if days <= 3 && stock >= 2 {
                    FAVOR_MODERATE
                } else {
                    FAVOR_NONE
                };
            }
        }
        Self { weights }
    }

    /// Accepts an uploaded `[days][stock][action]` table; only the 7x7x3 shape is valid.
    pub fn from_weights(raw: Vec<Vec<Vec<f64>>>) -> Result<Self, DomainError> {
        if raw.len() != BIN_COUNT {
            return Err(DomainError::InvalidActionTable(format!(
                "expected {BIN_COUNT} days-to-expiry rows, found {}",
                raw.len()
            )));
        }

        let mut weights = [[[0.0; ACTION_COUNT]; BIN_COUNT]; BIN_COUNT];
        for (days, row) in raw.into_iter().enumerate() {
            if row.len() != BIN_COUNT {
                return Err(DomainError::InvalidActionTable(format!(
                    "row {days}: expected {BIN_COUNT} stock cells, found {}",
                    row.len()
                )));
            }
            for (stock, cell) in row.into_iter().enumerate() {
                let values: [f64; ACTION_COUNT] = cell.try_into().map_err(|cell: Vec<f64>| {
                    DomainError::InvalidActionTable(format!(
                        "cell [{days}][{stock}]: expected {ACTION_COUNT} action weights, found {}",
                        cell.len()
                    ))
                })?;
                if values.iter().any(|value| !value.is_finite()) {
                    return Err(DomainError::InvalidActionTable(format!(
                        "cell [{days}][{stock}]: weights must be finite"
                    )));
                }
                weights[days][stock] = values;
            }
        }

        Ok(Self { weights })
    }

    pub fn weights(&self, bin: StateBin) -> Option<&[f64; ACTION_COUNT]> {
        self.weights.get(bin.days).and_then(|row| row.get(bin.stock))
    }

    /// Arg-max action for a state; ties resolve to the lowest index.
    pub fn best_action(&self, bin: StateBin) -> usize {
        let Some(weights) = self.weights(bin) else {
            return 0;
        };
        let mut best = 0;
        for (index, weight) in weights.iter().enumerate().skip(1) {
            if *weight > weights[best] {
                best = index;
            }
        }
        best
    }

    pub fn base_discount_pct(&self, bin: StateBin) -> f64 {
        self.best_action(bin) as f64 * ACTION_STEP_PCT
    }
}

impl TryFrom<Vec<Vec<Vec<f64>>>> for ActionTable {
    type Error = DomainError;

    fn try_from(value: Vec<Vec<Vec<f64>>>) -> Result<Self, Self::Error> {
        Self::from_weights(value)
    }
}

impl From<ActionTable> for Vec<Vec<Vec<f64>>> {
    fn from(table: ActionTable) -> Self {
        table.weights.iter().map(|row| row.iter().map(|cell| cell.to_vec()).collect()).collect()
    }
}
