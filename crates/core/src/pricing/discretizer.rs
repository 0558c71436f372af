use serde::{Deserialize, Serialize};

pub const DAYS_TO_EXPIRY_BINS: [u32; 6] = [0, 2, 5, 10, 30, 100];
pub const STOCK_BINS: [u32; 6] = [0, 10, 20, 50, 100, 1000];

/// Number of bins per dimension, including the overflow bin.
pub const BIN_COUNT: usize = DAYS_TO_EXPIRY_BINS.len() + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateBin {
    pub days: usize,
    pub stock: usize,
}

pub fn discretize(days_to_expiry: u32, stock_quantity: u32) -> StateBin {
    StateBin {
        days: bin_index(&DAYS_TO_EXPIRY_BINS, days_to_expiry),
        stock: bin_index(&STOCK_BINS, stock_quantity),
    }
}

/// Index of the first boundary `>= value`, or `boundaries.len()` past the last one.
fn bin_index(boundaries: &[u32], value: u32) -> usize {
    boundaries.iter().position(|boundary| value <= *boundary).unwrap_or(boundaries.len())
}
