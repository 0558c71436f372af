use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
}

impl Region {
    pub const ALL: [Region; 5] =
        [Region::North, Region::South, Region::East, Region::West, Region::Central];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Central => "Central",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Region {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            "central" => Ok(Self::Central),
            other => Err(DomainError::UnknownRegion(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Summer,
    Monsoon,
    Festival,
    Regular,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Summer => "Summer",
            Self::Monsoon => "Monsoon",
            Self::Festival => "Festival",
            Self::Regular => "Regular",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Self::Winter),
            "summer" => Ok(Self::Summer),
            "monsoon" => Ok(Self::Monsoon),
            "festival" => Ok(Self::Festival),
            "regular" => Ok(Self::Regular),
            other => Err(DomainError::UnknownSeason(other.to_string())),
        }
    }
}

/// One row of the active inventory dataset. `name` is the unique key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub unit_price: f64,
    pub stock_quantity: u32,
    /// Units sold per week.
    pub sales_volume: u32,
    pub days_to_expiry: u32,
    pub turnover_rate: f64,
    pub inventory_turnover_rate: f64,
    pub state: Option<String>,
    pub region: Option<Region>,
    pub season: Option<Season>,
}

impl Product {
    pub fn stock_value(&self) -> f64 {
        f64::from(self.stock_quantity) * self.unit_price
    }
}

/// Weekly sales over stock on hand; zero stock yields zero rather than a division error.
pub fn turnover_rate(sales_volume: u32, stock_quantity: u32) -> f64 {
    if stock_quantity == 0 {
        return 0.0;
    }
    f64::from(sales_volume) / f64::from(stock_quantity)
}
