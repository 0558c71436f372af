//! Static lookup data consumed by the pricing engine.
//!
//! The defaults mirror the dashboard's built-in tables. Operators can replace
//! them wholesale from a TOML file (see `AppConfig::reference_tables`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::product::{Region, Season};

pub const DEFAULT_ELASTICITY: f64 = 1.0;

/// Category keywords sharing one price elasticity. Rules are checked in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElasticityRule {
    pub keywords: Vec<String>,
    pub elasticity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub state_regions: BTreeMap<String, Region>,
    /// Region name -> season name -> minimum discount percentage.
    pub seasonal_floors: BTreeMap<String, BTreeMap<String, f64>>,
    pub elasticity_rules: Vec<ElasticityRule>,
    #[serde(default = "default_elasticity")]
    pub default_elasticity: f64,
}

fn default_elasticity() -> f64 {
    DEFAULT_ELASTICITY
}

impl Default for ReferenceTables {
    fn default() -> Self {
        let state_regions = [
            ("Punjab", Region::North),
            ("Haryana", Region::North),
            ("Himachal Pradesh", Region::North),
            ("Uttar Pradesh", Region::North),
            ("Uttarakhand", Region::North),
            ("Delhi", Region::North),
            ("Rajasthan", Region::North),
            ("Tamil Nadu", Region::South),
            ("Kerala", Region::South),
            ("Karnataka", Region::South),
            ("Andhra Pradesh", Region::South),
            ("Telangana", Region::South),
            ("West Bengal", Region::East),
            ("Bihar", Region::East),
            ("Jharkhand", Region::East),
            ("Odisha", Region::East),
            ("Assam", Region::East),
            ("Arunachal Pradesh", Region::East),
            ("Manipur", Region::East),
            ("Meghalaya", Region::East),
            ("Mizoram", Region::East),
            ("Nagaland", Region::East),
            ("Sikkim", Region::East),
            ("Tripura", Region::East),
            ("Maharashtra", Region::West),
            ("Gujarat", Region::West),
            ("Goa", Region::West),
            ("Madhya Pradesh", Region::Central),
            ("Chhattisgarh", Region::Central),
        ]
        .into_iter()
        .map(|(state, region)| (state.to_string(), region))
        .collect();

        // Winter, Summer, Monsoon, Festival. Regular has no floor.
        let floors = [
            (Region::North, [15.0, 10.0, 15.0, 25.0]),
            (Region::South, [10.0, 20.0, 15.0, 25.0]),
            (Region::East, [15.0, 10.0, 20.0, 25.0]),
            (Region::West, [10.0, 15.0, 15.0, 25.0]),
            (Region::Central, [15.0, 15.0, 15.0, 20.0]),
        ];
        let seasonal_floors = floors
            .into_iter()
            .map(|(region, values)| {
                let by_season = [Season::Winter, Season::Summer, Season::Monsoon, Season::Festival]
                    .into_iter()
                    .zip(values)
                    .map(|(season, floor)| (season.as_str().to_string(), floor))
                    .collect();
                (region.as_str().to_string(), by_season)
            })
            .collect();

        let elasticity_rules = vec![
            rule(&["luxury", "premium"], 1.5),
            rule(&["dairy", "bread"], 0.8),
            rule(&["meat", "seafood"], 1.2),
            rule(&["fruits", "vegetables"], 1.0),
        ];

        Self {
            state_regions,
            seasonal_floors,
            elasticity_rules,
            default_elasticity: DEFAULT_ELASTICITY,
        }
    }
}

fn rule(keywords: &[&str], elasticity: f64) -> ElasticityRule {
    ElasticityRule {
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        elasticity,
    }
}

impl ReferenceTables {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn region_for_state(&self, state: &str) -> Option<Region> {
        self.state_regions.get(state.trim()).copied()
    }

    /// Minimum discount for a region/season pair; unmapped pairs have no floor.
    pub fn seasonal_floor(&self, region: Region, season: Season) -> f64 {
        self.seasonal_floors
            .get(region.as_str())
            .and_then(|by_season| by_season.get(season.as_str()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn price_elasticity(&self, category: &str) -> f64 {
        let category = category.to_lowercase();
        self.elasticity_rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| category.contains(keyword.as_str())))
            .map(|rule| rule.elasticity)
            .unwrap_or(self.default_elasticity)
    }
}
