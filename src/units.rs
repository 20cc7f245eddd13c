//! Height/weight display. The API reports decimetres and hectograms.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

const INCHES_PER_DECIMETRE: f64 = 3.937_007_874;
const POUNDS_PER_HECTOGRAM: f64 = 0.220_462_262;

impl UnitSystem {
    pub fn toggle(&self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn format_height(&self, decimetres: u16) -> String {
        match self {
            UnitSystem::Metric => format!("{:.1} m", decimetres as f64 / 10.0),
            UnitSystem::Imperial => {
                let inches = (decimetres as f64 * INCHES_PER_DECIMETRE).round() as u32;
                format!("{}' {:02}\"", inches / 12, inches % 12)
            }
        }
    }

    pub fn format_weight(&self, hectograms: u16) -> String {
        match self {
            UnitSystem::Metric => format!("{:.1} kg", hectograms as f64 / 10.0),
            UnitSystem::Imperial => {
                format!("{:.1} lbs", hectograms as f64 * POUNDS_PER_HECTOGRAM)
            }
        }
    }
}
