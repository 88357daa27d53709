use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Component identifier as it appears in the product column.
pub type ComponentName = String;

/// Transport mode used to ship a component from its supplier.
///
/// - `Air`: fast and usually more expensive (default when the choice is open).
/// - `Sea`: slow and usually cheaper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Air,
    Sea,
}

impl TransportMode {
    pub const ALL: [TransportMode; 2] = [TransportMode::Air, TransportMode::Sea];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Air => "air",
            TransportMode::Sea => "sea",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "air" | "avion" => Ok(TransportMode::Air),
            "sea" | "bateau" => Ok(TransportMode::Sea),
            other => Err(format!(
                "invalid transport mode: {other} (expected \"air\" or \"sea\")"
            )),
        }
    }
}
