use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Region codes the backend scans in. Serialized as the bare code ("US").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    US,
    UK,
    UAE,
    CA,
    AU,
    DE,
    FR,
    IT,
    ES,
    NL,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::US,
        Region::UK,
        Region::UAE,
        Region::CA,
        Region::AU,
        Region::DE,
        Region::FR,
        Region::IT,
        Region::ES,
        Region::NL,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::US => "US",
            Region::UK => "UK",
            Region::UAE => "UAE",
            Region::CA => "CA",
            Region::AU => "AU",
            Region::DE => "DE",
            Region::FR => "FR",
            Region::IT => "IT",
            Region::ES => "ES",
            Region::NL => "NL",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Region::US => "United States",
            Region::UK => "United Kingdom",
            Region::UAE => "United Arab Emirates",
            Region::CA => "Canada",
            Region::AU => "Australia",
            Region::DE => "Germany",
            Region::FR => "France",
            Region::IT => "Italy",
            Region::ES => "Spain",
            Region::NL => "Netherlands",
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::US
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "US" => Ok(Region::US),
            "UK" => Ok(Region::UK),
            "UAE" => Ok(Region::UAE),
            "CA" => Ok(Region::CA),
            "AU" => Ok(Region::AU),
            "DE" => Ok(Region::DE),
            "FR" => Ok(Region::FR),
            "IT" => Ok(Region::IT),
            "ES" => Ok(Region::ES),
            "NL" => Ok(Region::NL),
            other => Err(format!("unknown region '{}'", other)),
        }
    }
}
