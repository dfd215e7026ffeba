use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Forced aspect ratios supported by the component.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize, Hash)]
pub enum Proportions {
    #[serde(rename = "4:3")]
    FourByThree,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    SixteenByNine,
    #[serde(rename = "9:16")]
    NineBySixteen,
}

impl Proportions {
    /// Height as a percentage of width, for a padding-bottom ratio box.
    pub fn padding_percent(self) -> f64 {
        match self {
            Proportions::FourByThree => 75.0,
            Proportions::Square => 100.0,
            Proportions::SixteenByNine => 56.25,
            Proportions::NineBySixteen => 177.78,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown proportions `{0}`, expected one of 4:3, 1:1, 16:9, 9:16")]
pub struct ParseProportionsError(pub String);

impl FromStr for Proportions {
    type Err = ParseProportionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4:3" => Ok(Proportions::FourByThree),
            "1:1" => Ok(Proportions::Square),
            "16:9" => Ok(Proportions::SixteenByNine),
            "9:16" => Ok(Proportions::NineBySixteen),
            other => Err(ParseProportionsError(other.to_string())),
        }
    }
}

/// Padding percentage for the ratio box. 0 means no forced ratio: the image
/// keeps its natural shape.
pub fn aspect_ratio(proportions: Option<Proportions>) -> f64 {
    proportions.map(Proportions::padding_percent).unwrap_or(0.0)
}

/// String flavour of [`aspect_ratio`]; unknown values behave like unset.
pub fn get_aspect_ratio(proportions: Option<&str>) -> f64 {
    aspect_ratio(proportions.and_then(|p| p.parse().ok()))
}
