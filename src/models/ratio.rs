use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Landscape threshold (width / height) for output framing.
const LANDSCAPE_ASPECT: f64 = 1.25;

/// Portrait threshold (width / height) for output framing.
const PORTRAIT_ASPECT: f64 = 0.8;

/// Output ratios accepted by Runway's text_to_image endpoint.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, EnumString, EnumIter, Display, PartialEq, Eq,
)]
pub enum OutputRatio {
    #[serde(rename = "1024:1024")]
    #[strum(serialize = "1024:1024")]
    Square,
    #[serde(rename = "1344:768")]
    #[strum(serialize = "1344:768")]
    Landscape,
    #[serde(rename = "768:1344")]
    #[strum(serialize = "768:1344")]
    Portrait,
    /// Accepted by the API for callers that pick a ratio explicitly.
    /// [`select_ratio`] never returns the 4:3 pair.
    #[serde(rename = "1184:864")]
    #[strum(serialize = "1184:864")]
    LandscapeClassic,
    #[serde(rename = "864:1184")]
    #[strum(serialize = "864:1184")]
    PortraitClassic,
}

impl OutputRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1024:1024",
            Self::Landscape => "1344:768",
            Self::Portrait => "768:1344",
            Self::LandscapeClassic => "1184:864",
            Self::PortraitClassic => "864:1184",
        }
    }
}

/// Pick the output ratio that best matches the subject photo's framing.
pub fn select_ratio(width: u32, height: u32) -> OutputRatio {
    if height == 0 {
        return OutputRatio::Square;
    }
    let aspect = width as f64 / height as f64;
    if aspect > LANDSCAPE_ASPECT {
        OutputRatio::Landscape
    } else if aspect < PORTRAIT_ASPECT {
        OutputRatio::Portrait
    } else {
        OutputRatio::Square
    }
}
