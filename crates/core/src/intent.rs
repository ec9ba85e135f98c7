//! The four request purposes and their fixed option sets.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What the operator is asking the model to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Chat(ChatIntent),
    Copy(CopyIntent),
    Forecast(ForecastIntent),
    Image(ImageIntent),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Chat(_) => "chat",
            Intent::Copy(_) => "copy",
            Intent::Forecast(_) => "forecast",
            Intent::Image(_) => "image",
        }
    }

    /// Whether the model must answer with a JSON object.
    pub fn is_structured(&self) -> bool {
        matches!(self, Intent::Copy(_) | Intent::Forecast(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatIntent {
    pub question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyIntent {
    pub platform: Platform,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastIntent {
    /// Product identifier the series belongs to.
    pub identifier: String,

    /// Model / specification string of the product.
    #[serde(default)]
    pub spec: String,

    /// Free-text exogenous factors (promotions, weather, holidays).
    #[serde(default)]
    pub factors: String,

    /// Number of future days to project.
    pub horizon_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageIntent {
    pub scene: SceneStyle,
    pub lighting: Lighting,
    pub aspect_ratio: AspectRatio,

    /// Free-text overrides appended to the prompt.
    #[serde(default)]
    pub details: String,
}

fn parse_token<T: Copy>(all: &[T], input: &str, as_str: fn(T) -> &'static str, kind: &str) -> Result<T, String> {
    let wanted = input.trim().to_ascii_lowercase();
    all.iter()
        .copied()
        .find(|v| as_str(*v) == wanted)
        .ok_or_else(|| {
            let options: Vec<&str> = all.iter().map(|v| as_str(*v)).collect();
            format!("unknown {kind} '{input}' (expected one of: {})", options.join(", "))
        })
}

/// Publishing platform for generated copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Xiaohongshu,
    Douyin,
    Taobao,
    Jd,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Xiaohongshu,
        Platform::Douyin,
        Platform::Taobao,
        Platform::Jd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Xiaohongshu => "xiaohongshu",
            Platform::Douyin => "douyin",
            Platform::Taobao => "taobao",
            Platform::Jd => "jd",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Xiaohongshu => "Xiaohongshu (RED)",
            Platform::Douyin => "Douyin",
            Platform::Taobao => "Taobao",
            Platform::Jd => "JD.com",
        }
    }

    /// Lifestyle / social platforms, as opposed to marketplaces.
    pub fn is_lifestyle(self) -> bool {
        matches!(self, Platform::Xiaohongshu | Platform::Douyin)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_token(&Self::ALL, s, Self::as_str, "platform")
    }
}

/// Copywriting angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    PainPoint,
    Scenario,
    Promotion,
    Premium,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::PainPoint,
        Strategy::Scenario,
        Strategy::Promotion,
        Strategy::Premium,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::PainPoint => "pain_point",
            Strategy::Scenario => "scenario",
            Strategy::Promotion => "promotion",
            Strategy::Premium => "premium",
        }
    }

    pub fn guidance(self) -> &'static str {
        match self {
            Strategy::PainPoint => {
                "Open with a concrete customer pain point, then show how the product removes it."
            }
            Strategy::Scenario => {
                "Paint a specific everyday usage scene and place the product at its center."
            }
            Strategy::Promotion => {
                "Lead with the offer and urgency; make the value of buying now explicit."
            }
            Strategy::Premium => {
                "Emphasize craftsmanship, materials and brand quality; avoid discount language."
            }
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_token(&Self::ALL, &s.replace('-', "_"), Self::as_str, "strategy")
    }
}

/// Scene style for product photography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneStyle {
    Studio,
    Lifestyle,
    Outdoor,
    Minimalist,
}

impl SceneStyle {
    pub const ALL: [SceneStyle; 4] = [
        SceneStyle::Studio,
        SceneStyle::Lifestyle,
        SceneStyle::Outdoor,
        SceneStyle::Minimalist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneStyle::Studio => "studio",
            SceneStyle::Lifestyle => "lifestyle",
            SceneStyle::Outdoor => "outdoor",
            SceneStyle::Minimalist => "minimalist",
        }
    }

    pub fn descriptor(self) -> &'static str {
        match self {
            SceneStyle::Studio => "professional studio product shot on a seamless backdrop",
            SceneStyle::Lifestyle => "lifestyle scene in a warm, lived-in home interior",
            SceneStyle::Outdoor => "outdoor scene with natural surroundings",
            SceneStyle::Minimalist => "minimalist composition with clean geometric props",
        }
    }
}

impl FromStr for SceneStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_token(&Self::ALL, s, Self::as_str, "scene style")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    Soft,
    Natural,
    Dramatic,
    GoldenHour,
}

impl Lighting {
    pub const ALL: [Lighting; 4] = [
        Lighting::Soft,
        Lighting::Natural,
        Lighting::Dramatic,
        Lighting::GoldenHour,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Lighting::Soft => "soft",
            Lighting::Natural => "natural",
            Lighting::Dramatic => "dramatic",
            Lighting::GoldenHour => "golden_hour",
        }
    }

    pub fn descriptor(self) -> &'static str {
        match self {
            Lighting::Soft => "soft diffused lighting",
            Lighting::Natural => "natural daylight",
            Lighting::Dramatic => "dramatic high-contrast lighting",
            Lighting::GoldenHour => "warm golden-hour sunlight",
        }
    }
}

impl FromStr for Lighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_token(&Self::ALL, &s.replace('-', "_"), Self::as_str, "lighting")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Story,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Story,
        AspectRatio::Wide,
    ];

    /// The token sent to the image endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Story => "9:16",
            AspectRatio::Wide => "16:9",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_token(&Self::ALL, s, Self::as_str, "aspect ratio")
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {$(
        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

display_as_str!(Platform, Strategy, SceneStyle, Lighting, AspectRatio);
