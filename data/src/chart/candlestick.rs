use iced_core::Color;
use serde::{Deserialize, Serialize};

use crate::theme::hex_opt;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 10.0;
/// Fewest candles a zoomed window shows.
pub const MIN_VISIBLE_CANDLES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandlestickOptions {
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_opt")]
    pub background: Option<Color>,
    /// Share of the plot height given to the volume panel.
    pub volume_ratio: f32,
}

impl Default for CandlestickOptions {
    fn default() -> Self {
        Self {
            background: None,
            volume_ratio: 0.2,
        }
    }
}

impl CandlestickOptions {
    pub fn volume_ratio(&self) -> f32 {
        if self.volume_ratio.is_finite() {
            self.volume_ratio.clamp(0.0, 0.9)
        } else {
            Self::default().volume_ratio
        }
    }
}
