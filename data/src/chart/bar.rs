use iced_core::Color;
use serde::{Deserialize, Serialize};

use crate::theme::hex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(with = "hex")]
    pub color_top: Color,
    #[serde(with = "hex")]
    pub color_bottom: Color,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            title: None,
            color_top: Color::from_rgb8(52, 152, 219),
            color_bottom: Color::from_rgb8(31, 97, 141),
        }
    }
}

impl BarOptions {
    pub fn with_colors(color_top: Color, color_bottom: Color) -> Self {
        Self {
            color_top,
            color_bottom,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
