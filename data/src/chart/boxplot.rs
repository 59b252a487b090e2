use iced_core::Color;
use serde::{Deserialize, Serialize};

use crate::theme::hex_opt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxPlotOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Colour of series that carry none, the theme's bullish colour otherwise.
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_opt")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_opt")]
    pub background: Option<Color>,
}

impl BoxPlotOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
