use iced_core::Color;
use palette::{Mix, Srgba};
use serde::{Deserialize, Serialize};

/// Colours every renderer draws with. Serialised as `#rrggbb`/`#rrggbbaa` strings,
/// fields missing from a theme file fall back to the dark preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(with = "hex")]
    pub background: Color,
    #[serde(with = "hex")]
    pub text: Color,
    #[serde(with = "hex")]
    pub text_secondary: Color,
    #[serde(with = "hex")]
    pub grid: Color,
    #[serde(with = "hex")]
    pub line: Color,
    #[serde(with = "hex")]
    pub point: Color,
    #[serde(with = "hex")]
    pub tooltip: Color,
    #[serde(with = "hex")]
    pub tooltip_text: Color,
    #[serde(with = "hex")]
    pub tooltip_border: Color,
    #[serde(with = "hex")]
    pub bullish: Color,
    #[serde(with = "hex")]
    pub bearish: Color,
    #[serde(with = "hex")]
    pub accent: Color,
    #[serde(with = "hex")]
    pub accent_border: Color,
    #[serde(with = "hex")]
    pub median: Color,
    #[serde(with = "hex")]
    pub crosshair: Color,
    #[serde(with = "hex")]
    pub shadow: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Preset::Dark.theme()
    }
}

impl Theme {
    /// Looks up a preset by its serialised name.
    pub fn preset(name: &str) -> Option<Theme> {
        name.parse::<Preset>().ok().map(Preset::theme)
    }

    /// Fill colours for pie slices and series without their own colour.
    pub fn series_palette(&self) -> Vec<Color> {
        vec![
            self.bullish,
            self.line,
            self.accent,
            self.bearish,
            Color::from_rgb8(168, 85, 247),
            Color::from_rgb8(20, 184, 166),
            Color::from_rgb8(236, 72, 153),
            Color::from_rgb8(148, 163, 184),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Dark,
    Light,
    Nord,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Dark, Preset::Light, Preset::Nord];

    pub fn theme(self) -> Theme {
        match self {
            Preset::Dark => Theme {
                background: Color::from_rgb8(26, 27, 30),
                text: Color::WHITE,
                text_secondary: Color::from_rgba8(216, 222, 233, 0.8),
                grid: Color::from_rgba8(255, 255, 255, 0.05),
                line: Color::from_rgb8(52, 152, 219),
                point: Color::WHITE,
                tooltip: Color::from_rgba8(40, 42, 46, 0.95),
                tooltip_text: Color::WHITE,
                tooltip_border: Color::from_rgba8(60, 62, 66, 0.8),
                bullish: Color::from_rgb8(34, 197, 94),
                bearish: Color::from_rgb8(239, 68, 68),
                accent: Color::from_rgb8(251, 191, 36),
                accent_border: Color::from_rgb8(245, 158, 11),
                median: Color::WHITE,
                crosshair: Color::from_rgba8(160, 160, 160, 0.9),
                shadow: Color::from_rgba8(0, 0, 0, 0.2),
            },
            Preset::Light => Theme {
                background: Color::WHITE,
                text: Color::from_rgb8(26, 27, 30),
                text_secondary: Color::from_rgba8(60, 64, 72, 0.8),
                grid: Color::from_rgba8(0, 0, 0, 0.08),
                line: Color::from_rgb8(37, 99, 235),
                point: Color::from_rgb8(30, 64, 175),
                tooltip: Color::from_rgba8(255, 255, 255, 0.95),
                tooltip_text: Color::from_rgb8(26, 27, 30),
                tooltip_border: Color::from_rgba8(0, 0, 0, 0.15),
                bullish: Color::from_rgb8(22, 163, 74),
                bearish: Color::from_rgb8(220, 38, 38),
                accent: Color::from_rgb8(245, 158, 11),
                accent_border: Color::from_rgb8(217, 119, 6),
                median: Color::WHITE,
                crosshair: Color::from_rgba8(80, 80, 80, 0.9),
                shadow: Color::from_rgba8(0, 0, 0, 0.15),
            },
            Preset::Nord => Theme {
                background: Color::from_rgb8(46, 52, 64),
                text: Color::from_rgb8(236, 239, 244),
                text_secondary: Color::from_rgba8(216, 222, 233, 0.8),
                grid: Color::from_rgba8(236, 239, 244, 0.06),
                line: Color::from_rgb8(136, 192, 208),
                point: Color::from_rgb8(236, 239, 244),
                tooltip: Color::from_rgba8(59, 66, 82, 0.95),
                tooltip_text: Color::from_rgb8(236, 239, 244),
                tooltip_border: Color::from_rgb8(76, 86, 106),
                bullish: Color::from_rgb8(163, 190, 140),
                bearish: Color::from_rgb8(191, 97, 106),
                accent: Color::from_rgb8(235, 203, 139),
                accent_border: Color::from_rgb8(208, 135, 112),
                median: Color::from_rgb8(236, 239, 244),
                crosshair: Color::from_rgba8(216, 222, 233, 0.9),
                shadow: Color::from_rgba8(0, 0, 0, 0.3),
            },
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Preset::Dark => "dark",
            Preset::Light => "light",
            Preset::Nord => "nord",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Preset::Dark),
            "light" => Ok(Preset::Light),
            "nord" => Ok(Preset::Nord),
            other => Err(format!("Invalid theme: {other}")),
        }
    }
}

impl Serialize for Preset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Preset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Linear blend in sRGB space, `factor` 0 keeps `from`, 1 gives `to`.
pub fn mix(from: Color, to: Color, factor: f32) -> Color {
    let from = Srgba::new(from.r, from.g, from.b, from.a);
    let to = Srgba::new(to.r, to.g, to.b, to.a);
    let mixed = from.mix(to, factor);

    Color::from_rgba(
        mixed.color.red,
        mixed.color.green,
        mixed.color.blue,
        mixed.alpha,
    )
}

/// Moves a colour `amount` of the way toward white, keeping its alpha.
pub fn lighten(color: Color, amount: f32) -> Color {
    mix(color, Color { a: color.a, ..Color::WHITE }, amount)
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(text: &str) -> Option<Color> {
    let text = text.trim();
    if !text.is_ascii() {
        return None;
    }
    text.parse::<Color>().ok()
}

pub mod hex {
    use iced_core::Color;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(color)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_color(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid colour: {text}")))
    }
}

pub mod hex_opt {
    use iced_core::Color;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &Option<Color>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match color {
            Some(color) => serializer.collect_str(color),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|text| {
                super::parse_color(&text)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid colour: {text}")))
            })
            .transpose()
    }
}
