use iced_core::Color;
use serde::{Deserialize, Serialize};

/// X-axis category, fixtures carry either strings or plain numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Text(text) => f.write_str(text),
            Label::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Label::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}

impl From<f64> for Label {
    fn from(value: f64) -> Self {
        Label::Number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,
    #[error("{x} labels for {y} values")]
    LengthMismatch { x: usize, y: usize },
    #[error("value at index {0} is not finite")]
    NonFinite(usize),
}

/// Parallel label/value arrays used by the line and bar charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub x: Vec<Label>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn new<L: Into<Label>>(x: impl IntoIterator<Item = L>, y: impl Into<Vec<f64>>) -> Self {
        Self {
            x: x.into_iter().map(Into::into).collect(),
            y: y.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Pairs labels with values, rejecting the inputs no chart can plot.
    pub fn points(&self) -> Result<Vec<(&Label, f64)>, SeriesError> {
        if self.x.is_empty() || self.y.is_empty() {
            return Err(SeriesError::Empty);
        }
        if self.x.len() != self.y.len() {
            return Err(SeriesError::LengthMismatch {
                x: self.x.len(),
                y: self.y.len(),
            });
        }
        if let Some(index) = self.y.iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFinite(index));
        }

        Ok(self.x.iter().zip(self.y.iter().copied()).collect())
    }

    /// Smallest and largest values, `None` when there is nothing finite.
    pub fn extent(&self) -> Option<(f64, f64)> {
        self.y
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieEntry {
    pub label: String,
    pub value: f64,
}

impl PieEntry {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

fn default_box_label() -> String {
    "Data".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSeries {
    pub values: Vec<f64>,
    #[serde(default = "default_box_label")]
    pub label: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::theme::hex_opt"
    )]
    pub color: Option<Color>,
}

impl BoxSeries {
    pub fn new(label: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            label: label.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Box plot input: one bare series or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoxData {
    Single(BoxSeries),
    Multi { series: Vec<BoxSeries> },
}

impl BoxData {
    pub fn series(&self) -> &[BoxSeries] {
        match self {
            BoxData::Single(series) => std::slice::from_ref(series),
            BoxData::Multi { series } => series,
        }
    }
}

impl From<Vec<BoxSeries>> for BoxData {
    fn from(series: Vec<BoxSeries>) -> Self {
        BoxData::Multi { series }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_reject_bad_input() {
        assert_eq!(Series::default().points(), Err(SeriesError::Empty));
        assert_eq!(
            Series::new(["a", "b"], vec![1.0]).points(),
            Err(SeriesError::LengthMismatch { x: 2, y: 1 })
        );
        assert_eq!(
            Series::new(["a", "b"], vec![1.0, f64::NAN]).points(),
            Err(SeriesError::NonFinite(1))
        );
        assert_eq!(Series::new(["a"], vec![3.0]).points().map(|p| p.len()), Ok(1));
    }

    #[test]
    fn labels_accept_numbers_and_strings() {
        let series: Series = serde_json::from_str(r#"{"x": ["Jan", 2, 2.5], "y": [1, 2, 3]}"#).unwrap();

        let labels: Vec<String> = series.x.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["Jan", "2", "2.5"]);
        assert_eq!(series.extent(), Some((1.0, 3.0)));
    }

    #[test]
    fn box_data_shapes() {
        let single: BoxData = serde_json::from_str(r#"{"values": [1, 2, 3]}"#).unwrap();
        assert_eq!(single.series().len(), 1);
        assert_eq!(single.series()[0].label, "Data");

        let multi: BoxData = serde_json::from_str(
            r##"{"series": [
                {"values": [1, 2], "label": "BTC", "color": "#f7931a"},
                {"values": [3], "label": "ETH"}
            ]}"##,
        )
        .unwrap();
        let series = multi.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].color, Some(Color::from_rgb8(0xf7, 0x93, 0x1a)));
        assert_eq!(series[1].color, None);
    }
}
