use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Fixed layout constants for one chart.
///
/// All lengths share one unit (SVG user units / CSS pixels).
/// A layout given in a settings file must list every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    /// Gap between the viewport edge and the plot area, on every side
    pub padding: f64,

    /// Number of intervals between Y ticks; `y_ticks + 1` labels are drawn
    pub y_ticks: usize,
    /// Upper bound on X-axis labels
    pub max_x_labels: usize,
    /// Bars shorter than this get no value label
    pub legibility_threshold: f64,

    pub marker_radius: f64,
    pub curve_width: f64,
    pub bar_width: f64,
    /// Distance from the start of a bar slot to the bar centre
    pub bar_offset: f64,

    /// Horizontal gap between the Y axis and its tick labels
    pub tick_label_gap: f64,
    /// How far grid lines reach left of the Y axis
    pub grid_overhang: f64,
    /// Baseline of X labels, below the X axis
    pub x_label_offset: f64,
    /// Gap between a bar top and its value label baseline
    pub value_label_gap: f64,
    /// Baseline of the Y axis title, above the plot area
    pub title_offset: f64,

    pub tick_font_size: f64,
    pub x_label_font_size: f64,
    pub title_font_size: f64,
}

impl ChartLayout {
    /// Layout of the cumulative XP chart.
    pub fn line_default() -> Self {
        Self {
            width: 700.0,
            height: 320.0,
            padding: 70.0,
            y_ticks: 5,
            max_x_labels: 7,
            legibility_threshold: 18.0,
            marker_radius: 4.0,
            curve_width: 3.0,
            bar_width: 30.0,
            bar_offset: 10.0,
            tick_label_gap: 10.0,
            grid_overhang: 6.0,
            x_label_offset: 22.0,
            value_label_gap: 6.0,
            title_offset: 16.0,
            tick_font_size: 14.0,
            x_label_font_size: 12.0,
            title_font_size: 16.0,
        }
    }

    /// Layout of the monthly audit chart.
    pub fn bar_default() -> Self {
        Self {
            padding: 50.0,
            tick_font_size: 12.0,
            ..Self::line_default()
        }
    }

    /// Width of the plot area.
    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    /// Height of the plot area.
    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    /// Y coordinate of the X axis.
    pub fn baseline(&self) -> f64 {
        self.height - self.padding
    }

    pub fn validate(&self, name: &str) -> Result<(), CoreError> {
        let lengths = [
            ("width", self.width),
            ("height", self.height),
            ("padding", self.padding),
            ("legibility_threshold", self.legibility_threshold),
            ("marker_radius", self.marker_radius),
            ("curve_width", self.curve_width),
            ("bar_width", self.bar_width),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidSettings(format!(
                    "{name}.{field} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(CoreError::InvalidSettings(format!(
                "{name}: padding {} leaves no plot area in a {}x{} viewport",
                self.padding, self.width, self.height
            )));
        }
        if self.y_ticks == 0 {
            return Err(CoreError::InvalidSettings(format!(
                "{name}.y_ticks must be at least 1"
            )));
        }
        if self.max_x_labels == 0 {
            return Err(CoreError::InvalidSettings(format!(
                "{name}.max_x_labels must be at least 1"
            )));
        }
        Ok(())
    }
}

/// Colours used when painting shapes, by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub curve: String,
    pub marker_outline: String,
    pub grid: String,
    pub axis: String,
    pub tick_label: String,
    pub title: String,
    pub bar: String,
    pub value_label: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            curve: "#22c55e".to_string(),
            marker_outline: "#fff".to_string(),
            grid: "#eee".to_string(),
            axis: "#888".to_string(),
            tick_label: "#888".to_string(),
            title: "#333".to_string(),
            bar: "#3b82f6".to_string(),
            value_label: "#3b82f6".to_string(),
        }
    }
}

/// User-configurable chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Layout of the cumulative XP line chart
    pub line: ChartLayout,

    /// Layout of the monthly audit bar chart
    pub bar: ChartLayout,

    pub palette: Palette,

    /// Digit-group separator for Y tick labels.
    /// Defaults to U+202F, the separator of the `fr-FR` locale.
    pub thousands_separator: String,

    /// Offset from UTC used for month buckets and date labels.
    /// `None` uses the host's local zone.
    pub utc_offset_minutes: Option<i32>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            line: ChartLayout::line_default(),
            bar: ChartLayout::bar_default(),
            palette: Palette::default(),
            thousands_separator: "\u{202f}".to_string(),
            utc_offset_minutes: None,
        }
    }
}

impl ChartSettings {
    /// Parse settings from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: ChartSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.line.validate("line")?;
        self.bar.validate("bar")?;
        if let Some(minutes) = self.utc_offset_minutes {
            // chrono's FixedOffset accepts strictly less than a day
            if minutes.unsigned_abs() >= 24 * 60 {
                return Err(CoreError::InvalidSettings(format!(
                    "utc_offset_minutes {minutes} is outside ±1439"
                )));
            }
        }
        Ok(())
    }
}
