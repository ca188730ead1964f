//! Core data types for the dashboard
//!
//! This module contains the data model that the host application streams
//! into the dashboard and that widgets read back.
//!
//! # Main Types
//!
//! - [`WidgetRole`] - Closed set of widget kinds a global index can resolve to
//! - [`AxisVisibility`] - Which plot axes the rendering layer should show
//! - [`DatasetValue`] - A numeric-or-text reading
//! - [`Dataset`] - One signal: value, unit, alarm threshold, display options
//! - [`Group`] - An ordered list of datasets with an optional group widget
//! - [`Frame`] - One decoded ingestion unit (title + groups)
//!
//! # Widget table
//!
//! A frame is flattened into one sub-table per [`WidgetRole`]. Group widgets
//! (data grid, multi-plot, accelerometer, ...) contribute one entry per
//! group; dataset widgets (bar, gauge, compass, plot, FFT) contribute one
//! entry per dataset. Global indices enumerate the sub-tables in the
//! declaration order of [`WidgetRole`].

use serde::{Deserialize, Serialize};

/// Logical kind of a dashboard widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetRole {
    DataGrid,
    MultiPlot,
    Fft,
    Plot,
    Bar,
    Gauge,
    Compass,
    Gyroscope,
    Accelerometer,
    Gps,
    Led,
    /// Registered by projects but rendered outside this core; has no widget.
    Plot3D,
}

impl WidgetRole {
    /// All roles, in global-index order
    pub const ALL: [WidgetRole; 12] = [
        WidgetRole::DataGrid,
        WidgetRole::MultiPlot,
        WidgetRole::Fft,
        WidgetRole::Plot,
        WidgetRole::Bar,
        WidgetRole::Gauge,
        WidgetRole::Compass,
        WidgetRole::Gyroscope,
        WidgetRole::Accelerometer,
        WidgetRole::Gps,
        WidgetRole::Led,
        WidgetRole::Plot3D,
    ];

    /// Whether entries of this role are whole groups (vs. single datasets)
    pub fn is_group_role(&self) -> bool {
        matches!(
            self,
            WidgetRole::DataGrid
                | WidgetRole::MultiPlot
                | WidgetRole::Gyroscope
                | WidgetRole::Accelerometer
                | WidgetRole::Gps
                | WidgetRole::Led
                | WidgetRole::Plot3D
        )
    }
}

impl std::fmt::Display for WidgetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WidgetRole::DataGrid => "datagrid",
            WidgetRole::MultiPlot => "multiplot",
            WidgetRole::Fft => "fft",
            WidgetRole::Plot => "plot",
            WidgetRole::Bar => "bar",
            WidgetRole::Gauge => "gauge",
            WidgetRole::Compass => "compass",
            WidgetRole::Gyroscope => "gyroscope",
            WidgetRole::Accelerometer => "accelerometer",
            WidgetRole::Gps => "gps",
            WidgetRole::Led => "led",
            WidgetRole::Plot3D => "plot3d",
        };
        write!(f, "{}", name)
    }
}

/// Axis visibility option shared by all plotting widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisVisibility {
    #[default]
    BothAxes,
    XOnly,
    YOnly,
    NeitherAxis,
}

impl AxisVisibility {
    pub fn x_visible(&self) -> bool {
        matches!(self, AxisVisibility::BothAxes | AxisVisibility::XOnly)
    }

    pub fn y_visible(&self) -> bool {
        matches!(self, AxisVisibility::BothAxes | AxisVisibility::YOnly)
    }
}

/// Widget shown for a group as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupWidget {
    #[default]
    None,
    DataGrid,
    MultiPlot,
    Accelerometer,
    Gyroscope,
    Gps,
    Led,
    Plot3D,
}

impl GroupWidget {
    /// Role of the sub-table this group is registered in, if any
    pub fn role(&self) -> Option<WidgetRole> {
        match self {
            GroupWidget::None => None,
            GroupWidget::DataGrid => Some(WidgetRole::DataGrid),
            GroupWidget::MultiPlot => Some(WidgetRole::MultiPlot),
            GroupWidget::Accelerometer => Some(WidgetRole::Accelerometer),
            GroupWidget::Gyroscope => Some(WidgetRole::Gyroscope),
            GroupWidget::Gps => Some(WidgetRole::Gps),
            GroupWidget::Led => Some(WidgetRole::Led),
            GroupWidget::Plot3D => Some(WidgetRole::Plot3D),
        }
    }
}

/// Widget shown for a single dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatasetWidget {
    #[default]
    None,
    Bar,
    Gauge,
    Compass,
}

impl DatasetWidget {
    pub fn role(&self) -> Option<WidgetRole> {
        match self {
            DatasetWidget::None => None,
            DatasetWidget::Bar => Some(WidgetRole::Bar),
            DatasetWidget::Gauge => Some(WidgetRole::Gauge),
            DatasetWidget::Compass => Some(WidgetRole::Compass),
        }
    }
}

/// A dataset reading: either a number or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetValue {
    Number(f64),
    Text(String),
}

impl Default for DatasetValue {
    fn default() -> Self {
        DatasetValue::Text(String::new())
    }
}

impl DatasetValue {
    /// Numeric interpretation of the value.
    ///
    /// Text counts as numeric only when it is a plain decimal literal
    /// (optional sign, optional fraction, no exponent, no surrounding text).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DatasetValue::Number(n) => Some(*n),
            DatasetValue::Text(s) => {
                if is_plain_decimal(s) {
                    s.parse::<f64>().ok()
                } else {
                    None
                }
            }
        }
    }

    /// Display text: numbers formatted to `precision` decimals, text verbatim
    pub fn display(&self, precision: usize) -> String {
        match self.as_number() {
            Some(n) => format!("{:.*}", precision, n),
            None => match self {
                DatasetValue::Text(s) => s.clone(),
                DatasetValue::Number(n) => n.to_string(),
            },
        }
    }
}

impl From<f64> for DatasetValue {
    fn from(value: f64) -> Self {
        DatasetValue::Number(value)
    }
}

impl From<&str> for DatasetValue {
    fn from(value: &str) -> Self {
        DatasetValue::Text(value.to_string())
    }
}

/// Matches `^[+-]?(\d*\.)?\d+$`
fn is_plain_decimal(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => ("", body),
    };
    !frac_part.is_empty()
        && frac_part.bytes().all(|b| b.is_ascii_digit())
        && int_part.bytes().all(|b| b.is_ascii_digit())
}

fn default_fft_samples() -> usize {
    256
}

fn default_sampling_rate() -> f64 {
    100.0
}

fn default_max() -> f64 {
    100.0
}

/// One signal of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub units: String,

    #[serde(default)]
    pub value: DatasetValue,

    /// Alarm threshold; 0 disables the alarm
    #[serde(default)]
    pub alarm: f64,

    /// Stable palette slot used for color assignment
    #[serde(default)]
    pub index: usize,

    #[serde(default)]
    pub widget: DatasetWidget,

    /// Whether the dataset gets an FFT plot
    #[serde(default)]
    pub fft: bool,

    /// Whether the dataset gets a time plot
    #[serde(default)]
    pub graph: bool,

    /// Requested FFT window length
    #[serde(default = "default_fft_samples")]
    pub fft_samples: usize,

    /// Sampling rate of the signal in Hz
    #[serde(default = "default_sampling_rate")]
    pub fft_sampling_rate: f64,

    #[serde(default)]
    pub min: f64,

    #[serde(default = "default_max")]
    pub max: f64,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            title: String::new(),
            units: String::new(),
            value: DatasetValue::default(),
            alarm: 0.0,
            index: 0,
            widget: DatasetWidget::None,
            fft: false,
            graph: false,
            fft_samples: default_fft_samples(),
            fft_sampling_rate: default_sampling_rate(),
            min: 0.0,
            max: default_max(),
        }
    }
}

impl Dataset {
    /// Create a dataset with a title and a value
    pub fn new(title: impl Into<String>, value: impl Into<DatasetValue>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_alarm(mut self, alarm: f64) -> Self {
        self.alarm = alarm;
        self
    }

    pub fn with_palette_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_widget(mut self, widget: DatasetWidget) -> Self {
        self.widget = widget;
        self
    }

    pub fn with_fft(mut self, samples: usize, sampling_rate: f64) -> Self {
        self.fft = true;
        self.fft_samples = samples;
        self.fft_sampling_rate = sampling_rate;
        self
    }

    pub fn with_graph(mut self) -> Self {
        self.graph = true;
        self
    }

    pub fn with_scale(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Whether two datasets occupy the same widget slots
    fn same_layout(&self, other: &Dataset) -> bool {
        self.title == other.title
            && self.widget == other.widget
            && self.fft == other.fft
            && self.graph == other.graph
            && self.fft_samples == other.fft_samples
            && self.fft_sampling_rate == other.fft_sampling_rate
    }
}

/// An ordered list of datasets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub widget: GroupWidget,

    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

impl Group {
    pub fn new(title: impl Into<String>, widget: GroupWidget) -> Self {
        Self {
            title: title.into(),
            widget,
            datasets: Vec::new(),
        }
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }
}

/// One decoded frame, as produced by the parsing front end
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Frame {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// True when both frames produce identical widget tables.
    ///
    /// Values may differ; titles, widgets and dataset flags may not.
    pub fn same_layout(&self, other: &Frame) -> bool {
        self.groups.len() == other.groups.len()
            && self.groups.iter().zip(&other.groups).all(|(a, b)| {
                a.title == b.title
                    && a.widget == b.widget
                    && a.datasets.len() == b.datasets.len()
                    && a.datasets.iter().zip(&b.datasets).all(|(x, y)| x.same_layout(y))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_decimal_detection() {
        assert!(is_plain_decimal("42"));
        assert!(is_plain_decimal("-3.5"));
        assert!(is_plain_decimal("+.25"));
        assert!(!is_plain_decimal("1e5"));
        assert!(!is_plain_decimal("12."));
        assert!(!is_plain_decimal("N/A"));
        assert!(!is_plain_decimal(""));
        assert!(!is_plain_decimal("-"));
    }

    #[test]
    fn test_value_display_uses_precision() {
        assert_eq!(DatasetValue::from(3.14159).display(2), "3.14");
        assert_eq!(DatasetValue::from("7").display(1), "7.0");
        assert_eq!(DatasetValue::from("OK").display(3), "OK");
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let n: DatasetValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(n, DatasetValue::Number(12.5));
        let t: DatasetValue = serde_json::from_str("\"LOCKED\"").unwrap();
        assert_eq!(t, DatasetValue::Text("LOCKED".to_string()));
    }

    #[test]
    fn test_axis_visibility_flags() {
        assert!(AxisVisibility::BothAxes.x_visible() && AxisVisibility::BothAxes.y_visible());
        assert!(AxisVisibility::XOnly.x_visible() && !AxisVisibility::XOnly.y_visible());
        assert!(!AxisVisibility::YOnly.x_visible() && AxisVisibility::YOnly.y_visible());
        assert!(!AxisVisibility::NeitherAxis.x_visible());
        assert!(!AxisVisibility::NeitherAxis.y_visible());
    }

    #[test]
    fn test_same_layout_ignores_values() {
        let a = Frame::new("f").with_group(
            Group::new("g", GroupWidget::DataGrid).with_dataset(Dataset::new("t", 1.0)),
        );
        let mut b = a.clone();
        b.groups[0].datasets[0].value = DatasetValue::from(99.0);
        assert!(a.same_layout(&b));

        b.groups[0].datasets[0].fft = true;
        assert!(!a.same_layout(&b));

        let mut c = a.clone();
        c.groups[0].datasets[0].fft_sampling_rate = 250.0;
        assert!(!a.same_layout(&c));
    }

    #[test]
    fn test_frame_deserializes_with_defaults() {
        let json = r#"{"title":"Rig","groups":[{"title":"IMU","widget":"accelerometer",
            "datasets":[{"title":"X","value":"0.5","units":"m/s²"}]}]}"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.groups[0].widget, GroupWidget::Accelerometer);
        assert_eq!(frame.groups[0].datasets[0].max, 100.0);
        assert_eq!(frame.groups[0].datasets[0].value.as_number(), Some(0.5));
    }
}
