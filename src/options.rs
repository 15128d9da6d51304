//! Plot option objects, as exchanged with the UI layer.
//!
//! The wire shape is plain JSON with the field names used throughout the
//! crate (`type`, `sig_x`, `sig_y`, `n_visible_points`, ...). [`PlotOptions`]
//! is tagged by `type`, and every kind flattens the shared [`BaseOptions`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PlotError;
use crate::signal::SignalRef;

/// The closed set of plot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Line,
    Trace,
    Bar,
    Spectrogram,
}

impl PlotKind {
    pub const ALL: [PlotKind; 4] = [
        PlotKind::Line,
        PlotKind::Trace,
        PlotKind::Bar,
        PlotKind::Spectrogram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlotKind::Line => "line",
            PlotKind::Trace => "trace",
            PlotKind::Bar => "bar",
            PlotKind::Spectrogram => "spectrogram",
        }
    }

    /// One-to-one kinds pair the i-th x reference with the i-th y reference.
    pub fn is_one_to_one(self) -> bool {
        matches!(self, PlotKind::Trace)
    }

    /// Whether `sig_x` may hold a reference at all.
    pub fn accepts_x(self) -> bool {
        matches!(self, PlotKind::Line | PlotKind::Trace)
    }

    /// Upper bound on `sig_y`, if the kind has one.
    pub fn max_y_channels(self) -> Option<usize> {
        match self {
            PlotKind::Spectrogram => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(PlotKind::Line),
            "trace" => Ok(PlotKind::Trace),
            "bar" => Ok(PlotKind::Bar),
            "spectrogram" => Ok(PlotKind::Spectrogram),
            other => Err(PlotError::UnknownKind(other.to_string())),
        }
    }
}

/// Where an axis is drawn relative to its plot region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisAlign {
    Bottom,
    Top,
    Left,
    Right,
}

/// Options shared by every plot kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseOptions {
    pub description: String,
    /// Empty means "no x channel"; `null` or an absent field read as empty.
    #[serde(deserialize_with = "null_as_empty")]
    pub sig_x: Vec<SignalRef>,
    #[serde(deserialize_with = "null_as_empty")]
    pub sig_y: Vec<SignalRef>,
    pub x_axis_align: AxisAlign,
    pub y_axis_align: AxisAlign,
    pub x_axis_flipped: bool,
    pub y_axis_flipped: bool,
    pub x_axis_visible: bool,
    pub y_axis_visible: bool,
    pub data_contains_nan: bool,
    pub data_is_sorted: bool,
}

impl Default for BaseOptions {
    fn default() -> Self {
        Self {
            description: String::new(),
            sig_x: Vec::new(),
            sig_y: Vec::new(),
            x_axis_align: AxisAlign::Bottom,
            y_axis_align: AxisAlign::Left,
            x_axis_flipped: false,
            y_axis_flipped: false,
            x_axis_visible: true,
            y_axis_visible: true,
            data_contains_nan: false,
            data_is_sorted: false,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SignalRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<SignalRef>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub auto_range: bool,
    pub y_domain_min: f64,
    pub y_domain_max: f64,
    pub n_visible_points: usize,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions {
                description: "Line".to_string(),
                data_is_sorted: true,
                ..Default::default()
            },
            auto_range: true,
            y_domain_min: -1.0,
            y_domain_max: 1.0,
            n_visible_points: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub auto_range_x: bool,
    pub auto_range_y: bool,
    pub x_domain_min: f64,
    pub x_domain_max: f64,
    pub y_domain_min: f64,
    pub y_domain_max: f64,
    pub n_visible_points: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions {
                description: "Trace".to_string(),
                ..Default::default()
            },
            auto_range_x: true,
            auto_range_y: true,
            x_domain_min: -1.0,
            x_domain_max: 1.0,
            y_domain_min: -1.0,
            y_domain_max: 1.0,
            n_visible_points: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub auto_range: bool,
    pub y_domain_min: f64,
    pub y_domain_max: f64,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions {
                description: "Bar".to_string(),
                ..Default::default()
            },
            auto_range: true,
            y_domain_min: 0.0,
            y_domain_max: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub bin_count: usize,
    pub n_visible_windows: usize,
    pub colormap_min: f64,
    pub colormap_max: f64,
}

impl Default for SpectrogramOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions {
                description: "Spectrogram".to_string(),
                ..Default::default()
            },
            bin_count: 32,
            n_visible_windows: 100,
            colormap_min: 0.0,
            colormap_max: 1.0,
        }
    }
}

/// The full option object of one plot, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlotOptions {
    Line(LineOptions),
    Trace(TraceOptions),
    Bar(BarOptions),
    Spectrogram(SpectrogramOptions),
}

impl PlotOptions {
    /// Default option object for a freshly added plot of `kind`.
    pub fn default_for(kind: PlotKind) -> Self {
        match kind {
            PlotKind::Line => PlotOptions::Line(LineOptions::default()),
            PlotKind::Trace => PlotOptions::Trace(TraceOptions::default()),
            PlotKind::Bar => PlotOptions::Bar(BarOptions::default()),
            PlotKind::Spectrogram => PlotOptions::Spectrogram(SpectrogramOptions::default()),
        }
    }

    pub fn kind(&self) -> PlotKind {
        match self {
            PlotOptions::Line(_) => PlotKind::Line,
            PlotOptions::Trace(_) => PlotKind::Trace,
            PlotOptions::Bar(_) => PlotKind::Bar,
            PlotOptions::Spectrogram(_) => PlotKind::Spectrogram,
        }
    }

    pub fn base(&self) -> &BaseOptions {
        match self {
            PlotOptions::Line(o) => &o.base,
            PlotOptions::Trace(o) => &o.base,
            PlotOptions::Bar(o) => &o.base,
            PlotOptions::Spectrogram(o) => &o.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseOptions {
        match self {
            PlotOptions::Line(o) => &mut o.base,
            PlotOptions::Trace(o) => &mut o.base,
            PlotOptions::Bar(o) => &mut o.base,
            PlotOptions::Spectrogram(o) => &mut o.base,
        }
    }

    /// Check the channel arity rules of this kind.
    pub fn validate(&self) -> Result<(), PlotError> {
        validate_channels(self.kind(), &self.base().sig_x, &self.base().sig_y)
    }
}

/// Arity rules: one-to-many kinds carry at most one x reference (none for
/// bar and spectrogram), one-to-one kinds pair x and y index by index.
pub fn validate_channels(
    kind: PlotKind,
    sig_x: &[SignalRef],
    sig_y: &[SignalRef],
) -> Result<(), PlotError> {
    if !kind.accepts_x() && !sig_x.is_empty() {
        return Err(PlotError::UnexpectedXChannel(kind));
    }
    if let Some(max) = kind.max_y_channels() {
        if sig_y.len() > max {
            return Err(PlotError::TooManyChannels { kind, max });
        }
    }
    let arity_ok = if kind.is_one_to_one() {
        sig_x.len() == sig_y.len()
    } else {
        sig_x.len() <= 1
    };
    if !arity_ok {
        return Err(PlotError::ChannelArity {
            kind,
            x: sig_x.len(),
            y: sig_y.len(),
        });
    }
    Ok(())
}
