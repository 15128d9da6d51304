//! livedash crate root: re-exports and module wiring.
//!
//! A live-plot runtime: an ordered set of typed plots (line, trace, bar,
//! spectrogram) bound to named signal channels, fed one sample batch at a
//! time, laid out on a shared drawing surface and painted with egui.
//!
//! - `signal`: signal references and sample batches
//! - `options`: plot kinds and their option objects (the JSON wire shape)
//! - `plots`: the plot variants
//! - `dashboard`: the plot container
//! - `layout`: grid layout of plot regions
//! - `surface`: the drawing surface abstraction, the in-memory `Scene` and
//!   its egui painter
//! - `sink`: command channel for feeding a dashboard from other threads
//! - `config`: YAML/JSON dashboard configuration
//! - `app`: eframe window and `run_dashboard`

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod layout;
pub mod options;
pub mod plots;
pub mod signal;
pub mod sink;
pub mod surface;

// Public re-exports for a compact external API
pub use app::{run_dashboard, DashboardApp};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, PlotId};
pub use error::{ConfigError, PlotError, SurfaceError};
pub use layout::{compute_layout, LayoutMode, Rect};
pub use options::{
    BarOptions, BaseOptions, LineOptions, PlotKind, PlotOptions, SpectrogramOptions, TraceOptions,
};
pub use plots::{BarPlot, LinePlot, Plot, SpectrogramPlot, TracePlot};
pub use signal::{compare, SampleBatch, SignalRef};
pub use sink::{channel_dashboard, DashboardCommand, DashboardSink};
pub use surface::{DrawingSurface, Scene};
