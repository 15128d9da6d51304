//! Error types for the dashboard runtime.

use std::path::PathBuf;

use thiserror::Error;

use crate::options::PlotKind;
use crate::signal::SignalRef;

/// Failures reported by a [`DrawingSurface`](crate::surface::DrawingSurface).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("drawing surface exhausted: all {capacity} resources are in use")]
    Exhausted { capacity: usize },
    #[error("unknown surface resource {0}")]
    UnknownResource(String),
}

/// Configuration errors raised synchronously by plot and container operations.
///
/// These indicate a programming or UI bug and are never silently absorbed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    #[error("unknown plot kind `{0}` (expected line, trace, bar or spectrogram)")]
    UnknownKind(String),
    #[error("plot index {index} out of range for {len} plots")]
    IndexOutOfRange { index: isize, len: usize },
    #[error("no plot with id {0}")]
    UnknownPlot(u64),
    #[error("channel {0} is already plotted")]
    DuplicateChannel(SignalRef),
    #[error("channel {0} is not plotted")]
    ChannelNotFound(SignalRef),
    #[error("{0} plots do not take an x channel")]
    UnexpectedXChannel(PlotKind),
    #[error("{0} plots need an x channel for every y channel")]
    MissingXChannel(PlotKind),
    #[error("{kind} plots hold at most {max} y channel(s)")]
    TooManyChannels { kind: PlotKind, max: usize },
    #[error("x channel {given} conflicts with the configured x channel {configured}")]
    XChannelConflict {
        given: SignalRef,
        configured: SignalRef,
    },
    #[error("{kind} plots need sig_x and sig_y of matching arity (got {x} x, {y} y)")]
    ChannelArity { kind: PlotKind, x: usize, y: usize },
    #[error("cannot apply {got} options to a {expected} plot")]
    KindMismatch { expected: PlotKind, got: PlotKind },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Errors while loading or saving a [`DashboardConfig`](crate::config::DashboardConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format for {0:?} (use .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
    #[error(transparent)]
    Plot(#[from] PlotError),
}
