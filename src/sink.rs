//! Command channel for driving a [`Dashboard`](crate::dashboard::Dashboard)
//! from other threads.
//!
//! The dashboard itself is single-threaded. Producers hold a cloneable
//! [`DashboardSink`] and send commands; the owning thread applies them in
//! arrival order with [`Dashboard::drain`](crate::dashboard::Dashboard::drain).

use std::sync::mpsc::{Receiver, SendError, Sender};

use crate::dashboard::PlotId;
use crate::layout::LayoutMode;
use crate::options::{PlotKind, PlotOptions};
use crate::signal::{SampleBatch, SignalRef};

/// Messages applied to a dashboard on its owning thread.
#[derive(Debug, Clone)]
pub enum DashboardCommand {
    /// Feed one batch to every plot.
    Batch(SampleBatch),
    /// Insert a plot with default options; `at = -1` appends.
    AddPlot { kind: PlotKind, at: isize },
    /// Insert a plot built from a full option object.
    AddPlotWithOptions {
        options: Box<PlotOptions>,
        at: isize,
    },
    /// Remove the plot at an index; `at = -1` is the last plot.
    RemovePlot { at: isize },
    ApplyOptions {
        plot: PlotId,
        options: Box<PlotOptions>,
    },
    AddChannel {
        plot: PlotId,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    },
    RemoveChannel {
        plot: PlotId,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    },
    SetLayout(LayoutMode),
}

/// Convenience sender for feeding a dashboard.
#[derive(Clone)]
pub struct DashboardSink {
    tx: Sender<DashboardCommand>,
}

impl DashboardSink {
    /// Send a raw command.
    pub fn send(&self, command: DashboardCommand) -> Result<(), SendError<DashboardCommand>> {
        self.tx.send(command)
    }

    /// Send one sample batch.
    pub fn send_batch(&self, batch: SampleBatch) -> Result<(), SendError<DashboardCommand>> {
        self.tx.send(DashboardCommand::Batch(batch))
    }

    pub fn add_plot(&self, kind: PlotKind, at: isize) -> Result<(), SendError<DashboardCommand>> {
        self.tx.send(DashboardCommand::AddPlot { kind, at })
    }

    pub fn add_plot_with_options(
        &self,
        options: PlotOptions,
        at: isize,
    ) -> Result<(), SendError<DashboardCommand>> {
        self.tx.send(DashboardCommand::AddPlotWithOptions {
            options: Box::new(options),
            at,
        })
    }

    pub fn remove_plot(&self, at: isize) -> Result<(), SendError<DashboardCommand>> {
        self.tx.send(DashboardCommand::RemovePlot { at })
    }

    pub fn apply_options(
        &self,
        plot: PlotId,
        options: PlotOptions,
    ) -> Result<(), SendError<DashboardCommand>> {
        self.tx.send(DashboardCommand::ApplyOptions {
            plot,
            options: Box::new(options),
        })
    }

    pub fn add_channel(
        &self,
        plot: PlotId,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), SendError<DashboardCommand>> {
        self.tx
            .send(DashboardCommand::AddChannel { plot, sig_y, sig_x })
    }

    pub fn remove_channel(
        &self,
        plot: PlotId,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), SendError<DashboardCommand>> {
        self.tx
            .send(DashboardCommand::RemoveChannel { plot, sig_y, sig_x })
    }

    pub fn set_layout(&self, layout: LayoutMode) -> Result<(), SendError<DashboardCommand>> {
        self.tx.send(DashboardCommand::SetLayout(layout))
    }
}

/// Create a new channel pair: `(DashboardSink, Receiver<DashboardCommand>)`.
pub fn channel_dashboard() -> (DashboardSink, Receiver<DashboardCommand>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (DashboardSink { tx }, rx)
}
