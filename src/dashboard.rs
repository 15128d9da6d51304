//! The plot container: an ordered set of plots on one shared surface.
//!
//! [`Dashboard`] owns its plots exclusively, fans every sample batch out to
//! them in list order, and recomputes the layout whenever the plot count
//! changes. Structural edits and batch ingestion all run on the owning
//! thread; see [`crate::sink`] for feeding it from other threads.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};

use crate::error::PlotError;
use crate::layout::{compute_layout, LayoutMode, Rect};
use crate::options::{PlotKind, PlotOptions};
use crate::plots::Plot;
use crate::signal::{SampleBatch, SignalRef};
use crate::sink::DashboardCommand;
use crate::surface::{DrawingSurface, RegionId, Scene, SharedSurface};

/// Stable identifier of a plot within its dashboard; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotId(pub u64);

impl fmt::Display for PlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plot#{}", self.0)
    }
}

pub struct Dashboard<S: DrawingSurface + 'static = Scene> {
    plots: Vec<(PlotId, Plot)>,
    layout: LayoutMode,
    rects: Vec<Rect>,
    next_id: u64,
    // Same allocation as `surface`, kept with its concrete type for readers.
    concrete: Rc<RefCell<S>>,
    surface: SharedSurface,
}

impl Default for Dashboard<Scene> {
    fn default() -> Self {
        Self::new(Scene::default())
    }
}

impl<S: DrawingSurface + 'static> Dashboard<S> {
    pub fn new(surface: S) -> Self {
        Self::with_layout(surface, LayoutMode::default())
    }

    pub fn with_layout(surface: S, layout: LayoutMode) -> Self {
        let concrete = Rc::new(RefCell::new(surface));
        let shared: SharedSurface = concrete.clone();
        Self {
            plots: Vec::new(),
            layout,
            rects: Vec::new(),
            next_id: 1,
            concrete,
            surface: shared,
        }
    }

    /// Borrow the drawing surface (e.g. to render it).
    pub fn surface(&self) -> Ref<'_, S> {
        self.concrete.borrow()
    }

    pub fn len(&self) -> usize {
        self.plots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    pub fn ids(&self) -> Vec<PlotId> {
        self.plots.iter().map(|(id, _)| *id).collect()
    }

    pub fn plots(&self) -> impl Iterator<Item = (PlotId, &Plot)> {
        self.plots.iter().map(|(id, p)| (*id, p))
    }

    pub fn plot(&self, index: usize) -> Option<&Plot> {
        self.plots.get(index).map(|(_, p)| p)
    }

    pub fn plot_by_id(&self, id: PlotId) -> Option<&Plot> {
        self.plots.iter().find(|(i, _)| *i == id).map(|(_, p)| p)
    }

    pub fn index_of(&self, id: PlotId) -> Option<usize> {
        self.plots.iter().position(|(i, _)| *i == id)
    }

    fn plot_mut(&mut self, id: PlotId) -> Result<&mut Plot, PlotError> {
        self.plots
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, p)| p)
            .ok_or(PlotError::UnknownPlot(id.0))
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout
    }

    /// Current rectangle of every plot, in plot order.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Insert a plot of `kind` with default options at `at` (`-1` appends).
    pub fn add_plot(&mut self, kind: PlotKind, at: isize) -> Result<PlotId, PlotError> {
        self.add_plot_with_options(PlotOptions::default_for(kind), at)
    }

    /// Insert a plot built from a full option object at `at` (`-1` appends).
    pub fn add_plot_with_options(
        &mut self,
        options: PlotOptions,
        at: isize,
    ) -> Result<PlotId, PlotError> {
        let index = insert_index(at, self.plots.len())?;
        let kind = options.kind();
        // A failed construction drops its leases, so nothing stays allocated.
        let plot = Plot::new(&self.surface, options)?;
        let id = PlotId(self.next_id);
        self.next_id += 1;
        self.plots.insert(index, (id, plot));
        log::info!("added {kind} {id} at index {index}");
        self.relayout()?;
        Ok(id)
    }

    /// Dispose and remove the plot at `at` (`-1` is the last plot).
    pub fn remove_plot(&mut self, at: isize) -> Result<PlotId, PlotError> {
        let index = existing_index(at, self.plots.len())?;
        let (id, plot) = self.plots.remove(index);
        let kind = plot.kind();
        plot.delete();
        log::info!("removed {kind} {id} from index {index}");
        self.relayout()?;
        Ok(id)
    }

    pub fn remove_plot_by_id(&mut self, id: PlotId) -> Result<(), PlotError> {
        let index = self.index_of(id).ok_or(PlotError::UnknownPlot(id.0))?;
        self.remove_plot(index as isize).map(|_| ())
    }

    /// Dispose every plot.
    pub fn clear(&mut self) -> Result<(), PlotError> {
        for (_, plot) in self.plots.drain(..) {
            plot.delete();
        }
        self.relayout()
    }

    /// Feed one batch to every plot, in plot order.
    ///
    /// A plot whose surface update fails does not stop the others; the first
    /// such error is returned after all plots have seen the batch.
    pub fn update(&mut self, batch: &SampleBatch) -> Result<(), PlotError> {
        log::trace!(
            "batch with {} signal(s) to {} plot(s)",
            batch.keys().count(),
            self.plots.len()
        );
        let mut first_err = None;
        for (id, plot) in &mut self.plots {
            if let Err(e) = plot.update(batch) {
                log::warn!("{id} failed to ingest batch: {e}");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Replace the option object of plot `id`.
    pub fn apply_options(&mut self, id: PlotId, options: PlotOptions) -> Result<(), PlotError> {
        self.plot_mut(id)?.update_all_options(options)?;
        log::info!("applied new options to {id}");
        Ok(())
    }

    pub fn add_plot_channel(
        &mut self,
        id: PlotId,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), PlotError> {
        self.plot_mut(id)?.add_plot_channel(sig_y, sig_x)
    }

    pub fn remove_plot_channel(
        &mut self,
        id: PlotId,
        sig_y: &SignalRef,
        sig_x: Option<&SignalRef>,
    ) -> Result<(), PlotError> {
        self.plot_mut(id)?.remove_plot_channel(sig_y, sig_x)
    }

    pub fn set_layout(&mut self, layout: LayoutMode) -> Result<(), PlotError> {
        self.layout = layout;
        log::info!("layout mode set to {layout:?}");
        self.relayout()
    }

    /// Set the transient zoom flag of the plot drawn in `region`.
    pub fn set_region_zooming(&mut self, region: RegionId, zooming: bool) {
        if let Some((_, plot)) = self.plots.iter_mut().find(|(_, p)| p.region() == region) {
            plot.set_zooming(zooming);
        }
    }

    /// Apply one command; used by [`Dashboard::drain`].
    pub fn apply_command(&mut self, command: DashboardCommand) -> Result<(), PlotError> {
        match command {
            DashboardCommand::Batch(batch) => self.update(&batch),
            DashboardCommand::AddPlot { kind, at } => self.add_plot(kind, at).map(|_| ()),
            DashboardCommand::AddPlotWithOptions { options, at } => {
                self.add_plot_with_options(*options, at).map(|_| ())
            }
            DashboardCommand::RemovePlot { at } => self.remove_plot(at).map(|_| ()),
            DashboardCommand::ApplyOptions { plot, options } => self.apply_options(plot, *options),
            DashboardCommand::AddChannel { plot, sig_y, sig_x } => {
                self.add_plot_channel(plot, sig_y, sig_x)
            }
            DashboardCommand::RemoveChannel { plot, sig_y, sig_x } => {
                self.remove_plot_channel(plot, &sig_y, sig_x.as_ref())
            }
            DashboardCommand::SetLayout(layout) => self.set_layout(layout),
        }
    }

    /// Apply every pending command in arrival order and return the failures.
    pub fn drain(&mut self, rx: &Receiver<DashboardCommand>) -> Vec<PlotError> {
        let mut errors = Vec::new();
        while let Ok(command) = rx.try_recv() {
            if let Err(e) = self.apply_command(command) {
                log::warn!("dashboard command failed: {e}");
                errors.push(e);
            }
        }
        errors
    }

    fn relayout(&mut self) -> Result<(), PlotError> {
        self.rects = compute_layout(self.plots.len(), self.layout);
        for ((_, plot), rect) in self.plots.iter().zip(&self.rects) {
            plot.set_rect(*rect)?;
        }
        Ok(())
    }
}

fn insert_index(at: isize, len: usize) -> Result<usize, PlotError> {
    let idx = if at < 0 { len as isize + 1 + at } else { at };
    if (0..=len as isize).contains(&idx) {
        Ok(idx as usize)
    } else {
        Err(PlotError::IndexOutOfRange { index: at, len })
    }
}

fn existing_index(at: isize, len: usize) -> Result<usize, PlotError> {
    let idx = if at < 0 { len as isize + at } else { at };
    if (0..len as isize).contains(&idx) {
        Ok(idx as usize)
    } else {
        Err(PlotError::IndexOutOfRange { index: at, len })
    }
}
