//! Plot variants and their uniform contract.
//!
//! [`Plot`] is a closed set of kinds. Each variant owns its series buffers
//! and the surface leases backing them; dropping a plot releases all of its
//! native resources on the spot.

pub mod bar;
pub mod line;
pub mod spectrogram;
pub mod trace;

use std::cell::RefMut;

use crate::error::PlotError;
use crate::layout::Rect;
use crate::options::{BaseOptions, PlotKind, PlotOptions};
use crate::signal::{SampleBatch, SignalRef};
use crate::surface::{
    lease_axis, lease_region, lease_series, AxisDomain, AxisId, AxisSpec, Dimension,
    DrawingSurface, Lease, RegionId, SeriesId, SeriesSpec, SeriesStyle, SharedSurface,
};

pub use bar::BarPlot;
pub use line::LinePlot;
pub use spectrogram::SpectrogramPlot;
pub use trace::TracePlot;

/// State every plot kind shares: its region and the two axes inside it.
pub struct PlotCore {
    // Field order is drop order: axes go before their region.
    x_axis: Lease<AxisId>,
    y_axis: Lease<AxisId>,
    region: Lease<RegionId>,
    zooming: bool,
}

impl PlotCore {
    pub(crate) fn new(surface: &SharedSurface, base: &BaseOptions) -> Result<Self, PlotError> {
        let region = lease_region(surface)?;
        let x_axis = lease_axis(surface, region.handle(), x_axis_spec(base))?;
        let y_axis = lease_axis(surface, region.handle(), y_axis_spec(base))?;
        let core = Self {
            x_axis,
            y_axis,
            region,
            zooming: false,
        };
        core.apply_base(base)?;
        Ok(core)
    }

    pub fn region(&self) -> RegionId {
        self.region.handle()
    }

    pub(crate) fn surface(&self) -> RefMut<'_, dyn DrawingSurface + 'static> {
        self.region.surface().borrow_mut()
    }

    pub(crate) fn apply_base(&self, base: &BaseOptions) -> Result<(), PlotError> {
        let mut surface = self.surface();
        surface.configure_axis(self.x_axis.handle(), x_axis_spec(base))?;
        surface.configure_axis(self.y_axis.handle(), y_axis_spec(base))?;
        surface.set_region_title(self.region.handle(), &base.description)?;
        Ok(())
    }

    pub(crate) fn set_rect(&self, rect: Rect) -> Result<(), PlotError> {
        self.surface().set_region_rect(self.region.handle(), rect)?;
        Ok(())
    }

    pub(crate) fn set_domain(&self, dim: Dimension, domain: AxisDomain) -> Result<(), PlotError> {
        let axis = match dim {
            Dimension::X => self.x_axis.handle(),
            Dimension::Y => self.y_axis.handle(),
        };
        self.surface().set_axis_domain(axis, domain)?;
        Ok(())
    }

    pub(crate) fn new_series(&self, spec: SeriesSpec) -> Result<Lease<SeriesId>, PlotError> {
        Ok(lease_series(self.region.surface(), self.region.handle(), spec)?)
    }

    /// Push a new spec to a series this plot already owns.
    pub(crate) fn configure_series(
        &self,
        series: &Lease<SeriesId>,
        spec: SeriesSpec,
    ) -> Result<(), PlotError> {
        self.surface().configure_series(series.handle(), spec)?;
        Ok(())
    }

    /// Transient "user is zooming/panning" flag set by the rendering backend.
    pub fn is_zooming(&self) -> bool {
        self.zooming
    }
}

fn x_axis_spec(base: &BaseOptions) -> AxisSpec {
    AxisSpec {
        dimension: Dimension::X,
        align: base.x_axis_align,
        flipped: base.x_axis_flipped,
        visible: base.x_axis_visible,
    }
}

fn y_axis_spec(base: &BaseOptions) -> AxisSpec {
    AxisSpec {
        dimension: Dimension::Y,
        align: base.y_axis_align,
        flipped: base.y_axis_flipped,
        visible: base.y_axis_visible,
    }
}

/// Series spec carrying the data hints of `base`.
pub(crate) fn series_spec(
    base: &BaseOptions,
    name: String,
    style: SeriesStyle,
    color_index: usize,
) -> SeriesSpec {
    SeriesSpec {
        color_index,
        contains_nan: base.data_contains_nan,
        sorted: base.data_is_sorted,
        ..SeriesSpec::new(name, style)
    }
}

/// Pinned or auto-fit domain from an `auto` flag and explicit bounds.
pub(crate) fn domain(auto: bool, min: f64, max: f64) -> AxisDomain {
    if auto {
        AxisDomain::Auto
    } else {
        AxisDomain::Fixed { min, max }
    }
}

/// Reuse existing per-channel entries for the channels still wanted and
/// create the missing ones, in `wanted` order.
///
/// All fallible allocation happens before `old` is touched, so on error the
/// plot keeps its previous series.
pub(crate) fn reconcile<S, W>(
    old: &mut Vec<S>,
    wanted: &[W],
    same: impl Fn(&S, &W) -> bool,
    mut create: impl FnMut(usize, &W) -> Result<S, PlotError>,
) -> Result<(), PlotError> {
    let mut fresh = Vec::new();
    for (i, w) in wanted.iter().enumerate() {
        if !old.iter().any(|s| same(s, w)) {
            fresh.push(create(i, w)?);
        }
    }
    let mut pool: Vec<Option<S>> = std::mem::take(old).into_iter().map(Some).collect();
    let mut fresh = fresh.into_iter();
    for w in wanted {
        let reused = pool
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|s| same(s, w)))
            .and_then(Option::take);
        if let Some(s) = reused.or_else(|| fresh.next()) {
            old.push(s);
        }
    }
    Ok(())
}

/// Reject a `sig_y` list that names the same channel twice.
pub(crate) fn ensure_unique(sigs: &[SignalRef]) -> Result<(), PlotError> {
    for (i, a) in sigs.iter().enumerate() {
        if sigs[..i].iter().any(|b| a == b) {
            return Err(PlotError::DuplicateChannel(a.clone()));
        }
    }
    Ok(())
}

/// The contract every plot kind implements.
pub trait PlotVariant {
    type Options;

    fn core(&self) -> &PlotCore;
    fn core_mut(&mut self) -> &mut PlotCore;
    fn update(&mut self, batch: &SampleBatch) -> Result<(), PlotError>;
    fn add_plot_channel(
        &mut self,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), PlotError>;
    fn remove_plot_channel(
        &mut self,
        sig_y: &SignalRef,
        sig_x: Option<&SignalRef>,
    ) -> Result<(), PlotError>;
    fn update_all_options(&mut self, options: Self::Options) -> Result<(), PlotError>;
}

/// A live plot of one of the supported kinds.
pub enum Plot {
    Line(LinePlot),
    Trace(TracePlot),
    Bar(BarPlot),
    Spectrogram(SpectrogramPlot),
}

macro_rules! dispatch {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            Plot::Line($p) => $body,
            Plot::Trace($p) => $body,
            Plot::Bar($p) => $body,
            Plot::Spectrogram($p) => $body,
        }
    };
}

impl Plot {
    /// Construct the variant matching `options` on `surface`.
    pub fn new(surface: &SharedSurface, options: PlotOptions) -> Result<Self, PlotError> {
        options.validate()?;
        Ok(match options {
            PlotOptions::Line(o) => Plot::Line(LinePlot::new(surface, o)?),
            PlotOptions::Trace(o) => Plot::Trace(TracePlot::new(surface, o)?),
            PlotOptions::Bar(o) => Plot::Bar(BarPlot::new(surface, o)?),
            PlotOptions::Spectrogram(o) => Plot::Spectrogram(SpectrogramPlot::new(surface, o)?),
        })
    }

    /// Construct a plot of `kind` with that kind's default options.
    pub fn with_kind(surface: &SharedSurface, kind: PlotKind) -> Result<Self, PlotError> {
        Self::new(surface, PlotOptions::default_for(kind))
    }

    pub fn kind(&self) -> PlotKind {
        match self {
            Plot::Line(_) => PlotKind::Line,
            Plot::Trace(_) => PlotKind::Trace,
            Plot::Bar(_) => PlotKind::Bar,
            Plot::Spectrogram(_) => PlotKind::Spectrogram,
        }
    }

    /// Snapshot of the full option object.
    pub fn options(&self) -> PlotOptions {
        match self {
            Plot::Line(p) => PlotOptions::Line(p.options().clone()),
            Plot::Trace(p) => PlotOptions::Trace(p.options().clone()),
            Plot::Bar(p) => PlotOptions::Bar(p.options().clone()),
            Plot::Spectrogram(p) => PlotOptions::Spectrogram(p.options().clone()),
        }
    }

    pub fn region(&self) -> RegionId {
        dispatch!(self, p => p.core().region())
    }

    pub fn update(&mut self, batch: &SampleBatch) -> Result<(), PlotError> {
        dispatch!(self, p => p.update(batch))
    }

    pub fn add_plot_channel(
        &mut self,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), PlotError> {
        dispatch!(self, p => p.add_plot_channel(sig_y, sig_x))
    }

    pub fn remove_plot_channel(
        &mut self,
        sig_y: &SignalRef,
        sig_x: Option<&SignalRef>,
    ) -> Result<(), PlotError> {
        dispatch!(self, p => p.remove_plot_channel(sig_y, sig_x))
    }

    /// Replace the whole option object. The kind must match.
    pub fn update_all_options(&mut self, options: PlotOptions) -> Result<(), PlotError> {
        options.validate()?;
        match (self, options) {
            (Plot::Line(p), PlotOptions::Line(o)) => p.update_all_options(o),
            (Plot::Trace(p), PlotOptions::Trace(o)) => p.update_all_options(o),
            (Plot::Bar(p), PlotOptions::Bar(o)) => p.update_all_options(o),
            (Plot::Spectrogram(p), PlotOptions::Spectrogram(o)) => p.update_all_options(o),
            (plot, o) => Err(PlotError::KindMismatch {
                expected: plot.kind(),
                got: o.kind(),
            }),
        }
    }

    pub(crate) fn set_rect(&self, rect: Rect) -> Result<(), PlotError> {
        dispatch!(self, p => p.core().set_rect(rect))
    }

    /// Mark the plot as being interactively zoomed; line plots stop
    /// following the newest sample while this is set.
    pub fn set_zooming(&mut self, zooming: bool) {
        dispatch!(self, p => p.core_mut().zooming = zooming)
    }

    pub fn is_zooming(&self) -> bool {
        dispatch!(self, p => p.core().is_zooming())
    }

    /// Dispose the plot, releasing every surface resource it holds.
    pub fn delete(self) {
        log::debug!("deleting {} plot on region#{}", self.kind(), self.region().0);
        drop(self);
    }

    pub fn as_line(&self) -> Option<&LinePlot> {
        match self {
            Plot::Line(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_trace(&self) -> Option<&TracePlot> {
        match self {
            Plot::Trace(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_bar(&self) -> Option<&BarPlot> {
        match self {
            Plot::Bar(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_spectrogram(&self) -> Option<&SpectrogramPlot> {
        match self {
            Plot::Spectrogram(p) => Some(p),
            _ => None,
        }
    }
}
