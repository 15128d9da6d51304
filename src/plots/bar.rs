//! Bar plot: a snapshot of the latest value of every y channel.

use crate::error::PlotError;
use crate::options::{validate_channels, BarOptions, PlotKind};
use crate::signal::{compare, SampleBatch, SignalRef};
use crate::surface::{
    AxisDomain, Dimension, Lease, SeriesId, SeriesSpec, SeriesStyle, SharedSurface,
};

use super::{domain, ensure_unique, series_spec, PlotCore, PlotVariant};

pub struct BarPlot {
    /// One value per `sig_y` entry; `NaN` until that channel delivers data.
    values: Vec<f64>,
    labels: Vec<String>,
    bars: Lease<SeriesId>,
    options: BarOptions,
    core: PlotCore,
}

impl BarPlot {
    pub fn new(surface: &SharedSurface, options: BarOptions) -> Result<Self, PlotError> {
        validate_channels(PlotKind::Bar, &options.base.sig_x, &options.base.sig_y)?;
        ensure_unique(&options.base.sig_y)?;
        let core = PlotCore::new(surface, &options.base)?;
        let bars = core.new_series(bar_spec(&options))?;
        let mut plot = Self {
            values: Vec::new(),
            labels: Vec::new(),
            bars,
            options,
            core,
        };
        plot.reset_channels();
        plot.apply_domains()?;
        plot.push()?;
        Ok(plot)
    }

    pub fn options(&self) -> &BarOptions {
        &self.options
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn reset_channels(&mut self) {
        self.values = vec![f64::NAN; self.options.base.sig_y.len()];
        self.labels = bar_labels(&self.options.base.sig_y);
    }

    fn apply_domains(&self) -> Result<(), PlotError> {
        let o = &self.options;
        self.core.set_domain(Dimension::X, AxisDomain::Auto)?;
        self.core.set_domain(
            Dimension::Y,
            domain(o.auto_range, o.y_domain_min, o.y_domain_max),
        )
    }

    fn push(&self) -> Result<(), PlotError> {
        self.core
            .surface()
            .set_bars(self.bars.handle(), &self.labels, &self.values)?;
        Ok(())
    }
}

/// Display names when every reference has one, `"{key}_{index}"` otherwise.
pub fn bar_labels(sigs: &[SignalRef]) -> Vec<String> {
    if sigs.iter().all(|s| s.name.is_some()) {
        sigs.iter().map(SignalRef::display_name).collect()
    } else {
        sigs.iter().map(SignalRef::id).collect()
    }
}

impl PlotVariant for BarPlot {
    type Options = BarOptions;

    fn core(&self) -> &PlotCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlotCore {
        &mut self.core
    }

    fn update(&mut self, batch: &SampleBatch) -> Result<(), PlotError> {
        self.values.clear();
        for sig in &self.options.base.sig_y {
            let last = batch.fetch(sig).last().copied().unwrap_or(f64::NAN);
            self.values.push(last);
        }
        self.push()
    }

    fn add_plot_channel(
        &mut self,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), PlotError> {
        if sig_x.is_some() {
            return Err(PlotError::UnexpectedXChannel(PlotKind::Bar));
        }
        if self.options.base.sig_y.iter().any(|s| compare(s, &sig_y)) {
            return Err(PlotError::DuplicateChannel(sig_y));
        }
        self.options.base.sig_y.push(sig_y);
        self.values.push(f64::NAN);
        self.labels = bar_labels(&self.options.base.sig_y);
        self.push()
    }

    fn remove_plot_channel(
        &mut self,
        sig_y: &SignalRef,
        sig_x: Option<&SignalRef>,
    ) -> Result<(), PlotError> {
        if sig_x.is_some() {
            return Err(PlotError::UnexpectedXChannel(PlotKind::Bar));
        }
        let idx = self
            .options
            .base
            .sig_y
            .iter()
            .position(|s| compare(s, sig_y))
            .ok_or_else(|| PlotError::ChannelNotFound(sig_y.clone()))?;
        self.options.base.sig_y.remove(idx);
        self.values.remove(idx);
        self.labels = bar_labels(&self.options.base.sig_y);
        self.push()
    }

    fn update_all_options(&mut self, options: BarOptions) -> Result<(), PlotError> {
        validate_channels(PlotKind::Bar, &options.base.sig_x, &options.base.sig_y)?;
        ensure_unique(&options.base.sig_y)?;
        let channels_changed = options.base.sig_y != self.options.base.sig_y;
        self.options = options;
        if channels_changed {
            self.reset_channels();
        } else {
            // Same channels, but display names may have changed.
            self.labels = bar_labels(&self.options.base.sig_y);
        }
        self.core.configure_series(&self.bars, bar_spec(&self.options))?;
        self.core.apply_base(&self.options.base)?;
        self.apply_domains()?;
        self.push()
    }
}

fn bar_spec(options: &BarOptions) -> SeriesSpec {
    series_spec(&options.base, options.base.description.clone(), SeriesStyle::Bars, 0)
}
