//! Line plot: many y channels against one shared x channel.

use crate::error::PlotError;
use crate::options::{validate_channels, LineOptions, PlotKind};
use crate::signal::{at, compare, SampleBatch, SignalRef};
use crate::surface::{
    AxisDomain, Dimension, Lease, SeriesId, SeriesSpec, SeriesStyle, SharedSurface,
};

use super::{domain, ensure_unique, reconcile, series_spec, PlotCore, PlotVariant};

/// Append-only buffer of one y channel.
pub struct LineSeries {
    pub sig: SignalRef,
    points: Vec<[f64; 2]>,
    lease: Lease<SeriesId>,
}

impl LineSeries {
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }
}

pub struct LinePlot {
    series: Vec<LineSeries>,
    options: LineOptions,
    x_domain: Option<(f64, f64)>,
    core: PlotCore,
}

impl LinePlot {
    pub fn new(surface: &SharedSurface, options: LineOptions) -> Result<Self, PlotError> {
        validate_channels(PlotKind::Line, &options.base.sig_x, &options.base.sig_y)?;
        ensure_unique(&options.base.sig_y)?;
        let core = PlotCore::new(surface, &options.base)?;
        let mut plot = Self {
            series: Vec::new(),
            options,
            x_domain: None,
            core,
        };
        plot.rebuild_series(false)?;
        plot.update_domains()?;
        Ok(plot)
    }

    pub fn options(&self) -> &LineOptions {
        &self.options
    }

    pub fn series(&self) -> &[LineSeries] {
        &self.series
    }

    /// Last x domain computed from the buffered samples.
    pub fn x_domain(&self) -> Option<(f64, f64)> {
        self.x_domain
    }

    // The surface only needs the visible window; the plot keeps everything.
    fn spec_for(&self, i: usize, sig: &SignalRef) -> SeriesSpec {
        series_spec(&self.options.base, sig.display_name(), SeriesStyle::Line, i)
            .with_max_points(self.options.n_visible_points)
    }

    fn create_series(&self, i: usize, sig: &SignalRef) -> Result<LineSeries, PlotError> {
        let lease = self.core.new_series(self.spec_for(i, sig))?;
        Ok(LineSeries {
            sig: sig.clone(),
            points: Vec::new(),
            lease,
        })
    }

    fn rebuild_series(&mut self, keep_buffers: bool) -> Result<(), PlotError> {
        let wanted = self.options.base.sig_y.clone();
        let mut series = if keep_buffers {
            std::mem::take(&mut self.series)
        } else {
            Vec::new()
        };
        let result = reconcile(
            &mut series,
            &wanted,
            |s, w| compare(&s.sig, w),
            |i, w| self.create_series(i, w),
        );
        if keep_buffers || result.is_ok() {
            self.series = series;
        }
        result
    }

    // Reused series keep their buffers but take the current names and hints.
    fn configure_all(&mut self) -> Result<(), PlotError> {
        let sigs = &self.options.base.sig_y;
        let specs: Vec<SeriesSpec> =
            sigs.iter().enumerate().map(|(i, s)| self.spec_for(i, s)).collect();
        for ((s, sig), spec) in self.series.iter_mut().zip(sigs).zip(specs) {
            s.sig = sig.clone();
            self.core.configure_series(&s.lease, spec)?;
        }
        Ok(())
    }

    // The visible x window ends at the newest sample and starts
    // `n_visible_points` samples earlier (clamped to the first sample).
    fn update_domains(&mut self) -> Result<(), PlotError> {
        if self.core.is_zooming() || self.series.is_empty() {
            return Ok(());
        }
        let o = &self.options;
        self.core.set_domain(
            Dimension::Y,
            domain(o.auto_range, o.y_domain_min, o.y_domain_max),
        )?;
        let Some(pts) = self.series.iter().map(|s| &s.points).find(|p| !p.is_empty()) else {
            return Ok(());
        };
        let n = o.n_visible_points.max(1) as isize;
        if let (Some(first), Some(last)) = (at(pts, -n), at(pts, -1)) {
            let max = last[0];
            let min = first[0].min(max);
            self.x_domain = Some((min, max));
            self.core
                .set_domain(Dimension::X, AxisDomain::Fixed { min, max })?;
        }
        Ok(())
    }
}

impl PlotVariant for LinePlot {
    type Options = LineOptions;

    fn core(&self) -> &PlotCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlotCore {
        &mut self.core
    }

    fn update(&mut self, batch: &SampleBatch) -> Result<(), PlotError> {
        let Some(x_ref) = self.options.base.sig_x.first() else {
            return Ok(());
        };
        let x = batch.fetch(x_ref);
        if !x.is_empty() {
            for s in &mut self.series {
                let y = batch.fetch(&s.sig);
                let fresh: Vec<[f64; 2]> = x.iter().zip(y).map(|(&x, &y)| [x, y]).collect();
                if fresh.is_empty() {
                    continue;
                }
                s.points.extend_from_slice(&fresh);
                self.core
                    .surface()
                    .append_points(s.lease.handle(), &fresh)?;
            }
        }
        self.update_domains()
    }

    fn add_plot_channel(
        &mut self,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), PlotError> {
        if self.series.iter().any(|s| compare(&s.sig, &sig_y)) {
            return Err(PlotError::DuplicateChannel(sig_y));
        }
        if let (Some(given), Some(configured)) = (&sig_x, self.options.base.sig_x.first()) {
            if !compare(given, configured) {
                return Err(PlotError::XChannelConflict {
                    given: given.clone(),
                    configured: configured.clone(),
                });
            }
        }
        let series = self.create_series(self.series.len(), &sig_y)?;
        if let Some(x) = sig_x {
            if self.options.base.sig_x.is_empty() {
                self.options.base.sig_x.push(x);
            }
        }
        self.options.base.sig_y.push(sig_y);
        self.series.push(series);
        Ok(())
    }

    fn remove_plot_channel(
        &mut self,
        sig_y: &SignalRef,
        sig_x: Option<&SignalRef>,
    ) -> Result<(), PlotError> {
        if let Some(x) = sig_x {
            if !self.options.base.sig_x.iter().any(|c| compare(c, x)) {
                return Err(PlotError::ChannelNotFound(x.clone()));
            }
        }
        let idx = self
            .series
            .iter()
            .position(|s| compare(&s.sig, sig_y))
            .ok_or_else(|| PlotError::ChannelNotFound(sig_y.clone()))?;
        self.series.remove(idx);
        self.options.base.sig_y.remove(idx);
        Ok(())
    }

    fn update_all_options(&mut self, options: LineOptions) -> Result<(), PlotError> {
        validate_channels(PlotKind::Line, &options.base.sig_x, &options.base.sig_y)?;
        ensure_unique(&options.base.sig_y)?;
        // Buffers pair y with the old x channel; a new x starts them over.
        let keep_buffers = options.base.sig_x == self.options.base.sig_x;
        let previous = std::mem::replace(&mut self.options, options);
        if let Err(e) = self.rebuild_series(keep_buffers) {
            self.options = previous;
            return Err(e);
        }
        if !keep_buffers {
            self.x_domain = None;
        }
        self.configure_all()?;
        self.core.apply_base(&self.options.base)?;
        self.update_domains()
    }
}
