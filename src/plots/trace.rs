//! Trace plot: index-aligned (x, y) channel pairs, each a bounded buffer.

use crate::error::PlotError;
use crate::options::{validate_channels, PlotKind, TraceOptions};
use crate::signal::{compare, SampleBatch, SignalRef};
use crate::surface::{Dimension, Lease, SeriesId, SeriesSpec, SeriesStyle, SharedSurface};

use super::{domain, reconcile, series_spec, PlotCore, PlotVariant};

pub struct TraceSeries {
    pub sig_x: SignalRef,
    pub sig_y: SignalRef,
    points: Vec<[f64; 2]>,
    lease: Lease<SeriesId>,
}

impl TraceSeries {
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    fn is_pair(&self, x: &SignalRef, y: &SignalRef) -> bool {
        compare(&self.sig_x, x) && compare(&self.sig_y, y)
    }

    fn trim(&mut self, max_points: usize) {
        let excess = self.points.len().saturating_sub(max_points);
        self.points.drain(..excess);
    }
}

pub struct TracePlot {
    series: Vec<TraceSeries>,
    options: TraceOptions,
    core: PlotCore,
}

impl TracePlot {
    pub fn new(surface: &SharedSurface, options: TraceOptions) -> Result<Self, PlotError> {
        validate_channels(PlotKind::Trace, &options.base.sig_x, &options.base.sig_y)?;
        ensure_unique_pairs(&options)?;
        let core = PlotCore::new(surface, &options.base)?;
        let mut plot = Self {
            series: Vec::new(),
            options,
            core,
        };
        let pairs = plot.pairs();
        let mut series = Vec::new();
        reconcile(
            &mut series,
            &pairs,
            |s: &TraceSeries, (x, y): &(SignalRef, SignalRef)| s.is_pair(x, y),
            |i, (x, y): &(SignalRef, SignalRef)| plot.create_series(i, x, y),
        )?;
        plot.series = series;
        plot.apply_domains()?;
        Ok(plot)
    }

    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    pub fn series(&self) -> &[TraceSeries] {
        &self.series
    }

    fn pairs(&self) -> Vec<(SignalRef, SignalRef)> {
        self.options
            .base
            .sig_x
            .iter()
            .cloned()
            .zip(self.options.base.sig_y.iter().cloned())
            .collect()
    }

    fn spec_for(&self, i: usize, sig_x: &SignalRef, sig_y: &SignalRef) -> SeriesSpec {
        let name = format!("{} vs {}", sig_y.display_name(), sig_x.display_name());
        series_spec(&self.options.base, name, SeriesStyle::Scatter, i)
    }

    fn create_series(
        &self,
        i: usize,
        sig_x: &SignalRef,
        sig_y: &SignalRef,
    ) -> Result<TraceSeries, PlotError> {
        let lease = self.core.new_series(self.spec_for(i, sig_x, sig_y))?;
        Ok(TraceSeries {
            sig_x: sig_x.clone(),
            sig_y: sig_y.clone(),
            points: Vec::new(),
            lease,
        })
    }

    fn apply_domains(&self) -> Result<(), PlotError> {
        let o = &self.options;
        self.core.set_domain(
            Dimension::X,
            domain(o.auto_range_x, o.x_domain_min, o.x_domain_max),
        )?;
        self.core.set_domain(
            Dimension::Y,
            domain(o.auto_range_y, o.y_domain_min, o.y_domain_max),
        )
    }

    fn push_all(&self) -> Result<(), PlotError> {
        let mut surface = self.core.surface();
        for s in &self.series {
            surface.set_points(s.lease.handle(), &s.points)?;
        }
        Ok(())
    }
}

fn ensure_unique_pairs(options: &TraceOptions) -> Result<(), PlotError> {
    let b = &options.base;
    for i in 0..b.sig_y.len() {
        let dup = (0..i)
            .any(|j| compare(&b.sig_x[i], &b.sig_x[j]) && compare(&b.sig_y[i], &b.sig_y[j]));
        if dup {
            return Err(PlotError::DuplicateChannel(b.sig_y[i].clone()));
        }
    }
    Ok(())
}

impl PlotVariant for TracePlot {
    type Options = TraceOptions;

    fn core(&self) -> &PlotCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlotCore {
        &mut self.core
    }

    fn update(&mut self, batch: &SampleBatch) -> Result<(), PlotError> {
        let max_points = self.options.n_visible_points.max(1);
        for s in &mut self.series {
            let x = batch.fetch(&s.sig_x);
            let y = batch.fetch(&s.sig_y);
            if x.is_empty() || y.is_empty() {
                continue;
            }
            s.points.extend(x.iter().zip(y).map(|(&x, &y)| [x, y]));
            s.trim(max_points);
        }
        self.push_all()
    }

    fn add_plot_channel(
        &mut self,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), PlotError> {
        let sig_x = sig_x.ok_or(PlotError::MissingXChannel(PlotKind::Trace))?;
        if self.series.iter().any(|s| s.is_pair(&sig_x, &sig_y)) {
            return Err(PlotError::DuplicateChannel(sig_y));
        }
        let series = self.create_series(self.series.len(), &sig_x, &sig_y)?;
        self.options.base.sig_x.push(sig_x);
        self.options.base.sig_y.push(sig_y);
        self.series.push(series);
        Ok(())
    }

    fn remove_plot_channel(
        &mut self,
        sig_y: &SignalRef,
        sig_x: Option<&SignalRef>,
    ) -> Result<(), PlotError> {
        let sig_x = sig_x.ok_or(PlotError::MissingXChannel(PlotKind::Trace))?;
        let idx = self
            .series
            .iter()
            .position(|s| s.is_pair(sig_x, sig_y))
            .ok_or_else(|| PlotError::ChannelNotFound(sig_y.clone()))?;
        self.series.remove(idx);
        self.options.base.sig_x.remove(idx);
        self.options.base.sig_y.remove(idx);
        Ok(())
    }

    fn update_all_options(&mut self, options: TraceOptions) -> Result<(), PlotError> {
        validate_channels(PlotKind::Trace, &options.base.sig_x, &options.base.sig_y)?;
        ensure_unique_pairs(&options)?;
        let previous = std::mem::replace(&mut self.options, options);
        let pairs = self.pairs();
        let mut series = std::mem::take(&mut self.series);
        let result = reconcile(
            &mut series,
            &pairs,
            |s: &TraceSeries, (x, y): &(SignalRef, SignalRef)| s.is_pair(x, y),
            |i, (x, y): &(SignalRef, SignalRef)| self.create_series(i, x, y),
        );
        self.series = series;
        if let Err(e) = result {
            self.options = previous;
            return Err(e);
        }
        let max_points = self.options.n_visible_points.max(1);
        for s in &mut self.series {
            s.trim(max_points);
        }
        let specs: Vec<SeriesSpec> = pairs
            .iter()
            .enumerate()
            .map(|(i, (x, y))| self.spec_for(i, x, y))
            .collect();
        for ((s, (x, y)), spec) in self.series.iter_mut().zip(pairs).zip(specs) {
            s.sig_x = x;
            s.sig_y = y;
            self.core.configure_series(&s.lease, spec)?;
        }
        self.core.apply_base(&self.options.base)?;
        self.apply_domains()?;
        self.push_all()
    }
}
