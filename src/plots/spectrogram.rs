//! Spectrogram plot: a `[bin_count, n_visible_windows]` sliding heatmap.
//!
//! The single y reference selects a signal key; channel `i` of that signal
//! feeds accumulator row `i`. Each row keeps only its newest
//! `n_visible_windows` samples.

use crate::error::PlotError;
use crate::options::{validate_channels, PlotKind, SpectrogramOptions};
use crate::signal::{compare, SampleBatch, SignalRef};
use crate::surface::{
    AxisDomain, Dimension, Lease, SeriesId, SeriesSpec, SeriesStyle, SharedSurface,
};

use super::{series_spec, PlotCore, PlotVariant};

pub struct SpectrogramPlot {
    rows: Vec<Vec<f64>>,
    /// Window length the accumulator and its heatmap were built for.
    effective_windows: usize,
    heatmap: Lease<SeriesId>,
    options: SpectrogramOptions,
    core: PlotCore,
}

impl SpectrogramPlot {
    pub fn new(surface: &SharedSurface, options: SpectrogramOptions) -> Result<Self, PlotError> {
        validate_channels(PlotKind::Spectrogram, &options.base.sig_x, &options.base.sig_y)?;
        let core = PlotCore::new(surface, &options.base)?;
        let heatmap = Self::create_heatmap(&core, &options)?;
        let windows = options.n_visible_windows.max(1);
        let mut plot = Self {
            rows: zeroed(options.bin_count.max(1), windows),
            effective_windows: windows,
            heatmap,
            options,
            core,
        };
        plot.apply_domains()?;
        plot.push()?;
        Ok(plot)
    }

    pub fn options(&self) -> &SpectrogramOptions {
        &self.options
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// `(bin_count, n_visible_windows)` of the accumulator.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.effective_windows)
    }

    pub fn effective_windows(&self) -> usize {
        self.effective_windows
    }

    fn heatmap_spec(options: &SpectrogramOptions) -> SeriesSpec {
        let name = options
            .base
            .sig_y
            .first()
            .map(|s| s.key.clone())
            .unwrap_or_else(|| options.base.description.clone());
        series_spec(&options.base, name, SeriesStyle::Heatmap, 0)
    }

    fn create_heatmap(
        core: &PlotCore,
        options: &SpectrogramOptions,
    ) -> Result<Lease<SeriesId>, PlotError> {
        core.new_series(Self::heatmap_spec(options))
    }

    fn clear(&mut self) {
        self.rows = zeroed(self.rows.len(), self.effective_windows);
    }

    fn apply_domains(&self) -> Result<(), PlotError> {
        self.core.set_domain(
            Dimension::X,
            AxisDomain::Fixed {
                min: 0.0,
                max: self.effective_windows as f64,
            },
        )?;
        self.core.set_domain(
            Dimension::Y,
            AxisDomain::Fixed {
                min: 0.0,
                max: self.rows.len() as f64,
            },
        )
    }

    fn push(&self) -> Result<(), PlotError> {
        let range = (self.options.colormap_min, self.options.colormap_max);
        self.core
            .surface()
            .set_heatmap(self.heatmap.handle(), &self.rows, range)?;
        Ok(())
    }
}

fn zeroed(bins: usize, windows: usize) -> Vec<Vec<f64>> {
    vec![vec![0.0; windows]; bins]
}

impl PlotVariant for SpectrogramPlot {
    type Options = SpectrogramOptions;

    fn core(&self) -> &PlotCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlotCore {
        &mut self.core
    }

    fn update(&mut self, batch: &SampleBatch) -> Result<(), PlotError> {
        let Some(sig) = self.options.base.sig_y.first() else {
            return Ok(());
        };
        let channels = batch.channels(&sig.key);
        if channels.is_empty() {
            return Ok(());
        }
        let windows = self.effective_windows;
        for (i, row) in self.rows.iter_mut().enumerate() {
            if let Some(fresh) = channels.get(i) {
                row.extend_from_slice(fresh);
            }
            let excess = row.len().saturating_sub(windows);
            row.drain(..excess);
        }
        self.push()
    }

    fn add_plot_channel(
        &mut self,
        sig_y: SignalRef,
        sig_x: Option<SignalRef>,
    ) -> Result<(), PlotError> {
        if sig_x.is_some() {
            return Err(PlotError::UnexpectedXChannel(PlotKind::Spectrogram));
        }
        match self.options.base.sig_y.first() {
            Some(existing) if compare(existing, &sig_y) => {
                return Err(PlotError::DuplicateChannel(sig_y))
            }
            Some(_) => {
                return Err(PlotError::TooManyChannels {
                    kind: PlotKind::Spectrogram,
                    max: 1,
                })
            }
            None => {}
        }
        self.options.base.sig_y.push(sig_y);
        self.clear();
        self.push()
    }

    fn remove_plot_channel(
        &mut self,
        sig_y: &SignalRef,
        sig_x: Option<&SignalRef>,
    ) -> Result<(), PlotError> {
        if sig_x.is_some() {
            return Err(PlotError::UnexpectedXChannel(PlotKind::Spectrogram));
        }
        let idx = self
            .options
            .base
            .sig_y
            .iter()
            .position(|s| compare(s, sig_y))
            .ok_or_else(|| PlotError::ChannelNotFound(sig_y.clone()))?;
        self.options.base.sig_y.remove(idx);
        self.clear();
        self.push()
    }

    fn update_all_options(&mut self, options: SpectrogramOptions) -> Result<(), PlotError> {
        validate_channels(PlotKind::Spectrogram, &options.base.sig_x, &options.base.sig_y)?;
        let windows = options.n_visible_windows.max(1);
        let bins = options.bin_count.max(1);
        if windows != self.effective_windows || bins != self.rows.len() {
            // No partial resize: a new accumulator and heatmap replace the old.
            let heatmap = Self::create_heatmap(&self.core, &options)?;
            self.heatmap = heatmap;
            self.rows = zeroed(bins, windows);
            self.effective_windows = windows;
        } else {
            self.core.configure_series(&self.heatmap, Self::heatmap_spec(&options))?;
        }
        self.options = options;
        self.core.apply_base(&self.options.base)?;
        self.apply_domains()?;
        self.push()
    }
}
