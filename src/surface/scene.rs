//! Retained-mode in-memory drawing surface.
//!
//! [`Scene`] stores everything plots push to it and is what the egui
//! backend paints from. It has a fixed resource capacity standing in for a
//! native backing store, so leaked leases show up as `Exhausted` errors.

use std::collections::{BTreeMap, VecDeque};

use crate::error::SurfaceError;
use crate::layout::Rect;

use super::{
    AxisDomain, AxisId, AxisSpec, Dimension, DrawingSurface, RegionId, Resource, SeriesId,
    SeriesSpec,
};

#[derive(Debug, Clone)]
pub struct RegionState {
    pub rect: Rect,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct AxisState {
    pub region: RegionId,
    pub spec: AxisSpec,
    pub domain: AxisDomain,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Points(VecDeque<[f64; 2]>),
    Bars { labels: Vec<String>, values: Vec<f64> },
    Heatmap { rows: Vec<Vec<f64>>, range: (f64, f64) },
}

#[derive(Debug, Clone)]
pub struct SeriesState {
    pub region: RegionId,
    pub spec: SeriesSpec,
    pub data: SeriesData,
}

impl SeriesState {
    pub fn points(&self) -> Option<&VecDeque<[f64; 2]>> {
        match &self.data {
            SeriesData::Points(p) => Some(p),
            _ => None,
        }
    }
}

/// Default number of live resources a scene can hold.
pub const DEFAULT_CAPACITY: usize = 4096;

pub struct Scene {
    capacity: usize,
    next_id: u64,
    /// Backend window for appended point series; `None` keeps everything.
    series_window: Option<usize>,
    regions: BTreeMap<RegionId, RegionState>,
    axes: BTreeMap<AxisId, AxisState>,
    series: BTreeMap<SeriesId, SeriesState>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Scene {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            next_id: 1,
            series_window: None,
            regions: BTreeMap::new(),
            axes: BTreeMap::new(),
            series: BTreeMap::new(),
        }
    }

    /// Keep at most `max_points` appended points per series.
    pub fn with_series_window(mut self, max_points: usize) -> Self {
        self.series_window = Some(max_points.max(1));
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of regions, axes and series currently allocated.
    pub fn live_resources(&self) -> usize {
        self.regions.len() + self.axes.len() + self.series.len()
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &RegionState)> {
        self.regions.iter().map(|(id, r)| (*id, r))
    }

    pub fn region(&self, id: RegionId) -> Option<&RegionState> {
        self.regions.get(&id)
    }

    pub fn axis(&self, id: AxisId) -> Option<&AxisState> {
        self.axes.get(&id)
    }

    pub fn series(&self, id: SeriesId) -> Option<&SeriesState> {
        self.series.get(&id)
    }

    pub fn axes_in(&self, region: RegionId) -> impl Iterator<Item = (AxisId, &AxisState)> {
        self.axes
            .iter()
            .filter(move |(_, a)| a.region == region)
            .map(|(id, a)| (*id, a))
    }

    pub fn series_in(&self, region: RegionId) -> impl Iterator<Item = (SeriesId, &SeriesState)> {
        self.series
            .iter()
            .filter(move |(_, s)| s.region == region)
            .map(|(id, s)| (*id, s))
    }

    /// First axis of `dimension` in `region`.
    pub fn axis_of(&self, region: RegionId, dimension: Dimension) -> Option<&AxisState> {
        self.axes_in(region)
            .map(|(_, a)| a)
            .find(|a| a.spec.dimension == dimension)
    }

    /// Concrete `(min, max)` of an axis, fitting `Auto` domains to the data.
    pub fn resolved_domain(&self, axis: AxisId) -> Option<(f64, f64)> {
        let state = self.axes.get(&axis)?;
        match state.domain {
            AxisDomain::Fixed { min, max } => Some((min, max)),
            AxisDomain::Auto => self.fit_domain(state.region, state.spec.dimension),
        }
    }

    fn fit_domain(&self, region: RegionId, dimension: Dimension) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        let mut include = |v: f64| {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        };
        for (_, s) in self.series_in(region) {
            match &s.data {
                SeriesData::Points(points) => match dimension {
                    Dimension::X if s.spec.sorted && !s.spec.contains_nan => {
                        if let (Some(first), Some(last)) = (points.front(), points.back()) {
                            include(first[0]);
                            include(last[0]);
                        }
                    }
                    Dimension::X => points.iter().for_each(|p| include(p[0])),
                    Dimension::Y => points.iter().for_each(|p| include(p[1])),
                },
                SeriesData::Bars { values, .. } => match dimension {
                    Dimension::X => {
                        include(-0.5);
                        include(values.len() as f64 - 0.5);
                    }
                    Dimension::Y => {
                        include(0.0);
                        values.iter().copied().for_each(&mut include);
                    }
                },
                SeriesData::Heatmap { rows, .. } => {
                    let extent = match dimension {
                        Dimension::X => rows.first().map_or(0, Vec::len),
                        Dimension::Y => rows.len(),
                    };
                    include(0.0);
                    include(extent as f64);
                }
            }
        }
        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }
        if lo == hi {
            Some((lo - 0.5, hi + 0.5))
        } else {
            Some((lo, hi))
        }
    }

    fn reserve(&mut self) -> Result<u64, SurfaceError> {
        if self.live_resources() >= self.capacity {
            return Err(SurfaceError::Exhausted {
                capacity: self.capacity,
            });
        }
        // Ids wrap back to 1 and skip anything still live.
        loop {
            let id = self.next_id;
            self.next_id = self.next_id.checked_add(1).unwrap_or(1);
            if !self.is_live(id) {
                return Ok(id);
            }
        }
    }

    fn is_live(&self, id: u64) -> bool {
        self.regions.contains_key(&RegionId(id))
            || self.axes.contains_key(&AxisId(id))
            || self.series.contains_key(&SeriesId(id))
    }

    fn point_window(&self, spec: &SeriesSpec) -> Option<usize> {
        match (spec.max_points, self.series_window) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn require_region(&self, region: RegionId) -> Result<(), SurfaceError> {
        if self.regions.contains_key(&region) {
            Ok(())
        } else {
            Err(unknown(region))
        }
    }

    fn series_mut(&mut self, id: SeriesId) -> Result<&mut SeriesState, SurfaceError> {
        self.series.get_mut(&id).ok_or_else(|| unknown(id))
    }
}

fn trim_front(buf: &mut VecDeque<[f64; 2]>, window: Option<usize>) {
    if let Some(max) = window {
        let excess = buf.len().saturating_sub(max);
        buf.drain(..excess);
    }
}

fn unknown(resource: impl Into<Resource>) -> SurfaceError {
    SurfaceError::UnknownResource(resource.into().to_string())
}

impl DrawingSurface for Scene {
    fn create_region(&mut self) -> Result<RegionId, SurfaceError> {
        let id = RegionId(self.reserve()?);
        self.regions.insert(
            id,
            RegionState {
                rect: Rect::UNIT,
                title: String::new(),
            },
        );
        Ok(id)
    }

    fn set_region_rect(&mut self, region: RegionId, rect: Rect) -> Result<(), SurfaceError> {
        let state = self.regions.get_mut(&region).ok_or_else(|| unknown(region))?;
        state.rect = rect;
        Ok(())
    }

    fn set_region_title(&mut self, region: RegionId, title: &str) -> Result<(), SurfaceError> {
        let state = self.regions.get_mut(&region).ok_or_else(|| unknown(region))?;
        state.title = title.to_string();
        Ok(())
    }

    fn create_axis(&mut self, region: RegionId, spec: AxisSpec) -> Result<AxisId, SurfaceError> {
        self.require_region(region)?;
        let id = AxisId(self.reserve()?);
        self.axes.insert(
            id,
            AxisState {
                region,
                spec,
                domain: AxisDomain::Auto,
            },
        );
        Ok(id)
    }

    fn configure_axis(&mut self, axis: AxisId, spec: AxisSpec) -> Result<(), SurfaceError> {
        let state = self.axes.get_mut(&axis).ok_or_else(|| unknown(axis))?;
        state.spec = spec;
        Ok(())
    }

    fn set_axis_domain(&mut self, axis: AxisId, domain: AxisDomain) -> Result<(), SurfaceError> {
        let state = self.axes.get_mut(&axis).ok_or_else(|| unknown(axis))?;
        state.domain = domain;
        Ok(())
    }

    fn create_series(
        &mut self,
        region: RegionId,
        spec: SeriesSpec,
    ) -> Result<SeriesId, SurfaceError> {
        self.require_region(region)?;
        let id = SeriesId(self.reserve()?);
        let data = match spec.style {
            super::SeriesStyle::Line | super::SeriesStyle::Scatter => {
                SeriesData::Points(VecDeque::new())
            }
            super::SeriesStyle::Bars => SeriesData::Bars {
                labels: Vec::new(),
                values: Vec::new(),
            },
            super::SeriesStyle::Heatmap => SeriesData::Heatmap {
                rows: Vec::new(),
                range: (0.0, 1.0),
            },
        };
        self.series.insert(id, SeriesState { region, spec, data });
        Ok(id)
    }

    fn configure_series(&mut self, series: SeriesId, spec: SeriesSpec) -> Result<(), SurfaceError> {
        let window = self.point_window(&spec);
        let state = self.series_mut(series)?;
        state.spec = spec;
        if let SeriesData::Points(buf) = &mut state.data {
            trim_front(buf, window);
        }
        Ok(())
    }

    fn append_points(&mut self, series: SeriesId, points: &[[f64; 2]]) -> Result<(), SurfaceError> {
        let state = self.series.get(&series).ok_or_else(|| unknown(series))?;
        let window = self.point_window(&state.spec);
        let state = self.series_mut(series)?;
        if let SeriesData::Points(buf) = &mut state.data {
            buf.extend(points.iter().copied());
            trim_front(buf, window);
        }
        Ok(())
    }

    fn set_points(&mut self, series: SeriesId, points: &[[f64; 2]]) -> Result<(), SurfaceError> {
        let state = self.series.get(&series).ok_or_else(|| unknown(series))?;
        let window = self.point_window(&state.spec);
        let state = self.series_mut(series)?;
        let mut buf: VecDeque<[f64; 2]> = points.iter().copied().collect();
        trim_front(&mut buf, window);
        state.data = SeriesData::Points(buf);
        Ok(())
    }

    fn set_bars(
        &mut self,
        series: SeriesId,
        labels: &[String],
        values: &[f64],
    ) -> Result<(), SurfaceError> {
        let state = self.series_mut(series)?;
        state.data = SeriesData::Bars {
            labels: labels.to_vec(),
            values: values.to_vec(),
        };
        Ok(())
    }

    fn set_heatmap(
        &mut self,
        series: SeriesId,
        rows: &[Vec<f64>],
        range: (f64, f64),
    ) -> Result<(), SurfaceError> {
        let state = self.series_mut(series)?;
        state.data = SeriesData::Heatmap {
            rows: rows.to_vec(),
            range,
        };
        Ok(())
    }

    fn release(&mut self, resource: Resource) -> bool {
        match resource {
            Resource::Region(id) => {
                let existed = self.regions.remove(&id).is_some();
                // Children go with their region.
                self.axes.retain(|_, a| a.region != id);
                self.series.retain(|_, s| s.region != id);
                existed
            }
            Resource::Axis(id) => self.axes.remove(&id).is_some(),
            Resource::Series(id) => self.series.remove(&id).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::AxisAlign;
    use crate::surface::SeriesStyle;

    fn x_axis() -> AxisSpec {
        AxisSpec {
            dimension: Dimension::X,
            align: AxisAlign::Bottom,
            flipped: false,
            visible: true,
        }
    }

    #[test]
    fn wrapped_ids_skip_live_resources() {
        let mut scene = Scene::default();
        let first = scene.create_region().unwrap();
        assert_eq!(first, RegionId(1));

        scene.next_id = u64::MAX;
        let last = scene.create_region().unwrap();
        assert_eq!(last, RegionId(u64::MAX));
        let wrapped = scene.create_region().unwrap();
        assert_eq!(wrapped, RegionId(2));

        assert_eq!(scene.live_resources(), 3);
        assert!(scene.region(first).is_some());
    }

    #[test]
    fn sorted_series_fit_from_their_ends() {
        let mut scene = Scene::default();
        let region = scene.create_region().unwrap();
        let axis = scene.create_axis(region, x_axis()).unwrap();
        let mut spec = SeriesSpec::new("s", SeriesStyle::Line);
        spec.sorted = true;
        let series = scene.create_series(region, spec).unwrap();
        // The flag is trusted: only the end points are read.
        scene.append_points(series, &[[1.0, 0.0], [9.0, 5.0], [4.0, 1.0]]).unwrap();
        assert_eq!(scene.resolved_domain(axis), Some((1.0, 4.0)));
    }

    #[test]
    fn reconfigured_window_trims_points() {
        let mut scene = Scene::default();
        let region = scene.create_region().unwrap();
        let spec = SeriesSpec::new("s", SeriesStyle::Line);
        let series = scene.create_series(region, spec.clone()).unwrap();
        let points: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 0.0]).collect();
        scene.append_points(series, &points).unwrap();

        scene.configure_series(series, spec.with_max_points(3)).unwrap();
        let kept = scene.series(series).unwrap().points().unwrap();
        assert_eq!(kept.len(), 3);
        assert_eq!(kept.front(), Some(&[7.0, 0.0]));
    }
}
