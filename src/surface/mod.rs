//! Drawing surface abstraction shared by all plots.
//!
//! A surface owns native resources (regions, axes, series) behind typed
//! handles. Plots never hold a bare handle: they hold a [`Lease`], which
//! releases its handle on the surface when dropped. Disposing a plot is
//! therefore just dropping it, and no early return can leak a region.

pub mod egui_backend;
pub mod scene;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::SurfaceError;
use crate::layout::Rect;
use crate::options::AxisAlign;

pub use scene::Scene;

/// The surface as shared by every plot of a container.
pub type SharedSurface = Rc<RefCell<dyn DrawingSurface>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub u64);

/// Any handle the surface can release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Region(RegionId),
    Axis(AxisId),
    Series(SeriesId),
}

impl From<RegionId> for Resource {
    fn from(id: RegionId) -> Self {
        Resource::Region(id)
    }
}

impl From<AxisId> for Resource {
    fn from(id: AxisId) -> Self {
        Resource::Axis(id)
    }
}

impl From<SeriesId> for Resource {
    fn from(id: SeriesId) -> Self {
        Resource::Series(id)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Region(id) => write!(f, "region#{}", id.0),
            Resource::Axis(id) => write!(f, "axis#{}", id.0),
            Resource::Series(id) => write!(f, "series#{}", id.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    X,
    Y,
}

/// Static configuration of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    pub dimension: Dimension,
    pub align: AxisAlign,
    pub flipped: bool,
    pub visible: bool,
}

/// The visible range of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisDomain {
    /// Fit to the data currently held by the region's series.
    Auto,
    Fixed { min: f64, max: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    /// Connected line through `(x, y)` points.
    Line,
    /// Point markers joined by a thin line, for x/y traces.
    Scatter,
    /// One bar per value with a category label.
    Bars,
    /// Row-major 2-D intensity grid.
    Heatmap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name: String,
    pub style: SeriesStyle,
    /// Index used to pick a palette color.
    pub color_index: usize,
    /// Points may hold `NaN`; they are skipped when drawn.
    pub contains_nan: bool,
    /// x is non-decreasing, so its extent is the first and last point.
    pub sorted: bool,
    /// Keep at most this many appended points on the surface.
    pub max_points: Option<usize>,
}

impl SeriesSpec {
    pub fn new(name: impl Into<String>, style: SeriesStyle) -> Self {
        Self {
            name: name.into(),
            style,
            color_index: 0,
            contains_nan: false,
            sorted: false,
            max_points: None,
        }
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = Some(max_points.max(1));
        self
    }
}

/// Resource-owning 2D drawing surface.
///
/// Every `create_*` call consumes capacity until the returned handle is
/// passed to [`DrawingSurface::release`].
pub trait DrawingSurface {
    fn create_region(&mut self) -> Result<RegionId, SurfaceError>;
    fn set_region_rect(&mut self, region: RegionId, rect: Rect) -> Result<(), SurfaceError>;
    fn set_region_title(&mut self, region: RegionId, title: &str) -> Result<(), SurfaceError>;

    fn create_axis(&mut self, region: RegionId, spec: AxisSpec) -> Result<AxisId, SurfaceError>;
    fn configure_axis(&mut self, axis: AxisId, spec: AxisSpec) -> Result<(), SurfaceError>;
    fn set_axis_domain(&mut self, axis: AxisId, domain: AxisDomain) -> Result<(), SurfaceError>;

    fn create_series(
        &mut self,
        region: RegionId,
        spec: SeriesSpec,
    ) -> Result<SeriesId, SurfaceError>;
    /// Replace the spec of a live series, keeping its data.
    fn configure_series(&mut self, series: SeriesId, spec: SeriesSpec) -> Result<(), SurfaceError>;
    /// Append points; the surface may apply its own windowing.
    fn append_points(&mut self, series: SeriesId, points: &[[f64; 2]]) -> Result<(), SurfaceError>;
    /// Replace all points of a series.
    fn set_points(&mut self, series: SeriesId, points: &[[f64; 2]]) -> Result<(), SurfaceError>;
    fn set_bars(
        &mut self,
        series: SeriesId,
        labels: &[String],
        values: &[f64],
    ) -> Result<(), SurfaceError>;
    fn set_heatmap(
        &mut self,
        series: SeriesId,
        rows: &[Vec<f64>],
        range: (f64, f64),
    ) -> Result<(), SurfaceError>;

    /// Release a resource. Returns `false` if the handle was not live.
    fn release(&mut self, resource: Resource) -> bool;
}

/// Exclusive ownership of one surface handle; released on drop.
pub struct Lease<H>
where
    H: Copy + Into<Resource>,
{
    surface: SharedSurface,
    handle: H,
}

impl<H> Lease<H>
where
    H: Copy + Into<Resource>,
{
    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }
}

impl<H> fmt::Debug for Lease<H>
where
    H: Copy + Into<Resource>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lease({})", self.handle.into())
    }
}

impl<H> Drop for Lease<H>
where
    H: Copy + Into<Resource>,
{
    fn drop(&mut self) {
        let resource = self.handle.into();
        match self.surface.try_borrow_mut() {
            Ok(mut surface) => {
                if surface.release(resource) {
                    log::debug!("released {resource}");
                } else {
                    log::debug!("{resource} was already released");
                }
            }
            Err(_) => log::warn!("surface busy, could not release {resource}"),
        }
    }
}

/// Allocate a region and wrap it in a lease.
pub fn lease_region(surface: &SharedSurface) -> Result<Lease<RegionId>, SurfaceError> {
    let handle = surface.borrow_mut().create_region()?;
    log::debug!("acquired {}", Resource::from(handle));
    Ok(Lease {
        surface: Rc::clone(surface),
        handle,
    })
}

/// Allocate an axis inside `region` and wrap it in a lease.
pub fn lease_axis(
    surface: &SharedSurface,
    region: RegionId,
    spec: AxisSpec,
) -> Result<Lease<AxisId>, SurfaceError> {
    let handle = surface.borrow_mut().create_axis(region, spec)?;
    log::debug!("acquired {}", Resource::from(handle));
    Ok(Lease {
        surface: Rc::clone(surface),
        handle,
    })
}

/// Allocate a series inside `region` and wrap it in a lease.
pub fn lease_series(
    surface: &SharedSurface,
    region: RegionId,
    spec: SeriesSpec,
) -> Result<Lease<SeriesId>, SurfaceError> {
    let handle = surface.borrow_mut().create_series(region, spec)?;
    log::debug!("acquired {}", Resource::from(handle));
    Ok(Lease {
        surface: Rc::clone(surface),
        handle,
    })
}
