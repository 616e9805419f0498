//! Geometric regions used to mask scan points.
//!
//! The engine only depends on the [`Roi`] predicate and an optional
//! axis-aligned extent. [`RegionShape`] provides the common shapes natively
//! and wraps any other geometry through [`RegionShape::Custom`].
//!
//! A [`ScanRegion`] pairs a shape with the ordered axis names it constrains.
//! For planar shapes the first axis is the shape's x and the second its y.
//!
//! # Example
//!
//! ```rust,ignore
//! use scan_core::region::{RegionShape, ScanRegion};
//!
//! let region = ScanRegion::new(RegionShape::circle([1.0, 1.0], 2.0), ["x", "y"]);
//! assert!(region.shape.contains_point(&[1.5, 1.5]));
//! ```

use crate::limits::GEOMETRY_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::sync::Arc;

/// Axis-aligned bounding extent of a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Lower corner, one entry per dimension.
    pub min: [f64; 2],
    /// Upper corner, one entry per dimension.
    pub max: [f64; 2],
}

/// Point-membership predicate supplied by a geometry library.
pub trait Roi: fmt::Debug + Send + Sync {
    /// Test whether `coords` (one value per constrained axis) lies inside.
    fn contains_point(&self, coords: &[f64]) -> bool;

    /// Number of axes this region constrains.
    fn dimensions(&self) -> usize {
        2
    }

    /// Optional axis-aligned extent.
    fn bounds(&self) -> Option<Extent> {
        None
    }

    /// True when the region is an unrotated box, which can leave a grid intact.
    fn is_axis_aligned(&self) -> bool {
        false
    }
}

/// Shared handle to a caller-supplied region.
///
/// Equality is identity: two handles are equal only if they point at the
/// same region object.
#[derive(Debug, Clone)]
pub struct CustomRoi(pub Arc<dyn Roi>);

impl PartialEq for CustomRoi {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Native region geometries.
///
/// Angles are in radians, measured from the first axis towards the second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionShape {
    /// Disc of `radius` around `centre`.
    Circle {
        /// Centre coordinates.
        centre: [f64; 2],
        /// Radius.
        radius: f64,
    },
    /// Ellipse with semi-axes rotated by `angle`.
    Ellipse {
        /// Centre coordinates.
        centre: [f64; 2],
        /// Semi-axis lengths along the rotated frame.
        semi_axes: [f64; 2],
        /// Rotation of the first semi-axis.
        #[serde(default)]
        angle: f64,
    },
    /// Rectangle anchored at `start`, rotated about it by `angle`.
    Rectangle {
        /// Anchor corner.
        start: [f64; 2],
        /// Extent along the rotated first axis.
        width: f64,
        /// Extent along the rotated second axis.
        height: f64,
        /// Rotation about `start`.
        #[serde(default)]
        angle: f64,
    },
    /// Closed polygon; points on an edge are inside.
    Polygon {
        /// Vertices in order.
        vertices: Vec<[f64; 2]>,
    },
    /// Segment from `start` to `end`; points on it are inside.
    Line {
        /// First end point.
        start: [f64; 2],
        /// Second end point.
        end: [f64; 2],
    },
    /// A single coordinate.
    Point {
        /// The coordinate.
        point: [f64; 2],
    },
    /// Annular sector between two radii and two angles.
    Sector {
        /// Centre coordinates.
        centre: [f64; 2],
        /// Inner and outer radius.
        radii: [f64; 2],
        /// Start and end angle, counter-clockwise.
        angles: [f64; 2],
    },
    /// Closed range along a single axis.
    Interval {
        /// Lower limit.
        min: f64,
        /// Upper limit.
        max: f64,
    },
    /// Caller-supplied geometry. Not serializable.
    #[serde(skip)]
    Custom(CustomRoi),
}

impl RegionShape {
    /// Disc of `radius` around `centre`.
    pub fn circle(centre: [f64; 2], radius: f64) -> Self {
        Self::Circle { centre, radius }
    }

    /// Unrotated rectangle from `start` with the given extents.
    pub fn rectangle(start: [f64; 2], width: f64, height: f64) -> Self {
        Self::Rectangle {
            start,
            width,
            height,
            angle: 0.0,
        }
    }

    /// Polygon from its vertices.
    pub fn polygon(vertices: Vec<[f64; 2]>) -> Self {
        Self::Polygon { vertices }
    }

    /// Wrap a caller-supplied geometry.
    pub fn custom(roi: Arc<dyn Roi>) -> Self {
        Self::Custom(CustomRoi(roi))
    }

    /// Short type label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
            Self::Rectangle { .. } => "rectangle",
            Self::Polygon { .. } => "polygon",
            Self::Line { .. } => "line",
            Self::Point { .. } => "point",
            Self::Sector { .. } => "sector",
            Self::Interval { .. } => "interval",
            Self::Custom(_) => "custom",
        }
    }
}

fn within(value: f64, a: f64, b: f64) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    value >= lo - GEOMETRY_TOLERANCE && value <= hi + GEOMETRY_TOLERANCE
}

/// Rotate `(x, y)` relative to `origin` into a frame turned by `angle`.
fn to_frame(x: f64, y: f64, origin: [f64; 2], angle: f64) -> (f64, f64) {
    let (dx, dy) = (x - origin[0], y - origin[1]);
    let (sin, cos) = angle.sin_cos();
    (dx * cos + dy * sin, -dx * sin + dy * cos)
}

fn distance_to_segment(x: f64, y: f64, a: [f64; 2], b: [f64; 2]) -> f64 {
    let (vx, vy) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = vx * vx + vy * vy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((x - a[0]) * vx + (y - a[1]) * vy) / len_sq).clamp(0.0, 1.0)
    };
    let (px, py) = (a[0] + t * vx, a[1] + t * vy);
    (x - px).hypot(y - py)
}

fn polygon_contains(vertices: &[[f64; 2]], x: f64, y: f64) -> bool {
    let n = vertices.len();
    if n == 0 {
        return false;
    }
    let mut inside = false;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + n - 1) % n];
        if distance_to_segment(x, y, a, b) <= GEOMETRY_TOLERANCE {
            return true;
        }
        if (a[1] > y) != (b[1] > y) {
            let crossing = a[0] + (y - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if x < crossing {
                inside = !inside;
            }
        }
    }
    inside
}

fn angle_within(theta: f64, start: f64, end: f64) -> bool {
    let span = (end - start).rem_euclid(TAU);
    if span == 0.0 && end != start {
        return true;
    }
    (theta - start).rem_euclid(TAU) <= span + GEOMETRY_TOLERANCE
}

impl Roi for RegionShape {
    fn contains_point(&self, coords: &[f64]) -> bool {
        if let Self::Custom(custom) = self {
            return custom.0.contains_point(coords);
        }
        if coords.len() != self.dimensions() {
            return false;
        }
        match self {
            Self::Interval { min, max } => within(coords[0], *min, *max),
            Self::Circle { centre, radius } => {
                (coords[0] - centre[0]).hypot(coords[1] - centre[1]) <= radius + GEOMETRY_TOLERANCE
            }
            Self::Ellipse {
                centre,
                semi_axes,
                angle,
            } => {
                let (u, v) = to_frame(coords[0], coords[1], *centre, *angle);
                let (a, b) = (semi_axes[0], semi_axes[1]);
                if a == 0.0 || b == 0.0 {
                    return false;
                }
                (u / a).powi(2) + (v / b).powi(2) <= 1.0 + GEOMETRY_TOLERANCE
            }
            Self::Rectangle {
                start,
                width,
                height,
                angle,
            } => {
                let (u, v) = to_frame(coords[0], coords[1], *start, *angle);
                within(u, 0.0, *width) && within(v, 0.0, *height)
            }
            Self::Polygon { vertices } => polygon_contains(vertices, coords[0], coords[1]),
            Self::Line { start, end } => {
                distance_to_segment(coords[0], coords[1], *start, *end) <= GEOMETRY_TOLERANCE
            }
            Self::Point { point } => {
                (coords[0] - point[0]).hypot(coords[1] - point[1]) <= GEOMETRY_TOLERANCE
            }
            Self::Sector {
                centre,
                radii,
                angles,
            } => {
                let (dx, dy) = (coords[0] - centre[0], coords[1] - centre[1]);
                let r = dx.hypot(dy);
                within(r, radii[0], radii[1]) && (r == 0.0 || angle_within(dy.atan2(dx), angles[0], angles[1]))
            }
            Self::Custom(_) => false,
        }
    }

    fn dimensions(&self) -> usize {
        match self {
            Self::Interval { .. } => 1,
            Self::Custom(custom) => custom.0.dimensions(),
            _ => 2,
        }
    }

    fn bounds(&self) -> Option<Extent> {
        match self {
            Self::Circle { centre, radius } => Some(Extent {
                min: [centre[0] - radius, centre[1] - radius],
                max: [centre[0] + radius, centre[1] + radius],
            }),
            Self::Rectangle {
                start,
                width,
                height,
                angle,
            } if *angle == 0.0 => Some(Extent {
                min: [start[0].min(start[0] + width), start[1].min(start[1] + height)],
                max: [start[0].max(start[0] + width), start[1].max(start[1] + height)],
            }),
            Self::Polygon { vertices } if !vertices.is_empty() => {
                let mut extent = Extent {
                    min: [f64::INFINITY; 2],
                    max: [f64::NEG_INFINITY; 2],
                };
                for v in vertices {
                    for k in 0..2 {
                        extent.min[k] = extent.min[k].min(v[k]);
                        extent.max[k] = extent.max[k].max(v[k]);
                    }
                }
                Some(extent)
            }
            Self::Line { start, end } => Some(Extent {
                min: [start[0].min(end[0]), start[1].min(end[1])],
                max: [start[0].max(end[0]), start[1].max(end[1])],
            }),
            Self::Point { point } => Some(Extent {
                min: *point,
                max: *point,
            }),
            Self::Custom(custom) => custom.0.bounds(),
            _ => None,
        }
    }

    fn is_axis_aligned(&self) -> bool {
        match self {
            Self::Rectangle { angle, .. } => *angle == 0.0,
            Self::Interval { .. } => true,
            Self::Custom(custom) => custom.0.is_axis_aligned(),
            _ => false,
        }
    }
}

/// A shape applied to an ordered list of axes.
///
/// An empty axis list means "the two axes of the model it is attached to".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRegion {
    /// Geometry of the region.
    pub shape: RegionShape,
    /// Axes constrained by the region, in shape coordinate order.
    #[serde(default)]
    pub axes: Vec<String>,
}

impl ScanRegion {
    /// Region over explicit axes.
    pub fn new<S: Into<String>>(shape: RegionShape, axes: impl IntoIterator<Item = S>) -> Self {
        Self {
            shape,
            axes: axes.into_iter().map(Into::into).collect(),
        }
    }

    /// Region whose axes are taken from the model it is attached to.
    pub fn unbound(shape: RegionShape) -> Self {
        Self {
            shape,
            axes: Vec::new(),
        }
    }

    /// Evaluate the predicate on coordinates given in [`ScanRegion::axes`] order.
    pub fn contains(&self, coords: &[f64]) -> bool {
        self.shape.contains_point(coords)
    }
}
