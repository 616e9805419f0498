//! Two-axis models: grids, lines, spirals, Lissajous figures and single points.
//!
//! Every model here names an x and a y axis. Grids and spirals are framed by
//! a [`BoundingBox`], lines by a [`BoundingLine`].

use super::span::{fit_steps, AxisSpan};
use super::{default_continuous, default_units, AxisModel};
use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};

fn default_x_name() -> String {
    "x".to_string()
}

fn default_y_name() -> String {
    "y".to_string()
}

fn default_scale() -> f64 {
    1.0
}

fn default_lobes() -> u32 {
    4
}

fn default_points() -> usize {
    100
}

/// Rectangle framing a two-axis scan. Lengths may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Start of the x range.
    pub x_axis_start: f64,
    /// Start of the y range.
    pub y_axis_start: f64,
    /// Signed extent along x.
    pub x_axis_length: f64,
    /// Signed extent along y.
    pub y_axis_length: f64,
}

impl BoundingBox {
    /// Box from a start corner and signed lengths.
    pub fn new(x_axis_start: f64, y_axis_start: f64, x_axis_length: f64, y_axis_length: f64) -> Self {
        Self {
            x_axis_start,
            y_axis_start,
            x_axis_length,
            y_axis_length,
        }
    }

    /// Centre of the box.
    pub fn centre(&self) -> [f64; 2] {
        [
            self.x_axis_start + self.x_axis_length / 2.0,
            self.y_axis_start + self.y_axis_length / 2.0,
        ]
    }
}

/// Segment framing a line scan, stored as start, length and angle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingLine {
    /// Start x.
    pub x_start: f64,
    /// Start y.
    pub y_start: f64,
    /// Length of the segment.
    pub length: f64,
    /// Direction in radians from the x axis.
    pub angle: f64,
}

impl BoundingLine {
    /// Line from start, length and angle.
    pub fn new(x_start: f64, y_start: f64, length: f64, angle: f64) -> Self {
        Self {
            x_start,
            y_start,
            length,
            angle,
        }
    }

    /// Line between two end points.
    pub fn from_points(x_start: f64, y_start: f64, x_end: f64, y_end: f64) -> Self {
        let (dx, dy) = (x_end - x_start, y_end - y_start);
        Self {
            x_start,
            y_start,
            length: dx.hypot(dy),
            angle: dy.atan2(dx),
        }
    }

    /// End x.
    pub fn x_end(&self) -> f64 {
        self.x_start + self.length * self.angle.cos()
    }

    /// End y.
    pub fn y_end(&self) -> f64 {
        self.y_start + self.length * self.angle.sin()
    }

    /// Coordinates at distance `t` from the start.
    pub fn at(&self, t: f64) -> [f64; 2] {
        let (sin, cos) = self.angle.sin_cos();
        [self.x_start + t * cos, self.y_start + t * sin]
    }
}

/// Which axis of a grid moves fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// x is the inner, fast axis.
    #[default]
    Horizontal,
    /// y is the inner, fast axis.
    Vertical,
}

/// Grid with an explicit number of points per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoAxisGridPointsModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Name of the x axis.
    #[serde(default = "default_x_name")]
    pub x_axis_name: String,
    /// Name of the y axis.
    #[serde(default = "default_y_name")]
    pub y_axis_name: String,
    /// Units of the x axis.
    #[serde(default = "default_units")]
    pub x_axis_units: String,
    /// Units of the y axis.
    #[serde(default = "default_units")]
    pub y_axis_units: String,
    /// Area covered by the grid.
    #[serde(default)]
    pub bounding_box: BoundingBox,
    /// Points along x.
    pub x_axis_points: usize,
    /// Points along y.
    pub y_axis_points: usize,
    /// Fast axis selection.
    #[serde(default)]
    pub orientation: Orientation,
    /// Place points at cell centres instead of on the box edges.
    #[serde(default)]
    pub bounds_to_fit: bool,
    /// Snake the fast axis.
    #[serde(default)]
    pub alternating: bool,
    /// Also snake the slow axis when the grid sits inside an outer scan.
    #[serde(default)]
    pub alternate_both_axes: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl TwoAxisGridPointsModel {
    /// Grid over `x_axis_name` and `y_axis_name` with the given point counts.
    pub fn new(
        x_axis_name: impl Into<String>,
        y_axis_name: impl Into<String>,
        bounding_box: BoundingBox,
        x_axis_points: usize,
        y_axis_points: usize,
    ) -> Self {
        Self {
            name: "Grid".to_string(),
            x_axis_name: x_axis_name.into(),
            y_axis_name: y_axis_name.into(),
            x_axis_units: default_units(),
            y_axis_units: default_units(),
            bounding_box,
            x_axis_points,
            y_axis_points,
            orientation: Orientation::Horizontal,
            bounds_to_fit: false,
            alternating: false,
            alternate_both_axes: false,
            continuous: default_continuous(),
        }
    }

    /// Set the fast axis.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Place points at cell centres.
    pub fn with_bounds_to_fit(mut self, bounds_to_fit: bool) -> Self {
        self.bounds_to_fit = bounds_to_fit;
        self
    }

    /// Snake the fast axis.
    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    /// Snake the slow axis as well.
    pub fn with_alternate_both_axes(mut self, alternate_both_axes: bool) -> Self {
        self.alternate_both_axes = alternate_both_axes;
        self
    }

    /// Set the continuous flag.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// Point placement along x.
    pub fn x_span(&self) -> AxisSpan {
        AxisSpan::place(
            self.bounding_box.x_axis_start,
            self.bounding_box.x_axis_length,
            self.x_axis_points,
            self.bounds_to_fit,
        )
    }

    /// Point placement along y.
    pub fn y_span(&self) -> AxisSpan {
        AxisSpan::place(
            self.bounding_box.y_axis_start,
            self.bounding_box.y_axis_length,
            self.y_axis_points,
            self.bounds_to_fit,
        )
    }
}

impl AxisModel for TwoAxisGridPointsModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.x_axis_name.clone(), self.y_axis_name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.x_axis_units.clone(), self.y_axis_units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Grid with a fixed distance between points along each axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoAxisGridStepModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Name of the x axis.
    #[serde(default = "default_x_name")]
    pub x_axis_name: String,
    /// Name of the y axis.
    #[serde(default = "default_y_name")]
    pub y_axis_name: String,
    /// Units of the x axis.
    #[serde(default = "default_units")]
    pub x_axis_units: String,
    /// Units of the y axis.
    #[serde(default = "default_units")]
    pub y_axis_units: String,
    /// Area covered by the grid.
    #[serde(default)]
    pub bounding_box: BoundingBox,
    /// Signed distance between points along x.
    pub x_axis_step: f64,
    /// Signed distance between points along y.
    pub y_axis_step: f64,
    /// Fast axis selection.
    #[serde(default)]
    pub orientation: Orientation,
    /// Place points at cell centres instead of on the box edges.
    #[serde(default)]
    pub bounds_to_fit: bool,
    /// Snake the fast axis.
    #[serde(default)]
    pub alternating: bool,
    /// Also snake the slow axis when the grid sits inside an outer scan.
    #[serde(default)]
    pub alternate_both_axes: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl TwoAxisGridStepModel {
    /// Grid over `x_axis_name` and `y_axis_name` with the given steps.
    pub fn new(
        x_axis_name: impl Into<String>,
        y_axis_name: impl Into<String>,
        bounding_box: BoundingBox,
        x_axis_step: f64,
        y_axis_step: f64,
    ) -> Self {
        Self {
            name: "Grid".to_string(),
            x_axis_name: x_axis_name.into(),
            y_axis_name: y_axis_name.into(),
            x_axis_units: default_units(),
            y_axis_units: default_units(),
            bounding_box,
            x_axis_step,
            y_axis_step,
            orientation: Orientation::Horizontal,
            bounds_to_fit: false,
            alternating: false,
            alternate_both_axes: false,
            continuous: default_continuous(),
        }
    }

    /// Set the fast axis.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Place points at cell centres.
    pub fn with_bounds_to_fit(mut self, bounds_to_fit: bool) -> Self {
        self.bounds_to_fit = bounds_to_fit;
        self
    }

    /// Snake the fast axis.
    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    /// Convert to the equivalent point count grid.
    ///
    /// The box is trimmed to whole steps on each axis and never grows,
    /// except that a step longer than its axis yields one point on a box
    /// one step long when `bounds_to_fit` is off.
    pub fn enforce_shape(&self) -> ScanResult<TwoAxisGridPointsModel> {
        let bbox = self.bounding_box;
        let x = fit_steps(bbox.x_axis_length, self.x_axis_step, self.bounds_to_fit, &self.x_axis_name)?;
        let y = fit_steps(bbox.y_axis_length, self.y_axis_step, self.bounds_to_fit, &self.y_axis_name)?;
        Ok(TwoAxisGridPointsModel {
            name: self.name.clone(),
            x_axis_name: self.x_axis_name.clone(),
            y_axis_name: self.y_axis_name.clone(),
            x_axis_units: self.x_axis_units.clone(),
            y_axis_units: self.y_axis_units.clone(),
            bounding_box: BoundingBox::new(bbox.x_axis_start, bbox.y_axis_start, x.length, y.length),
            x_axis_points: x.points,
            y_axis_points: y.points,
            orientation: self.orientation,
            bounds_to_fit: self.bounds_to_fit,
            alternating: self.alternating,
            alternate_both_axes: self.alternate_both_axes,
            continuous: self.continuous,
        })
    }
}

impl AxisModel for TwoAxisGridStepModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.x_axis_name.clone(), self.y_axis_name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.x_axis_units.clone(), self.y_axis_units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Points along a line where both axes move together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoAxisLinePointsModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Name of the x axis.
    #[serde(default = "default_x_name")]
    pub x_axis_name: String,
    /// Name of the y axis.
    #[serde(default = "default_y_name")]
    pub y_axis_name: String,
    /// Units of the x axis.
    #[serde(default = "default_units")]
    pub x_axis_units: String,
    /// Units of the y axis.
    #[serde(default = "default_units")]
    pub y_axis_units: String,
    /// Segment to scan.
    pub bounding_line: BoundingLine,
    /// Number of points.
    pub points: usize,
    /// Place points at cell centres instead of the segment ends.
    #[serde(default)]
    pub bounds_to_fit: bool,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl TwoAxisLinePointsModel {
    /// Line over `x_axis_name` and `y_axis_name`.
    pub fn new(
        x_axis_name: impl Into<String>,
        y_axis_name: impl Into<String>,
        bounding_line: BoundingLine,
        points: usize,
    ) -> Self {
        Self {
            name: "Line".to_string(),
            x_axis_name: x_axis_name.into(),
            y_axis_name: y_axis_name.into(),
            x_axis_units: default_units(),
            y_axis_units: default_units(),
            bounding_line,
            points,
            bounds_to_fit: false,
            alternating: false,
            continuous: default_continuous(),
        }
    }

    /// Place points at cell centres.
    pub fn with_bounds_to_fit(mut self, bounds_to_fit: bool) -> Self {
        self.bounds_to_fit = bounds_to_fit;
        self
    }

    /// Point placement as distances along the line.
    pub fn span(&self) -> AxisSpan {
        AxisSpan::place(0.0, self.bounding_line.length, self.points, self.bounds_to_fit)
    }
}

impl AxisModel for TwoAxisLinePointsModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.x_axis_name.clone(), self.y_axis_name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.x_axis_units.clone(), self.y_axis_units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Points along a line at a fixed distance apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoAxisLineStepModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Name of the x axis.
    #[serde(default = "default_x_name")]
    pub x_axis_name: String,
    /// Name of the y axis.
    #[serde(default = "default_y_name")]
    pub y_axis_name: String,
    /// Units of the x axis.
    #[serde(default = "default_units")]
    pub x_axis_units: String,
    /// Units of the y axis.
    #[serde(default = "default_units")]
    pub y_axis_units: String,
    /// Segment to scan.
    pub bounding_line: BoundingLine,
    /// Distance between points along the line.
    pub step: f64,
    /// Place points at cell centres instead of the segment ends.
    #[serde(default)]
    pub bounds_to_fit: bool,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl TwoAxisLineStepModel {
    /// Line over `x_axis_name` and `y_axis_name` with the given step.
    pub fn new(
        x_axis_name: impl Into<String>,
        y_axis_name: impl Into<String>,
        bounding_line: BoundingLine,
        step: f64,
    ) -> Self {
        Self {
            name: "Line".to_string(),
            x_axis_name: x_axis_name.into(),
            y_axis_name: y_axis_name.into(),
            x_axis_units: default_units(),
            y_axis_units: default_units(),
            bounding_line,
            step,
            bounds_to_fit: false,
            alternating: false,
            continuous: default_continuous(),
        }
    }

    /// Place points at cell centres.
    pub fn with_bounds_to_fit(mut self, bounds_to_fit: bool) -> Self {
        self.bounds_to_fit = bounds_to_fit;
        self
    }

    /// Convert to the equivalent point count line.
    ///
    /// The start and angle are kept; the length is trimmed to whole steps.
    pub fn enforce_shape(&self) -> ScanResult<TwoAxisLinePointsModel> {
        if self.step.is_nan() || self.step <= 0.0 {
            return Err(ScanError::generation(format!(
                "line step must be positive, got {}",
                self.step
            )));
        }
        let line = self.bounding_line;
        let fit = fit_steps(line.length, self.step, self.bounds_to_fit, &self.name)?;
        Ok(TwoAxisLinePointsModel {
            name: self.name.clone(),
            x_axis_name: self.x_axis_name.clone(),
            y_axis_name: self.y_axis_name.clone(),
            x_axis_units: self.x_axis_units.clone(),
            y_axis_units: self.y_axis_units.clone(),
            bounding_line: BoundingLine::new(line.x_start, line.y_start, fit.length, line.angle),
            points: fit.points,
            bounds_to_fit: self.bounds_to_fit,
            alternating: self.alternating,
            continuous: self.continuous,
        })
    }
}

impl AxisModel for TwoAxisLineStepModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.x_axis_name.clone(), self.y_axis_name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.x_axis_units.clone(), self.y_axis_units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Fermat spiral filling the circle that encloses a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoAxisSpiralModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Name of the x axis.
    #[serde(default = "default_x_name")]
    pub x_axis_name: String,
    /// Name of the y axis.
    #[serde(default = "default_y_name")]
    pub y_axis_name: String,
    /// Units of the x axis.
    #[serde(default = "default_units")]
    pub x_axis_units: String,
    /// Units of the y axis.
    #[serde(default = "default_units")]
    pub y_axis_units: String,
    /// Box whose circumscribed circle the spiral fills.
    pub bounding_box: BoundingBox,
    /// Approximate distance between neighbouring points.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl TwoAxisSpiralModel {
    /// Spiral over `x_axis_name` and `y_axis_name`.
    pub fn new(x_axis_name: impl Into<String>, y_axis_name: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            name: "Spiral".to_string(),
            x_axis_name: x_axis_name.into(),
            y_axis_name: y_axis_name.into(),
            x_axis_units: default_units(),
            y_axis_units: default_units(),
            bounding_box,
            scale: default_scale(),
            alternating: false,
            continuous: default_continuous(),
        }
    }

    /// Set the point spacing scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Radius of the circle enclosing the box.
    pub fn radius(&self) -> f64 {
        let bbox = &self.bounding_box;
        (bbox.x_axis_length / 2.0).hypot(bbox.y_axis_length / 2.0)
    }
}

impl AxisModel for TwoAxisSpiralModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.x_axis_name.clone(), self.y_axis_name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.x_axis_units.clone(), self.y_axis_units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Lissajous figure inscribed in a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoAxisLissajousModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Name of the x axis.
    #[serde(default = "default_x_name")]
    pub x_axis_name: String,
    /// Name of the y axis.
    #[serde(default = "default_y_name")]
    pub y_axis_name: String,
    /// Units of the x axis.
    #[serde(default = "default_units")]
    pub x_axis_units: String,
    /// Units of the y axis.
    #[serde(default = "default_units")]
    pub y_axis_units: String,
    /// Box the figure is inscribed in.
    pub bounding_box: BoundingBox,
    /// Lobes along x; y has one more.
    #[serde(default = "default_lobes")]
    pub lobes: u32,
    /// Points around one full period.
    #[serde(default = "default_points")]
    pub points: usize,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl TwoAxisLissajousModel {
    /// Lissajous figure over `x_axis_name` and `y_axis_name`.
    pub fn new(x_axis_name: impl Into<String>, y_axis_name: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            name: "Lissajous".to_string(),
            x_axis_name: x_axis_name.into(),
            y_axis_name: y_axis_name.into(),
            x_axis_units: default_units(),
            y_axis_units: default_units(),
            bounding_box,
            lobes: default_lobes(),
            points: default_points(),
            alternating: false,
            continuous: default_continuous(),
        }
    }

    /// Set the lobe count.
    pub fn with_lobes(mut self, lobes: u32) -> Self {
        self.lobes = lobes;
        self
    }

    /// Set the point count.
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }
}

impl AxisModel for TwoAxisLissajousModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.x_axis_name.clone(), self.y_axis_name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.x_axis_units.clone(), self.y_axis_units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// A single fixed coordinate on two axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoAxisPointSingleModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Name of the x axis.
    #[serde(default = "default_x_name")]
    pub x_axis_name: String,
    /// Name of the y axis.
    #[serde(default = "default_y_name")]
    pub y_axis_name: String,
    /// Units of the x axis.
    #[serde(default = "default_units")]
    pub x_axis_units: String,
    /// Units of the y axis.
    #[serde(default = "default_units")]
    pub y_axis_units: String,
    /// x coordinate.
    pub x: f64,
    /// y coordinate.
    pub y: f64,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl TwoAxisPointSingleModel {
    /// Point at `(x, y)`.
    pub fn new(x_axis_name: impl Into<String>, y_axis_name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: "Point".to_string(),
            x_axis_name: x_axis_name.into(),
            y_axis_name: y_axis_name.into(),
            x_axis_units: default_units(),
            y_axis_units: default_units(),
            x,
            y,
            continuous: default_continuous(),
        }
    }
}

impl AxisModel for TwoAxisPointSingleModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.x_axis_name.clone(), self.y_axis_name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.x_axis_units.clone(), self.y_axis_units.clone()]
    }

    fn is_alternating(&self) -> bool {
        false
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}
