//! Region masking over dimensions.
//!
//! Each region constrains one or two named axes. The dimensions writing
//! those axes form a contiguous range of the odometer; overlapping ranges are
//! merged into one group so that regions sharing axes are evaluated together
//! (logical AND), while regions on disjoint groups mask independently.
//!
//! For every group the sub-space is enumerated once, when the generator is
//! built, and the surviving flat indices are stored. The group then either
//! stays as it was (every point survives and every region is an axis-aligned
//! box) or collapses into a single masked dimension of rank 1.

use crate::dimension::{Dimension, Layout, Odometer};
use scan_core::error::{ScanError, ScanResult};
use scan_core::region::{Roi, ScanRegion};
use std::ops::Range;
use tracing::debug;

/// Fill in the axes of a region declared without any.
///
/// Such a region applies to `default_axes`, which must name exactly two
/// axes (the two axes of a two-axis model).
pub fn resolve_region_axes(region: &ScanRegion, default_axes: &[String]) -> ScanResult<ScanRegion> {
    if !region.axes.is_empty() {
        return Ok(region.clone());
    }
    if default_axes.len() != 2 {
        return Err(ScanError::validation(format!(
            "{} region declares no axes and the innermost component moves {:?}, not two axes",
            region.shape.kind(),
            default_axes
        )));
    }
    Ok(ScanRegion::new(region.shape.clone(), default_axes.iter().cloned()))
}

/// Check a resolved region against the axes of a scan.
pub fn check_region_axes(region: &ScanRegion, known_axes: &[String]) -> ScanResult<()> {
    let kind = region.shape.kind();
    if region.axes.is_empty() {
        return Err(ScanError::validation(format!("{kind} region declares no axes")));
    }
    if region.axes.len() != region.shape.dimensions() {
        return Err(ScanError::validation(format!(
            "{kind} region constrains {} axes but was given {:?}",
            region.shape.dimensions(),
            region.axes
        )));
    }
    for (i, axis) in region.axes.iter().enumerate() {
        if region.axes[..i].contains(axis) {
            return Err(ScanError::validation(format!(
                "{kind} region names axis '{axis}' twice"
            )));
        }
        if !known_axes.contains(axis) {
            return Err(ScanError::validation(format!(
                "{kind} region names unknown axis '{axis}'"
            )));
        }
    }
    Ok(())
}

struct Group {
    dims: Range<usize>,
    regions: Vec<ScanRegion>,
}

/// Apply `regions` to `dims`, outermost first.
///
/// Regions must already carry their axes. Returns the dimensions with every
/// masked group replaced.
pub fn apply_regions(
    dims: Vec<Dimension>,
    regions: &[ScanRegion],
    max_evaluations: usize,
) -> ScanResult<Vec<Dimension>> {
    if regions.is_empty() {
        return Ok(dims);
    }
    let known: Vec<String> = dims.iter().flat_map(|d| d.axes().iter().cloned()).collect();

    let mut ranges: Vec<(Range<usize>, &ScanRegion)> = Vec::with_capacity(regions.len());
    for region in regions {
        check_region_axes(region, &known)?;
        let positions: Vec<usize> = region
            .axes
            .iter()
            .filter_map(|axis| dims.iter().position(|d| d.axes().contains(axis)))
            .collect();
        let first = positions.iter().copied().min().unwrap_or(0);
        let last = positions.iter().copied().max().unwrap_or(0);
        ranges.push((first..last + 1, region));
    }
    ranges.sort_by_key(|(range, _)| range.start);

    let mut groups: Vec<Group> = Vec::new();
    for (range, region) in ranges {
        match groups.last_mut() {
            Some(group) if range.start < group.dims.end => {
                group.dims.end = group.dims.end.max(range.end);
                group.regions.push(region.clone());
            }
            _ => groups.push(Group {
                dims: range,
                regions: vec![region.clone()],
            }),
        }
    }

    let mut out = Vec::with_capacity(dims.len());
    let mut rest = dims.into_iter().enumerate().peekable();
    for group in groups {
        while let Some((_, dim)) = rest.next_if(|(k, _)| *k < group.dims.start) {
            out.push(dim);
        }
        let mut members = Vec::with_capacity(group.dims.len());
        while let Some((_, dim)) = rest.next_if(|(k, _)| group.dims.contains(k)) {
            members.push(dim);
        }
        out.extend(mask_group(members, group.regions, max_evaluations)?);
    }
    out.extend(rest.map(|(_, dim)| dim));
    Ok(out)
}

fn mask_group(
    dims: Vec<Dimension>,
    regions: Vec<ScanRegion>,
    max_evaluations: usize,
) -> ScanResult<Vec<Dimension>> {
    let alternate = dims.first().is_some_and(Dimension::alternate);
    let mut inner = Odometer::new(dims)?;
    let total = inner.len();
    if total > max_evaluations {
        return Err(ScanError::generation(format!(
            "masking {total} points exceeds the limit of {max_evaluations} evaluations"
        )));
    }

    let axes = inner.axes();
    let layout = Layout::new(&axes)?;
    inner.bind(&layout)?;
    let slots: Vec<Vec<usize>> = regions
        .iter()
        .map(|r| r.axes.iter().filter_map(|a| layout.slot(a)).collect())
        .collect();

    let mut values = vec![0.0; layout.len()];
    let mut indices = vec![0; layout.len()];
    let mut coords = Vec::with_capacity(2);
    let mut surviving = Vec::new();
    for flat in 0..total {
        inner.write(flat, &mut values, &mut indices);
        let inside = regions.iter().zip(&slots).all(|(region, slots)| {
            coords.clear();
            coords.extend(slots.iter().map(|&s| values[s]));
            region.contains(&coords)
        });
        if inside {
            surviving.push(flat);
        }
    }

    if surviving.is_empty() {
        return Err(ScanError::generation(format!(
            "regions over {axes:?} exclude every point"
        )));
    }

    if surviving.len() == total && regions.iter().all(|r| r.shape.is_axis_aligned()) {
        debug!(axes = ?axes, points = total, "Regions keep every point, mask is identity");
        return Ok(inner.into_dims());
    }

    debug!(
        axes = ?axes,
        points = total,
        surviving = surviving.len(),
        "Collapsed masked dimensions"
    );
    Ok(vec![Dimension::masked(inner, surviving, regions, alternate)])
}
