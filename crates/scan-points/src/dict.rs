//! Export dictionary.
//!
//! A generator exports its configuration as a [`CompoundDict`]: the list of
//! trajectory parameter sets (outermost first), the excluders derived from
//! its regions, its mutators, and the duration and continuity flags. Groups
//! nest their components with their own generators and excluders. The
//! structure serializes to JSON with `serde_json` and rebuilds a generator
//! producing the same points.
//!
//! # Example
//!
//! ```rust,ignore
//! let dict = generator.to_dict()?;
//! let json = dict.to_json_string()?;
//! let rebuilt = service.generator_from_dict(&CompoundDict::from_json_str(&json)?)?;
//! assert_eq!(rebuilt.size(), generator.size());
//! ```

use crate::config::GeneratorSettings;
use crate::dimension::{Dimension, DimensionSource, Odometer};
use crate::generator::build::edges_from_params;
use crate::mask::apply_regions;
use crate::mutator::dedup_mutators;
use crate::space::{PointSpace, SpaceParts};
use crate::trajectory::{TrajectoryParams, TrajectoryRegistry};
use scan_core::error::{ScanError, ScanResult};
use scan_core::model::{MutatorModel, RandomOffsetMutator};
use scan_core::region::{RegionShape, ScanRegion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type id of the top-level dictionary.
pub const COMPOUND_TYPEID: &str = "scanpointgenerator:generator/CompoundGenerator:1.0";

/// Type id of a region excluder.
pub const EXCLUDER_TYPEID: &str = "scanpointgenerator:excluder/ROIExcluder:1.0";

fn compound_typeid() -> String {
    COMPOUND_TYPEID.to_string()
}

fn excluder_typeid() -> String {
    EXCLUDER_TYPEID.to_string()
}

fn unset_duration() -> f64 {
    -1.0
}

fn default_continuous() -> bool {
    true
}

/// Top-level export of a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundDict {
    /// Always [`COMPOUND_TYPEID`].
    #[serde(default = "compound_typeid")]
    pub typeid: String,
    /// Generators, outermost first.
    pub generators: Vec<GeneratorDict>,
    /// Regions applied across the generators.
    #[serde(default)]
    pub excluders: Vec<ExcluderDict>,
    /// Mutators, in application order.
    #[serde(default)]
    pub mutators: Vec<MutatorDict>,
    /// Exposure per point, `-1` when unset.
    #[serde(default = "unset_duration")]
    pub duration: f64,
    /// Delay after each point.
    #[serde(default)]
    pub delay_after: f64,
    /// Continuous motion flag.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
    /// Axis order of the positions. Empty means generator order.
    #[serde(default)]
    pub axes: Vec<String>,
}

/// One entry of a generator list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratorDict {
    /// A trajectory with its numeric parameters.
    Trajectory(TrajectoryParams),
    /// A concurrent or consecutive group.
    Group(GroupDict),
}

/// Nested group of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typeid")]
pub enum GroupDict {
    /// Components advanced together.
    #[serde(rename = "scanpointgenerator:generator/ConcurrentGenerator:1.0")]
    Concurrent {
        /// Components, each moving its own axes.
        components: Vec<ComponentDict>,
    },
    /// Components visited one after another.
    #[serde(rename = "scanpointgenerator:generator/ConcatGenerator:1.0")]
    Consecutive {
        /// Components in visiting order.
        components: Vec<ComponentDict>,
        /// Reverse on every other pass of the enclosing scan.
        #[serde(default)]
        alternate: bool,
    },
}

/// Generators and excluders of one group component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDict {
    /// Generators, outermost first.
    pub generators: Vec<GeneratorDict>,
    /// Regions applied within the component.
    #[serde(default)]
    pub excluders: Vec<ExcluderDict>,
}

/// Regions applied to a list of axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcluderDict {
    /// Always [`EXCLUDER_TYPEID`].
    #[serde(default = "excluder_typeid")]
    pub typeid: String,
    /// Axes in region coordinate order.
    pub axes: Vec<String>,
    /// Region geometries.
    pub rois: Vec<RegionShape>,
}

/// Exported mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typeid")]
pub enum MutatorDict {
    /// See [`RandomOffsetMutator`].
    #[serde(rename = "scanpointgenerator:mutator/RandomOffsetMutator:1.0")]
    RandomOffset {
        /// Stream seed.
        seed: u64,
        /// Perturbed axes.
        axes: Vec<String>,
        /// Largest offset per axis.
        max_offset: BTreeMap<String, f64>,
    },
}

impl From<&MutatorModel> for MutatorDict {
    fn from(mutator: &MutatorModel) -> Self {
        match mutator {
            MutatorModel::RandomOffset(m) => Self::RandomOffset {
                seed: m.seed,
                axes: m.axes.clone(),
                max_offset: m.max_offset.clone(),
            },
        }
    }
}

impl From<&MutatorDict> for MutatorModel {
    fn from(dict: &MutatorDict) -> Self {
        match dict {
            MutatorDict::RandomOffset {
                seed,
                axes,
                max_offset,
            } => RandomOffsetMutator {
                seed: *seed,
                axes: axes.clone(),
                max_offset: max_offset.clone(),
            }
            .into(),
        }
    }
}

impl ExcluderDict {
    fn from_region(region: &ScanRegion) -> ScanResult<Self> {
        if matches!(region.shape, RegionShape::Custom(_)) {
            return Err(ScanError::validation(format!(
                "custom region over {:?} cannot be exported",
                region.axes
            )));
        }
        Ok(Self {
            typeid: excluder_typeid(),
            axes: region.axes.clone(),
            rois: vec![region.shape.clone()],
        })
    }

    fn regions(&self) -> impl Iterator<Item = ScanRegion> + '_ {
        self.rois
            .iter()
            .map(|roi| ScanRegion::new(roi.clone(), self.axes.iter().cloned()))
    }
}

impl CompoundDict {
    /// Serialize to a JSON value.
    pub fn to_json(&self) -> ScanResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serialize to a JSON string.
    pub fn to_json_string(&self) -> ScanResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from a JSON value.
    pub fn from_json(value: serde_json::Value) -> ScanResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse from a JSON string.
    pub fn from_json_str(text: &str) -> ScanResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Export a built space.
pub fn export(space: &PointSpace) -> ScanResult<CompoundDict> {
    let mut excluders = Vec::new();
    let generators = export_dims(space.dims(), &mut excluders)?;
    Ok(CompoundDict {
        typeid: compound_typeid(),
        generators,
        excluders,
        mutators: space.mutators().iter().map(MutatorDict::from).collect(),
        duration: space.duration().unwrap_or_else(unset_duration),
        delay_after: 0.0,
        continuous: space.is_continuous(),
        axes: space.axes().to_vec(),
    })
}

fn export_dims(dims: &[Dimension], excluders: &mut Vec<ExcluderDict>) -> ScanResult<Vec<GeneratorDict>> {
    let mut generators = Vec::with_capacity(dims.len());
    for dim in dims {
        match dim.source() {
            DimensionSource::Trajectory { params, .. } => {
                generators.push(GeneratorDict::Trajectory(params.clone()));
            }
            DimensionSource::Masked { inner, regions, .. } => {
                generators.extend(export_dims(inner.dims(), excluders)?);
                for region in regions {
                    excluders.push(ExcluderDict::from_region(region)?);
                }
            }
            DimensionSource::Concurrent { parts } => {
                generators.push(GeneratorDict::Group(GroupDict::Concurrent {
                    components: export_components(parts)?,
                }));
            }
            DimensionSource::Consecutive { parts, .. } => {
                generators.push(GeneratorDict::Group(GroupDict::Consecutive {
                    components: export_components(parts)?,
                    alternate: dim.alternate(),
                }));
            }
        }
    }
    Ok(generators)
}

fn export_components(parts: &[Odometer]) -> ScanResult<Vec<ComponentDict>> {
    parts
        .iter()
        .map(|part| {
            let mut excluders = Vec::new();
            let generators = export_dims(part.dims(), &mut excluders)?;
            Ok(ComponentDict {
                generators,
                excluders,
            })
        })
        .collect()
}

/// Rebuild the space a dictionary describes.
pub fn rebuild(
    dict: &CompoundDict,
    trajectories: &TrajectoryRegistry,
    settings: &GeneratorSettings,
) -> ScanResult<PointSpace> {
    if dict.typeid != COMPOUND_TYPEID {
        return Err(ScanError::validation(format!(
            "expected a '{COMPOUND_TYPEID}' dictionary, got '{}'",
            dict.typeid
        )));
    }
    let dims = rebuild_dims(&dict.generators, &dict.excluders, trajectories, settings)?;
    let axes = if dict.axes.is_empty() {
        dims.iter().flat_map(|d| d.axes().to_vec()).collect()
    } else {
        dict.axes.clone()
    };
    let edges = match dims.last().map(Dimension::source) {
        Some(DimensionSource::Trajectory { params, .. }) => edges_from_params(params),
        _ => Vec::new(),
    };
    let duration = (dict.duration >= 0.0).then_some(dict.duration);
    PointSpace::new(SpaceParts {
        dims,
        axes,
        mutators: dedup_mutators(dict.mutators.iter().map(MutatorModel::from)),
        duration,
        continuous: dict.continuous,
        edges,
        max_materialized: settings.max_materialized_points,
    })
}

fn rebuild_dims(
    generators: &[GeneratorDict],
    excluders: &[ExcluderDict],
    trajectories: &TrajectoryRegistry,
    settings: &GeneratorSettings,
) -> ScanResult<Vec<Dimension>> {
    let component = |c: &ComponentDict| {
        Odometer::new(rebuild_dims(
            &c.generators,
            &c.excluders,
            trajectories,
            settings,
        )?)
    };
    let dims = generators
        .iter()
        .map(|generator| match generator {
            GeneratorDict::Trajectory(params) => {
                let trajectory = trajectories.create(params)?;
                Ok(Dimension::trajectory(trajectory, params.clone()))
            }
            GeneratorDict::Group(GroupDict::Concurrent { components }) => {
                let parts = components.iter().map(&component).collect::<ScanResult<_>>()?;
                Dimension::concurrent(parts)
            }
            GeneratorDict::Group(GroupDict::Consecutive {
                components,
                alternate,
            }) => {
                let parts = components.iter().map(&component).collect::<ScanResult<_>>()?;
                Dimension::consecutive(parts, *alternate)
            }
        })
        .collect::<ScanResult<Vec<_>>>()?;
    let regions: Vec<ScanRegion> = excluders.iter().flat_map(ExcluderDict::regions).collect();
    apply_regions(dims, &regions, settings.max_mask_evaluations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::PointGenerator;
    use crate::service::PointGeneratorService;
    use scan_core::model::{
        AxialStepModel, BoundingBox, CompoundModel, ConcurrentModel, TwoAxisGridPointsModel,
    };

    #[test]
    fn test_defaults_when_parsing() {
        let text = r#"{
            "generators": [{
                "typeid": "scanpointgenerator:generator/LineGenerator:1.0",
                "axes": ["x"], "units": ["mm"], "start": [0.0], "stop": [1.0], "size": 3
            }]
        }"#;
        let dict = CompoundDict::from_json_str(text).unwrap();
        assert_eq!(dict.typeid, COMPOUND_TYPEID);
        assert_eq!(dict.duration, -1.0);
        assert!(dict.excluders.is_empty());
        assert!(dict.mutators.is_empty());
        assert!(dict.continuous);
    }

    #[test]
    fn test_export_lists_outer_first() {
        let model = CompoundModel::default()
            .with_model(AxialStepModel::new("T", 290.0, 291.0, 1.0))
            .with_model(TwoAxisGridPointsModel::new(
                "x",
                "y",
                BoundingBox::new(0.0, 0.0, 1.0, 1.0),
                2,
                2,
            ));
        let dict = PointGeneratorService::default()
            .create_compound_generator(&model)
            .unwrap()
            .to_dict()
            .unwrap();
        let axes: Vec<Vec<String>> = dict
            .generators
            .iter()
            .map(|g| match g {
                GeneratorDict::Trajectory(p) => p.axes().to_vec(),
                GeneratorDict::Group(_) => Vec::new(),
            })
            .collect();
        assert_eq!(axes, vec![vec!["T"], vec!["y"], vec!["x"]]);
        assert_eq!(dict.axes, vec!["T", "x", "y"]);
    }

    #[test]
    fn test_groups_survive_json() {
        let model = ConcurrentModel::new(vec![
            AxialStepModel::new("x", 0.0, 4.0, 1.0).into(),
            AxialStepModel::new("y", 10.0, 14.0, 1.0).into(),
        ]);
        let service = PointGeneratorService::default();
        let generator = service.create_generator(&model.into()).unwrap();
        let json = generator.to_dict().unwrap().to_json().unwrap();
        assert_eq!(
            json["generators"][0]["typeid"],
            "scanpointgenerator:generator/ConcurrentGenerator:1.0"
        );
        let rebuilt = service
            .generator_from_dict(&CompoundDict::from_json(json).unwrap())
            .unwrap();
        assert_eq!(rebuilt.size(), 5);
        assert_eq!(rebuilt.position_at(3).unwrap().get("y"), Some(13.0));
    }

    #[test]
    fn test_unknown_typeid_rejected() {
        let mut dict = PointGeneratorService::default()
            .create_generator(&AxialStepModel::new("x", 0.0, 1.0, 1.0).into())
            .unwrap()
            .to_dict()
            .unwrap();
        dict.typeid = "something/else".to_string();
        assert!(PointGeneratorService::default()
            .generator_from_dict(&dict)
            .unwrap_err()
            .is_validation());
    }
}
