//! Generator factory.
//!
//! [`PointGeneratorService`] is the entry point for callers: it validates a
//! model, builds its point space and wraps it in the matching generator
//! kind. The validator and trajectory registry are injected, so hosts can
//! add trajectory providers or stricter checks without touching the engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use scan_core::model::{AxialStepModel, CompoundModel};
//! use scan_points::service::PointGeneratorService;
//!
//! let service = PointGeneratorService::default();
//! let model = CompoundModel::default()
//!     .with_model(AxialStepModel::new("Temperature", 290.0, 295.0, 1.0))
//!     .with_model(AxialStepModel::new("Position", 1.0, 4.0, 0.6));
//! let generator = service.create_compound_generator(&model)?;
//! assert_eq!(generator.size(), 36);
//! ```

use crate::config::{GeneratorSettings, PointsConfig};
use crate::dict::{self, CompoundDict};
use crate::generator::{
    build::combine, AxisGenerator, CompoundGenerator, MultiModelGenerator, PointGenerator,
    RegionMaskedGenerator, SpaceBuilder,
};
use crate::info::ScanInformation;
use crate::space::PointSpace;
use crate::trajectory::TrajectoryRegistry;
use crate::validator::{DefaultValidator, ModelValidator};
use scan_core::error::{ScanError, ScanResult};
use scan_core::model::{CompoundModel, ScanModel};
use scan_core::region::ScanRegion;
use std::sync::Arc;
use tracing::{info, instrument};

/// Validates models and creates generators from them.
#[derive(Debug, Clone)]
pub struct PointGeneratorService {
    validator: Arc<dyn ModelValidator>,
    trajectories: Arc<TrajectoryRegistry>,
    settings: GeneratorSettings,
}

impl Default for PointGeneratorService {
    fn default() -> Self {
        Self::new(
            Arc::new(DefaultValidator),
            Arc::new(TrajectoryRegistry::native()),
            GeneratorSettings::default(),
        )
    }
}

impl PointGeneratorService {
    /// Service from explicit parts.
    pub fn new(
        validator: Arc<dyn ModelValidator>,
        trajectories: Arc<TrajectoryRegistry>,
        settings: GeneratorSettings,
    ) -> Self {
        Self {
            validator,
            trajectories,
            settings,
        }
    }

    /// Service with the native trajectories and limits from `config`.
    pub fn from_config(config: &PointsConfig) -> Self {
        Self::default().with_settings(config.generator.clone())
    }

    /// Replace the generator limits.
    pub fn with_settings(mut self, settings: GeneratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the trajectory registry.
    pub fn with_trajectories(mut self, trajectories: Arc<TrajectoryRegistry>) -> Self {
        self.trajectories = trajectories;
        self
    }

    /// Replace the validator.
    pub fn with_validator(mut self, validator: Arc<dyn ModelValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Generator limits in use.
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Registry used to build trajectories.
    pub fn trajectories(&self) -> &TrajectoryRegistry {
        &self.trajectories
    }

    fn builder(&self) -> SpaceBuilder<'_> {
        SpaceBuilder::new(&self.trajectories, &self.settings)
    }

    /// Run the configured validator over `model`.
    pub fn validate(&self, model: &ScanModel) -> ScanResult<()> {
        self.validator.validate(model)
    }

    /// Generator of the kind matching `model`.
    #[instrument(skip_all, fields(kind = model.kind()), err)]
    pub fn create_generator(&self, model: &ScanModel) -> ScanResult<Box<dyn PointGenerator>> {
        self.validate(model)?;
        let builder = self.builder();
        let generator: Box<dyn PointGenerator> = match model {
            ScanModel::Concurrent(_) | ScanModel::Consecutive(_) => Box::new(
                MultiModelGenerator::new(model.clone(), builder.space(model)?),
            ),
            ScanModel::Compound(m) => {
                Box::new(CompoundGenerator::new(Some(m.clone()), builder.compound(m)?))
            }
            _ => Box::new(AxisGenerator::new(model.clone(), builder.atomic(model)?)),
        };
        info!(
            size = generator.size(),
            rank = generator.rank(),
            "Created point generator"
        );
        Ok(generator)
    }

    /// Generator over a single atomic model.
    pub fn create_axis_generator(&self, model: &ScanModel) -> ScanResult<AxisGenerator> {
        if matches!(
            model,
            ScanModel::Concurrent(_) | ScanModel::Consecutive(_) | ScanModel::Compound(_)
        ) {
            return Err(ScanError::validation(format!(
                "{} model is not an axis model",
                model.kind()
            )));
        }
        self.validate(model)?;
        Ok(AxisGenerator::new(model.clone(), self.builder().atomic(model)?))
    }

    /// `model` restricted to the points inside every region.
    #[instrument(skip_all, fields(kind = model.kind(), regions = regions.len()), err)]
    pub fn create_masked_generator(
        &self,
        model: &ScanModel,
        regions: &[ScanRegion],
    ) -> ScanResult<RegionMaskedGenerator> {
        let mut compound = CompoundModel::new(vec![model.clone()]);
        compound.regions = regions.to_vec();
        self.validate(&compound.clone().into())?;
        let space = self.builder().compound(&compound)?;
        let generator = RegionMaskedGenerator::new(model.clone(), regions.to_vec(), space);
        info!(size = generator.size(), "Created masked generator");
        Ok(generator)
    }

    /// Nested generator over the components of `model`.
    #[instrument(skip_all, fields(components = model.models.len()), err)]
    pub fn create_compound_generator(&self, model: &CompoundModel) -> ScanResult<CompoundGenerator> {
        self.validate(&model.clone().into())?;
        let generator = CompoundGenerator::new(Some(model.clone()), self.builder().compound(model)?);
        info!(
            size = generator.size(),
            rank = generator.rank(),
            "Created compound generator"
        );
        Ok(generator)
    }

    /// Nest already-built generators, outermost first.
    ///
    /// The result keeps a model only when every component has one.
    pub fn compound_generators(
        &self,
        generators: &[&dyn PointGenerator],
    ) -> ScanResult<CompoundGenerator> {
        let spaces: Vec<Arc<PointSpace>> = generators.iter().map(|g| Arc::clone(g.space())).collect();
        let space = combine(&spaces, &[], &[], None, &self.settings)?;
        let model = generators
            .iter()
            .map(|g| g.model())
            .collect::<Option<Vec<_>>>()
            .map(CompoundModel::new);
        Ok(CompoundGenerator::new(model, space))
    }

    /// Rebuild a generator from an exported dictionary.
    #[instrument(skip_all, err)]
    pub fn generator_from_dict(&self, dict: &CompoundDict) -> ScanResult<CompoundGenerator> {
        let space = dict::rebuild(dict, &self.trajectories, &self.settings)?;
        let generator = CompoundGenerator::new(None, space);
        info!(size = generator.size(), "Rebuilt generator from dictionary");
        Ok(generator)
    }

    /// Rank, shape and size of `model` without iterating its points.
    pub fn scan_info(&self, model: &ScanModel) -> ScanResult<ScanInformation> {
        self.validate(model)?;
        Ok(ScanInformation::from_space(&self.builder().space(model)?))
    }
}
