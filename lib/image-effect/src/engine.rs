//! Rendering engine seam.
//!
//! The application only ever talks to [`RenderEngine`]: it asks which
//! parameter roles a filter exposes and then hands over one parameter set per
//! render. [`CpuEngine`] is the in-process implementation backed by the
//! effect configs of this crate.

use crate::{
    Effect, ImageEffect, ImageEffectError, ImageEffectResult,
    blur_effect::{GaussianBlurConfig, UnsharpMaskConfig},
    filter_effect::{SepiaConfig, VignetteConfig},
    params::{FilterKind, FilterParams, ParamRole, ParamRoles},
    stylized_effect::{CrystallizeConfig, EdgesConfig, PixellateConfig},
};
use image::RgbaImage;

pub trait RenderEngine {
    /// Roles the filter accepts, queried before every render.
    fn parameter_roles(&self, kind: FilterKind) -> ParamRoles;

    /// Renders `source` through `kind`. `None` means the engine produced no output.
    fn execute(&self, kind: FilterKind, source: &RgbaImage, params: &FilterParams)
    -> Option<RgbaImage>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CpuEngine;

impl CpuEngine {
    pub fn new() -> Self {
        Self
    }

    /// Builds the effect for `kind`, overriding defaults with whatever `params` carries.
    pub fn effect(&self, kind: FilterKind, params: &FilterParams) -> ImageEffect {
        let intensity = params.get(ParamRole::Intensity);
        let radius = params.get(ParamRole::Radius);
        let scale = params.get(ParamRole::Scale);

        match kind {
            FilterKind::Crystallize => {
                let mut config = CrystallizeConfig::new();
                if let Some(radius) = radius {
                    config = config.with_radius(radius);
                }
                ImageEffect::Crystallize(config)
            }
            FilterKind::Edges => {
                let mut config = EdgesConfig::new();
                if let Some(intensity) = intensity {
                    config = config.with_intensity(intensity);
                }
                ImageEffect::Edges(config)
            }
            FilterKind::GaussianBlur => {
                let mut config = GaussianBlurConfig::new();
                if let Some(radius) = radius {
                    config = config.with_radius(radius);
                }
                ImageEffect::GaussianBlur(config)
            }
            FilterKind::Pixellate => {
                let mut config = PixellateConfig::new();
                if let Some(scale) = scale {
                    config = config.with_scale(scale);
                }
                ImageEffect::Pixellate(config)
            }
            FilterKind::SepiaTone => {
                let mut config = SepiaConfig::new();
                if let Some(intensity) = intensity {
                    config = config.with_intensity(intensity);
                }
                ImageEffect::Sepia(config)
            }
            FilterKind::UnsharpMask => {
                let mut config = UnsharpMaskConfig::new();
                if let Some(radius) = radius {
                    config = config.with_radius(radius);
                }
                if let Some(intensity) = intensity {
                    config = config.with_intensity(intensity);
                }
                ImageEffect::UnsharpMask(config)
            }
            FilterKind::Vignette => {
                let mut config = VignetteConfig::new();
                if let Some(radius) = radius {
                    config = config.with_radius(radius);
                }
                if let Some(intensity) = intensity {
                    config = config.with_intensity(intensity);
                }
                ImageEffect::Vignette(config)
            }
        }
    }

    pub fn render(
        &self,
        kind: FilterKind,
        source: &RgbaImage,
        params: &FilterParams,
    ) -> ImageEffectResult<RgbaImage> {
        if source.width() == 0 || source.height() == 0 {
            return Err(ImageEffectError::EmptyImage(source.width(), source.height()));
        }

        let supported = self.parameter_roles(kind);
        if let Some(role) = params.roles().iter().find(|role| !supported.contains(*role)) {
            return Err(ImageEffectError::InvalidParameter(format!(
                "{kind} has no {role} parameter"
            )));
        }

        let mut output = source.clone();
        self.effect(kind, params).apply(&mut output)?;
        Ok(output)
    }
}

impl RenderEngine for CpuEngine {
    fn parameter_roles(&self, kind: FilterKind) -> ParamRoles {
        let roles = ParamRoles::empty();
        match kind {
            FilterKind::Crystallize => roles.with(ParamRole::Radius),
            FilterKind::Edges => roles.with(ParamRole::Intensity),
            FilterKind::GaussianBlur => roles.with(ParamRole::Radius),
            FilterKind::Pixellate => roles.with(ParamRole::Scale),
            FilterKind::SepiaTone => roles.with(ParamRole::Intensity),
            FilterKind::UnsharpMask => roles.with(ParamRole::Radius).with(ParamRole::Intensity),
            FilterKind::Vignette => roles.with(ParamRole::Intensity).with(ParamRole::Radius),
        }
    }

    fn execute(
        &self,
        kind: FilterKind,
        source: &RgbaImage,
        params: &FilterParams,
    ) -> Option<RgbaImage> {
        match self.render(kind, source, params) {
            Ok(output) => Some(output),
            Err(e) => {
                log::warn!("render {kind} failed: {e}");
                None
            }
        }
    }
}
