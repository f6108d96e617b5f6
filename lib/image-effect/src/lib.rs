pub mod blur_effect;
pub mod engine;
pub mod filter_effect;
pub mod params;
pub mod stylized_effect;

pub use engine::{CpuEngine, RenderEngine};
pub use params::{FilterKind, FilterParams, ParamRole, ParamRoles};

use image::RgbaImage;

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Empty image: {0}x{1}")]
    EmptyImage(u32, u32),
}

pub trait Effect {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()>;
}

#[derive(Debug, Clone)]
pub enum ImageEffect {
    // Blur effects
    GaussianBlur(blur_effect::GaussianBlurConfig),
    UnsharpMask(blur_effect::UnsharpMaskConfig),

    // Filter effects
    Sepia(filter_effect::SepiaConfig),
    Vignette(filter_effect::VignetteConfig),

    // Stylized effects
    Crystallize(stylized_effect::CrystallizeConfig),
    Edges(stylized_effect::EdgesConfig),
    Pixellate(stylized_effect::PixellateConfig),
}

impl Effect for ImageEffect {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        match self {
            ImageEffect::GaussianBlur(config) => config.apply(image),
            ImageEffect::UnsharpMask(config) => config.apply(image),

            ImageEffect::Sepia(config) => config.apply(image),
            ImageEffect::Vignette(config) => config.apply(image),

            ImageEffect::Crystallize(config) => config.apply(image),
            ImageEffect::Edges(config) => config.apply(image),
            ImageEffect::Pixellate(config) => config.apply(image),
        }
    }
}

/// Rejects negative and non-finite parameter values before they reach a kernel.
pub(crate) fn check_param(name: &str, value: f32) -> ImageEffectResult<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ImageEffectError::InvalidParameter(format!(
            "{name} must be a finite non-negative number, got {value}"
        )))
    }
}
