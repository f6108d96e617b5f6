use crate::{Effect, ImageEffectResult, check_param};
use derivative::Derivative;
use derive_setters::Setters;
use image::{
    RgbaImage,
    imageops::{self, FilterType},
};
use rayon::prelude::*;

/// Gaussian blur configuration
///
/// `radius` is used as the standard deviation of the kernel.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianBlurConfig {
    #[derivative(Default(value = "10.0"))]
    pub radius: f32,
}

impl GaussianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for GaussianBlurConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        let radius = check_param("radius", self.radius)?;
        if let Some(blurred) = gaussian(image, radius) {
            *image = blurred;
        }

        Ok(())
    }
}

/// Unsharp mask configuration
///
/// Adds back `intensity` times the difference between the image and its
/// gaussian blur of the given `radius`.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct UnsharpMaskConfig {
    #[derivative(Default(value = "2.5"))]
    pub radius: f32,

    #[derivative(Default(value = "0.5"))]
    pub intensity: f32,
}

impl UnsharpMaskConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for UnsharpMaskConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        let radius = check_param("radius", self.radius)?;
        let intensity = check_param("intensity", self.intensity)?;

        let Some(blurred) = gaussian(image, radius) else {
            return Ok(());
        };

        image
            .par_chunks_exact_mut(4)
            .zip(blurred.par_chunks_exact(4))
            .for_each(|(pixel, soft)| {
                for c in 0..3 {
                    let orig = pixel[c] as f32;
                    let detail = orig - soft[c] as f32;
                    pixel[c] = (orig + intensity * detail).round().clamp(0.0, 255.0) as u8;
                }
            });

        Ok(())
    }
}

/// Largest sigma blurred at full resolution.
const MAX_DIRECT_SIGMA: f32 = 8.0;

/// Blurs with the given sigma, `None` when the blur would be a no-op.
///
/// Wide blurs run on a copy shrunk so the remaining sigma stays under
/// `MAX_DIRECT_SIGMA`, then get scaled back up.
fn gaussian(image: &RgbaImage, sigma: f32) -> Option<RgbaImage> {
    // imageproc panics on a non-positive sigma
    if sigma <= 0.0 || image.width() == 0 || image.height() == 0 {
        return None;
    }

    if sigma <= MAX_DIRECT_SIGMA {
        return Some(imageproc::filter::gaussian_blur_f32(image, sigma));
    }

    let (width, height) = image.dimensions();
    let factor = (sigma / MAX_DIRECT_SIGMA).ceil();
    let small_width = ((width as f32 / factor).round() as u32).max(1);
    let small_height = ((height as f32 / factor).round() as u32).max(1);

    let small = imageops::resize(image, small_width, small_height, FilterType::Triangle);
    let blurred = imageproc::filter::gaussian_blur_f32(&small, sigma / factor);
    Some(imageops::resize(&blurred, width, height, FilterType::Triangle))
}
