use crate::{Effect, ImageEffectResult, check_param};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use rayon::prelude::*;

/// Sepia tone configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SepiaConfig {
    #[derivative(Default(value = "1.0"))]
    pub intensity: f32,
}

impl SepiaConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for SepiaConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        let intensity = check_param("intensity", self.intensity)?.min(1.0);

        image.par_chunks_exact_mut(4).for_each(|pixel| {
            let r = pixel[0] as f32;
            let g = pixel[1] as f32;
            let b = pixel[2] as f32;

            let tr = (0.393 * r + 0.769 * g + 0.189 * b).min(255.0);
            let tg = (0.349 * r + 0.686 * g + 0.168 * b).min(255.0);
            let tb = (0.272 * r + 0.534 * g + 0.131 * b).min(255.0);

            pixel[0] = (r * (1.0 - intensity) + tr * intensity).round() as u8;
            pixel[1] = (g * (1.0 - intensity) + tg * intensity).round() as u8;
            pixel[2] = (b * (1.0 - intensity) + tb * intensity).round() as u8;
        });

        Ok(())
    }
}

/// Vignette configuration
///
/// `radius` is the reach of the falloff in percent of the centre-to-corner
/// distance, `intensity` the darkening applied at the edge of that reach.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct VignetteConfig {
    #[derivative(Default(value = "0.0"))]
    pub intensity: f32,

    #[derivative(Default(value = "1.0"))]
    pub radius: f32,
}

impl VignetteConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for VignetteConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        let intensity = check_param("intensity", self.intensity)?.min(1.0);
        let reach = (check_param("radius", self.radius)? / 100.0).max(f32::EPSILON);

        if intensity == 0.0 || image.width() == 0 {
            return Ok(());
        }

        let width = image.width() as usize;
        let center_x = image.width() as f32 / 2.0;
        let center_y = image.height() as f32 / 2.0;
        let max_distance = (center_x * center_x + center_y * center_y)
            .sqrt()
            .max(f32::EPSILON);

        image
            .par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let dx = x as f32 + 0.5 - center_x;
                    let dy = y as f32 + 0.5 - center_y;
                    let distance = (dx * dx + dy * dy).sqrt() / max_distance;

                    let falloff = (distance / reach).min(1.0);
                    let factor = 1.0 - intensity * falloff * falloff;

                    pixel[0] = (pixel[0] as f32 * factor).round() as u8;
                    pixel[1] = (pixel[1] as f32 * factor).round() as u8;
                    pixel[2] = (pixel[2] as f32 * factor).round() as u8;
                }
            });

        Ok(())
    }
}
