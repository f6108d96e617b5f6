use crate::{Effect, ImageEffectResult, check_param};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

const CRYSTALLIZE_SEED: u64 = 0x1d5f_c0de;

/// Crystallize configuration
///
/// Splits the image into Voronoi cells roughly `radius` pixels across. Every
/// cell takes the colour found under its seed point.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CrystallizeConfig {
    #[derivative(Default(value = "20.0"))]
    pub radius: f32,
}

impl CrystallizeConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for CrystallizeConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        let cell = check_param("radius", self.radius)?.round().max(1.0);
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Ok(());
        }

        let cols = (width as f32 / cell).ceil() as i64;
        let rows = (height as f32 / cell).ceil() as i64;

        // Fixed seed keeps the output a pure function of the inputs
        let mut rng = StdRng::seed_from_u64(CRYSTALLIZE_SEED);
        let seeds = (0..rows * cols)
            .map(|i| {
                let (cx, cy) = ((i % cols) as f32, (i / cols) as f32);
                (
                    (cx + rng.random::<f32>()) * cell,
                    (cy + rng.random::<f32>()) * cell,
                )
            })
            .collect::<Vec<_>>();

        let source = image.clone();
        let seed_color = |sx: f32, sy: f32| {
            let x = (sx as u32).min(width - 1);
            let y = (sy as u32).min(height - 1);
            *source.get_pixel(x, y)
        };

        image
            .par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                let py = y as f32 + 0.5;
                let cy = (py / cell) as i64;

                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let px = x as f32 + 0.5;
                    let cx = (px / cell) as i64;

                    let mut nearest = (f32::MAX, 0.0, 0.0);
                    for ny in (cy - 2).max(0)..=(cy + 2).min(rows - 1) {
                        for nx in (cx - 2).max(0)..=(cx + 2).min(cols - 1) {
                            let (sx, sy) = seeds[(ny * cols + nx) as usize];
                            let d = (sx - px) * (sx - px) + (sy - py) * (sy - py);
                            if d < nearest.0 {
                                nearest = (d, sx, sy);
                            }
                        }
                    }

                    let color = seed_color(nearest.1, nearest.2);
                    pixel.copy_from_slice(&color.0);
                }
            });

        Ok(())
    }
}

/// Edge detection configuration
///
/// Per-channel Sobel magnitude scaled by `intensity`, on a black background.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct EdgesConfig {
    #[derivative(Default(value = "1.0"))]
    pub intensity: f32,
}

impl EdgesConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for EdgesConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        let intensity = check_param("intensity", self.intensity)?;
        let (width, height) = (image.width() as i32, image.height() as i32);
        let source = image.clone();

        let sobel_x: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
        let sobel_y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

        for y in 0..height {
            for x in 0..width {
                let mut gx = [0.0f32; 3];
                let mut gy = [0.0f32; 3];

                for ky in -1i32..=1 {
                    for kx in -1i32..=1 {
                        let px = (x + kx).clamp(0, width - 1) as u32;
                        let py = (y + ky).clamp(0, height - 1) as u32;
                        let pixel = source.get_pixel(px, py);

                        let ki = ((ky + 1) * 3 + (kx + 1)) as usize;
                        for c in 0..3 {
                            gx[c] += pixel[c] as f32 * sobel_x[ki];
                            gy[c] += pixel[c] as f32 * sobel_y[ki];
                        }
                    }
                }

                let pixel = image.get_pixel_mut(x as u32, y as u32);
                for c in 0..3 {
                    let magnitude = (gx[c] * gx[c] + gy[c] * gy[c]).sqrt() * intensity;
                    pixel[c] = magnitude.clamp(0.0, 255.0) as u8;
                }
            }
        }

        Ok(())
    }
}

/// Pixellate configuration
///
/// Averages square blocks of `scale` pixels.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct PixellateConfig {
    #[derivative(Default(value = "8.0"))]
    pub scale: f32,
}

impl PixellateConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for PixellateConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        let block_size = check_param("scale", self.scale)?.round().max(1.0) as u32;
        if block_size == 1 {
            return Ok(());
        }

        let (width, height) = (image.width(), image.height());
        let source = image.clone();

        for y in (0..height).step_by(block_size as usize) {
            for x in (0..width).step_by(block_size as usize) {
                let mut sum = [0u64; 3];
                let mut count = 0u64;

                let y_end = (y + block_size).min(height);
                let x_end = (x + block_size).min(width);

                for by in y..y_end {
                    for bx in x..x_end {
                        let pixel = source.get_pixel(bx, by);
                        for c in 0..3 {
                            sum[c] += pixel[c] as u64;
                        }
                        count += 1;
                    }
                }

                let avg = sum.map(|s| ((s + count / 2) / count) as u8);
                for by in y..y_end {
                    for bx in x..x_end {
                        let pixel = image.get_pixel_mut(bx, by);
                        pixel[0] = avg[0];
                        pixel[1] = avg[1];
                        pixel[2] = avg[2];
                    }
                }
            }
        }

        Ok(())
    }
}
