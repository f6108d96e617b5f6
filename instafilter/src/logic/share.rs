use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

pub const SHARE_TITLE: &str = "Instafilter image";

/// What the share sheet receives: a title and the rendered image as PNG.
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub title: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SharePayload {
    pub fn new(image: &RgbaImage) -> Result<Self> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .with_context(|| "encode shared image failed")?;

        Ok(Self {
            title: SHARE_TITLE.to_string(),
            png,
            width: image.width(),
            height: image.height(),
        })
    }
}
