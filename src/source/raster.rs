//! Image-only page rasterization.
//!
//! Pages are painted with a background colour and every placed image
//! XObject is decoded and composited at its placement. Text and vector
//! graphics are not drawn; the raster only has to be good enough to crop
//! images back out of it.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, Rgba, RgbImage, RgbaImage};
use lopdf::{Object, Stream};

use super::Viewport;
use crate::error::{Error, Result};

/// Rasterization settings handed to [`super::ContentSource::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// Pixels per page unit
    pub scale: f32,
    /// Background colour (RGBA)
    pub background: [u8; 4],
}

impl RasterConfig {
    /// Create a raster configuration with defaults (2x, white).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scale. Non-positive or non-finite values fall back to 1.0.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self
    }

    /// Set the background colour.
    pub fn with_background(mut self, rgba: [u8; 4]) -> Self {
        self.background = rgba;
        self
    }

    /// Bitmap size in pixels for a page of the given size.
    pub fn pixel_size(&self, viewport: Viewport) -> (u32, u32) {
        let w = (viewport.width * self.scale).ceil().max(1.0) as u32;
        let h = (viewport.height * self.scale).ceil().max(1.0) as u32;
        (w, h)
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: [255, 255, 255, 255],
        }
    }
}

/// Create a blank canvas for a page.
pub(crate) fn blank_canvas(viewport: Viewport, config: &RasterConfig) -> RgbaImage {
    let (w, h) = config.pixel_size(viewport);
    RgbaImage::from_pixel(w, h, Rgba(config.background))
}

/// Draw `image` onto `canvas` inside the rectangle `(x, y, width, height)`,
/// given in top-down page units.
///
/// Only the part of the rectangle that falls on the canvas is drawn; the
/// matching region of `image` is scaled into it.
pub(crate) fn composite(
    canvas: &mut RgbaImage,
    image: &DynamicImage,
    rect: (f32, f32, f32, f32),
    scale: f32,
) {
    let (x, y, width, height) = rect;
    let scale = f64::from(scale);
    let tx = f64::from(x) * scale;
    let ty = f64::from(y) * scale;
    let tw = f64::from(width) * scale;
    let th = f64::from(height) * scale;
    if ![tx, ty, tw, th].iter().all(|v| v.is_finite()) || tw <= 0.0 || th <= 0.0 {
        return;
    }

    let (cw, ch) = canvas.dimensions();
    let px0 = tx.round().clamp(0.0, f64::from(cw));
    let py0 = ty.round().clamp(0.0, f64::from(ch));
    let px1 = (tx + tw).round().clamp(0.0, f64::from(cw));
    let py1 = (ty + th).round().clamp(0.0, f64::from(ch));
    if px1 <= px0 || py1 <= py0 {
        return;
    }

    let (iw, ih) = (image.width(), image.height());
    if iw == 0 || ih == 0 {
        return;
    }
    let (iw, ih) = (f64::from(iw), f64::from(ih));
    let sx0 = ((px0 - tx) / tw * iw).floor().clamp(0.0, iw - 1.0);
    let sy0 = ((py0 - ty) / th * ih).floor().clamp(0.0, ih - 1.0);
    let sx1 = ((px1 - tx) / tw * iw).ceil().clamp(sx0 + 1.0, iw);
    let sy1 = ((py1 - ty) / th * ih).ceil().clamp(sy0 + 1.0, ih);

    let visible = image
        .crop_imm(
            sx0 as u32,
            sy0 as u32,
            (sx1 - sx0) as u32,
            (sy1 - sy0) as u32,
        )
        .to_rgba8();
    let resized = imageops::resize(
        &visible,
        (px1 - px0) as u32,
        (py1 - py0) as u32,
        FilterType::Triangle,
    );
    imageops::overlay(canvas, &resized, px0 as i64, py0 as i64);
}

/// Decode an image XObject stream into pixels.
///
/// JPEG data is handed to the `image` crate as is; other streams are
/// decompressed and interpreted as 8-bit gray, RGB or CMYK samples.
pub(crate) fn decode_image_stream(stream: &Stream) -> Result<DynamicImage> {
    let dict = &stream.dict;
    let filters = stream_filters(dict);

    if filters.iter().any(|f| f == "DCTDecode") {
        return Ok(image::load_from_memory_with_format(
            &stream.content,
            ImageFormat::Jpeg,
        )?);
    }
    if let Some(unsupported) = filters
        .iter()
        .find(|f| matches!(f.as_str(), "JPXDecode" | "JBIG2Decode" | "CCITTFaxDecode"))
    {
        return Err(Error::ImageExtract(format!(
            "unsupported image filter {}",
            unsupported
        )));
    }

    let width = dict_u32(dict, b"Width")?;
    let height = dict_u32(dict, b"Height")?;
    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|b| b.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        return Err(Error::ImageExtract(format!(
            "unsupported bits per component {}",
            bits
        )));
    }

    let samples = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream
            .decompressed_content()
            .map_err(|e| Error::ImageExtract(e.to_string()))?
    };

    let pixels = width as usize * height as usize;
    if pixels == 0 {
        return Err(Error::ImageExtract("empty image".to_string()));
    }

    match samples.len() / pixels {
        1 => GrayImage::from_raw(width, height, truncate(samples, pixels))
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| Error::ImageExtract("short gray sample data".to_string())),
        3 => RgbImage::from_raw(width, height, truncate(samples, pixels * 3))
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| Error::ImageExtract("short RGB sample data".to_string())),
        4 => {
            let rgb: Vec<u8> = samples[..pixels * 4]
                .chunks_exact(4)
                .flat_map(|c| cmyk_to_rgb(c[0], c[1], c[2], c[3]))
                .collect();
            RgbImage::from_raw(width, height, rgb)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| Error::ImageExtract("short CMYK sample data".to_string()))
        }
        n => Err(Error::ImageExtract(format!(
            "unexpected sample layout ({} bytes per pixel)",
            n
        ))),
    }
}

fn stream_filters(dict: &lopdf::Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).to_string()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn dict_u32(dict: &lopdf::Dictionary, key: &[u8]) -> Result<u32> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_i64().ok())
        .filter(|v| *v > 0)
        .map(|v| v as u32)
        .ok_or_else(|| {
            Error::ImageExtract(format!(
                "missing /{}",
                String::from_utf8_lossy(key)
            ))
        })
}

fn truncate(mut data: Vec<u8>, len: usize) -> Vec<u8> {
    data.truncate(len);
    data
}

fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> [u8; 3] {
    let k = 255 - k as u16;
    let channel = |v: u8| ((255 - v as u16) * k / 255) as u8;
    [channel(c), channel(m), channel(y)]
}
