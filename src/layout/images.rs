//! Image placement and cropping.
//!
//! Each image paint operation is located through the transform in effect
//! when it is drawn. The page is rasterized at most once and every surviving
//! placement is cropped out of that raster and encoded as PNG.

use std::io::Cursor;

use image::{imageops, DynamicImage, ImageFormat, RgbaImage};

use super::LayoutConfig;
use crate::error::Result;
use crate::model::ExtractedImage;
use crate::source::{ContentSource, Matrix, PaintOp, RasterConfig, Viewport};

/// Where an image sits on the page, in top-down page units.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    /// Resource name of the painted image
    pub name: String,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

/// Finds images on a page and crops them from the page raster.
pub struct ImageExtractor<'c> {
    config: &'c LayoutConfig,
    raster: &'c RasterConfig,
}

impl<'c> ImageExtractor<'c> {
    /// Create an extractor.
    pub fn new(config: &'c LayoutConfig, raster: &'c RasterConfig) -> Self {
        Self { config, raster }
    }

    /// Recover placement rectangles from a page's paint operations.
    ///
    /// Transforms are combined through `Save`/`Restore` the same way the
    /// page raster combines them, so each rectangle is the image's unit
    /// square under the current transform. Images drawn before any
    /// transform, and rectangles smaller than the minimum size after
    /// clamping to the page, are skipped.
    pub fn placements(&self, ops: &[PaintOp], viewport: Viewport) -> Vec<ImagePlacement> {
        let mut placements = Vec::new();
        // Current transform, and whether any `Transform` contributed to it.
        let mut state = (Matrix::identity(), false);
        let mut stack = Vec::new();

        for op in ops {
            match op {
                PaintOp::Save => stack.push(state),
                PaintOp::Restore => state = stack.pop().unwrap_or((Matrix::identity(), false)),
                PaintOp::Transform(m) => state = (Matrix::from_array(*m).multiply(&state.0), true),
                PaintOp::PaintImage { name } => {
                    let (ctm, transformed) = state;
                    if !transformed {
                        log::debug!("Image {} has no placement transform, skipping", name);
                        continue;
                    }

                    let (left, bottom, right, top) = ctm.unit_square_bounds();
                    let x0 = left.max(0.0);
                    let y0 = (viewport.height - top).max(0.0);
                    let x1 = right.min(viewport.width);
                    let y1 = (viewport.height - bottom).min(viewport.height);
                    let width = x1 - x0;
                    let height = y1 - y0;

                    if !(width >= self.config.min_image_size && height >= self.config.min_image_size)
                    {
                        log::debug!(
                            "Image {} too small ({:.1}x{:.1}), skipping",
                            name,
                            width,
                            height
                        );
                        continue;
                    }

                    placements.push(ImagePlacement {
                        name: name.clone(),
                        x: x0,
                        y: y0,
                        width,
                        height,
                    });
                }
                PaintOp::Other(_) => {}
            }
        }

        placements
    }

    /// Extract the images of one page.
    ///
    /// The raster is only requested when at least one placement survives.
    /// A raster failure yields no images; it never fails the page.
    pub fn extract<S: ContentSource + ?Sized>(
        &self,
        source: &S,
        page: u32,
        ops: &[PaintOp],
        viewport: Viewport,
    ) -> Vec<ExtractedImage> {
        let placements = self.placements(ops, viewport);
        if placements.is_empty() {
            return Vec::new();
        }

        let bitmap = match source.render(page, self.raster) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                log::warn!("Page {}: rasterization failed, skipping images: {}", page, e);
                return Vec::new();
            }
        };

        let mut images = Vec::with_capacity(placements.len());
        for placement in &placements {
            match self.crop(&bitmap, placement) {
                Ok(Some((data, pixel_width, pixel_height))) => {
                    images.push(ExtractedImage {
                        data,
                        page,
                        index: images.len(),
                        width: placement.width,
                        height: placement.height,
                        pixel_width,
                        pixel_height,
                        x: placement.x,
                        y: placement.y,
                    });
                }
                Ok(None) => {
                    log::debug!("Page {}: image {} crop is empty", page, placement.name);
                }
                Err(e) => {
                    log::warn!("Page {}: cannot encode image {}: {}", page, placement.name, e);
                }
            }
        }

        log::debug!("Page {}: extracted {} images", page, images.len());
        images
    }

    /// Crop a placement out of the raster and encode it as PNG.
    fn crop(
        &self,
        bitmap: &RgbaImage,
        placement: &ImagePlacement,
    ) -> Result<Option<(Vec<u8>, u32, u32)>> {
        let scale = self.raster.scale;
        let (bw, bh) = bitmap.dimensions();

        let px0 = ((placement.x * scale).floor().max(0.0) as u32).min(bw);
        let py0 = ((placement.y * scale).floor().max(0.0) as u32).min(bh);
        let px1 = (((placement.x + placement.width) * scale).ceil().max(0.0) as u32).min(bw);
        let py1 = (((placement.y + placement.height) * scale).ceil().max(0.0) as u32).min(bh);

        if px1 <= px0 || py1 <= py0 {
            return Ok(None);
        }

        let (w, h) = (px1 - px0, py1 - py0);
        let cropped = imageops::crop_imm(bitmap, px0, py0, w, h).to_image();

        let mut data = Vec::new();
        DynamicImage::ImageRgba8(cropped).write_to(&mut Cursor::new(&mut data), ImageFormat::Png)?;
        Ok(Some((data, w, h)))
    }
}
