//! Input boundary: access to per-page content of a PDF.
//!
//! The reconstructor never parses PDF bytes itself. It asks a
//! [`ContentSource`] for positioned text items, the page's paint operations
//! and, when images were found, a raster of the page.

mod lopdf_source;
mod matrix;
mod raster;

pub use lopdf_source::LopdfSource;
pub use raster::RasterConfig;

pub(crate) use matrix::Matrix;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Metadata;

/// Page size in page units (points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
}

impl Viewport {
    /// Create a viewport with the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::letter()
    }
}

/// A positioned text item as reported by the source.
///
/// `transform` is `[a b c d e f]` in the source's bottom-up coordinate
/// space; `e`/`f` locate the baseline origin and `a`/`b` carry the font
/// scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    /// Decoded text
    pub text: String,
    /// Text rendering matrix
    pub transform: [f32; 6],
    /// Advance width in page units
    pub width: f32,
    /// Glyph height in page units
    pub height: f32,
    /// Font identifier
    pub font_name: String,
}

/// A low-level page drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// Save graphics state (`q`)
    Save,
    /// Restore graphics state (`Q`)
    Restore,
    /// Concatenate a transform (`cm`)
    Transform([f32; 6]),
    /// Paint an image XObject (`Do` on an image)
    PaintImage {
        /// Resource name of the XObject
        name: String,
    },
    /// Any other operator
    Other(String),
}

impl PaintOp {
    /// Check if this operation paints an image.
    pub fn is_image(&self) -> bool {
        matches!(self, PaintOp::PaintImage { .. })
    }
}

/// Capability set for reading page content. Pages are 1-indexed.
pub trait ContentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Size of a page.
    fn viewport(&self, page: u32) -> Result<Viewport>;

    /// Positioned text items of a page.
    fn text_items(&self, page: u32) -> Result<Vec<TextItem>>;

    /// Drawing operations of a page, in content-stream order.
    fn paint_ops(&self, page: u32) -> Result<Vec<PaintOp>>;

    /// Rasterize a page. The bitmap is `viewport * raster.scale` pixels.
    fn render(&self, page: u32, raster: &RasterConfig) -> Result<RgbaImage>;

    /// Document metadata, if the source has any.
    fn metadata(&self) -> Metadata {
        Metadata::default()
    }
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn viewport(&self, page: u32) -> Result<Viewport> {
        (**self).viewport(page)
    }

    fn text_items(&self, page: u32) -> Result<Vec<TextItem>> {
        (**self).text_items(page)
    }

    fn paint_ops(&self, page: u32) -> Result<Vec<PaintOp>> {
        (**self).paint_ops(page)
    }

    fn render(&self, page: u32, raster: &RasterConfig) -> Result<RgbaImage> {
        (**self).render(page, raster)
    }

    fn metadata(&self) -> Metadata {
        (**self).metadata()
    }
}
