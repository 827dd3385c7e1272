//! Images cropped out of a rendered page.

use serde::{Deserialize, Serialize};

/// An image recovered from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedImage {
    /// PNG-encoded pixel data
    #[serde(skip)]
    pub data: Vec<u8>,

    /// 1-based page number the image was found on
    pub page: u32,

    /// Zero-based index among the images of that page
    pub index: usize,

    /// Placement width in page units
    pub width: f32,

    /// Placement height in page units
    pub height: f32,

    /// Width of the encoded bitmap in pixels
    pub pixel_width: u32,

    /// Height of the encoded bitmap in pixels
    pub pixel_height: u32,

    /// Placement X position (left edge)
    pub x: f32,

    /// Placement Y position, measured from the top of the page
    pub y: f32,
}

impl ExtractedImage {
    /// MIME type of the encoded data.
    pub fn mime_type(&self) -> &'static str {
        "image/png"
    }

    /// Suggested file name, unique within a document.
    pub fn file_name(&self) -> String {
        format!("page{}_img{}.png", self.page, self.index + 1)
    }

    /// Size of the encoded data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
