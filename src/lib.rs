//! # relayout
//!
//! Layout reconstruction for PDF documents.
//!
//! This library turns the positioned text fragments and image placements of
//! PDF pages into an ordered stream of blocks (paragraphs and headings with
//! inferred style, detected tables, cropped images, page breaks) and
//! serializes that stream to Markdown, plain text or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use relayout::{convert_file, render};
//!
//! fn main() -> relayout::Result<()> {
//!     // Reconstruct the layout of a PDF file
//!     let doc = convert_file("document.pdf")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`source`]: page content access ([`ContentSource`], [`LopdfSource`])
//! - [`layout`]: paragraph segmentation, table detection, image cropping
//! - [`model`]: the block stream ([`LayoutDocument`], [`Block`])
//! - [`render`]: Markdown, text and JSON serializers

pub mod error;
pub mod layout;
pub mod model;
pub mod options;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{LayoutConfig, LayoutReconstructor, TableFragments};
pub use model::{
    Block, ExtractedImage, HeadingLevel, LayoutDocument, Metadata, ParagraphBlock, Table,
    TableCell, TableRow, TextFragment,
};
pub use options::{ConvertOptions, PageSelection};
pub use render::{JsonFormat, LayoutStats, RenderOptions};
pub use source::{ContentSource, LopdfSource, PaintOp, RasterConfig, TextItem, Viewport};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Reconstruct the layout of a PDF file.
///
/// # Example
///
/// ```no_run
/// use relayout::convert_file;
///
/// let doc = convert_file("document.pdf").unwrap();
/// println!("Blocks: {}", doc.blocks.len());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<LayoutDocument> {
    convert_file_with_options(path, ConvertOptions::default())
}

/// Reconstruct the layout of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use relayout::{convert_file_with_options, ConvertOptions, PageSelection};
///
/// let options = ConvertOptions::new()
///     .with_pages(PageSelection::Range(1..=3))
///     .with_images(false);
/// let doc = convert_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<LayoutDocument> {
    let source = LopdfSource::open(path)?;
    convert_source(&source, options)
}

/// Reconstruct the layout of a PDF held in memory.
pub fn convert_bytes(data: &[u8]) -> Result<LayoutDocument> {
    convert_bytes_with_options(data, ConvertOptions::default())
}

/// Reconstruct the layout of a PDF held in memory with custom options.
pub fn convert_bytes_with_options(data: &[u8], options: ConvertOptions) -> Result<LayoutDocument> {
    let source = LopdfSource::from_bytes(data)?;
    convert_source(&source, options)
}

/// Reconstruct the layout of a PDF read from a reader.
pub fn convert_reader<R: Read>(reader: R) -> Result<LayoutDocument> {
    let source = LopdfSource::from_reader(reader)?;
    convert_source(&source, ConvertOptions::default())
}

/// Reconstruct the layout of any content source.
pub fn convert_source<S: ContentSource + ?Sized>(
    source: &S,
    options: ConvertOptions,
) -> Result<LayoutDocument> {
    LayoutReconstructor::new(options).reconstruct(source)
}

/// Extract plain text from a PDF file.
///
/// # Example
///
/// ```no_run
/// use relayout::extract_text;
///
/// let text = extract_text("document.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = convert_file_with_options(path, ConvertOptions::new().with_images(false))?;
    render::to_text(&doc)
}

/// Convert a PDF to Markdown.
///
/// Image links point at file names produced by [`render::write_images`];
/// the image bytes themselves are not written.
///
/// # Example
///
/// ```no_run
/// use relayout::to_markdown;
///
/// let markdown = to_markdown("document.pdf").unwrap();
/// std::fs::write("output.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = convert_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Builder for converting PDF documents.
///
/// # Example
///
/// ```no_run
/// use relayout::Relayout;
///
/// let result = Relayout::new()
///     .with_frontmatter()
///     .with_image_prefix("images/")
///     .exclude_table_text()
///     .convert("document.pdf")?;
/// result.write_images("out/images")?;
/// std::fs::write("out/document.md", result.to_markdown()?)?;
/// # Ok::<(), relayout::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Relayout {
    convert_options: ConvertOptions,
    render_options: RenderOptions,
}

impl Relayout {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout thresholds.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.convert_options = self.convert_options.with_layout(layout);
        self
    }

    /// Remove table text from the paragraph stream.
    pub fn exclude_table_text(mut self) -> Self {
        self.convert_options.layout = self.convert_options.layout.exclude_table_text();
        self
    }

    /// Set the raster scale used for image cropping.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.convert_options = self.convert_options.with_scale(scale);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.convert_options = self.convert_options.with_pages(pages);
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.convert_options = self.convert_options.with_images(extract);
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.convert_options = self.convert_options.with_tables(extract);
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Set the prefix for image links in Markdown output.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_image_prefix(prefix);
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Convert a PDF file.
    pub fn convert<P: AsRef<Path>>(self, path: P) -> Result<RelayoutResult> {
        let source = LopdfSource::open(path)?;
        self.convert_source(&source)
    }

    /// Convert a PDF from bytes.
    pub fn convert_bytes(self, data: &[u8]) -> Result<RelayoutResult> {
        let source = LopdfSource::from_bytes(data)?;
        self.convert_source(&source)
    }

    /// Convert any content source.
    pub fn convert_source<S: ContentSource + ?Sized>(self, source: &S) -> Result<RelayoutResult> {
        let document = convert_source(source, self.convert_options)?;
        Ok(RelayoutResult {
            document,
            render_options: self.render_options,
        })
    }
}

/// Result of converting a PDF document.
#[derive(Debug, Clone)]
pub struct RelayoutResult {
    /// The reconstructed document
    pub document: LayoutDocument,
    /// Render options to use
    render_options: RenderOptions,
}

impl RelayoutResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Write extracted images into a directory.
    pub fn write_images(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        render::write_images(&self.document, dir)
    }

    /// Layout statistics.
    pub fn stats(&self) -> LayoutStats {
        LayoutStats::from_document(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relayout_builder() {
        let builder = Relayout::new()
            .with_frontmatter()
            .with_scale(3.0)
            .exclude_table_text()
            .with_images(false);

        assert!(builder.render_options.include_frontmatter);
        assert_eq!(builder.convert_options.raster.scale, 3.0);
        assert_eq!(
            builder.convert_options.layout.table_fragments,
            TableFragments::Exclude
        );
        assert!(!builder.convert_options.extract_images);
    }

    #[test]
    fn test_relayout_builder_with_pages() {
        let builder = Relayout::new().with_pages(PageSelection::Range(1..=5));
        assert_eq!(builder.convert_options.pages, PageSelection::Range(1..=5));
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_convert_bytes_empty_data() {
        assert!(matches!(convert_bytes(&[]), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_convert_bytes_too_short() {
        assert!(convert_bytes(b"%PDF").is_err());
    }

    #[test]
    fn test_convert_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(matches!(convert_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_convert_bytes_unsupported_version() {
        assert!(matches!(
            convert_bytes(b"%PDF-3.1\n%%EOF"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_builder_convert_invalid_bytes() {
        assert!(Relayout::new().convert_bytes(b"not a pdf").is_err());
    }

    #[test]
    fn test_convert_missing_file() {
        assert!(matches!(
            convert_file("/nonexistent/document.pdf"),
            Err(Error::Io(_))
        ));
    }
}
