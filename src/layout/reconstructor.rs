//! Per-document orchestration of the layout passes.

use crate::error::Result;
use crate::model::{Block, LayoutDocument, PageLayout, TextFragment};
use crate::options::ConvertOptions;
use crate::source::ContentSource;

use super::{ImageExtractor, LayoutConfig, ParagraphSegmenter, TableDetector, TableFragments};

/// Turns the pages of a [`ContentSource`] into an ordered block stream.
///
/// Pages are processed one at a time. Each page contributes its paragraphs,
/// then its table, then its images; pages are separated by
/// [`Block::PageBreak`].
#[derive(Debug, Clone, Default)]
pub struct LayoutReconstructor {
    options: ConvertOptions,
}

impl LayoutReconstructor {
    /// Create a reconstructor with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Create a reconstructor with custom thresholds and default options.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self::new(ConvertOptions::default().with_layout(config))
    }

    /// The options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Reconstruct the selected pages of a document.
    ///
    /// Failures reading a page's text, size or paint operations abort the
    /// conversion. Image failures only drop the affected images.
    pub fn reconstruct<S: ContentSource + ?Sized>(&self, source: &S) -> Result<LayoutDocument> {
        self.reconstruct_with_progress(source, |_, _| {})
    }

    /// Like [`reconstruct`](Self::reconstruct), calling `progress(done, total)`
    /// after each page.
    pub fn reconstruct_with_progress<S, F>(&self, source: &S, mut progress: F) -> Result<LayoutDocument>
    where
        S: ContentSource + ?Sized,
        F: FnMut(usize, usize),
    {
        let pages = self.options.pages.resolve(source.page_count());
        log::debug!(
            "Reconstructing {} of {} pages",
            pages.len(),
            source.page_count()
        );

        let mut doc = LayoutDocument {
            metadata: source.metadata(),
            page_count: pages.len() as u32,
            blocks: Vec::new(),
        };

        for (i, &page) in pages.iter().enumerate() {
            let layout = self.layout_page(source, page)?;
            doc.blocks.extend(layout.into_blocks());
            if i + 1 < pages.len() {
                doc.blocks.push(Block::PageBreak);
            }
            progress(i + 1, pages.len());
        }

        log::info!(
            "Reconstructed {} pages into {} blocks",
            doc.page_count,
            doc.blocks.len()
        );
        Ok(doc)
    }

    /// Reconstruct one page of a source.
    pub fn layout_page<S: ContentSource + ?Sized>(&self, source: &S, page: u32) -> Result<PageLayout> {
        let viewport = source.viewport(page)?;
        let fragments: Vec<TextFragment> = source
            .text_items(page)?
            .iter()
            .map(|item| TextFragment::from_item(item, viewport.height))
            .collect();

        let mut layout = self.reconstruct_page(&fragments);

        if self.options.extract_images {
            let ops = source.paint_ops(page)?;
            let extractor = ImageExtractor::new(&self.options.layout, &self.options.raster);
            layout.images = extractor.extract(source, page, &ops, viewport);
        }

        log::debug!(
            "Page {}: {} paragraphs, {} tables, {} images",
            page,
            layout.paragraphs.len(),
            layout.tables.len(),
            layout.images.len()
        );
        Ok(layout)
    }

    /// Reconstruct paragraphs and tables from the fragments of one page.
    pub fn reconstruct_page(&self, fragments: &[TextFragment]) -> PageLayout {
        let config = &self.options.layout;
        let live: Vec<&TextFragment> = fragments.iter().filter(|f| !f.is_blank()).collect();

        let detected = if self.options.extract_tables {
            TableDetector::new(config).detect(&live)
        } else {
            None
        };

        let paragraphs = match (&detected, config.table_fragments) {
            (Some(table), TableFragments::Exclude) => {
                let rest: Vec<&TextFragment> = live
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| table.fragment_indices.binary_search(i).is_err())
                    .map(|(_, f)| *f)
                    .collect();
                ParagraphSegmenter::new(config).segment(&rest)
            }
            _ => ParagraphSegmenter::new(config).segment(&live),
        };

        PageLayout {
            paragraphs,
            tables: detected.map(|d| d.table).into_iter().collect(),
            images: Vec::new(),
        }
    }
}
