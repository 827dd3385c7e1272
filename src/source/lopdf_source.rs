//! `ContentSource` backed by lopdf.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use image::RgbaImage;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::raster::{blank_canvas, composite, decode_image_stream};
use super::{ContentSource, Matrix, PaintOp, RasterConfig, TextItem, Viewport};
use crate::error::{Error, Result};
use crate::model::Metadata;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// TJ adjustment (thousandths of text space) treated as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size, used when
/// glyph metrics are not read.
const GLYPH_ADVANCE: f32 = 0.5;

/// A PDF document opened with lopdf.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        check_header(data)?;

        let doc = LopdfDocument::load_mem(data)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        Ok(Self::from_document(doc))
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Wrap an already loaded lopdf document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    /// Get PDF version.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    /// Look up a page attribute, following `/Parent` for inheritable keys.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = self.doc.get_dictionary(page_id).ok();
        // Page trees are shallow; the bound only protects against cycles.
        for _ in 0..32 {
            let dict = current?;
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .and_then(|id| self.doc.get_dictionary(id))
                .ok();
        }
        None
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Image XObjects available to a page, by resource name.
    fn page_images(&self, page_id: ObjectId) -> HashMap<Vec<u8>, ObjectId> {
        let mut images = HashMap::new();

        let xobjects = self
            .inherited(page_id, b"Resources")
            .and_then(|res| self.resolve_dict(res))
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|x| self.resolve_dict(x));

        if let Some(xobjects) = xobjects {
            for (name, obj) in xobjects.iter() {
                let Ok(obj_ref) = obj.as_reference() else {
                    continue;
                };
                if let Ok(Object::Stream(stream)) = self.doc.get_object(obj_ref) {
                    let is_image = stream
                        .dict
                        .get(b"Subtype")
                        .and_then(Object::as_name)
                        .map(|s| s == b"Image")
                        .unwrap_or(false);
                    if is_image {
                        images.insert(name.clone(), obj_ref);
                    }
                }
            }
        }

        images
    }

    /// Get the decoded content stream of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<lopdf::content::Content> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let raw = match page_dict.get(b"Contents") {
            Ok(Object::Reference(r)) => match self.doc.get_object(*r)? {
                Object::Stream(s) => stream_bytes(s)?,
                Object::Array(arr) => self.concat_streams(arr),
                _ => return Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Ok(Object::Array(arr)) => self.concat_streams(arr),
            Ok(_) => return Err(Error::PdfParse("Invalid content stream".to_string())),
            // A page without /Contents is blank.
            Err(_) => Vec::new(),
        };

        lopdf::content::Content::decode(&raw).map_err(|e| Error::PdfParse(e.to_string()))
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match stream_bytes(s) {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                        Err(e) => log::warn!("Skipping unreadable content stream {:?}: {}", r, e),
                    }
                }
            }
        }
        content
    }

    fn decode_string(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        bytes: &[u8],
    ) -> String {
        let encoding = fonts
            .get(font)
            .and_then(|f| f.get_font_encoding(&self.doc).ok());
        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }
}

impl ContentSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn viewport(&self, page: u32) -> Result<Viewport> {
        let page_id = self.page_id(page)?;

        if let Some(Ok(array)) = self.inherited(page_id, b"MediaBox").map(Object::as_array) {
            if array.len() >= 4 {
                let coords: Vec<f32> = array.iter().filter_map(get_number).collect();
                if coords.len() >= 4 {
                    let width = (coords[2] - coords[0]).abs();
                    let height = (coords[3] - coords[1]).abs();
                    if width > 0.0 && height > 0.0 {
                        return Ok(Viewport::new(width, height));
                    }
                }
            }
        }

        Ok(Viewport::letter())
    }

    fn text_items(&self, page: u32) -> Result<Vec<TextItem>> {
        let page_id = self.page_id(page)?;
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

        let base_fonts: HashMap<Vec<u8>, String> = fonts
            .iter()
            .map(|(name, font)| {
                let base = font
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                (name.clone(), base)
            })
            .collect();

        let content = self.page_content(page_id)?;
        let mut state = TextState::default();
        let mut items = Vec::new();

        for op in content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => state.save(),
                "Q" => state.restore(),
                "cm" => {
                    if let Some(m) = matrix_operands(operands) {
                        state.ctm = m.multiply(&state.ctm);
                    }
                }
                "BT" => {
                    state.in_text = true;
                    state.tm = Matrix::identity();
                    state.tlm = Matrix::identity();
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if operands.len() >= 2 {
                        if let Object::Name(name) = &operands[0] {
                            state.font_key = name.clone();
                            state.font_name = base_fonts
                                .get(name)
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        }
                        state.font_size = get_number(&operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if operands.len() >= 2 {
                        let tx = get_number(&operands[0]).unwrap_or(0.0);
                        let ty = get_number(&operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(operands) {
                        state.tm = m;
                        state.tlm = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        state.next_line();
                    }
                    if !state.in_text {
                        continue;
                    }

                    let text = match op.operator.as_str() {
                        "TJ" => match operands.first() {
                            Some(Object::Array(arr)) => self.decode_tj_array(&fonts, &state, arr),
                            _ => String::new(),
                        },
                        "\"" => match operands.get(2) {
                            Some(Object::String(bytes, _)) => {
                                self.decode_string(&fonts, &state.font_key, bytes)
                            }
                            _ => String::new(),
                        },
                        _ => match operands.first() {
                            Some(Object::String(bytes, _)) => {
                                self.decode_string(&fonts, &state.font_key, bytes)
                            }
                            _ => String::new(),
                        },
                    };

                    if text.is_empty() {
                        continue;
                    }

                    let advance = text.chars().count() as f32 * state.font_size * GLYPH_ADVANCE;
                    let trm = Matrix::scale(state.font_size).multiply(&state.tm).multiply(&state.ctm);
                    let unit = state.tm.multiply(&state.ctm);
                    items.push(TextItem {
                        text,
                        transform: trm.to_array(),
                        width: advance * unit.horizontal_scale(),
                        height: trm.vertical_scale(),
                        font_name: state.font_name.clone(),
                    });
                    state.tm = Matrix::translate(advance, 0.0).multiply(&state.tm);
                }
                _ => {}
            }
        }

        log::debug!("Page {}: extracted {} text items", page, items.len());
        Ok(items)
    }

    fn paint_ops(&self, page: u32) -> Result<Vec<PaintOp>> {
        let page_id = self.page_id(page)?;
        let images = self.page_images(page_id);
        let content = self.page_content(page_id)?;

        let ops = content
            .operations
            .into_iter()
            .map(|op| match op.operator.as_str() {
                "q" => PaintOp::Save,
                "Q" => PaintOp::Restore,
                "cm" => match matrix_operands(&op.operands) {
                    Some(m) => PaintOp::Transform(m.to_array()),
                    None => PaintOp::Other(op.operator),
                },
                "Do" => match op.operands.first() {
                    Some(Object::Name(name)) if images.contains_key(name) => PaintOp::PaintImage {
                        name: String::from_utf8_lossy(name).to_string(),
                    },
                    _ => PaintOp::Other(op.operator),
                },
                _ => PaintOp::Other(op.operator),
            })
            .collect();

        Ok(ops)
    }

    fn render(&self, page: u32, raster: &RasterConfig) -> Result<RgbaImage> {
        let viewport = self.viewport(page)?;
        let page_id = self.page_id(page)?;
        let images = self.page_images(page_id);
        let mut canvas = blank_canvas(viewport, raster);

        if images.is_empty() {
            return Ok(canvas);
        }

        let mut ctm = Matrix::identity();
        let mut stack: Vec<Matrix> = Vec::new();
        for op in self.paint_ops(page)? {
            match op {
                PaintOp::Save => stack.push(ctm),
                PaintOp::Restore => ctm = stack.pop().unwrap_or_else(Matrix::identity),
                PaintOp::Transform(m) => ctm = Matrix::from_array(m).multiply(&ctm),
                PaintOp::PaintImage { name } => {
                    let Some(obj_ref) = images.get(name.as_bytes()) else {
                        continue;
                    };
                    let decoded = match self.doc.get_object(*obj_ref) {
                        Ok(Object::Stream(stream)) => decode_image_stream(stream),
                        _ => Err(Error::ImageExtract(format!("{} is not a stream", name))),
                    };
                    match decoded {
                        Ok(image) => {
                            let (x0, y0, x1, y1) = ctm.unit_square_bounds();
                            let rect = (x0, viewport.height - y1, x1 - x0, y1 - y0);
                            composite(&mut canvas, &image, rect, raster.scale);
                        }
                        Err(e) => log::warn!("Page {}: cannot draw image {}: {}", page, name, e),
                    }
                }
                PaintOp::Other(_) => {}
            }
        }

        Ok(canvas)
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata {
            pdf_version: Some(self.doc.version.clone()),
            ..Default::default()
        };

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| self.resolve_dict(info));
        if let Some(info) = info {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.producer = get_string_from_dict(info, b"Producer");
        }

        metadata
    }
}

impl LopdfSource {
    fn decode_tj_array(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        state: &TextState,
        arr: &[Object],
    ) -> String {
        let mut combined = String::new();
        for item in arr {
            match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode_string(fonts, &state.font_key, bytes));
                }
                Object::Integer(_) | Object::Real(_) => {
                    // Negative adjustments move the next glyph right.
                    let adjustment = -get_number(item).unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }
}

/// Graphics and text state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    tm: Matrix,
    tlm: Matrix,
    leading: f32,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    in_text: bool,
    stack: Vec<Matrix>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::identity(),
            tm: Matrix::identity(),
            tlm: Matrix::identity(),
            leading: 0.0,
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            in_text: false,
            stack: Vec::new(),
        }
    }
}

impl TextState {
    fn save(&mut self) {
        self.stack.push(self.ctm);
    }

    fn restore(&mut self) {
        self.ctm = self.stack.pop().unwrap_or_else(Matrix::identity);
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translate(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        // Without TL the font size is the closest thing to a line height.
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size
        };
        self.move_line(0.0, -leading);
    }
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0f32; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = get_number(obj)?;
    }
    Some(Matrix::from_array(m))
}

fn stream_bytes(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| Error::PdfParse(e.to_string()))
    } else {
        Ok(stream.content.clone())
    }
}

/// Validate the `%PDF-x.y` header.
fn check_header(data: &[u8]) -> Result<()> {
    // Readers accept the header anywhere in the first 1024 bytes.
    let window = &data[..data.len().min(1024)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_start = start + PDF_MAGIC.len();
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    let valid = matches!(
        version.as_str(),
        "1.0" | "1.1" | "1.2" | "1.3" | "1.4" | "1.5" | "1.6" | "1.7" | "2.0"
    );
    if !valid {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(())
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with byte order mark
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            let text = decode_text_simple(bytes);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}
