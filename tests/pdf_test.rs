//! End-to-end tests over PDFs built in memory with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use relayout::{
    ContentSource, Error, HeadingLevel, JsonFormat, LopdfSource, PaintOp, PageSelection,
    RasterConfig, Relayout, Viewport,
};

fn text(font: &str, size: i64, x: i64, y: i64, body: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(body)]),
        Operation::new("ET", vec![]),
    ]
}

/// A Letter-size PDF with one page per operation list. Every page shares
/// the fonts `F1`/`F2` and a 2x2 red image `Im1`.
fn build_pdf(pages: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let red: Vec<u8> = [255u8, 0, 0].repeat(4);
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        red,
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
        "XObject" => dictionary! {
            "Im1" => image_id,
        },
    });

    let mut kids = Vec::new();
    let page_count = pages.len() as i64;
    for operations in pages {
        let content = Content { operations }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Quarterly Report"),
        "Author" => Object::string_literal("Finance"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Two Letter pages: a heading, a wrapped paragraph and a red image on the
/// first, a single line on the second.
fn sample_pdf() -> Vec<u8> {
    let mut first = Vec::new();
    first.extend(text("F2", 20, 72, 720, "Report Title"));
    first.extend(vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 680.into()]),
        Operation::new("Tj", vec![Object::string_literal("First paragraph line one")]),
        Operation::new("Td", vec![0.into(), (-14).into()]),
        Operation::new("Tj", vec![Object::string_literal("line two")]),
        Operation::new("ET", vec![]),
    ]);
    first.extend(vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                100.into(),
                0.into(),
                0.into(),
                50.into(),
                72.into(),
                400.into(),
            ],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
    ]);
    let second = text("F1", 12, 72, 720, "Page two");

    build_pdf(vec![first, second])
}

/// One page drawing `Im1` under two nested transforms: a half-size scale
/// around a 200x100 placement at (100, 400).
fn nested_transform_pdf() -> Vec<u8> {
    let number = |v: f32| Object::Real(v);
    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                number(0.5),
                number(0.0),
                number(0.0),
                number(0.5),
                number(0.0),
                number(0.0),
            ],
        ),
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                200.into(),
                0.into(),
                0.into(),
                100.into(),
                100.into(),
                400.into(),
            ],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
        Operation::new("Q", vec![]),
    ];
    build_pdf(vec![operations])
}

#[test]
fn test_source_reads_pages_and_metadata() {
    let source = LopdfSource::from_bytes(&sample_pdf()).unwrap();

    assert_eq!(source.page_count(), 2);
    assert_eq!(source.version(), "1.5");
    assert_eq!(source.viewport(1).unwrap(), Viewport::new(612.0, 792.0));

    let metadata = source.metadata();
    assert_eq!(metadata.title.as_deref(), Some("Quarterly Report"));
    assert_eq!(metadata.author.as_deref(), Some("Finance"));
    assert_eq!(metadata.pdf_version.as_deref(), Some("1.5"));
}

#[test]
fn test_source_text_items() {
    let source = LopdfSource::from_bytes(&sample_pdf()).unwrap();
    let items = source.text_items(1).unwrap();

    let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["Report Title", "First paragraph line one", "line two"]);

    assert_eq!(items[0].transform, [20.0, 0.0, 0.0, 20.0, 72.0, 720.0]);
    assert_eq!(items[0].font_name, "Helvetica-Bold");
    assert_eq!(items[2].transform[4], 72.0);
    assert_eq!(items[2].transform[5], 666.0);
}

#[test]
fn test_source_paint_ops() {
    let source = LopdfSource::from_bytes(&sample_pdf()).unwrap();
    let ops = source.paint_ops(1).unwrap();

    let images: Vec<&PaintOp> = ops.iter().filter(|op| op.is_image()).collect();
    assert_eq!(
        images,
        vec![&PaintOp::PaintImage {
            name: "Im1".to_string()
        }]
    );
    assert!(ops.contains(&PaintOp::Transform([100.0, 0.0, 0.0, 50.0, 72.0, 400.0])));
    assert!(!source.paint_ops(2).unwrap().iter().any(PaintOp::is_image));
}

#[test]
fn test_source_render_composites_image() {
    let source = LopdfSource::from_bytes(&sample_pdf()).unwrap();
    let raster = RasterConfig::new().with_scale(1.0);
    let bitmap = source.render(1, &raster).unwrap();

    assert_eq!(bitmap.dimensions(), (612, 792));
    // Image spans x 72..172, top-down y 342..392
    assert_eq!(bitmap.get_pixel(120, 365).0, [255, 0, 0, 255]);
    assert_eq!(bitmap.get_pixel(10, 10).0, [255, 255, 255, 255]);
}

#[test]
fn test_nested_transforms_crop_the_drawn_image() {
    let result = Relayout::new()
        .convert_bytes(&nested_transform_pdf())
        .unwrap();
    let images: Vec<_> = result.document().images().collect();
    assert_eq!(images.len(), 1);

    // 0.5 x [200 0 0 100 100 400] covers x 50..150, bottom-up y 200..250.
    let image = images[0];
    assert_eq!((image.x, image.y), (50.0, 542.0));
    assert_eq!((image.width, image.height), (100.0, 50.0));

    let decoded = image::load_from_memory(&image.data).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (200, 100));
    let red = decoded
        .pixels()
        .filter(|p| p.0 == [255, 0, 0, 255])
        .count();
    assert!(red > 200 * 100 * 9 / 10, "only {} red pixels", red);
}

#[test]
fn test_oversized_transform_is_clipped() {
    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(1e8),
                0.into(),
                0.into(),
                Object::Real(1e8),
                0.into(),
                0.into(),
            ],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
    ];
    let result = Relayout::new()
        .with_scale(1.0)
        .convert_bytes(&build_pdf(vec![operations]))
        .unwrap();

    let images: Vec<_> = result.document().images().collect();
    assert_eq!(images.len(), 1);
    assert_eq!((images[0].width, images[0].height), (612.0, 792.0));
    assert_eq!((images[0].pixel_width, images[0].pixel_height), (612, 792));
}

#[test]
fn test_source_page_out_of_range() {
    let source = LopdfSource::from_bytes(&sample_pdf()).unwrap();
    assert!(matches!(
        source.text_items(3),
        Err(Error::PageOutOfRange(3, 2))
    ));
}

#[test]
fn test_end_to_end_blocks() {
    let result = Relayout::new().convert_bytes(&sample_pdf()).unwrap();
    let doc = result.document();

    assert_eq!(doc.page_count, 2);
    let paragraphs: Vec<_> = doc.paragraphs().collect();
    assert_eq!(paragraphs.len(), 3);

    assert_eq!(paragraphs[0].text, "Report Title");
    assert_eq!(paragraphs[0].heading_level, Some(HeadingLevel::H1));
    assert!(paragraphs[0].is_bold);

    assert_eq!(paragraphs[1].text, "First paragraph line one line two");
    assert_eq!(paragraphs[1].heading_level, None);
    assert!(!paragraphs[1].is_bold);

    assert_eq!(paragraphs[2].text, "Page two");

    let images: Vec<_> = doc.images().collect();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].x, 72.0);
    assert_eq!(images[0].y, 342.0);
    assert_eq!(images[0].pixel_width, 200);
    assert_eq!(images[0].pixel_height, 100);

    let decoded = image::load_from_memory(&images[0].data).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(100, 50).0, [255, 0, 0, 255]);
}

#[test]
fn test_end_to_end_markdown() {
    let result = Relayout::new()
        .with_image_prefix("images/")
        .convert_bytes(&sample_pdf())
        .unwrap();

    assert_eq!(
        result.to_markdown().unwrap(),
        "# Report Title\n\n\
         First paragraph line one line two\n\n\
         ![image](images/page1_img1.png)\n\n\
         ---\n\n\
         Page two"
    );
}

#[test]
fn test_end_to_end_frontmatter() {
    let markdown = Relayout::new()
        .with_frontmatter()
        .with_images(false)
        .convert_bytes(&sample_pdf())
        .unwrap()
        .to_markdown()
        .unwrap();

    assert!(markdown.starts_with("---\n"));
    assert!(markdown.contains("title: \"Quarterly Report\""));
    assert!(!markdown.contains("!["));
}

#[test]
fn test_end_to_end_text_and_json() {
    let result = Relayout::new().convert_bytes(&sample_pdf()).unwrap();

    assert_eq!(
        result.to_text().unwrap(),
        "Report Title\n\nFirst paragraph line one line two\n\n\u{000C}\n\nPage two"
    );

    let json: serde_json::Value =
        serde_json::from_str(&result.to_json(JsonFormat::Compact).unwrap()).unwrap();
    assert_eq!(json["page_count"], 2);
    assert_eq!(json["blocks"][0]["type"], "paragraph");
    assert_eq!(json["blocks"][3]["type"], "page_break");
}

#[test]
fn test_end_to_end_page_selection() {
    let result = Relayout::new()
        .with_pages(PageSelection::Pages(vec![2]))
        .convert_bytes(&sample_pdf())
        .unwrap();

    assert_eq!(result.to_text().unwrap(), "Page two");
    assert_eq!(result.stats().page_break_count, 0);
}

#[test]
fn test_write_images_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let result = Relayout::new().convert_bytes(&sample_pdf()).unwrap();

    let written = result.write_images(dir.path().join("images")).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("page1_img1.png"));

    let bytes = std::fs::read(&written[0]).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}
