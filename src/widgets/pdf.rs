//! PDF assembly: merging documents and laying images out on A4 pages.

use image::{DynamicImage, GenericImageView};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

use super::compressor::compress_image;

/// A4 in points.
pub const A4_WIDTH: f64 = 595.0;
pub const A4_HEIGHT: f64 = 842.0;
/// 10 mm.
pub const PAGE_MARGIN: f64 = 28.0;

/// JPEG quality used when embedding images.
const EMBED_QUALITY: f64 = 0.92;

/// Page attributes a page may inherit from its ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];
const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("At least 2 documents are needed, got {0}")]
    NotEnoughDocuments(usize),
    #[error("No images to convert")]
    NoImages,
    #[error("Document is encrypted")]
    Encrypted,
    #[error("Document has no pages")]
    NoPages,
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Concatenate documents, pages in input order then page order.
pub fn merge_pdfs(sources: &[Vec<u8>]) -> Result<Vec<u8>, PdfError> {
    if sources.len() < 2 {
        return Err(PdfError::NotEnoughDocuments(sources.len()));
    }

    let mut merged = Document::with_version("1.5");
    let pages_id = merged.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for bytes in sources {
        let mut doc = Document::load_mem(bytes)?;
        if doc.trailer.has(b"Encrypt") {
            return Err(PdfError::Encrypted);
        }
        doc.renumber_objects_with(merged.max_id + 1);
        merged.max_id = merged.max_id.max(doc.max_id);

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(PdfError::NoPages);
        }

        let mut pages = Vec::with_capacity(page_ids.len());
        for &page_id in &page_ids {
            let mut page = flattened_page(&doc, page_id)?;
            page.set("Parent", pages_id);
            pages.push((page_id, page));
        }

        let root = doc.trailer.get(b"Root").and_then(Object::as_reference).ok();
        for (id, object) in doc.objects {
            let structural = Some(id) == root
                || page_ids.contains(&id)
                || matches!(object.type_name(), Ok("Pages") | Ok("Catalog"));
            if !structural {
                merged.objects.insert(id, object);
            }
        }

        for (page_id, page) in pages {
            merged.objects.insert(page_id, Object::Dictionary(page));
            kids.push(page_id.into());
        }
    }

    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    merged.prune_objects();

    save(merged)
}

/// Copy of a page dictionary with inherited attributes made explicit, so it
/// can be moved under a different parent.
fn flattened_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, PdfError> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(page)
}

/// Scale `(width, height)` to fit inside the box, keeping the aspect ratio.
pub fn fit_within(width: f64, height: f64, max_width: f64, max_height: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (max_width / width).min(max_height / height);
    (width * scale, height * scale)
}

/// One A4 page per image, centred inside the margin.
pub fn images_to_pdf(images: &[DynamicImage]) -> Result<Vec<u8>, PdfError> {
    if images.is_empty() {
        return Err(PdfError::NoImages);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(images.len());

    for image in images {
        let (width, height) = image.dimensions();
        let jpeg = compress_image(image, EMBED_QUALITY)?;
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let (draw_w, draw_h) = fit_within(
            width as f64,
            height as f64,
            A4_WIDTH - 2.0 * PAGE_MARGIN,
            A4_HEIGHT - 2.0 * PAGE_MARGIN,
        );
        let x = (A4_WIDTH - draw_w) / 2.0;
        let y = (A4_HEIGHT - draw_h) / 2.0;
        let points = |v: f64| Object::Integer(v.round() as i64);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![points(draw_w), 0.into(), 0.into(), points(draw_h), points(x), points(y)],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), points(A4_WIDTH), points(A4_HEIGHT)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    save(doc)
}

/// Number of pages in a document.
pub fn page_count(bytes: &[u8]) -> Result<usize, PdfError> {
    Ok(Document::load_mem(bytes)?.get_pages().len())
}

fn save(mut doc: Document) -> Result<Vec<u8>, PdfError> {
    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    /// A one-page document whose MediaBox lives on the page tree node.
    fn inherited_mediabox_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => dictionary! {},
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        save(doc).unwrap()
    }

    /// `bytes` re-saved with a standard security handler in the trailer.
    pub(crate) fn with_encrypt_entry(bytes: &[u8]) -> Vec<u8> {
        let mut doc = Document::load_mem(bytes).unwrap();
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);
        save(doc).unwrap()
    }

    // =========================================================================
    // Images to PDF
    // =========================================================================

    #[test]
    fn test_one_page_per_image() {
        let images = vec![solid(40, 20, [255, 0, 0]), solid(20, 40, [0, 255, 0])];
        let pdf = images_to_pdf(&images).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(page_count(&pdf).unwrap(), 2);
    }

    #[test]
    fn test_no_images() {
        assert!(matches!(images_to_pdf(&[]), Err(PdfError::NoImages)));
    }

    #[test]
    fn test_fit_within_keeps_aspect() {
        let (w, h) = fit_within(1000.0, 500.0, 539.0, 786.0);
        assert!((w - 539.0).abs() < 1e-9);
        assert!((h - 269.5).abs() < 1e-9);

        let (w, h) = fit_within(100.0, 400.0, 539.0, 786.0);
        assert!((h - 786.0).abs() < 1e-9);
        assert!((w - 196.5).abs() < 1e-9);

        assert_eq!(fit_within(0.0, 10.0, 100.0, 100.0), (0.0, 0.0));
    }

    #[test]
    fn test_pages_are_a4() {
        let pdf = images_to_pdf(&[solid(10, 10, [0, 0, 0])]).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 595);
        assert_eq!(media_box[3].as_i64().unwrap(), 842);
    }

    // =========================================================================
    // Merge
    // =========================================================================

    #[test]
    fn test_merge_concatenates_pages() {
        let one = images_to_pdf(&[solid(10, 10, [1, 2, 3])]).unwrap();
        let two = images_to_pdf(&[solid(10, 10, [4, 5, 6]), solid(10, 10, [7, 8, 9])]).unwrap();

        let merged = merge_pdfs(&[one, two]).unwrap();
        assert_eq!(page_count(&merged).unwrap(), 3);
    }

    #[test]
    fn test_merge_keeps_input_order() {
        let small = images_to_pdf(&[solid(10, 10, [0, 0, 0])]).unwrap();
        let wide = images_to_pdf(&[solid(400, 100, [0, 0, 0])]).unwrap();
        let merged = merge_pdfs(&[small.clone(), wide, small]).unwrap();

        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        // Each page draws its own image; the second is the wide one.
        let widths: Vec<i64> = doc
            .get_pages()
            .values()
            .map(|&id| {
                let page = doc.get_dictionary(id).unwrap();
                let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
                let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
                let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
                let stream = doc.get_object(image_id).unwrap().as_stream().unwrap();
                stream.dict.get(b"Width").unwrap().as_i64().unwrap()
            })
            .collect();
        assert_eq!(widths, vec![10, 400, 10]);
    }

    #[test]
    fn test_merge_flattens_inherited_attributes() {
        let inherited = inherited_mediabox_pdf();
        let plain = images_to_pdf(&[solid(10, 10, [0, 0, 0])]).unwrap();
        let merged = merge_pdfs(&[inherited, plain]).unwrap();

        let doc = Document::load_mem(&merged).unwrap();
        let (_, first) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(first).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 612);
    }

    #[test]
    fn test_merge_needs_two_documents() {
        let one = images_to_pdf(&[solid(10, 10, [0, 0, 0])]).unwrap();
        assert!(matches!(
            merge_pdfs(&[one]),
            Err(PdfError::NotEnoughDocuments(1))
        ));
    }

    #[test]
    fn test_merge_rejects_encrypted_input() {
        let plain = images_to_pdf(&[solid(10, 10, [0, 0, 0])]).unwrap();
        let locked = with_encrypt_entry(&plain);
        assert!(matches!(
            merge_pdfs(&[plain, locked]),
            Err(PdfError::Encrypted)
        ));
    }

    #[test]
    fn test_merge_rejects_garbage() {
        let one = images_to_pdf(&[solid(10, 10, [0, 0, 0])]).unwrap();
        let garbage = b"definitely not a pdf".to_vec();
        assert!(merge_pdfs(&[one, garbage]).is_err());
    }
}
