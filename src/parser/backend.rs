//! PDF backend abstraction layer.
//!
//! The analysis pipeline only needs three things from a PDF: how many pages it
//! has, the ruled tables on a page, and the text blocks on a page. The
//! [`PdfBackend`] and [`PdfDocument`] traits isolate those needs from the
//! concrete PDF library (lopdf), so tests can substitute scripted documents.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::content::{
    decode_text_simple, get_number, ContentInterpreter, FormXObject, Matrix, PageLayout,
    PageResources,
};
use super::layout::{build_blocks, TextBlock};
use super::options::TableSettings;
use super::ruling::TableFinder;
use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::Rect;

/// A table region found on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTable {
    /// Region covered by the table
    pub bbox: Rect,
    /// Number of detected cells
    pub cell_count: usize,
    /// Cell text, row-major
    pub rows: Vec<Vec<String>>,
}

/// Opens PDF files.
pub trait PdfBackend: Send + Sync {
    /// Short identifier used in log output.
    fn name(&self) -> &str;

    /// Open a document. The handle is released when the returned box drops.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>>;
}

/// An open PDF document. Page indices are 0-based.
pub trait PdfDocument {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Ruled tables on a page, top to bottom.
    fn find_tables(&self, page: usize, settings: &TableSettings) -> Result<Vec<PageTable>>;

    /// Text blocks on a page in reading order.
    ///
    /// A block never mixes lines inside one of `regions` with lines outside
    /// it, so prose next to a table stays separate from the table's text.
    fn text_blocks(&self, page: usize, regions: &[Rect]) -> Result<Vec<TextBlock>>;
}

/// Default page size (US Letter) when a page has no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Concrete [`PdfBackend`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for LopdfBackend {
    fn name(&self) -> &str {
        "lopdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>> {
        detect_format_from_path(path)?;
        let doc = LopdfDocument::load(path)?;
        log::debug!("opened {} ({} pages)", path.display(), doc.get_pages().len());
        Ok(Box::new(LopdfPdf::new(doc)))
    }
}

/// A document loaded by lopdf.
pub struct LopdfPdf {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
    // Tables and blocks of the same page are requested back to back.
    cache: RefCell<Option<(usize, Rc<PageLayout>)>>,
}

impl LopdfPdf {
    /// Wrap a loaded document.
    pub fn new(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages().into_values().collect();
        Self {
            doc,
            pages,
            cache: RefCell::new(None),
        }
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(LopdfDocument::load_mem(data)?))
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        self.pages
            .get(page)
            .copied()
            .ok_or(Error::PageOutOfRange(page + 1, self.pages.len()))
    }

    /// Interpret a page's content stream, reusing the last result.
    pub fn layout(&self, page: usize) -> Result<Rc<PageLayout>> {
        if let Some((cached, layout)) = self.cache.borrow().as_ref() {
            if *cached == page {
                return Ok(Rc::clone(layout));
            }
        }

        let page_id = self.page_id(page)?;
        let (width, height) = self.page_size(page_id);
        let resources = LopdfResources::for_page(&self.doc, page_id);
        let content = self.doc.get_page_content(page_id)?;
        let operations = Content::decode(&content)?.operations;

        let layout = Rc::new(ContentInterpreter::new(width, height).run(&operations, &resources));
        log::trace!(
            "page {}: {} spans, {} lines, {} rect edges",
            page + 1,
            layout.spans.len(),
            layout.lines.len(),
            layout.rect_edges.len()
        );

        *self.cache.borrow_mut() = Some((page, Rc::clone(&layout)));
        Ok(layout)
    }

    /// MediaBox size, inherited through the page tree.
    fn page_size(&self, page_id: ObjectId) -> (f32, f32) {
        inherited(&self.doc, page_id, b"MediaBox")
            .and_then(|media_box| box_size(&self.doc, media_box))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Font and XObject resources of a page or a form XObject.
#[derive(Clone)]
struct LopdfResources<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    xobjects: Option<&'a Dictionary>,
}

impl<'a> LopdfResources<'a> {
    fn for_page(doc: &'a LopdfDocument, page_id: ObjectId) -> Self {
        // Pages without a font resource fall back to raw string decoding.
        let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
        let xobjects = inherited(doc, page_id, b"Resources")
            .and_then(|r| resolve(doc, r))
            .and_then(|r| r.as_dict().ok())
            .and_then(|r| sub_dictionary(doc, r, b"XObject"));
        Self {
            doc,
            fonts,
            xobjects,
        }
    }

    fn from_dictionary(doc: &'a LopdfDocument, resources: &'a Dictionary) -> Self {
        let fonts = sub_dictionary(doc, resources, b"Font")
            .map(|fonts| {
                fonts
                    .iter()
                    .filter_map(|(name, font)| {
                        let font = resolve(doc, font)?.as_dict().ok()?;
                        Some((name.clone(), font))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            doc,
            fonts,
            xobjects: sub_dictionary(doc, resources, b"XObject"),
        }
    }
}

impl PageResources for LopdfResources<'_> {
    fn decode_text(&self, font: &[u8], bytes: &[u8]) -> String {
        if let Some(font_dict) = self.fonts.get(font) {
            if let Ok(enc) = font_dict.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn form_xobject(&self, name: &[u8]) -> Option<FormXObject<'_>> {
        let entry = self.xobjects?.get(name).ok()?;
        let stream = resolve(self.doc, entry)?.as_stream().ok()?;
        let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok()?;
        if subtype != &b"Form"[..] {
            return None;
        }

        let content = if stream.dict.has(b"Filter") {
            stream.decompressed_content().ok()?
        } else {
            stream.content.clone()
        };
        let operations = match Content::decode(&content) {
            Ok(content) => content.operations,
            Err(e) => {
                log::debug!("form XObject /{}: {}", String::from_utf8_lossy(name), e);
                return None;
            }
        };
        let matrix = stream
            .dict
            .get(b"Matrix")
            .and_then(Object::as_array)
            .ok()
            .and_then(|m| Matrix::from_operands(m))
            .unwrap_or(Matrix::IDENTITY);

        // Forms without their own resources use the invoking ones.
        let resources: Box<dyn PageResources + '_> =
            match sub_dictionary(self.doc, &stream.dict, b"Resources") {
                Some(dict) => Box::new(LopdfResources::from_dictionary(self.doc, dict)),
                None => Box::new(self.clone()),
            };

        Some(FormXObject {
            matrix,
            operations,
            resources,
        })
    }
}

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn sub_dictionary<'a>(doc: &'a LopdfDocument, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Dictionary> {
    resolve(doc, dict.get(key).ok()?)?.as_dict().ok()
}

/// A page attribute, looked up through the `Parent` chain.
fn inherited<'a>(doc: &'a LopdfDocument, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok();
    while let Some(dict) = node {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        node = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }
    None
}

fn box_size(doc: &LopdfDocument, obj: &Object) -> Option<(f32, f32)> {
    let n: Vec<f32> = resolve(doc, obj)?
        .as_array()
        .ok()?
        .iter()
        .filter_map(get_number)
        .collect();
    if n.len() < 4 {
        return None;
    }
    Some(((n[2] - n[0]).abs(), (n[3] - n[1]).abs()))
}

impl PdfDocument for LopdfPdf {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn find_tables(&self, page: usize, settings: &TableSettings) -> Result<Vec<PageTable>> {
        let layout = self.layout(page)?;
        let tables = TableFinder::from_layout(&layout, settings).find_tables();
        Ok(tables
            .into_iter()
            .map(|t| PageTable {
                bbox: t.bbox,
                cell_count: t.cells.len(),
                rows: t.extract(&layout.spans),
            })
            .collect())
    }

    fn text_blocks(&self, page: usize, regions: &[Rect]) -> Result<Vec<TextBlock>> {
        let layout = self.layout(page)?;
        Ok(build_blocks(layout.spans.clone(), regions))
    }
}
