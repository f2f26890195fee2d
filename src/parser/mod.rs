//! PDF parsing module.

mod backend;
mod content;
mod layout;
mod options;
mod ruling;

pub use backend::{LopdfBackend, LopdfPdf, PageTable, PdfBackend, PdfDocument};
pub use content::{
    decode_text_simple, Edge, FormXObject, Matrix, Orientation, PageLayout, PageResources,
    TextSpan, MAX_FORM_DEPTH,
};
pub use layout::{build_blocks, TextBlock, TextLine};
pub use options::{TableSettings, TableStrategy};
pub use ruling::{Cell, RuledTable, TableFinder};
