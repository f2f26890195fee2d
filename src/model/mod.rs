//! Data model shared by the extraction pipeline.
//!
//! Tables flow from the PDF backend as [`RawTable`]s, are tagged with a
//! [`StatementKind`] by the classifier, and end up in a per-document
//! [`FinancialTableSet`]. Prose outside tables is collected as
//! [`NarrativeText`].

mod geometry;
mod report;
mod statement;
mod table;

pub use geometry::Rect;
pub use report::{AnalysisResult, BatchOutcome, FinancialTableSet, NarrativeText, OutputFiles};
pub use statement::{StatementFamily, StatementKind};
pub use table::{ClassifiedTable, RawTable};
