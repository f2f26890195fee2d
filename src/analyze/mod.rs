//! Statement recognition.
//!
//! [`PageScanner`] splits each page into table regions and narrative blocks,
//! [`classify`] and [`validate`] decide what a table is and whether it is
//! complete, and [`ReportAggregator`] keeps the best table per statement.

mod aggregator;
mod classifier;
mod scanner;
mod validator;

pub use aggregator::{aggregate, ReportAggregator};
pub use classifier::{classify, HEADER_ROWS};
pub use scanner::{PageScan, PageScanner, ScannedTable};
pub use validator::{required_keywords, validate};
