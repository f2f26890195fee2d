//! Output options and artifact naming.

use std::path::{Path, PathBuf};

/// Options for the spreadsheet and word document written per report.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    /// Typeface for document runs, also used for East Asian text
    pub font_family: String,

    /// Font size in points
    pub font_size: u32,

    /// Upper bound on spreadsheet column width, in characters
    pub max_column_width: usize,

    /// Characters added to the widest cell of a column
    pub column_padding: usize,

    /// Appended to the title to name the spreadsheet
    pub spreadsheet_suffix: String,

    /// Appended to the title to name the word document
    pub document_suffix: String,
}

impl OutputOptions {
    /// Create new output options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the typeface.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the font size in points.
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size.max(1);
        self
    }

    /// Set the column width cap.
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// Set the column padding.
    pub fn with_column_padding(mut self, padding: usize) -> Self {
        self.column_padding = padding;
        self
    }

    /// Set both filename suffixes.
    pub fn with_suffixes(
        mut self,
        spreadsheet: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        self.spreadsheet_suffix = spreadsheet.into();
        self.document_suffix = document.into();
        self
    }

    /// File name of the spreadsheet for a report title.
    pub fn spreadsheet_name(&self, title: &str) -> String {
        format!("{}{}", title, self.spreadsheet_suffix)
    }

    /// File name of the word document for a report title.
    pub fn document_name(&self, title: &str) -> String {
        format!("{}{}", title, self.document_suffix)
    }

    /// Spreadsheet location beside `source`.
    pub fn spreadsheet_path(&self, source: &Path, title: &str) -> PathBuf {
        sibling(source, &self.spreadsheet_name(title))
    }

    /// Word document location beside `source`.
    pub fn document_path(&self, source: &Path, title: &str) -> PathBuf {
        sibling(source, &self.document_name(title))
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            font_family: "宋体".to_string(),
            font_size: 12,
            max_column_width: 50,
            column_padding: 2,
            spreadsheet_suffix: "_数据.xlsx".to_string(),
            document_suffix: "_文本.docx".to_string(),
        }
    }
}

fn sibling(source: &Path, name: &str) -> PathBuf {
    match source.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Title of a report: the source file name without extension.
pub fn report_title(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Short display path: the last three directory components of `source`
/// followed by `file_name`, joined with `/`.
pub fn display_path(source: &Path, file_name: &str) -> String {
    let dirs: Vec<String> = source
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let start = dirs.len().saturating_sub(3);
    let mut parts: Vec<&str> = dirs[start..].iter().map(String::as_str).collect();
    parts.push(file_name);
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = OutputOptions::default();
        assert_eq!(options.font_family, "宋体");
        assert_eq!(options.font_size, 12);
        assert_eq!(options.max_column_width, 50);
        assert_eq!(options.column_padding, 2);
    }

    #[test]
    fn test_artifact_names() {
        let options = OutputOptions::default();
        let source = Path::new("/data/downloads/600000/年报/2023年年报.pdf");
        let title = report_title(source);
        assert_eq!(title, "2023年年报");
        assert_eq!(
            options.spreadsheet_path(source, &title),
            PathBuf::from("/data/downloads/600000/年报/2023年年报_数据.xlsx")
        );
        assert_eq!(
            options.document_path(source, &title),
            PathBuf::from("/data/downloads/600000/年报/2023年年报_文本.docx")
        );
    }

    #[test]
    fn test_display_path_keeps_three_directories() {
        let source = Path::new("/data/downloads/600000/年报/2023.pdf");
        assert_eq!(
            display_path(source, "2023_数据.xlsx"),
            "downloads/600000/年报/2023_数据.xlsx"
        );

        let shallow = Path::new("reports/2023.pdf");
        assert_eq!(display_path(shallow, "2023_文本.docx"), "reports/2023_文本.docx");
    }

    #[test]
    fn test_builder() {
        let options = OutputOptions::new()
            .with_font_family("SimSun")
            .with_font_size(0)
            .with_suffixes(".xlsx", ".docx");
        assert_eq!(options.font_size, 1);
        assert_eq!(options.spreadsheet_name("a"), "a.xlsx");
        assert_eq!(options.document_name("a"), "a.docx");
    }
}
