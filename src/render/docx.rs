//! Word document output for narrative text.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, RunFonts, Style, StyleType};

use super::OutputOptions;
use crate::error::{Error, Result};
use crate::model::NarrativeText;

const HEADING_STYLE: &str = "Heading1";

fn fonts(options: &OutputOptions) -> RunFonts {
    RunFonts::new()
        .ascii(&options.font_family)
        .hi_ansi(&options.font_family)
        .east_asia(&options.font_family)
}

fn run(text: &str, options: &OutputOptions) -> Run {
    // Run sizes are in half-points.
    Run::new()
        .add_text(text)
        .fonts(fonts(options))
        .size(options.font_size as usize * 2)
}

/// Serialize the narrative under a centered title heading.
///
/// Each non-blank block becomes one justified paragraph. Returns `None` when
/// no block has visible text.
pub fn build_document(
    title: &str,
    narrative: &NarrativeText,
    options: &OutputOptions,
) -> Result<Option<Vec<u8>>> {
    if !narrative.has_content() {
        return Ok(None);
    }

    let heading = Style::new(HEADING_STYLE, StyleType::Paragraph)
        .name("Heading 1")
        .bold();

    let mut docx = Docx::new()
        .default_fonts(fonts(options))
        .default_size(options.font_size as usize * 2)
        .add_style(heading)
        .add_paragraph(
            Paragraph::new()
                .style(HEADING_STYLE)
                .align(AlignmentType::Center)
                .add_run(run(title, options)),
        );

    for text in narrative.paragraphs() {
        docx = docx.add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Both)
                .add_run(run(text, options)),
        );
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| Error::Document(e.to_string()))?;
    Ok(Some(buffer.into_inner()))
}

/// Write the document to `path`. Returns whether a file was written.
pub fn save_document(
    title: &str,
    narrative: &NarrativeText,
    path: &Path,
    options: &OutputOptions,
) -> Result<bool> {
    match build_document(title, narrative, options)? {
        Some(bytes) => {
            fs::write(path, bytes)?;
            log::info!("wrote narrative to {}", path.display());
            Ok(true)
        }
        None => Ok(false),
    }
}
