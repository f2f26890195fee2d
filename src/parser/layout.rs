//! Grouping of text spans into lines and blocks.
//!
//! A block is a run of consecutive lines with regular spacing, a stable font
//! size and a stable left margin. Blocks are the unit in which prose is
//! carried into the narrative document and tested against table regions, so
//! a block never spans a region boundary.

use super::content::TextSpan;
use super::ruling::join_line;
use crate::model::Rect;

/// Spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Spans sorted left to right
    pub spans: Vec<TextSpan>,
    /// Union of the span boxes
    pub bbox: Rect,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a line from spans. No spans yields an empty line at the origin.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let bbox = spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();

        // Weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted / total_chars as f32
        } else {
            spans.first().map(|s| s.font_size).unwrap_or(0.0)
        };

        Self {
            spans,
            bbox,
            font_size,
        }
    }

    /// Baseline position, top-down.
    pub fn baseline(&self) -> f32 {
        self.bbox.bottom - self.font_size * 0.2
    }

    /// Combined text of the spans.
    pub fn text(&self) -> String {
        let refs: Vec<&TextSpan> = self.spans.iter().collect();
        join_line(&refs)
    }
}

/// A paragraph-like group of lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Union of the line boxes
    pub bbox: Rect,
    /// Line texts joined with newlines
    pub text: String,
}

impl TextBlock {
    fn from_lines(lines: &[TextLine]) -> Self {
        let bbox = lines
            .iter()
            .map(|l| l.bbox)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();
        let text = lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n");
        Self { bbox, text }
    }
}

/// Group spans into blocks in reading order (top to bottom).
///
/// Lines overlapping one of `regions` (table boxes) are never grouped with
/// lines outside it.
pub fn build_blocks(spans: Vec<TextSpan>, regions: &[Rect]) -> Vec<TextBlock> {
    let lines = group_spans_into_lines(spans);
    group_lines_into_blocks(&lines, regions)
}

/// Y-based line grouping.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.retain(|s| !s.text.trim().is_empty());
    spans.sort_by(|a, b| {
        baseline(a)
            .total_cmp(&baseline(b))
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y = baseline(&span);
        // Allow 30% of font size variance
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(line_y) if (y - line_y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Group lines into blocks based on spacing, font size, indentation and the
/// region each line falls in.
pub fn group_lines_into_blocks(lines: &[TextLine], regions: &[Rect]) -> Vec<TextBlock> {
    if lines.is_empty() {
        return vec![];
    }

    let avg_spacing = calculate_avg_line_spacing(lines);
    let region_of: Vec<Option<usize>> = lines
        .iter()
        .map(|line| regions.iter().position(|r| line.bbox.intersects(r)))
        .collect();
    let mut blocks = Vec::new();
    let mut start = 0;

    for i in 1..lines.len() {
        if region_of[i - 1] != region_of[i]
            || should_break_block(&lines[i - 1], &lines[i], avg_spacing)
        {
            blocks.push(TextBlock::from_lines(&lines[start..i]));
            start = i;
        }
    }
    blocks.push(TextBlock::from_lines(&lines[start..]));

    log::trace!("grouped {} lines into {} blocks", lines.len(), blocks.len());
    blocks
}

fn calculate_avg_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[1].baseline() - w[0].baseline()).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    let spacing = (curr.baseline() - prev.baseline()).abs();

    // Blank line, or more than two lines' worth of gap
    if spacing > avg_spacing * 1.5 || spacing > prev.font_size.max(curr.font_size) * 2.5 {
        return true;
    }

    if (prev.font_size - curr.font_size).abs() > 1.0 {
        return true;
    }

    // Left margin change (indentation)
    (prev.bbox.x0 - curr.bbox.x0).abs() > 20.0
}

fn baseline(span: &TextSpan) -> f32 {
    span.bbox.bottom - span.font_size * 0.2
}
