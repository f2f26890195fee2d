//! Ruled-table detection.
//!
//! Tables are recovered from drawn lines alone: edges are snapped and joined,
//! their crossings become grid points, every rectangle with four grid-point
//! corners becomes a cell, and cells that touch are grouped into one table.

use std::collections::HashMap;

use super::content::{is_spaceless_script_char, Edge, Orientation, PageLayout, TextSpan};
use super::options::{TableSettings, TableStrategy};
use crate::model::Rect;

const EPS: f32 = 1e-3;

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub bbox: Rect,
}

/// A group of connected cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RuledTable {
    /// Union of every cell box
    pub bbox: Rect,
    pub cells: Vec<Cell>,
}

impl RuledTable {
    /// Arrange cell text into a row-major grid.
    ///
    /// Columns and rows come from the distinct cell boundaries. A cell that
    /// spans several grid positions fills the top-left one; the positions it
    /// covers are left empty.
    pub fn extract(&self, spans: &[TextSpan]) -> Vec<Vec<String>> {
        let xs = distinct(self.cells.iter().map(|c| c.bbox.x0));
        let ys = distinct(self.cells.iter().map(|c| c.bbox.top));

        let mut rows = vec![vec![String::new(); xs.len()]; ys.len()];
        for cell in &self.cells {
            let col = position(&xs, cell.bbox.x0);
            let row = position(&ys, cell.bbox.top);
            if let (Some(row), Some(col)) = (row, col) {
                rows[row][col] = cell_text(&cell.bbox, spans);
            }
        }
        rows
    }
}

/// Finds ruled tables from page edges.
pub struct TableFinder {
    edges: Vec<Edge>,
    settings: TableSettings,
}

impl TableFinder {
    /// Collect the edges of a page according to the strategies in `settings`.
    pub fn from_layout(layout: &PageLayout, settings: &TableSettings) -> Self {
        let mut edges = layout.lines.clone();
        edges.extend(layout.rect_edges.iter().filter(|e| {
            let strategy = match e.orientation {
                Orientation::Horizontal => settings.horizontal_strategy,
                Orientation::Vertical => settings.vertical_strategy,
            };
            strategy != TableStrategy::LinesStrict
        }));
        Self::new(edges, settings.clone())
    }

    pub fn new(edges: Vec<Edge>, settings: TableSettings) -> Self {
        Self { edges, settings }
    }

    /// Run the full pipeline, returning tables top to bottom.
    pub fn find_tables(&self) -> Vec<RuledTable> {
        let s = &self.settings;
        let snapped = snap_edges(self.edges.clone(), s.snap_tolerance);
        let joined = join_edges(snapped, s.join_tolerance);
        let edges: Vec<Edge> = joined
            .into_iter()
            .filter(|e| e.length() >= s.edge_min_length)
            .collect();

        let points = edges_to_intersections(&edges, s.intersection_tolerance);
        let cells = intersections_to_cells(&points, &edges, s.intersection_tolerance);
        cells_to_tables(cells)
    }
}

/// Align parallel edges that lie within `tolerance` of each other.
pub fn snap_edges(edges: Vec<Edge>, tolerance: f32) -> Vec<Edge> {
    let (mut horizontals, mut verticals): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .partition(|e| e.orientation == Orientation::Horizontal);

    snap_group(&mut horizontals, tolerance, |e| e.top, |e, v| {
        e.top = v;
        e.bottom = v;
    });
    snap_group(&mut verticals, tolerance, |e| e.x0, |e, v| {
        e.x0 = v;
        e.x1 = v;
    });

    horizontals.extend(verticals);
    horizontals
}

fn snap_group<F, G>(edges: &mut [Edge], tolerance: f32, key: F, mut set: G)
where
    F: Fn(&Edge) -> f32,
    G: FnMut(&mut Edge, f32),
{
    edges.sort_by(|a, b| key(a).total_cmp(&key(b)));

    let mut start = 0;
    for i in 1..=edges.len() {
        let end_of_cluster = i == edges.len() || key(&edges[i]) - key(&edges[start]) > tolerance;
        if end_of_cluster {
            let mean = (start..i).map(|j| key(&edges[j])).sum::<f32>() / (i - start) as f32;
            for edge in &mut edges[start..i] {
                set(edge, mean);
            }
            start = i;
        }
    }
}

/// Merge collinear segments whose gap is at most `tolerance`.
pub fn join_edges(edges: Vec<Edge>, tolerance: f32) -> Vec<Edge> {
    let (horizontals, verticals): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .partition(|e| e.orientation == Orientation::Horizontal);

    let mut result = join_collinear(
        horizontals,
        |e| e.top,
        |e| (e.x0, e.x1),
        |proto, start, end| Edge::horizontal(start, end, proto.top),
        tolerance,
    );
    result.extend(join_collinear(
        verticals,
        |e| e.x0,
        |e| (e.top, e.bottom),
        |proto, start, end| Edge::vertical(proto.x0, start, end),
        tolerance,
    ));
    result
}

fn join_collinear<K, S, B>(mut edges: Vec<Edge>, key: K, span: S, build: B, tolerance: f32) -> Vec<Edge>
where
    K: Fn(&Edge) -> f32,
    S: Fn(&Edge) -> (f32, f32),
    B: Fn(&Edge, f32, f32) -> Edge,
{
    edges.sort_by(|a, b| {
        key(a)
            .total_cmp(&key(b))
            .then_with(|| span(a).0.total_cmp(&span(b).0))
    });

    let mut result = Vec::new();
    let mut i = 0;
    while i < edges.len() {
        let line = key(&edges[i]);
        let mut j = i + 1;
        while j < edges.len() && (key(&edges[j]) - line).abs() < EPS {
            j += 1;
        }

        let (mut cur_start, mut cur_end) = span(&edges[i]);
        for edge in &edges[i + 1..j] {
            let (s, e) = span(edge);
            if s <= cur_end + tolerance {
                cur_end = cur_end.max(e);
            } else {
                result.push(build(&edges[i], cur_start, cur_end));
                cur_start = s;
                cur_end = e;
            }
        }
        result.push(build(&edges[i], cur_start, cur_end));
        i = j;
    }
    result
}

/// Points where a horizontal and a vertical edge cross, sorted and deduplicated.
pub fn edges_to_intersections(edges: &[Edge], tolerance: f32) -> Vec<(f32, f32)> {
    let mut points = Vec::new();
    for h in edges.iter().filter(|e| e.orientation == Orientation::Horizontal) {
        for v in edges.iter().filter(|e| e.orientation == Orientation::Vertical) {
            if v.x0 >= h.x0 - tolerance
                && v.x0 <= h.x1 + tolerance
                && h.top >= v.top - tolerance
                && h.top <= v.bottom + tolerance
            {
                points.push((v.x0, h.top));
            }
        }
    }

    points.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
    points.dedup_by(|a, b| (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS);
    points
}

/// Build cells from grid points.
///
/// A cell needs all four corners and a drawn edge along each side. When the
/// boundary between two adjacent columns is missing in a row, the cell
/// extends to the next column that closes it.
pub fn intersections_to_cells(points: &[(f32, f32)], edges: &[Edge], tolerance: f32) -> Vec<Cell> {
    let xs = distinct(points.iter().map(|p| p.0));
    let ys = distinct(points.iter().map(|p| p.1));
    let has = |x: f32, y: f32| {
        points
            .iter()
            .any(|p| (p.0 - x).abs() < EPS && (p.1 - y).abs() < EPS)
    };
    let vertical = |x: f32, top: f32, bottom: f32| {
        edges.iter().any(|e| {
            e.orientation == Orientation::Vertical
                && (e.x0 - x).abs() <= tolerance
                && e.top <= top + tolerance
                && e.bottom >= bottom - tolerance
        })
    };
    let horizontal = |y: f32, x0: f32, x1: f32| {
        edges.iter().any(|e| {
            e.orientation == Orientation::Horizontal
                && (e.top - y).abs() <= tolerance
                && e.x0 <= x0 + tolerance
                && e.x1 >= x1 - tolerance
        })
    };

    let mut cells = Vec::new();
    for pair in ys.windows(2) {
        let (top, bottom) = (pair[0], pair[1]);
        let mut xi = 0;
        while xi + 1 < xs.len() {
            let x0 = xs[xi];
            if !(has(x0, top) && has(x0, bottom) && vertical(x0, top, bottom)) {
                xi += 1;
                continue;
            }
            let right = (xi + 1..xs.len()).find(|&xj| {
                has(xs[xj], top) && has(xs[xj], bottom) && vertical(xs[xj], top, bottom)
            });
            match right {
                Some(xj) => {
                    let x1 = xs[xj];
                    if horizontal(top, x0, x1) && horizontal(bottom, x0, x1) {
                        cells.push(Cell {
                            bbox: Rect::new(x0, top, x1, bottom),
                        });
                    }
                    xi = xj;
                }
                None => break,
            }
        }
    }
    cells
}

/// Group cells that share a boundary into tables.
pub fn cells_to_tables(cells: Vec<Cell>) -> Vec<RuledTable> {
    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if cells_share_edge(&cells[i], &cells[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    let mut groups: HashMap<usize, Vec<Cell>> = HashMap::new();
    for (i, cell) in cells.iter().enumerate() {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(*cell);
    }

    let mut tables: Vec<RuledTable> = groups
        .into_values()
        .map(|cells| {
            let bbox = cells
                .iter()
                .skip(1)
                .fold(cells[0].bbox, |acc, c| acc.union(&c.bbox));
            RuledTable { bbox, cells }
        })
        .collect();

    tables.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    tables
}

fn cells_share_edge(a: &Cell, b: &Cell) -> bool {
    let (a, b) = (&a.bbox, &b.bbox);
    let shared_vertical = ((a.x1 - b.x0).abs() < EPS || (a.x0 - b.x1).abs() < EPS)
        && a.top < b.bottom + EPS
        && b.top < a.bottom + EPS;
    let shared_horizontal = ((a.bottom - b.top).abs() < EPS || (a.top - b.bottom).abs() < EPS)
        && a.x0 < b.x1 + EPS
        && b.x0 < a.x1 + EPS;
    shared_vertical || shared_horizontal
}

/// Text of the spans whose centre falls inside `bbox`.
///
/// Spans on one line are joined with a space unless both sides are
/// ideographic; lines are joined with newlines.
fn cell_text(bbox: &Rect, spans: &[TextSpan]) -> String {
    let mut inside: Vec<&TextSpan> = spans
        .iter()
        .filter(|s| {
            let (x, y) = s.bbox.center();
            bbox.contains_point(x, y)
        })
        .collect();
    inside.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Vec<&TextSpan>> = Vec::new();
    for span in inside {
        match lines.last_mut() {
            Some(line)
                if (line[0].bbox.center().1 - span.bbox.center().1).abs()
                    <= line[0].font_size.min(span.font_size) * 0.5 =>
            {
                line.push(span)
            }
            _ => lines.push(vec![span]),
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            join_line(&line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join the spans of one visual line.
pub(crate) fn join_line(spans: &[&TextSpan]) -> String {
    let mut text = String::new();
    for span in spans {
        let piece = span.text.trim();
        if piece.is_empty() {
            continue;
        }
        let glue = match (text.chars().last(), piece.chars().next()) {
            (Some(prev), Some(next)) => {
                !(is_spaceless_script_char(prev) && is_spaceless_script_char(next))
            }
            _ => false,
        };
        if glue {
            text.push(' ');
        }
        text.push_str(piece);
    }
    text
}

fn distinct(values: impl Iterator<Item = f32>) -> Vec<f32> {
    let mut out: Vec<f32> = values.collect();
    out.sort_by(f32::total_cmp);
    out.dedup_by(|a, b| (*a - *b).abs() < EPS);
    out
}

fn position(sorted: &[f32], value: f32) -> Option<usize> {
    sorted.iter().position(|v| (v - value).abs() < EPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Full grid with `cols + 1` vertical and `rows + 1` horizontal lines.
    fn grid(x0: f32, top: f32, col_w: f32, row_h: f32, cols: usize, rows: usize) -> Vec<Edge> {
        let right = x0 + col_w * cols as f32;
        let bottom = top + row_h * rows as f32;
        let mut edges = Vec::new();
        for r in 0..=rows {
            edges.push(Edge::horizontal(x0, right, top + row_h * r as f32));
        }
        for c in 0..=cols {
            edges.push(Edge::vertical(x0 + col_w * c as f32, top, bottom));
        }
        edges
    }

    fn span(text: &str, x: f32, baseline: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, baseline, 20.0, 10.0)
    }

    #[test]
    fn test_snap_aligns_to_mean() {
        let edges = vec![
            Edge::horizontal(0.0, 10.0, 100.0),
            Edge::horizontal(0.0, 10.0, 102.0),
            Edge::horizontal(0.0, 10.0, 110.0),
        ];
        let snapped = snap_edges(edges, 3.0);
        assert_eq!(snapped[0].top, 101.0);
        assert_eq!(snapped[1].top, 101.0);
        assert_eq!(snapped[2].top, 110.0);
    }

    #[test]
    fn test_join_merges_small_gaps() {
        let edges = vec![
            Edge::horizontal(0.0, 50.0, 10.0),
            Edge::horizontal(52.0, 100.0, 10.0),
            Edge::horizontal(120.0, 150.0, 10.0),
        ];
        let joined = join_edges(edges, 3.0);
        assert_eq!(joined.len(), 2);
        assert_eq!((joined[0].x0, joined[0].x1), (0.0, 100.0));
        assert_eq!((joined[1].x0, joined[1].x1), (120.0, 150.0));
    }

    #[test]
    fn test_full_grid_cells() {
        let finder = TableFinder::new(grid(50.0, 100.0, 100.0, 20.0, 3, 4), TableSettings::default());
        let tables = finder.find_tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cells.len(), 12);
        assert_eq!(tables[0].bbox, Rect::new(50.0, 100.0, 350.0, 180.0));
    }

    #[test]
    fn test_separate_grids_are_separate_tables() {
        let mut edges = grid(50.0, 100.0, 100.0, 20.0, 2, 2);
        edges.extend(grid(50.0, 400.0, 100.0, 20.0, 2, 3));
        let tables = TableFinder::new(edges, TableSettings::default()).find_tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].cells.len(), 4);
        assert_eq!(tables[1].cells.len(), 6);
    }

    #[test]
    fn test_short_edges_and_lone_lines_ignored() {
        let edges = vec![
            Edge::horizontal(0.0, 500.0, 50.0),
            Edge::vertical(10.0, 300.0, 301.0),
        ];
        let tables = TableFinder::new(edges, TableSettings::default()).find_tables();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_merged_cell_spans_columns() {
        // Top row has no inner vertical line.
        let mut edges = vec![
            Edge::horizontal(0.0, 200.0, 0.0),
            Edge::horizontal(0.0, 200.0, 20.0),
            Edge::horizontal(0.0, 200.0, 40.0),
            Edge::vertical(0.0, 0.0, 40.0),
            Edge::vertical(200.0, 0.0, 40.0),
        ];
        edges.push(Edge::vertical(100.0, 20.0, 40.0));
        let tables = TableFinder::new(edges, TableSettings::default()).find_tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cells.len(), 3);

        let rows = tables[0].extract(&[span("标题", 80.0, 15.0), span("左", 10.0, 35.0)]);
        assert_eq!(rows, vec![vec!["标题".to_string(), String::new()], vec!["左".into(), "".into()]]);
    }

    #[test]
    fn test_extract_places_text_by_centre() {
        let tables =
            TableFinder::new(grid(0.0, 0.0, 100.0, 20.0, 2, 2), TableSettings::default()).find_tables();
        let spans = vec![
            span("项目", 5.0, 15.0),
            span("本期", 105.0, 15.0),
            span("营业收入", 5.0, 35.0),
            span("1,000", 105.0, 35.0),
            span("outside", 300.0, 35.0),
        ];
        let rows = tables[0].extract(&spans);
        assert_eq!(
            rows,
            vec![
                vec!["项目".to_string(), "本期".to_string()],
                vec!["营业收入".to_string(), "1,000".to_string()],
            ]
        );
    }

    #[test]
    fn test_strict_strategy_skips_filled_rects() {
        let layout = PageLayout {
            rect_edges: grid(0.0, 0.0, 100.0, 20.0, 2, 2),
            ..PageLayout::default()
        };
        let lines = TableFinder::from_layout(&layout, &TableSettings::default()).find_tables();
        assert_eq!(lines.len(), 1);

        let strict = TableSettings::default().with_strategy(TableStrategy::LinesStrict);
        assert!(TableFinder::from_layout(&layout, &strict).find_tables().is_empty());
    }

    #[test]
    fn test_join_line_spacing() {
        let a = span("营业", 0.0, 10.0);
        let b = span("收入", 20.0, 10.0);
        let c = span("2023", 40.0, 10.0);
        assert_eq!(join_line(&[&a, &b, &c]), "营业收入 2023");
    }
}
