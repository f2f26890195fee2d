//! Content stream interpretation.
//!
//! Walks the operators of a page content stream and collects positioned text
//! spans and straight ruling edges. All output coordinates are in PDF points
//! with the origin at the top-left corner of the page. Form XObjects invoked
//! with `Do` are interpreted in place.

use lopdf::content::Operation;
use lopdf::Object;

use crate::model::Rect;

/// Affine transform `[a b c d e f]` as used by `cm` and `Tm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub(crate) fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6].iter().filter_map(get_number).collect();
        if n.len() < 6 {
            return None;
        }
        Some(Matrix {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A run of text shown by a single text operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Text as decoded from the content stream
    pub text: String,
    /// Estimated glyph box
    pub bbox: Rect,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span from its baseline origin (top-left page coordinates).
    pub fn new(text: String, x: f32, baseline: f32, width: f32, font_size: f32) -> Self {
        Self {
            bbox: Rect::new(
                x,
                baseline - font_size * 0.8,
                x + width,
                baseline + font_size * 0.2,
            ),
            text,
            font_size,
        }
    }
}

/// Direction of a ruling edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An axis-aligned line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
    pub orientation: Orientation,
}

impl Edge {
    /// Horizontal edge at `y` spanning `x0..x1`.
    pub fn horizontal(x0: f32, x1: f32, y: f32) -> Self {
        Self {
            x0: x0.min(x1),
            top: y,
            x1: x0.max(x1),
            bottom: y,
            orientation: Orientation::Horizontal,
        }
    }

    /// Vertical edge at `x` spanning `top..bottom`.
    pub fn vertical(x: f32, top: f32, bottom: f32) -> Self {
        Self {
            x0: x,
            top: top.min(bottom),
            x1: x,
            bottom: top.max(bottom),
            orientation: Orientation::Vertical,
        }
    }

    /// Length along the edge direction.
    pub fn length(&self) -> f32 {
        match self.orientation {
            Orientation::Horizontal => self.x1 - self.x0,
            Orientation::Vertical => self.bottom - self.top,
        }
    }
}

/// Everything the table finder and block builder need from one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub spans: Vec<TextSpan>,
    /// Edges from stroked paths
    pub lines: Vec<Edge>,
    /// Edges from the borders of rectangles that were only filled
    pub rect_edges: Vec<Edge>,
}

/// Deepest form XObject nesting that is still interpreted.
pub const MAX_FORM_DEPTH: usize = 10;

/// Named resources a content stream refers to.
pub trait PageResources {
    /// Decode string bytes shown with the font resource `font`.
    fn decode_text(&self, font: &[u8], bytes: &[u8]) -> String;

    /// The form XObject named `name`. Images and unknown names yield `None`.
    fn form_xobject(&self, name: &[u8]) -> Option<FormXObject<'_>>;
}

/// A form XObject ready to be interpreted.
pub struct FormXObject<'r> {
    /// Form space to user space
    pub matrix: Matrix,
    pub operations: Vec<Operation>,
    /// Resources in effect inside the form
    pub resources: Box<dyn PageResources + 'r>,
}

type Segment = ((f32, f32), (f32, f32));

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font_name: Vec<u8>,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font_name: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
        }
    }
}

/// Interprets one page's operators into a [`PageLayout`].
pub struct ContentInterpreter {
    height: f32,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
    path: Vec<Segment>,
    rect_path: Vec<Segment>,
    current: Option<(f32, f32)>,
    subpath_start: Option<(f32, f32)>,
    layout: PageLayout,
}

impl ContentInterpreter {
    /// Create an interpreter for a page of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            height,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
            path: Vec::new(),
            rect_path: Vec::new(),
            current: None,
            subpath_start: None,
            layout: PageLayout {
                width,
                height,
                ..PageLayout::default()
            },
        }
    }

    /// Run every operation and return the collected layout.
    pub fn run(mut self, operations: &[Operation], resources: &dyn PageResources) -> PageLayout {
        self.run_operations(operations, resources, 0);
        self.layout
    }

    fn run_operations(&mut self, operations: &[Operation], resources: &dyn PageResources, depth: usize) {
        for op in operations {
            self.step(op, resources, depth);
        }
    }

    fn step(&mut self, op: &Operation, resources: &dyn PageResources, depth: usize) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }

            // Path construction
            "m" => {
                if let Some((x, y)) = point(operands) {
                    let p = self.state.ctm.apply(x, y);
                    self.current = Some(p);
                    self.subpath_start = Some(p);
                }
            }
            "l" => {
                if let Some((x, y)) = point(operands) {
                    let p = self.state.ctm.apply(x, y);
                    if let Some(from) = self.current {
                        self.path.push((from, p));
                    }
                    self.current = Some(p);
                }
            }
            "c" | "v" | "y" => {
                // Curves never form ruling lines; only track the end point.
                let n = operands.len();
                if n >= 2 {
                    if let Some((x, y)) = point(&operands[n - 2..]) {
                        self.current = Some(self.state.ctm.apply(x, y));
                    }
                }
            }
            "h" => self.close_subpath(),
            "re" => {
                let n: Vec<f32> = operands.iter().filter_map(get_number).collect();
                if n.len() >= 4 {
                    let ctm = self.state.ctm;
                    let (x, y, w, h) = (n[0], n[1], n[2], n[3]);
                    let corners = [
                        ctm.apply(x, y),
                        ctm.apply(x + w, y),
                        ctm.apply(x + w, y + h),
                        ctm.apply(x, y + h),
                    ];
                    for i in 0..4 {
                        self.rect_path.push((corners[i], corners[(i + 1) % 4]));
                    }
                    self.current = Some(corners[0]);
                    self.subpath_start = Some(corners[0]);
                }
            }

            // Path painting
            "S" => self.paint(true, false),
            "s" => {
                self.close_subpath();
                self.paint(true, false);
            }
            "f" | "F" | "f*" => self.paint(false, true),
            "B" | "B*" => self.paint(true, true),
            "b" | "b*" => {
                self.close_subpath();
                self.paint(true, true);
            }
            "n" => self.clear_path(),

            // External objects
            "Do" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.invoke_form(name, resources, depth);
                }
            }

            // Text state
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if operands.len() >= 2 {
                    if let Object::Name(name) = &operands[0] {
                        self.state.font_name = name.clone();
                    }
                    self.state.font_size = get_number(&operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(l) = operands.first().and_then(get_number) {
                    self.state.leading = l;
                }
            }
            "Tc" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    self.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    self.state.word_spacing = v;
                }
            }
            "Td" => {
                if let Some((tx, ty)) = point(operands) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let Some((tx, ty)) = point(operands) {
                    self.state.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),

            // Text showing
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = self.decode_string(resources, bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text = self.decode_array(resources, items);
                    self.show(text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = self.decode_string(resources, bytes);
                    self.show(text);
                }
            }
            "\"" => {
                if operands.len() >= 3 {
                    self.state.word_spacing = get_number(&operands[0]).unwrap_or(0.0);
                    self.state.char_spacing = get_number(&operands[1]).unwrap_or(0.0);
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    let text = self.decode_string(resources, bytes);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    /// Interpret a form XObject with its matrix on top of the CTM. The
    /// graphics state is restored afterwards.
    fn invoke_form(&mut self, name: &[u8], resources: &dyn PageResources, depth: usize) {
        if depth >= MAX_FORM_DEPTH {
            log::debug!(
                "form XObject /{} skipped: nesting deeper than {}",
                String::from_utf8_lossy(name),
                MAX_FORM_DEPTH
            );
            return;
        }
        let form = match resources.form_xobject(name) {
            Some(form) => form,
            None => return,
        };

        // The form sees an empty save stack, so unbalanced `q`/`Q` inside it
        // cannot reach the caller's entries.
        let outer_stack = std::mem::take(&mut self.stack);
        let outer_state = self.state.clone();
        self.state.ctm = form.matrix.then(&self.state.ctm);
        self.clear_path();

        self.run_operations(&form.operations, form.resources.as_ref(), depth + 1);

        self.stack = outer_stack;
        self.state = outer_state;
        self.clear_path();
    }

    fn close_subpath(&mut self) {
        if let (Some(from), Some(to)) = (self.current, self.subpath_start) {
            if from != to {
                self.path.push((from, to));
            }
            self.current = Some(to);
        }
    }

    fn paint(&mut self, stroke: bool, fill: bool) {
        let height = self.height;
        if stroke {
            for segment in self.path.iter().chain(self.rect_path.iter()) {
                if let Some(edge) = to_edge(*segment, height) {
                    self.layout.lines.push(edge);
                }
            }
        } else if fill {
            for segment in &self.rect_path {
                if let Some(edge) = to_edge(*segment, height) {
                    self.layout.rect_edges.push(edge);
                }
            }
        }
        self.clear_path();
    }

    fn clear_path(&mut self) {
        self.path.clear();
        self.rect_path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.state.leading != 0.0 {
            self.state.leading
        } else {
            self.state.font_size
        };
        self.move_line(0.0, -leading);
    }

    fn decode_string(&self, resources: &dyn PageResources, bytes: &[u8]) -> String {
        resources.decode_text(&self.state.font_name, bytes)
    }

    fn decode_array(&self, resources: &dyn PageResources, items: &[Object]) -> String {
        // Adjustments are in thousandths of an em; a large negative one
        // usually stands in for a word space.
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode_string(resources, bytes)),
                other => {
                    if let Some(n) = get_number(other) {
                        if -n > SPACE_THRESHOLD
                            && !combined.is_empty()
                            && !combined.ends_with(' ')
                            && !combined.chars().last().is_some_and(is_spaceless_script_char)
                        {
                            combined.push(' ');
                        }
                    }
                }
            }
        }
        combined
    }

    fn show(&mut self, text: String) {
        if !self.in_text {
            return;
        }
        let advance = estimate_advance(&text, &self.state);

        if !text.trim().is_empty() {
            let m = self.text_matrix.then(&self.state.ctm);
            let (x, y) = m.apply(0.0, 0.0);
            let size = self.state.font_size * m.vertical_scale();
            let width = advance * m.horizontal_scale();
            self.layout
                .spans
                .push(TextSpan::new(text, x, self.height - y, width, size));
        }

        self.text_matrix = Matrix::translation(advance, 0.0).then(&self.text_matrix);
    }
}

/// Horizontal advance in text space units.
///
/// Glyph widths are not read from font programs; ideographs count as one em
/// and everything else as half an em.
fn estimate_advance(text: &str, state: &GraphicsState) -> f32 {
    text.chars()
        .map(|c| {
            let em = if is_wide_char(c) { 1.0 } else { 0.5 };
            let spacing = if c == ' ' {
                state.char_spacing + state.word_spacing
            } else {
                state.char_spacing
            };
            em * state.font_size + spacing
        })
        .sum()
}

fn to_edge(((x0, y0), (x1, y1)): Segment, height: f32) -> Option<Edge> {
    const AXIS_SLACK: f32 = 0.5;

    let (top0, top1) = (height - y0, height - y1);
    if (top0 - top1).abs() < AXIS_SLACK && (x0 - x1).abs() >= AXIS_SLACK {
        Some(Edge::horizontal(x0, x1, (top0 + top1) / 2.0))
    } else if (x0 - x1).abs() < AXIS_SLACK && (top0 - top1).abs() >= AXIS_SLACK {
        Some(Edge::vertical((x0 + x1) / 2.0, top0, top1))
    } else {
        None
    }
}

fn point(operands: &[Object]) -> Option<(f32, f32)> {
    let x = operands.first().and_then(get_number)?;
    let y = operands.get(1).and_then(get_number)?;
    Some((x, y))
}

/// Helper to extract number from PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Whether a character belongs to a script written without word spaces.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
        || (0xFF00..=0xFFEF).contains(&code)
}

fn is_wide_char(c: char) -> bool {
    is_spaceless_script_char(c) || (0xAC00..=0xD7AF).contains(&(c as u32))
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Content;

    /// Resources with raw string decoding and, optionally, forms by name.
    #[derive(Default)]
    struct TestResources {
        forms: Vec<(&'static str, Matrix, &'static str)>,
    }

    impl PageResources for TestResources {
        fn decode_text(&self, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }

        fn form_xobject(&self, name: &[u8]) -> Option<FormXObject<'_>> {
            let (_, matrix, stream) = self.forms.iter().find(|(n, _, _)| n.as_bytes() == name)?;
            Some(FormXObject {
                matrix: *matrix,
                operations: Content::decode(stream.as_bytes()).ok()?.operations,
                resources: Box::new(TestResources {
                    forms: self.forms.clone(),
                }),
            })
        }
    }

    fn interpret_with(stream: &str, resources: &TestResources) -> PageLayout {
        let content = Content::decode(stream.as_bytes()).unwrap();
        ContentInterpreter::new(600.0, 800.0).run(&content.operations, resources)
    }

    fn interpret(stream: &str) -> PageLayout {
        interpret_with(stream, &TestResources::default())
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0xE9]), "Hé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_matrix_then() {
        let scale = Matrix {
            a: 2.0,
            d: 2.0,
            ..Matrix::IDENTITY
        };
        let moved = Matrix::translation(10.0, 5.0).then(&scale);
        assert_eq!(moved.apply(1.0, 1.0), (22.0, 12.0));
    }

    #[test]
    fn test_stroked_lines_become_edges() {
        let layout = interpret("1 w 50 700 m 250 700 l S 50 700 m 50 600 l S 10 10 m 20 30 l S");
        assert_eq!(layout.lines.len(), 2);

        let h = layout.lines[0];
        assert_eq!(h.orientation, Orientation::Horizontal);
        assert_eq!((h.x0, h.x1, h.top), (50.0, 250.0, 100.0));

        let v = layout.lines[1];
        assert_eq!(v.orientation, Orientation::Vertical);
        assert_eq!((v.x0, v.top, v.bottom), (50.0, 100.0, 200.0));
    }

    #[test]
    fn test_rectangles() {
        let stroked = interpret("100 100 200 50 re S");
        assert_eq!(stroked.lines.len(), 4);
        assert!(stroked.rect_edges.is_empty());

        let filled = interpret("100 100 200 50 re f");
        assert!(filled.lines.is_empty());
        assert_eq!(filled.rect_edges.len(), 4);

        let discarded = interpret("100 100 200 50 re n");
        assert!(discarded.lines.is_empty() && discarded.rect_edges.is_empty());
    }

    #[test]
    fn test_ctm_applies_to_paths() {
        let layout = interpret("q 1 0 0 1 100 0 cm 0 700 m 50 700 l S Q 0 500 m 50 500 l S");
        assert_eq!(layout.lines[0].x0, 100.0);
        assert_eq!(layout.lines[1].x0, 0.0);
    }

    #[test]
    fn test_text_positions() {
        let layout = interpret("BT /F1 10 Tf 72 700 Td (Hello) Tj 0 -20 Td (World) Tj ET");
        assert_eq!(layout.spans.len(), 2);

        let first = &layout.spans[0];
        assert_eq!(first.text, "Hello");
        assert_eq!(first.font_size, 10.0);
        assert_eq!(first.bbox.x0, 72.0);
        assert!((first.bbox.bottom - 102.0).abs() < 1e-3);
        assert!((first.bbox.width() - 25.0).abs() < 1e-3);

        assert!(layout.spans[1].bbox.top > first.bbox.bottom);
    }

    #[test]
    fn test_consecutive_show_advances() {
        let layout = interpret("BT /F1 10 Tf 0 700 Td (ab) Tj (cd) Tj ET");
        assert_eq!(layout.spans[1].bbox.x0, 10.0);
    }

    #[test]
    fn test_text_keeps_full_width_punctuation() {
        let layout = interpret("BT /F1 10 Tf 0 700 Td (单位：元，币种：人民币（元）) Tj ET");
        assert_eq!(layout.spans[0].text, "单位：元，币种：人民币（元）");
    }

    #[test]
    fn test_tj_array_inserts_word_space() {
        let layout = interpret("BT /F1 10 Tf 0 700 Td [(Net) -300 (profit)] TJ ET");
        assert_eq!(layout.spans[0].text, "Net profit");
    }

    #[test]
    fn test_text_outside_bt_ignored() {
        let layout = interpret("/F1 10 Tf (stray) Tj");
        assert!(layout.spans.is_empty());
    }

    #[test]
    fn test_form_xobject_is_interpreted() {
        let resources = TestResources {
            forms: vec![(
                "Fm1",
                Matrix::translation(100.0, 0.0),
                "0 700 m 50 700 l S BT /F1 10 Tf 0 650 Td (表内) Tj ET",
            )],
        };
        let layout = interpret_with("q 1 0 0 1 0 -100 cm /Fm1 Do Q 0 500 m 50 500 l S", &resources);

        assert_eq!(layout.lines.len(), 2);
        assert_eq!((layout.lines[0].x0, layout.lines[0].top), (100.0, 200.0));
        assert_eq!((layout.lines[1].x0, layout.lines[1].top), (0.0, 300.0));
        assert_eq!(layout.spans[0].text, "表内");
        assert_eq!(layout.spans[0].bbox.x0, 100.0);
    }

    #[test]
    fn test_unknown_xobject_ignored() {
        let layout = interpret("/Im0 Do 0 700 m 50 700 l S");
        assert_eq!(layout.lines.len(), 1);
    }

    #[test]
    fn test_self_referencing_form_stops() {
        let resources = TestResources {
            forms: vec![("Loop", Matrix::IDENTITY, "0 700 m 50 700 l S /Loop Do")],
        };
        let layout = interpret_with("/Loop Do", &resources);
        assert_eq!(layout.lines.len(), MAX_FORM_DEPTH);
    }

    #[test]
    fn test_unbalanced_save_inside_form_restored() {
        let resources = TestResources {
            forms: vec![("Fm1", Matrix::IDENTITY, "q 1 0 0 1 300 0 cm")],
        };
        let layout = interpret_with("/Fm1 Do 0 700 m 50 700 l S", &resources);
        assert_eq!(layout.lines[0].x0, 0.0);
    }

    #[test]
    fn test_extra_restore_inside_form_keeps_caller_state() {
        let resources = TestResources {
            forms: vec![("Fm1", Matrix::IDENTITY, "Q Q 1 0 0 1 300 0 cm")],
        };
        let layout = interpret_with("q 1 0 0 1 200 0 cm /Fm1 Do 0 700 m 50 700 l S Q", &resources);
        assert_eq!(layout.lines[0].x0, 200.0);
    }
}
