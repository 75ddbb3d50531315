//! Minimal PDF writer for reading exports.
//!
//! Emits a deterministic PDF 1.4 document using the built-in Helvetica
//! faces only, so no font embedding is needed. Text is transliterated to
//! WinAnsi; anything outside Latin-1 (emoji are stripped upstream) becomes
//! `?`. Same model in, same bytes out.

use std::fmt::Write as _;

use arcana_core::markup::{strip_emojis, DocBlock, Inline};

use crate::display::DisplayModel;

// A4 in points.
const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 56.0;

/// Average glyph width as a fraction of the font size, for wrapping.
const GLYPH_ASPECT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
    /// Helvetica-Oblique.
    Oblique,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
            Self::Oblique => "F3",
        }
    }
}

/// A same-face stretch of text within a line.
struct Run {
    face: Face,
    text: String,
}

/// One laid-out text line; no runs means vertical spacing.
struct Line {
    size: f64,
    runs: Vec<Run>,
}

impl Line {
    fn blank() -> Self {
        Self {
            size: 10.0,
            runs: Vec::new(),
        }
    }

    fn solid(face: Face, size: f64, text: String) -> Self {
        Self {
            size,
            runs: vec![Run { face, text }],
        }
    }

    fn height(&self) -> f64 {
        self.size * 1.4
    }
}

/// Render a display model into PDF bytes.
pub fn render_pdf(model: &DisplayModel) -> Vec<u8> {
    let lines = layout(model);
    let pages = paginate(&lines);
    assemble(&pages)
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

fn layout(model: &DisplayModel) -> Vec<Line> {
    let mut lines = Vec::new();

    push_wrapped(&mut lines, Face::Bold, 18.0, &model.title);
    push_wrapped(
        &mut lines,
        Face::Oblique,
        11.0,
        &format!("Uma leitura para {}", model.user_name),
    );
    lines.push(Line::blank());

    for (label, value) in &model.config_lines {
        push_wrapped(&mut lines, Face::Regular, 10.0, &format!("{label}: {value}"));
    }
    if !model.units.is_empty() {
        lines.push(Line::blank());
        for unit in &model.units {
            push_wrapped(&mut lines, Face::Bold, 11.0, &unit.heading);
            push_wrapped(&mut lines, Face::Regular, 10.0, &unit.detail);
        }
    }

    for block in &model.interpretation {
        lines.push(Line::blank());
        match block {
            DocBlock::Heading(text) => push_wrapped(&mut lines, Face::Bold, 13.0, text),
            DocBlock::Paragraph(inlines) => {
                let mut words = Vec::new();
                for inline in inlines {
                    let (face, text) = match inline {
                        Inline::Text(t) => (Face::Regular, t),
                        Inline::Bold(t) => (Face::Bold, t),
                    };
                    words.extend(text.split_whitespace().map(|w| (face, w)));
                }
                lines.extend(wrap_runs(&words, 10.0));
            }
        }
    }
    lines
}

fn push_wrapped(lines: &mut Vec<Line>, face: Face, size: f64, text: &str) {
    for wrapped in wrap(text, size) {
        lines.push(Line::solid(face, size, wrapped));
    }
}

/// Greedy word wrap against the printable width.
fn wrap(text: &str, size: f64) -> Vec<String> {
    let max_chars = (((PAGE_WIDTH - 2.0 * MARGIN) / (size * GLYPH_ASPECT)) as usize).max(8);
    let mut wrapped = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > max_chars && !current.is_empty() {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}

/// Greedy word wrap over face-tagged words; adjacent same-face words on a
/// line merge into one run.
fn wrap_runs(words: &[(Face, &str)], size: f64) -> Vec<Line> {
    let max_chars = (((PAGE_WIDTH - 2.0 * MARGIN) / (size * GLYPH_ASPECT)) as usize).max(8);
    let mut lines = Vec::new();
    let mut runs: Vec<Run> = Vec::new();
    let mut len = 0usize;

    for &(face, word) in words {
        let word_len = word.chars().count();
        if len > 0 && len + 1 + word_len > max_chars {
            lines.push(Line {
                size,
                runs: std::mem::take(&mut runs),
            });
            len = 0;
        }
        if len > 0 {
            if let Some(last) = runs.last_mut() {
                last.text.push(' ');
            }
            len += 1;
        }
        match runs.last_mut() {
            Some(last) if last.face == face => last.text.push_str(word),
            _ => runs.push(Run {
                face,
                text: word.to_string(),
            }),
        }
        len += word_len;
    }
    if !runs.is_empty() {
        lines.push(Line { size, runs });
    }
    lines
}

fn paginate(lines: &[Line]) -> Vec<Vec<&Line>> {
    let mut pages = Vec::new();
    let mut page: Vec<&Line> = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        if y - line.height() < MARGIN {
            // Drop trailing spacing when it lands at a page top.
            pages.push(std::mem::take(&mut page));
            y = PAGE_HEIGHT - MARGIN;
            if line.runs.is_empty() {
                continue;
            }
        }
        y -= line.height();
        page.push(line);
    }
    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Transliterate to WinAnsi and escape PDF string delimiters.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in strip_emojis(text).chars() {
        let byte = if (ch as u32) <= 0xFF { ch as u32 as u8 } else { b'?' };
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' | b'\r' => out.push(b' '),
            _ => out.push(byte),
        }
    }
    out
}

fn content_stream(page: &[&Line]) -> Vec<u8> {
    let mut stream = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;
    for line in page {
        y -= line.height();
        if line.runs.iter().all(|r| r.text.is_empty()) {
            continue;
        }
        let mut op = String::new();
        let _ = write!(op, "BT {} {:.1} Td", MARGIN, y);
        stream.extend_from_slice(op.as_bytes());
        for run in &line.runs {
            let mut select = String::new();
            let _ = write!(select, " /{} {} Tf (", run.face.resource(), line.size);
            stream.extend_from_slice(select.as_bytes());
            stream.extend_from_slice(&encode_text(&run.text));
            stream.extend_from_slice(b") Tj");
        }
        stream.extend_from_slice(b" ET\n");
    }
    stream
}

fn assemble(pages: &[Vec<&Line>]) -> Vec<u8> {
    // Object numbering: 1 catalog, 2 pages, 3-5 fonts, then per page a
    // page object and a content object.
    let first_page_obj = 6;
    let mut objects: Vec<Vec<u8>> = Vec::new();

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", first_page_obj + 2 * i))
        .collect();

    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
    );
    for (resource, base) in [
        ("F1", "Helvetica"),
        ("F2", "Helvetica-Bold"),
        ("F3", "Helvetica-Oblique"),
    ] {
        let _ = resource;
        objects.push(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>"
            )
            .into_bytes(),
        );
    }

    for (i, page) in pages.iter().enumerate() {
        let content_obj = first_page_obj + 2 * i + 1;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> \
                 /Contents {content_obj} 0 R >>"
            )
            .into_bytes(),
        );

        let stream = content_stream(page);
        let mut content = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        content.extend_from_slice(&stream);
        content.extend_from_slice(b"endstream");
        objects.push(content);
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    out.extend_from_slice(xref.as_bytes());
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}
