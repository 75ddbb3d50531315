//! Lightweight markup model for generated readings.
//!
//! The generation service returns markdown-flavoured text using only two
//! constructs: `### ` section headings and `**bold**` spans. This module
//! parses that subset into a block model the exporters can render without
//! pulling in a full markdown engine.

use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Block model
// ---------------------------------------------------------------------------

/// An inline run inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

/// A top-level block of the rendered reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBlock {
    /// A `### ` section heading, marker stripped.
    Heading(String),
    /// A run of consecutive non-heading lines, joined with spaces.
    Paragraph(Vec<Inline>),
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse reading text into blocks. Blank lines separate paragraphs; any
/// line starting with `### ` becomes a heading. Unterminated `**` markers
/// are treated as literal text.
pub fn parse(text: &str) -> Vec<DocBlock> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();

    let flush = |paragraph: &mut Vec<String>, blocks: &mut Vec<DocBlock>| {
        if !paragraph.is_empty() {
            let joined = paragraph.join(" ");
            blocks.push(DocBlock::Paragraph(parse_inlines(&joined)));
            paragraph.clear();
        }
    };

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else if let Some(heading) = line.trim_start().strip_prefix("### ") {
            flush(&mut paragraph, &mut blocks);
            let heading = heading.trim();
            if !heading.is_empty() {
                blocks.push(DocBlock::Heading(heading.to_string()));
            }
        } else {
            paragraph.push(line.trim_start().to_string());
        }
    }
    flush(&mut paragraph, &mut blocks);
    blocks
}

/// Split a paragraph into text and bold runs.
fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        match after_open.find("**") {
            Some(close) if close > 0 => {
                if open > 0 {
                    inlines.push(Inline::Text(rest[..open].to_string()));
                }
                inlines.push(Inline::Bold(after_open[..close].to_string()));
                rest = &after_open[close + 2..];
            }
            // `****` or a dangling `**`: keep the marker as literal text.
            _ => {
                inlines.push(Inline::Text(rest[..open + 2].to_string()));
                rest = &rest[open + 2..];
            }
        }
    }
    if !rest.is_empty() {
        inlines.push(Inline::Text(rest.to_string()));
    }
    inlines
}

// ---------------------------------------------------------------------------
// Emoji stripping
// ---------------------------------------------------------------------------

fn emoji_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Pictographs, symbols, flags and the variation selectors that ride
        // along with them.
        Regex::new(
            "[\u{1F300}-\u{1FAFF}\u{1F000}-\u{1F2FF}\u{2600}-\u{27BF}\u{2B00}-\u{2BFF}\u{FE00}-\u{FE0F}\u{1F1E6}-\u{1F1FF}\u{200D}]",
        )
        .unwrap()
    })
}

/// Remove emoji and pictographic symbols, for targets such as the PDF
/// exporter that cannot render them.
pub fn strip_emojis(text: &str) -> String {
    emoji_pattern().replace_all(text, "").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
