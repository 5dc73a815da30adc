//! Pull the ATIS letter out of a zone fragment.
//!
//! The fragment's markup is not a stable contract, so extraction is an
//! ordered chain of independent strategies, most specific first. Each
//! strategy is a pure `&Html -> Option<AtisLetter>` and the first `Some`
//! wins. When every strategy misses, the error carries excerpts of the
//! fragment for diagnosis.

use std::borrow::Cow;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::error::{AtisError, AtisResult};
use crate::types::AtisLetter;

/// Attribute marker on the grid's first data row.
const FIRST_ROW_SELECTOR: &str = r#"[data-grid-row="first"]"#;

/// Body rows of a Tapestry data grid, matched by its style class.
const GRID_ROW_SELECTOR: &str = "table.t-data-grid tbody tr";

/// Elements whose boundaries end a visible text line.
const LINE_BREAKING_ELEMENTS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "table", "thead", "tbody", "tfoot", "tr", "td", "th", "h1",
    "h2", "h3", "h4", "h5", "h6", "section", "article", "header", "footer", "pre", "dd", "dt",
];

/// Elements whose text is never visible.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// One way of finding the letter in a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// First cell of the row marked `data-grid-row="first"`.
    StructuredRow,
    /// First cell of the first body row of a `t-data-grid` table.
    GridCell,
    /// First visible text line that is a single letter.
    BareTextLine,
}

impl Strategy {
    /// Evaluation order: most specific binding first.
    pub const ORDER: [Strategy; 3] = [
        Strategy::StructuredRow,
        Strategy::GridCell,
        Strategy::BareTextLine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::StructuredRow => "structured_row",
            Strategy::GridCell => "grid_cell",
            Strategy::BareTextLine => "bare_text_line",
        }
    }

    pub fn apply(self, fragment: &Html) -> Option<AtisLetter> {
        match self {
            Strategy::StructuredRow => structured_row(fragment),
            Strategy::GridCell => grid_cell(fragment),
            Strategy::BareTextLine => bare_text_line(fragment),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A successful extraction and the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub letter: AtisLetter,
    pub strategy: Strategy,
}

/// Extract the ATIS letter from a zone fragment.
pub fn extract(html: &str) -> AtisResult<AtisLetter> {
    extract_detailed(html).map(|e| e.letter)
}

/// Like [`extract`], also reporting which strategy matched.
pub fn extract_detailed(html: &str) -> AtisResult<Extraction> {
    let fragment = parse_fragment(html);

    for strategy in Strategy::ORDER {
        match strategy.apply(&fragment) {
            Some(letter) => {
                debug!(%strategy, %letter, "extraction strategy matched");
                return Ok(Extraction { letter, strategy });
            }
            None => debug!(%strategy, "extraction strategy found nothing"),
        }
    }

    Err(AtisError::extraction(html))
}

/// Parse a zone fragment.
///
/// Rows sent without their enclosing `<table>` would lose their row and
/// cell elements under HTML parsing rules, so each one is wrapped first.
pub fn parse_fragment(html: &str) -> Html {
    Html::parse_fragment(&wrap_bare_rows(html))
}

/// Put every `<tr>` that sits outside any `<table>` into a table of its own.
///
/// Rows inside real tables, including tables nested in a bare row's
/// cells, are left alone.
fn wrap_bare_rows(html: &str) -> Cow<'_, str> {
    let lower = html.to_ascii_lowercase();
    let mut out = String::new();
    let mut copied = 0;
    let mut wrapped = false;
    let mut table_depth = 0usize;
    let mut in_bare_row = false;

    for (i, _) in lower.match_indices('<') {
        let tag = &lower[i..];
        if starts_tag(tag, "<table") {
            table_depth += 1;
        } else if starts_tag(tag, "</table") {
            table_depth = table_depth.saturating_sub(1);
        } else if table_depth == 0 && !in_bare_row && starts_tag(tag, "<tr") {
            out.push_str(&html[copied..i]);
            out.push_str("<table>");
            copied = i;
            in_bare_row = true;
            wrapped = true;
        } else if table_depth == 0 && in_bare_row && starts_tag(tag, "</tr") {
            let end = tag.find('>').map_or(html.len(), |j| i + j + 1);
            out.push_str(&html[copied..end]);
            out.push_str("</table>");
            copied = end;
            in_bare_row = false;
        }
    }

    if !wrapped {
        return Cow::Borrowed(html);
    }
    out.push_str(&html[copied..]);
    if in_bare_row {
        out.push_str("</table>");
    }
    Cow::Owned(out)
}

/// `tag` opens with `name` followed by the end of the tag name.
fn starts_tag(tag: &str, name: &str) -> bool {
    tag.starts_with(name)
        && matches!(
            tag[name.len()..].chars().next(),
            None | Some('>' | '/' | ' ' | '\t' | '\n' | '\r')
        )
}

/// Strategy 1: first `td` under the row marked as the grid's first row.
pub fn structured_row(fragment: &Html) -> Option<AtisLetter> {
    let row_sel = Selector::parse(FIRST_ROW_SELECTOR).ok()?;
    let row = fragment.select(&row_sel).next()?;
    first_cell_letter(row)
}

/// Strategy 2: first `td` of the first body row of the data grid.
pub fn grid_cell(fragment: &Html) -> Option<AtisLetter> {
    let row_sel = Selector::parse(GRID_ROW_SELECTOR).ok()?;
    let row = fragment.select(&row_sel).next()?;
    first_cell_letter(row)
}

/// Strategy 3: first visible text line consisting of exactly one letter.
pub fn bare_text_line(fragment: &Html) -> Option<AtisLetter> {
    let mut text = String::new();
    collect_visible_text(fragment.root_element(), &mut text);

    text.lines().map(str::trim).find_map(|line| {
        let mut chars = line.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => AtisLetter::new(c),
            _ => None,
        }
    })
}

fn first_cell_letter(row: ElementRef<'_>) -> Option<AtisLetter> {
    let cell_sel = Selector::parse("td").ok()?;
    let cell = row.select(&cell_sel).next()?;
    let text: String = cell.text().collect();
    AtisLetter::from_candidate(&text)
}

/// Flatten an element's visible text, ending a line at every `<br>` and
/// at block-level element boundaries.
fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if INVISIBLE_ELEMENTS.contains(&name) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let breaks = LINE_BREAKING_ELEMENTS.contains(&name);
                if breaks {
                    out.push('\n');
                }
                collect_visible_text(child_el, out);
                if breaks {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}
