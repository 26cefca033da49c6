//! SVG import: foreign markup → editable shapes.
//!
//! The importer walks the document with a streaming XML reader and keeps an
//! explicit element stack, so it can tell "well-formed but nothing we
//! support" (an empty import) apart from markup that is not a document at
//! all (an [`ImportError`]).
//!
//! Supported elements are `path`, `rect`, `circle` and `ellipse`, matched by
//! local name at any depth below the root. Everything else is skipped
//! without affecting the rest of the document; subtrees of non-rendered
//! containers such as `defs` are skipped entirely.
//!
//! Parsing produces an [`ImportedDocument`] and never touches a model, which
//! is what makes applying an import all-or-nothing.

#[cfg(test)]
#[path = "import_test.rs"]
mod import_test;

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use tracing::{trace, warn};

use crate::consts::DEFAULT_IMPORT_FILL;
use crate::doc::{Geometry, Origin, Shape};
use crate::geometry::{BoundingBox, ViewBox};

/// Containers whose children are never painted directly.
const NON_RENDERED: &[&str] = &["defs", "clipPath", "mask", "pattern", "symbol", "marker"];

/// Errors that make SVG text unusable as a document.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The XML reader rejected the markup.
    #[error("malformed SVG markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An element carried a malformed attribute list.
    #[error("malformed SVG attribute: {0}")]
    Attr(#[from] AttrError),

    /// Input ended while an element was still open.
    #[error("malformed SVG markup: <{0}> is never closed")]
    Unclosed(String),

    /// A second top-level element followed the root.
    #[error("malformed SVG markup: more than one root element")]
    MultipleRoots,

    /// No element at all.
    #[error("not an SVG document: no root element")]
    NoRootElement,

    /// Character data before or after the root element.
    #[error("malformed SVG markup: text outside the root element")]
    ContentOutsideRoot,
}

/// Result of parsing an SVG document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedDocument {
    /// The root `viewBox`, when present and valid.
    pub view_box: Option<ViewBox>,
    /// One shape per supported element, in document order.
    pub shapes: Vec<Shape>,
}

/// Parse SVG text into shapes.
///
/// # Errors
///
/// Returns an [`ImportError`] when the text is not a well-formed document.
/// A well-formed document without supported elements is `Ok` with no shapes.
pub fn parse_svg(text: &str) -> Result<ImportedDocument, ImportError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut doc = ImportedDocument::default();
    let mut stack: Vec<String> = Vec::new();
    let mut skip_from: Option<usize> = None;
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = local_name(e);
                open_element(&mut doc, e, &name, stack.len(), &mut seen_root, skip_from.is_some())?;
                if skip_from.is_none() && NON_RENDERED.contains(&name.as_str()) {
                    skip_from = Some(stack.len());
                }
                stack.push(name);
            }
            Event::Empty(ref e) => {
                let name = local_name(e);
                open_element(&mut doc, e, &name, stack.len(), &mut seen_root, skip_from.is_some())?;
            }
            Event::End(_) => {
                stack.pop();
                if skip_from == Some(stack.len()) {
                    skip_from = None;
                }
            }
            Event::Text(ref t) if stack.is_empty() && t.iter().any(|b| !b.is_ascii_whitespace()) => {
                return Err(ImportError::ContentOutsideRoot);
            }
            Event::CData(_) if stack.is_empty() => return Err(ImportError::ContentOutsideRoot),
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ImportError::Unclosed(open));
    }
    if !seen_root {
        return Err(ImportError::NoRootElement);
    }
    Ok(doc)
}

fn open_element(
    doc: &mut ImportedDocument,
    e: &BytesStart<'_>,
    name: &str,
    depth: usize,
    seen_root: &mut bool,
    skipping: bool,
) -> Result<(), ImportError> {
    let attrs = attributes(e)?;
    if depth == 0 {
        if *seen_root {
            return Err(ImportError::MultipleRoots);
        }
        *seen_root = true;
        if name == "svg" {
            doc.view_box = read_view_box(&attrs);
        }
        return Ok(());
    }
    if skipping {
        trace!(element = name, "skipping element inside non-rendered container");
        return Ok(());
    }
    let Some(geometry) = element_geometry(name, &attrs) else {
        trace!(element = name, "skipping unsupported svg element");
        return Ok(());
    };
    let n = doc.shapes.len() + 1;
    let fill = non_empty(&attrs, "fill").unwrap_or(DEFAULT_IMPORT_FILL);
    let mut shape = Shape::new(geometry, fill, format!("Imported {name} {n}"), Origin::Imported);
    shape.stroke = non_empty(&attrs, "stroke").map(str::to_owned);
    shape.stroke_width = attrs.get("stroke-width").and_then(|v| leading_number(v));
    doc.shapes.push(shape);
    Ok(())
}

/// An attribute value, treating empty or blank values as absent.
fn non_empty<'a>(attrs: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    attrs.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
}

fn read_view_box(attrs: &HashMap<String, String>) -> Option<ViewBox> {
    let raw = attrs.get("viewBox")?;
    let parsed = ViewBox::parse(raw);
    if parsed.is_none() {
        warn!(view_box = raw.as_str(), "ignoring unparsable viewBox");
    }
    parsed
}

/// Map a supported element to internal geometry.
fn element_geometry(name: &str, attrs: &HashMap<String, String>) -> Option<Geometry> {
    let num = |key: &str| attrs.get(key).map_or(0.0, |v| number(v));
    match name {
        "path" => Some(Geometry::Path { d: attrs.get("d").cloned().unwrap_or_default() }),
        "rect" => Some(Geometry::Rectangle(BoundingBox::new(num("x"), num("y"), num("width"), num("height")))),
        "circle" => Some(Geometry::Circle(circle_box(num("cx"), num("cy"), num("r")))),
        "ellipse" => {
            // Circles carry a single radius; use the larger one so the
            // result encloses the ellipse. A missing radius mirrors the other.
            let rx = attrs.get("rx").or_else(|| attrs.get("ry")).map_or(0.0, |v| number(v));
            let ry = attrs.get("ry").or_else(|| attrs.get("rx")).map_or(0.0, |v| number(v));
            Some(Geometry::Circle(circle_box(num("cx"), num("cy"), rx.max(ry))))
        }
        _ => None,
    }
}

fn circle_box(cx: f64, cy: f64, r: f64) -> BoundingBox {
    BoundingBox::new(cx - r, cy - r, r * 2.0, r * 2.0)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>, ImportError> {
    let mut out = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        out.insert(key, value);
    }
    Ok(out)
}

/// Numeric attribute value with leading-number semantics; 0 when unparsable.
fn number(raw: &str) -> f64 {
    leading_number(raw).unwrap_or(0.0)
}

/// Parse the longest numeric prefix of `raw` (`"10px"` → 10, `"1e2"` → 100).
pub(crate) fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}
