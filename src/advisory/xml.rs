//! Advisory XML parser
//!
//! Advisories are small documents, so the XML is read into a light element
//! tree first and the advisory fields are picked out of that tree.

use std::borrow::Cow;

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::advisory::error::AdvisoryError;
use crate::advisory::types::{Advisory, AffectedPackageEntry, ArchFilter};
use crate::version::atom::{Atom, Operator};

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements named `name`, in document order
    fn descendants<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for element in self.elements() {
            if element.name == name {
                found.push(element);
            }
            element.collect_descendants(name, found);
        }
    }

    fn first(&self, name: &str) -> Option<&Element> {
        self.descendants(name).into_iter().next()
    }

    fn require(&self, name: &'static str) -> Result<&Element, AdvisoryError> {
        self.first(name)
            .ok_or(AdvisoryError::MissingElement(name))
    }

    /// Concatenated text; `<uri>` and `<mail>` contribute `text: link`
    fn raw_text(&self) -> String {
        if matches!(self.name.as_str(), "uri" | "mail") {
            let text = self.child_text();
            return match self.attr("link") {
                Some(link) if !link.is_empty() => format!("{text}: {link}"),
                _ => text,
            };
        }
        self.child_text()
    }

    fn child_text(&self) -> String {
        self.children
            .iter()
            .map(|node| match node {
                Node::Text(text) => Cow::Borrowed(text.as_str()),
                Node::Element(element) => Cow::Owned(element.raw_text()),
            })
            .collect()
    }

    /// Text with all whitespace runs collapsed to one space
    fn text(&self) -> String {
        collapse_whitespace(&self.raw_text())
    }

    /// Text of a formatted section (`<p>`, `<ul>`, `<ol>`, `<code>`).
    ///
    /// Paragraphs and list items end up on their own lines.
    fn section_text(&self) -> String {
        let mut lines = Vec::new();
        for node in &self.children {
            match node {
                Node::Text(text) => {
                    let text = collapse_whitespace(text);
                    if !text.is_empty() {
                        lines.push(text);
                    }
                }
                Node::Element(element) => match element.name.as_str() {
                    "ul" => lines.extend(element.elements().map(|li| format!("- {}", li.text()))),
                    "ol" => lines.extend(
                        element
                            .elements()
                            .enumerate()
                            .map(|(i, li)| format!("{}. {}", i + 1, li.text())),
                    ),
                    "code" => lines.extend(
                        element
                            .raw_text()
                            .trim()
                            .lines()
                            .map(|line| line.trim().to_string()),
                    ),
                    _ => lines.push(element.paragraph_text()),
                },
            }
        }
        lines.join("\n")
    }

    /// A paragraph, with links written as `text ( link )`
    fn paragraph_text(&self) -> String {
        let text: String = self
            .children
            .iter()
            .map(|node| match node {
                Node::Text(text) => text.clone(),
                Node::Element(element) if matches!(element.name.as_str(), "uri" | "mail") => {
                    match element.attr("link") {
                        Some(link) => format!("{} ( {} )", element.child_text(), link),
                        None => element.child_text(),
                    }
                }
                Node::Element(element) => element.paragraph_text(),
            })
            .collect();
        collapse_whitespace(&text)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn xml_error(e: impl std::fmt::Display) -> AdvisoryError {
    AdvisoryError::Xml(e.to_string())
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, AdvisoryError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_error)?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
    })
}

/// Read a document into its doctype and root element
fn parse_tree(xml: &str) -> Result<(Option<String>, Element), AdvisoryError> {
    let mut reader = Reader::from_str(xml);
    let mut doctype = None;
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        let finished = match event {
            Event::DocType(text) => {
                doctype = Some(String::from_utf8_lossy(&text).trim().to_string());
                None
            }
            Event::Start(start) => {
                stack.push(element_from(&start)?);
                None
            }
            Event::Empty(start) => Some(element_from(&start)?),
            Event::End(_) => Some(
                stack
                    .pop()
                    .ok_or_else(|| xml_error("unbalanced closing tag"))?,
            ),
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let text = text.unescape().map_err(xml_error)?;
                    parent.children.push(Node::Text(text.into_owned()));
                }
                None
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    parent.children.push(Node::Text(text));
                }
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some(element) = finished {
            match stack.last_mut() {
                Some(parent) => parent.children.push(Node::Element(element)),
                None => root = Some(element),
            }
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("unexpected end of document"));
    }
    let root = root.ok_or_else(|| xml_error("empty document"))?;
    Ok((doctype, root))
}

/// Check that the doctype names one of the advisory DTDs.
///
/// The doctype text looks like `glsa SYSTEM "http://www.gentoo.org/dtd/glsa.dtd"`.
fn check_doctype(doctype: Option<&str>) -> Result<(), AdvisoryError> {
    let system_id = doctype
        .and_then(|d| d.split('"').nth(1))
        .map(str::trim);

    match system_id {
        Some(id) if id.ends_with("/glsa.dtd") || id.ends_with("/glsa-2.dtd") => Ok(()),
        _ => Err(AdvisoryError::WrongDoctype(doctype.map(str::to_string))),
    }
}

/// `2008-01-01` becomes `January 01, 2008`; anything else is kept as is
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Revised dates come either as `<revised count="2">2007-12-30</revised>`
/// or as `<revised>December 30, 2007: 02</revised>`.
fn parse_revised(element: &Element) -> (String, u32) {
    let text = element.text();
    let (date, count) = match element.attr("count") {
        Some(count) => (text.as_str(), Some(count)),
        None => match text.rsplit_once(':') {
            Some((date, count)) => (date, Some(count)),
            None => (text.as_str(), None),
        },
    };
    let count = count.and_then(|c| c.trim().parse().ok()).unwrap_or(1);
    (format_date(date.trim()), count)
}

fn parse_entry(package: &Element) -> Result<AffectedPackageEntry, AdvisoryError> {
    let name = package.attr("name").unwrap_or_default();
    let atoms = |kind: &str| -> Result<Vec<Atom>, AdvisoryError> {
        package
            .elements()
            .filter(|element| element.name == kind)
            .map(|element| -> Result<Atom, AdvisoryError> {
                let operator = Operator::from_range_name(element.attr("range").unwrap_or_default())?;
                Ok(Atom::new(operator, name, &element.text(), element.attr("slot"))?)
            })
            .collect()
    };

    Ok(AffectedPackageEntry::new(
        name,
        ArchFilter::parse(package.attr("arch").unwrap_or_default()),
        package.attr("auto") == Some("yes"),
        atoms("vulnerable")?,
        atoms("unaffected")?,
    )?)
}

/// Parse an advisory document.
///
/// When `expected_id` is given, the document's own ID has to match it.
pub fn parse_advisory(xml: &str, expected_id: Option<&str>) -> Result<Advisory, AdvisoryError> {
    let (doctype, root) = parse_tree(xml)?;
    check_doctype(doctype.as_deref())?;

    if root.name != "glsa" {
        return Err(AdvisoryError::MissingElement("glsa"));
    }
    let id = root.attr("id").unwrap_or_default().to_string();
    if let Some(expected) = expected_id.filter(|expected| *expected != id) {
        return Err(AdvisoryError::IdMismatch {
            expected: expected.to_string(),
            found: id,
        });
    }

    let (revised, revision_count) = parse_revised(root.require("revised")?);
    let impact = root.require("impact")?;
    let product = root.require("product")?;

    let affected = root
        .require("affected")?
        .descendants("package")
        .into_iter()
        .map(parse_entry)
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Parsed advisory {} with {} affected entries", id, affected.len());

    Ok(Advisory {
        title: root.require("title")?.text(),
        synopsis: root.require("synopsis")?.text(),
        product_type: product.attr("type").unwrap_or_default().to_string(),
        product: product.text(),
        announced: format_date(&root.require("announced")?.text()),
        revised,
        revision_count,
        access: root.first("access").map(Element::text).unwrap_or_default(),
        bugs: root.descendants("bug").into_iter().map(Element::text).collect(),
        references: root
            .first("references")
            .map(|refs| refs.descendants("uri").into_iter().map(Element::text).collect())
            .unwrap_or_default(),
        background: root
            .first("background")
            .map(Element::section_text)
            .unwrap_or_default(),
        description: root.require("description")?.section_text(),
        impact: impact.section_text(),
        impact_type: impact.attr("type").unwrap_or_default().to_string(),
        workaround: root.require("workaround")?.section_text(),
        resolution: root.require("resolution")?.section_text(),
        affected,
        id,
    })
}
