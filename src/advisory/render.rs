//! Plain-text rendering of advisories

use crate::advisory::types::{Advisory, ArchFilter};
use crate::version::atom::Atom;

pub const DEFAULT_WIDTH: usize = 76;

const CAPTION_WIDTH: usize = 19;

/// Word-wrap `text` to `width` columns behind `caption`.
///
/// Continuation lines are indented to the caption's width and every `\n`
/// in `text` starts a new line. A word longer than the line is never split.
pub fn wrap(text: &str, width: usize, caption: &str) -> String {
    let indent = " ".repeat(caption.chars().count());
    let mut lines = Vec::new();
    let mut line = caption.to_string();
    let mut has_words = false;

    for (i, paragraph) in text.split('\n').enumerate() {
        if i > 0 {
            lines.push(std::mem::replace(&mut line, indent.clone()));
            has_words = false;
        }
        for word in paragraph.split_whitespace() {
            if has_words && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::replace(&mut line, indent.clone()));
                has_words = false;
            }
            if has_words {
                line.push(' ');
            }
            line.push_str(word);
            has_words = true;
        }
    }
    lines.push(line);

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn center(text: &str, width: usize) -> String {
    format!("{text:^width$}").trim_end().to_string()
}

fn caption(label: &str) -> String {
    format!("{:<CAPTION_WIDTH$}", format!("{label}:"))
}

fn field(label: &str, value: &str) -> String {
    format!("{}{}\n", caption(label), value)
}

fn expressions(atoms: &[Atom]) -> String {
    atoms
        .iter()
        .map(Atom::version_expression)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full human-readable report of one advisory
pub fn dump(advisory: &Advisory, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&center(&format!("GLSA {}:", advisory.id), width));
    out.push('\n');
    out.push_str(&center(&advisory.title, width));
    out.push('\n');
    out.push_str(&"=".repeat(width));
    out.push('\n');

    out.push_str(&wrap(&advisory.synopsis, width, &caption("Synopsis")));
    out.push('\n');
    out.push_str(&field("Announced on", &advisory.announced));
    out.push_str(&field(
        "Last revised on",
        &format!("{} : {:02}", advisory.revised, advisory.revision_count),
    ));
    out.push('\n');

    if advisory.product_type == "ebuild" {
        for entry in &advisory.affected {
            let arch = match entry.arch() {
                ArchFilter::Any => "All".to_string(),
                arch => arch.to_string(),
            };
            out.push_str(&field("Affected package", entry.package()));
            out.push_str(&field("Affected archs", &arch));
            out.push_str(&field("Vulnerable", &expressions(entry.vulnerable())));
            out.push_str(&field("Unaffected", &expressions(entry.unaffected())));
        }
    }
    if !advisory.bugs.is_empty() {
        out.push_str(&field("Related bugs", &advisory.bugs.join(", ")));
    }

    let sections = [
        ("Background", &advisory.background),
        ("Description", &advisory.description),
        ("Impact", &advisory.impact),
        ("Workaround", &advisory.workaround),
        ("Resolution", &advisory.resolution),
    ];
    for (label, text) in sections {
        if label == "Background" && text.trim().is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(&wrap(text, width, &caption(label)));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&wrap(
        &advisory.references.join("\n"),
        width,
        &caption("References"),
    ));
    out.push('\n');
    out
}
