/// Document-order walk over an HTML alert summary.
///
/// The walker is the only place that touches `scraper` node types. Every
/// descendant of the parsed fragment is classified as it is visited and
/// handed to a `NodeVisitor` as a library-independent `SummaryNode`; nodes
/// that carry no summary structure are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// A text line that looks like `key: value`. Matched anywhere in the text
/// node, so values may contain spaces (`"Stage: 12.3 ft"`).
static DATA_ITEM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+\s*:\s\S+").expect("data item pattern is valid"));

/// A node that contributes to the summary structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryNode {
    /// `<h2>` heading; carries its full text content.
    Section(String),
    /// `<u>` or `<i>` label; carries its full text content.
    Subsection(String),
    /// Raw text of a `key: value` line.
    Data(String),
}

/// Receives classified nodes in document order.
pub trait NodeVisitor {
    type Error;

    fn visit(&mut self, node: SummaryNode) -> Result<(), Self::Error>;
}

/// Classifies an element by tag name. `text` is only evaluated for
/// heading tags.
pub fn classify_element(tag: &str, text: impl FnOnce() -> String) -> Option<SummaryNode> {
    match tag {
        "h2" => Some(SummaryNode::Section(text())),
        "u" | "i" => Some(SummaryNode::Subsection(text())),
        _ => None,
    }
}

/// Classifies a text node.
pub fn classify_text(text: &str) -> Option<SummaryNode> {
    DATA_ITEM_PATTERN
        .is_match(text)
        .then(|| SummaryNode::Data(text.to_string()))
}

/// Parses `html` as a fragment and feeds every classified descendant to
/// `visitor`, stopping at the first error.
pub fn walk<V: NodeVisitor>(html: &str, visitor: &mut V) -> Result<(), V::Error> {
    let document = Html::parse_fragment(html);

    for node in document.tree.root().descendants() {
        let classified = match node.value() {
            Node::Element(element) => classify_element(element.name(), || {
                ElementRef::wrap(node)
                    .map(|el| el.text().collect())
                    .unwrap_or_default()
            }),
            Node::Text(text) => classify_text(text),
            _ => None,
        };

        if let Some(summary_node) = classified {
            visitor.visit(summary_node)?;
        }
    }

    Ok(())
}

/// Collects the classified nodes of `html` without interpreting them.
pub fn classify_all(html: &str) -> Vec<SummaryNode> {
    struct Collect(Vec<SummaryNode>);

    impl NodeVisitor for Collect {
        type Error = std::convert::Infallible;

        fn visit(&mut self, node: SummaryNode) -> Result<(), Self::Error> {
            self.0.push(node);
            Ok(())
        }
    }

    let mut collect = Collect(Vec::new());
    match walk(html, &mut collect) {
        Ok(()) => collect.0,
        Err(never) => match never {},
    }
}
