/// AHPS alert summary parser.
///
/// An alert summary is a loosely structured HTML fragment: `<h2>` section
/// headings ("Observed", "Forecast"), `<u>`/`<i>` subsection labels
/// ("Crest", "Flood Categories") and trailing `key: value` text lines.
/// `parse_summary` buckets each data line under the nearest preceding
/// section and subsection, producing an `AlertSummary`.
///
/// Submodules:
/// - `walk` — classifying document-order traversal of the HTML tree.

pub mod walk;

use crate::model::{AlertSummary, DataItems, Section, SummaryError};
use walk::{NodeVisitor, SummaryNode};

/// Separator between a data key and its value.
const DATA_SEPARATOR: &str = ": ";

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
    NoSection,
    InSection { section: String },
    InSubsection { section: String, subsection: String },
}

/// Incrementally builds an `AlertSummary` from classified nodes.
///
/// A repeated section or subsection heading resets that heading's map;
/// data seen earlier under the same name is dropped.
#[derive(Debug)]
pub struct SummaryBuilder {
    summary: AlertSummary,
    state: ParseState,
}

impl SummaryBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            summary: AlertSummary::new(title),
            state: ParseState::NoSection,
        }
    }

    pub fn on_section(&mut self, section: String) {
        self.summary.sections.insert(section.clone(), Section::new());
        self.state = ParseState::InSection { section };
    }

    pub fn on_subsection(&mut self, subsection: String) -> Result<(), SummaryError> {
        let section = match &self.state {
            ParseState::NoSection => {
                return Err(SummaryError::SubsectionWithoutSection { subsection });
            }
            ParseState::InSection { section } | ParseState::InSubsection { section, .. } => {
                section.clone()
            }
        };

        self.summary
            .sections
            .get_or_insert_with(section.clone(), Section::new)
            .insert(subsection.clone(), DataItems::new());
        self.state = ParseState::InSubsection { section, subsection };
        Ok(())
    }

    pub fn on_data(&mut self, line: &str) -> Result<(), SummaryError> {
        let ParseState::InSubsection { section, subsection } = &self.state else {
            return Err(SummaryError::DataWithoutHeading {
                line: line.to_string(),
            });
        };

        let (key, value) = split_data_line(line)?;
        self.summary
            .sections
            .get_or_insert_with(section.clone(), Section::new)
            .get_or_insert_with(subsection.clone(), DataItems::new)
            .insert(key, value);
        Ok(())
    }

    pub fn finish(self) -> AlertSummary {
        self.summary
    }
}

impl NodeVisitor for SummaryBuilder {
    type Error = SummaryError;

    fn visit(&mut self, node: SummaryNode) -> Result<(), SummaryError> {
        match node {
            SummaryNode::Section(section) => {
                self.on_section(section);
                Ok(())
            }
            SummaryNode::Subsection(subsection) => self.on_subsection(subsection),
            SummaryNode::Data(line) => self.on_data(&line),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Splits a `key: value` line into its trimmed key and value.
///
/// # Errors
/// `SummaryError::UnsplittableData` unless the line contains exactly one
/// `": "` separator.
pub fn split_data_line(line: &str) -> Result<(String, String), SummaryError> {
    match line.split_once(DATA_SEPARATOR) {
        Some((key, value)) if !value.contains(DATA_SEPARATOR) => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(SummaryError::UnsplittableData {
            line: line.to_string(),
        }),
    }
}

/// Parses one alert's HTML summary into section → subsection → key → value.
///
/// # Errors
/// - `SummaryError::SubsectionWithoutSection` — a `<u>`/`<i>` label before
///   any `<h2>`.
/// - `SummaryError::DataWithoutHeading` — a data line before its section
///   or subsection heading.
/// - `SummaryError::UnsplittableData` — a data line with zero or several
///   `": "` separators.
pub fn parse_summary(title: &str, html: &str) -> Result<AlertSummary, SummaryError> {
    let mut builder = SummaryBuilder::new(title);
    walk::walk(html, &mut builder)?;
    Ok(builder.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
