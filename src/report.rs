//! Report parsing for the two validator vocabularies.
//!
//! The structural validator (epubcheck) writes a JHOVE-vocabulary report
//! with a well-formedness status and a format version. The schema-rule
//! validator (probatron) writes an SVRL-vocabulary report listing failed
//! assertions. Both are reduced to one shared outcome shape; there is no
//! schema-agnostic parser, just two entry points.
//!
//! Parsing is pure: malformed input becomes a failed outcome with a
//! diagnostic message, never an error.

use roxmltree::{Document, Node};

/// SVRL namespace used by the schema-rule validator's report
pub const SVRL_NS: &str = "http://purl.oclc.org/dsdl/svrl";

/// JHOVE namespace used by the structural validator's report
pub const JHOVE_NS: &str = "http://hul.harvard.edu/ois/xml/ns/jhove";

/// Status literal the structural validator uses for a clean file
pub const WELL_FORMED: &str = "Well-formed";

/// Marker substituted for report fields that could not be read
pub const UNAVAILABLE: &str = "unavailable";

/// Diagnostic recorded when the assertion report cannot be parsed
pub const ASSERTION_PARSE_ERROR: &str = "Error processing validator output";

/// Diagnostic recorded when the structural report cannot be parsed
pub const STRUCTURAL_PARSE_ERROR: &str = "Error processing structural validator output";

/// Normalized outcome of one report document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub passed: bool,
    /// Human-readable problem lines, in document order
    pub messages: Vec<String>,
}

impl ReportOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            messages: Vec::new(),
        }
    }

    pub fn fail(messages: Vec<String>) -> Self {
        Self {
            passed: false,
            messages,
        }
    }
}

/// Outcome of the structural report plus the fields the detail log needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralReport {
    pub outcome: ReportOutcome,
    /// Raw status text, or [`UNAVAILABLE`]
    pub status: String,
    /// Reported format version, or [`UNAVAILABLE`]
    pub version: String,
}

impl StructuralReport {
    fn unparseable() -> Self {
        Self {
            outcome: ReportOutcome::fail(vec![STRUCTURAL_PARSE_ERROR.to_string()]),
            status: UNAVAILABLE.to_string(),
            version: UNAVAILABLE.to_string(),
        }
    }
}

/// Parse the schema-rule validator's SVRL report.
///
/// Every `failed-assert` element contributes one message,
/// `Test "<id>" failed (<description>)`, in document order. No such
/// elements means the document passed.
pub fn parse_assertion_report(xml: &str) -> ReportOutcome {
    let doc = match Document::parse(xml) {
        Ok(doc) => doc,
        Err(_) => return ReportOutcome::fail(vec![ASSERTION_PARSE_ERROR.to_string()]),
    };

    let messages: Vec<String> = doc
        .descendants()
        .filter(|node| is_element(node, SVRL_NS, "failed-assert"))
        .map(|node| {
            let test = node.attribute("test").unwrap_or_default();
            let description = node
                .descendants()
                .find(|sub| is_element(sub, SVRL_NS, "text"))
                .and_then(|sub| sub.text())
                .unwrap_or_default()
                .trim()
                .to_string();
            format!("Test \"{}\" failed ({})", test, description)
        })
        .collect();

    if messages.is_empty() {
        ReportOutcome::pass()
    } else {
        ReportOutcome::fail(messages)
    }
}

/// Parse the structural validator's JHOVE report.
///
/// Reads the `repInfo` section's status and version. A status other than
/// `Well-formed` fails the document and every non-empty trimmed text under
/// the `messages` section becomes one message line. Absent sections or
/// fields degrade to [`UNAVAILABLE`] markers instead of crashing the merge.
pub fn parse_structural_report(xml: &str) -> StructuralReport {
    let doc = match Document::parse(xml) {
        Ok(doc) => doc,
        Err(_) => return StructuralReport::unparseable(),
    };

    let rep_info = match doc
        .descendants()
        .find(|node| is_element(node, JHOVE_NS, "repInfo"))
    {
        Some(node) => node,
        None => return StructuralReport::unparseable(),
    };

    let version = child_text(&rep_info, "version").unwrap_or_else(|| UNAVAILABLE.to_string());

    let status = match child_text(&rep_info, "status") {
        Some(status) => status,
        None => {
            return StructuralReport {
                outcome: ReportOutcome::fail(vec![STRUCTURAL_PARSE_ERROR.to_string()]),
                status: UNAVAILABLE.to_string(),
                version,
            };
        }
    };

    if status == WELL_FORMED {
        return StructuralReport {
            outcome: ReportOutcome::pass(),
            status,
            version,
        };
    }

    let messages: Vec<String> = rep_info
        .descendants()
        .find(|node| is_element(node, JHOVE_NS, "messages"))
        .map(|messages| {
            messages
                .descendants()
                .filter(Node::is_element)
                .filter_map(|node| node.text())
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    StructuralReport {
        outcome: ReportOutcome::fail(messages),
        status,
        version,
    }
}

fn is_element(node: &Node, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}

fn child_text(parent: &Node, name: &str) -> Option<String> {
    parent
        .descendants()
        .find(|node| is_element(node, JHOVE_NS, name))
        .and_then(|node| node.text())
        .map(|text| text.trim().to_string())
}
