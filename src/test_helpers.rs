//! Shared test utilities for the spec-pages test suite.
//!
//! The sample specification lives in `fixtures/spec/SPECIFICATION.md` so the
//! unit tests and the integration tests in `tests/` read the same document.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (doc, preamble) = sample_document();
//! let body = project_page(&doc, &preamble, &page("intro.md", &["1. Introduction"]));
//! ```

use std::collections::BTreeMap;

use crate::config::{MappingConfig, PageFilter, PageSpec};
use crate::document::Document;
use crate::filter::SubsectionFilter;
use crate::preamble::{Preamble, extract_preamble};
use crate::transform::strip_footer;

pub const SAMPLE_SPEC: &str = include_str!("../fixtures/spec/SPECIFICATION.md");

pub const FOOTER_MARKER: &str = "*This specification is published";

/// Parse [`SAMPLE_SPEC`] the way a generation run does.
pub fn sample_document() -> (Document, Preamble) {
    let doc = Document::parse(strip_footer(SAMPLE_SPEC, FOOTER_MARKER), 2);
    let preamble = extract_preamble(&doc.preamble);
    (doc, preamble)
}

/// A plain page: no preamble, no filter, title derived from the file name.
pub fn page(output: &str, sections: &[&str]) -> PageSpec {
    PageSpec {
        output: output.to_string(),
        title: output.trim_end_matches(".md").to_string(),
        description: String::new(),
        sections: sections.iter().map(|s| s.to_string()).collect(),
        keep_preamble: false,
        subsection_filter: None,
    }
}

pub fn include_filter(section: &str, prefixes: &[&str]) -> PageFilter {
    PageFilter {
        section: section.to_string(),
        mode: SubsectionFilter::Include {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        },
    }
}

pub fn exclude_filter(section: &str, prefixes: &[&str], stubs: &[(&str, &str)]) -> PageFilter {
    PageFilter {
        section: section.to_string(),
        mode: SubsectionFilter::Exclude {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            stubs: stubs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        },
    }
}

/// An in-memory mapping over the given pages with one cross reference.
pub fn config_with(pages: Vec<PageSpec>) -> MappingConfig {
    let mut cross_references = BTreeMap::new();
    cross_references.insert(
        "#manifest".to_string(),
        "/specification/manifest/".to_string(),
    );
    MappingConfig {
        source_spec: "spec/SPECIFICATION.md".into(),
        output_dir: "docs".into(),
        section_level: 2,
        footer_marker: FOOTER_MARKER.to_string(),
        cross_references,
        pages,
    }
}
