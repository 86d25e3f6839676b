//! Assembling a page body from document sections.
//!
//! For each section a page lists, in listed order:
//!
//! 1. look the section up (missing → [`Diagnostic::UnmatchedSection`], skip),
//! 2. strip its trailing `---` separator,
//! 3. apply the page's subsection filter if it targets this section,
//! 4. prefix the section heading, unless an include filter made the section
//!    an excerpt,
//! 5. join with a `---` line between consecutive sections.
//!
//! A page that keeps the preamble starts with the title and version lines.
//! Problems are returned alongside the body rather than logged here, so one
//! run can report all of them at the end.

use crate::config::PageSpec;
use crate::document::{Document, heading_marker};
use crate::filter::apply_filter;
use crate::preamble::Preamble;
use crate::transform::{SECTION_RULE, strip_trailing_rule};
use std::fmt;
use tracing::debug;

/// A recoverable problem found while rendering. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A page lists a section the document does not have.
    UnmatchedSection { page: String, section: String },
    /// A page keeps the preamble but the preamble lacks a title or version.
    MissingPreamble {
        page: String,
        missing_title: bool,
        missing_version: bool,
    },
    /// A page's subsection filter targets a section the page does not list.
    FilterSectionNotListed { page: String, section: String },
    /// A filter prefix matched no subsection of its section.
    UnmatchedPrefix {
        page: String,
        section: String,
        prefix: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmatchedSection { page, section } => {
                write!(f, "{page}: section \"{section}\" not found in spec")
            }
            Diagnostic::MissingPreamble {
                page,
                missing_title,
                missing_version,
            } => {
                let what = match (missing_title, missing_version) {
                    (true, true) => "title and version lines",
                    (true, false) => "title line",
                    _ => "version line",
                };
                write!(f, "{page}: preamble has no {what}")
            }
            Diagnostic::FilterSectionNotListed { page, section } => write!(
                f,
                "{page}: subsection filter targets \"{section}\", which the page does not include"
            ),
            Diagnostic::UnmatchedPrefix {
                page,
                section,
                prefix,
            } => write!(
                f,
                "{page}: subsection \"{prefix}\" not found in section \"{section}\""
            ),
        }
    }
}

/// A page body plus what went wrong assembling it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub body: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Assemble the body of `page` from `doc`.
pub fn project_page(doc: &Document, preamble: &Preamble, page: &PageSpec) -> Projection {
    let mut diagnostics = Vec::new();
    let mut parts: Vec<String> = Vec::new();

    if page.keep_preamble {
        if !preamble.is_complete() {
            diagnostics.push(Diagnostic::MissingPreamble {
                page: page.output.clone(),
                missing_title: preamble.title_line.is_empty(),
                missing_version: preamble.version_line.is_empty(),
            });
        }
        parts.push(preamble.framing());
    }

    if let Some(filter) = &page.subsection_filter {
        if !page.sections.contains(&filter.section) {
            diagnostics.push(Diagnostic::FilterSectionNotListed {
                page: page.output.clone(),
                section: filter.section.clone(),
            });
        }
    }

    let subsection_level = doc.level() + 1;
    let mut emitted = 0usize;
    for title in &page.sections {
        let Some(section) = doc.section(title) else {
            diagnostics.push(Diagnostic::UnmatchedSection {
                page: page.output.clone(),
                section: title.clone(),
            });
            continue;
        };

        let mut content = strip_trailing_rule(&section.body).to_string();
        let mut keep_heading = true;
        if let Some(filter) = page.filter_for(title) {
            let filtered = apply_filter(&content, filter, subsection_level);
            diagnostics.extend(filtered.unmatched.into_iter().map(|prefix| {
                Diagnostic::UnmatchedPrefix {
                    page: page.output.clone(),
                    section: title.clone(),
                    prefix,
                }
            }));
            content = filtered.text;
            keep_heading = filter.keeps_parent_heading();
        }

        if emitted > 0 {
            parts.push(SECTION_RULE.to_string());
        }
        if keep_heading {
            parts.push(format!("{}{title}\n{content}", heading_marker(doc.level())));
        } else {
            parts.push(content);
        }
        emitted += 1;
        debug!(page = %page.output, section = %title, "projected section");
    }

    Projection {
        body: parts.join("\n\n"),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{SAMPLE_SPEC, include_filter, page, sample_document};

    #[test]
    fn single_section_with_heading() {
        let (doc, preamble) = sample_document();
        let p = project_page(&doc, &preamble, &page("intro.md", &["1. Introduction"]));
        assert_eq!(
            p.body,
            "## 1. Introduction\n\nThe package format bundles components. See [manifest](#manifest) and [local](#local-only).\n\n### 1.1 Goals\n\n- Portable archives."
        );
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn sections_joined_with_rule_in_listed_order() {
        let (doc, preamble) = sample_document();
        let p = project_page(
            &doc,
            &preamble,
            &page("two.md", &["Appendix D. Extensions", "1. Introduction"]),
        );
        let appendix = p.body.find("## Appendix D. Extensions").unwrap();
        let intro = p.body.find("## 1. Introduction").unwrap();
        assert!(appendix < intro);
        assert!(p.body.contains("Lazy body.\n\n---\n\n## 1. Introduction"));
        assert!(!p.body.starts_with("---"));
    }

    #[test]
    fn keep_preamble_prepends_framing() {
        let (doc, preamble) = sample_document();
        let mut spec = page("overview.md", &["1. Introduction"]);
        spec.keep_preamble = true;
        let p = project_page(&doc, &preamble, &spec);
        assert!(p.body.starts_with(
            "# ccpkg Specification\n\n**Version 1.0.0-draft** | Status: Draft\n\n## 1. Introduction\n"
        ));
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn unmatched_section_reported_and_skipped() {
        let (doc, preamble) = sample_document();
        let p = project_page(
            &doc,
            &preamble,
            &page("p.md", &["9. Future Work", "1. Introduction"]),
        );
        assert_eq!(
            p.diagnostics,
            vec![Diagnostic::UnmatchedSection {
                page: "p.md".into(),
                section: "9. Future Work".into(),
            }]
        );
        assert!(p.body.starts_with("## 1. Introduction"));
        assert!(!p.body.contains("Future Work"));
    }

    #[test]
    fn include_filter_drops_parent_heading_and_intro() {
        let (doc, preamble) = sample_document();
        let mut spec = page("lazy.md", &["Appendix D. Extensions"]);
        spec.subsection_filter = Some(include_filter("Appendix D. Extensions", &["D.4"]));
        let p = project_page(&doc, &preamble, &spec);
        assert_eq!(p.body, "### D.4 Lazy Loading\n\nLazy body.");
    }

    #[test]
    fn filter_on_unlisted_section_reported() {
        let (doc, preamble) = sample_document();
        let mut spec = page("p.md", &["1. Introduction"]);
        spec.subsection_filter = Some(include_filter("2. Manifest", &["2.1"]));
        let p = project_page(&doc, &preamble, &spec);
        assert!(matches!(
            p.diagnostics.as_slice(),
            [Diagnostic::FilterSectionNotListed { section, .. }] if section == "2. Manifest"
        ));
    }

    #[test]
    fn unmatched_prefix_reported() {
        let (doc, preamble) = sample_document();
        let mut spec = page("p.md", &["Appendix D. Extensions"]);
        spec.subsection_filter = Some(include_filter("Appendix D. Extensions", &["D.9"]));
        let p = project_page(&doc, &preamble, &spec);
        assert_eq!(
            p.diagnostics[0].to_string(),
            "p.md: subsection \"D.9\" not found in section \"Appendix D. Extensions\""
        );
    }

    #[test]
    fn missing_preamble_reported_for_framing_page() {
        let doc = Document::parse("## One\nbody", 2);
        let preamble = Preamble::default();
        let mut spec = page("o.md", &["One"]);
        spec.keep_preamble = true;
        let p = project_page(&doc, &preamble, &spec);
        assert_eq!(
            p.diagnostics[0].to_string(),
            "o.md: preamble has no title and version lines"
        );
    }

    #[test]
    fn fenced_heading_in_sample_stays_in_manifest_body() {
        assert!(SAMPLE_SPEC.contains("## Not a heading inside a fence"));
        let (doc, preamble) = sample_document();
        let p = project_page(&doc, &preamble, &page("m.md", &["2. Manifest"]));
        assert!(p.body.contains("## Not a heading inside a fence"));
    }

    #[test]
    fn unmatched_section_display() {
        let d = Diagnostic::UnmatchedSection {
            page: "a.md".into(),
            section: "X".into(),
        };
        assert_eq!(d.to_string(), "a.md: section \"X\" not found in spec");
    }
}
