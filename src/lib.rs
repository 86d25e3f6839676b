//! # spec-pages
//!
//! Derives documentation pages from one authoritative markdown specification
//! and verifies that the committed pages are exactly what the specification
//! produces today.
//!
//! # Pipeline
//!
//! ```text
//! SPECIFICATION.md ─ parse ─┬─ preamble ────────────────┐
//!                           └─ per page: project ─ filter ─ promote ─ rewrite links
//!                                        ─ front matter ─ normalize ─ write
//! ```
//!
//! A page mapping (`spec-pages.toml`) names, for each page, the sections it
//! pulls and optionally a subsection filter. `spec-pages generate` writes the
//! pages; `spec-pages check` regenerates into a scratch directory and fails
//! when any committed page differs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | Splits the specification into sections and subsections, code-fence aware |
//! | [`preamble`] | Pulls the title and version lines out of the preamble |
//! | [`project`] | Assembles a page body from sections; collects [`project::Diagnostic`]s |
//! | [`filter`] | Include/exclude/stub filtering of subsections |
//! | [`transform`] | Heading promotion, link rewriting, normalization, rule and footer stripping |
//! | [`generate`] | Front matter, rendering every page, writing the output directory |
//! | [`freshness`] | Byte-for-byte comparison of fresh output against committed pages |
//! | [`config`] | Page-mapping loading and validation (TOML or JSON) |
//! | [`output`] | CLI report formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Byte determinism
//!
//! The check compares bytes, so every step is a pure text function and the
//! final artifact is normalized as a whole: trailing whitespace trimmed per
//! line, one trailing newline. Re-running on the same input is a no-op.
//!
//! ## Warnings are values
//!
//! A page naming a section that has not landed in the specification yet is
//! not an error. Such problems are returned as diagnostics next to the
//! output and reported together at the end of a run.
//!
//! ## Linear fence tracking
//!
//! Code-fence state is one flag for the whole document. An unclosed fence
//! hides every later heading; see [`document`].

pub mod config;
pub mod document;
pub mod filter;
pub mod freshness;
pub mod generate;
pub mod logging;
pub mod output;
pub mod preamble;
pub mod project;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;
