//! # grader-feedback
//!
//! Serialization and rendering of grading feedback for programming exercises.
//!
//! A grading run classifies every test, computes bounded diffs and stores the
//! outcome as a compact JSON envelope. The rendering stage decodes the
//! envelope and rebuilds role-gated, collapsible HTML feedback from it without
//! re-running any grading logic.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Settings read from the environment
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Bounded unified diffs between expected and actual output
pub mod diff;
/// RST wrapping and the `hidden-until` directive
pub mod document;
/// The feedback envelope and its wire format
pub mod envelope;
/// Grading summaries and the host feedback store
pub mod feedback;
/// For all things related to grading
pub mod grade;
/// Message lookup
pub mod i18n;
/// HTML feedback fragments
pub mod render;
/// Ordered grading outcomes
pub mod result;
/// Previews of test input files
pub mod sample;
/// Utility functions for convenience
pub mod util;

pub use diff::{DiffEngine, compute as compute_diff};
pub use document::{DocumentError, Mode, ParsableText};
pub use envelope::{BackendKind, DecodeError, Envelope, RenderOptions};
pub use feedback::{FeedbackRecord, FeedbackStore, FeedbackSummary, GlobalResult, publish};
pub use i18n::{Catalog, NullTranslator, Translator};
pub use render::{RenderContext, Suppression, render_envelope, render_json};
pub use result::GraderResult;
