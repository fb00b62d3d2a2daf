#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Bridges rendered feedback and the RST document layer.
//!
//! Converting RST to HTML is the host's job and happens behind
//! [`MarkupWriter`]. This module owns what the host cannot know about: the
//! `hidden-until` directive and the dispatch between JSON envelopes, RST and
//! raw HTML content.

use std::str::FromStr;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    constants::{
        HIDDEN_UNTIL_DATE_FORMATS, HIDDEN_UNTIL_DATETIME_FORMATS, HIDDEN_UNTIL_DISPLAY_FORMAT,
    },
    i18n::Translator,
    render::{RenderContext, Suppression, parsing_failed, render_json},
    util::fill,
};

/// Name of the time-gated visibility directive.
const HIDDEN_UNTIL: &str = "hidden-until";

/// Indentation used for directive bodies this module writes.
const INDENT: &str = "    ";

/// Authoring errors in feedback documents.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// The `hidden-until` argument is not a date.
    #[error("Unknown date format in the \"hidden-until\" directive; {0}")]
    InvalidDate(String),
    /// The `hidden-until` directive has no argument.
    #[error("The \"hidden-until\" directive on line {0} requires a date argument")]
    MissingDate(usize),
    /// The `hidden-until` directive has no content.
    #[error("Content block expected for the \"hidden-until\" directive on line {0}; none found")]
    EmptyContent(usize),
    /// The requested parsing mode does not exist.
    #[error("Unknown text parser: {0}")]
    UnknownMode(String),
}

/// Wraps an HTML fragment in an RST `raw` directive.
pub fn html_to_rst(html: &str) -> String {
    let mut rst = String::from(".. raw:: html\n\n");
    for line in html.lines() {
        if !line.trim().is_empty() {
            rst.push_str(INDENT);
            rst.push_str(line);
        }
        rst.push('\n');
    }
    rst
}

/// Parses a `hidden-until` argument.
pub fn parse_hidden_until(argument: &str) -> Result<NaiveDateTime, DocumentError> {
    let argument = argument.trim();
    HIDDEN_UNTIL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(argument, format).ok())
        .or_else(|| parse_date(argument).and_then(|date| date.and_hms_opt(0, 0, 0)))
        .or_else(|| parse_date_and_hour(argument))
        .ok_or_else(|| DocumentError::InvalidDate(argument.to_string()))
}

/// Parses a date in one of the date-only formats.
fn parse_date(text: &str) -> Option<NaiveDate> {
    HIDDEN_UNTIL_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Parses `<date> <hour>`, e.g. `2030-01-15 9`.
fn parse_date_and_hour(text: &str) -> Option<NaiveDateTime> {
    let (date, hour) = text.rsplit_once(' ')?;
    if hour.is_empty() || hour.len() > 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    parse_date(date.trim_end())?.and_hms_opt(hour.parse().ok()?, 0, 0)
}

/// Settings for expanding `hidden-until` directives.
#[derive(Clone, Copy)]
pub struct DirectiveContext<'a> {
    /// Current local time.
    pub now:             NaiveDateTime,
    /// Show hidden content anyway (staff preview).
    pub show_everything: bool,
    /// Message lookup for the banners.
    pub translator:      &'a dyn Translator,
}

/// Number of leading spaces/tabs of `line`.
fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Writes an RST `caution` admonition with `text` at `indent`.
fn push_caution(out: &mut Vec<String>, indent: &str, text: &str) {
    out.push(format!("{indent}.. caution::"));
    out.push(String::new());
    for line in text.lines() {
        out.push(format!("{indent}{INDENT}{line}"));
    }
    out.push(String::new());
}

/// Expands every `hidden-until` directive of an RST document.
///
/// Content is kept once the date has passed. Before that it is replaced by a
/// caution telling the viewer to come back later, unless `show_everything` is
/// set, in which case it is kept behind a caution saying when students will
/// see it. Directives nest.
pub fn expand_hidden_until(source: &str, ctx: &DirectiveContext<'_>) -> Result<String, DocumentError> {
    let lines: Vec<&str> = source.lines().collect();
    let mut out = Vec::with_capacity(lines.len());
    let marker = format!(".. {HIDDEN_UNTIL}::");
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        let Some(argument) = line.trim_start().strip_prefix(marker.as_str()) else {
            out.push(line.to_string());
            index += 1;
            continue;
        };

        let line_number = index + 1;
        let indent = &line[..indentation(line)];
        if argument.trim().is_empty() {
            return Err(DocumentError::MissingDate(line_number));
        }
        let hidden_until = parse_hidden_until(argument)?;

        // the body is every following blank or more-indented line
        index += 1;
        let body_start = index;
        while index < lines.len()
            && (lines[index].trim().is_empty() || indentation(lines[index]) > indent.len())
        {
            index += 1;
        }
        let body = &lines[body_start..index];
        let trailing_blank = body.iter().rev().take_while(|l| l.trim().is_empty()).count();
        let body = &body[..body.len() - trailing_blank];
        let leading_blank = body.iter().take_while(|l| l.trim().is_empty()).count();
        let body = &body[leading_blank..];

        let body_indent = body
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| indentation(l))
            .min()
            .ok_or(DocumentError::EmptyContent(line_number))?;

        let date = hidden_until.format(HIDDEN_UNTIL_DISPLAY_FORMAT).to_string();
        let after_deadline = hidden_until <= ctx.now;

        if after_deadline || ctx.show_everything {
            if !after_deadline {
                let warning = ctx
                    .translator
                    .gettext("The feedback below will be hidden to the students until {}.");
                push_caution(&mut out, indent, &fill(&warning, &[&date]));
            }

            let dedented = body
                .iter()
                .map(|l| if l.trim().is_empty() { "" } else { &l[body_indent..] })
                .collect::<Vec<_>>()
                .join("\n");
            for expanded in expand_hidden_until(&dedented, ctx)?.lines() {
                if expanded.is_empty() {
                    out.push(String::new());
                } else {
                    out.push(format!("{indent}{expanded}"));
                }
            }
        } else {
            let notice = ctx.translator.gettext(
                "A part of this feedback is hidden until {}. Please come back later and reload \
                 the submission to see the full feedback.",
            );
            push_caution(&mut out, indent, &fill(&notice, &[&date]));
        }

        for _ in 0..trailing_blank {
            out.push(String::new());
        }
    }

    let mut expanded = out.join("\n");
    if source.ends_with('\n') {
        expanded.push('\n');
    }
    Ok(expanded)
}

/// Converts RST to HTML; provided by the host.
pub trait MarkupWriter {
    /// Renders an RST document to an HTML fragment.
    fn write_html(&self, rst: &str) -> Result<String>;
}

/// Writer that hands the RST source back untouched, for hosts that render
/// RST themselves later on.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimWriter;

impl MarkupWriter for VerbatimWriter {
    fn write_html(&self, rst: &str) -> Result<String> {
        Ok(rst.to_string())
    }
}

/// Format of stored feedback content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// reStructuredText.
    Rst,
    /// Raw HTML.
    Html,
    /// A JSON feedback envelope.
    Json,
}

impl FromStr for Mode {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rst" => Ok(Mode::Rst),
            "html" => Ok(Mode::Html),
            "json" => Ok(Mode::Json),
            other => Err(DocumentError::UnknownMode(other.to_string())),
        }
    }
}

/// Stored feedback content plus everything needed to show it to one viewer.
pub struct ParsableText<'a> {
    /// The content to parse.
    content:         String,
    /// How to interpret the content.
    mode:            Mode,
    /// Show content hidden by `hidden-until` (staff preview).
    show_everything: bool,
    /// Whether the viewer is staff.
    staff:           bool,
    /// Current local time, for `hidden-until`.
    now:             NaiveDateTime,
    /// Message lookup.
    translator:      &'a dyn Translator,
    /// Result kinds that never reveal detail.
    suppression:     Suppression,
}

impl<'a> ParsableText<'a> {
    /// Creates parsable content for a student viewer, evaluated at the
    /// current local time.
    pub fn new(content: impl Into<String>, mode: Mode, translator: &'a dyn Translator) -> Self {
        Self {
            content: content.into(),
            mode,
            show_everything: false,
            staff: false,
            now: chrono::Local::now().naive_local(),
            translator,
            suppression: Suppression::render_side(),
        }
    }

    /// sets the `show_everything` field
    pub fn set_show_everything(mut self, show_everything: bool) -> Self {
        self.show_everything = show_everything;
        self
    }

    /// sets the `staff` field
    pub fn set_staff(mut self, staff: bool) -> Self {
        self.staff = staff;
        self
    }

    /// sets the `now` field
    pub fn set_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// sets the `suppression` field
    pub fn set_suppression(mut self, suppression: Suppression) -> Self {
        self.suppression = suppression;
        self
    }

    /// Returns the original content.
    pub fn original_content(&self) -> &str {
        &self.content
    }

    /// Parses the content.
    ///
    /// Envelopes that fail to decode and RST the writer cannot handle become
    /// the "Parsing failed" fragment. A malformed `hidden-until` directive is
    /// an authoring error and is returned as such.
    pub fn parse(&self, writer: &dyn MarkupWriter) -> Result<String, DocumentError> {
        let ctx = RenderContext::new(self.translator, &self.suppression).with_staff(self.staff);

        match self.mode {
            Mode::Json => Ok(render_json(&self.content, &ctx)),
            Mode::Html => Ok(self.content.clone()),
            Mode::Rst => {
                let directives = DirectiveContext {
                    now:             self.now,
                    show_everything: self.show_everything,
                    translator:      self.translator,
                };
                let expanded = expand_hidden_until(&self.content, &directives)?;
                match writer.write_html(&expanded) {
                    Ok(html) => Ok(html),
                    Err(err) => {
                        tracing::warn!("Could not render feedback document: {err:#}");
                        Ok(parsing_failed(&self.content, &ctx))
                    }
                }
            }
        }
    }
}

/// Wraps each HTML fragment in a `raw` block and joins them into one RST
/// document.
pub fn fragments_to_rst<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fragments
        .into_iter()
        .map(|fragment| html_to_rst(fragment.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
