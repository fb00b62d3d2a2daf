#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # grader-feedback
//!
//! Command line front end: renders stored feedback, diffs two outputs, or
//! grades a recorded run and prints what would be published to the host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use grader_feedback::{
    FeedbackRecord, Mode, ParsableText,
    config::Config,
    constants::{DEFAULT_DIFF_CONTEXT_LINES, DEFAULT_DIFF_MAX_LINES},
    diff,
    document::VerbatimWriter,
    grade::GradingRun,
    publish,
};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Render a stored feedback document
    Render {
        /// Render for a staff viewer
        staff:           bool,
        /// Reveal content hidden by `hidden-until`
        show_everything: bool,
        /// Format of the document
        mode:            Mode,
        /// Path of the document
        file:            PathBuf,
    },
    /// Diff an actual output against the expected one
    Diff {
        /// Maximum number of diff lines
        max_lines: usize,
        /// Do not cap the number of diff lines
        unbounded: bool,
        /// Context lines around each change
        context:   usize,
        /// Path of the actual output
        actual:    PathBuf,
        /// Path of the expected output
        expected:  PathBuf,
    },
    /// Grade a recorded run
    Grade(PathBuf),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses a file path
    fn path(name: &'static str, help: &'static str) -> impl Parser<PathBuf> {
        positional::<PathBuf>(name).help(help)
    }

    let staff = long("staff").help("Render for a staff viewer").switch();
    let show_everything = long("show-everything")
        .help("Reveal content hidden by hidden-until directives")
        .switch();
    let mode = long("mode")
        .help("Format of the document: json, rst or html")
        .argument::<Mode>("MODE")
        .fallback(Mode::Json);
    let file = path("FILE", "Path of the feedback document");
    let render = construct!(Cmd::Render {
        staff,
        show_everything,
        mode,
        file
    })
    .to_options()
    .command("render")
    .help("Render stored feedback to HTML");

    let max_lines = long("max-lines")
        .help("Maximum number of diff lines")
        .argument::<usize>("N")
        .fallback(DEFAULT_DIFF_MAX_LINES);
    let unbounded = long("unbounded").help("Do not cap the number of diff lines").switch();
    let context = long("context")
        .help("Context lines around each change")
        .argument::<usize>("N")
        .fallback(DEFAULT_DIFF_CONTEXT_LINES);
    let actual = path("ACTUAL", "Path of the actual output");
    let expected = path("EXPECTED", "Path of the expected output");
    let diff = construct!(Cmd::Diff {
        max_lines,
        unbounded,
        context,
        actual,
        expected
    })
    .to_options()
    .command("diff")
    .help("Print a unified diff of two outputs");

    let run = path("RUN", "Path of the recorded run (JSON)");
    let grade = construct!(Cmd::Grade(run))
        .to_options()
        .command("grade")
        .help("Grade a recorded run and print the published feedback");

    let cmd = construct!([render, diff, grade]);

    cmd.to_options().descr("Grading feedback renderer").run()
}

/// Reads a whole file.
fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
}

fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::from_env();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(config.log_level());
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();
    let translator = config.translator()?;

    match cmd {
        Cmd::Render {
            staff,
            show_everything,
            mode,
            file,
        } => {
            let content = read(&file)?;
            let html = ParsableText::new(content, mode, translator.as_ref())
                .set_staff(staff || config.staff())
                .set_show_everything(show_everything || config.show_everything())
                .parse(&VerbatimWriter)?;
            println!("{html}");
        }
        Cmd::Diff {
            max_lines,
            unbounded,
            context,
            actual,
            expected,
        } => {
            let max_lines = (!unbounded).then_some(max_lines);
            println!("{}", diff::compute(&read(&actual)?, &read(&expected)?, max_lines, context));
        }
        Cmd::Grade(path) => {
            let run: GradingRun = serde_json::from_str(&read(&path)?)
                .with_context(|| format!("Could not parse grading run {}", path.display()))?;
            let summary = run.grade(translator.as_ref())?;

            let mut record = FeedbackRecord::default();
            publish(&summary, &mut record);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    };

    Ok(())
}
