//! Output formatting and source-annotated error rendering using ariadne.

use std::io::{self, IsTerminal};
use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use gcode_settings_container::ContainerError;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable output; errors with source context.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, otherwise pick based on whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Container errors ────────────────────────────────────────────────────

/// Render a profile deserialization error in the given format.
///
/// - `Pretty` → annotated source excerpt on stderr when the error points at
///   a line, a plain `error:` line otherwise.
/// - `Json`   → `{ "error", "file", "span" }` object on stdout.
pub(crate) fn render_container_error(
    source: &str,
    filename: &str,
    err: &ContainerError,
    format: Format,
) {
    match format {
        Format::Pretty => render_container_error_pretty(source, filename, err),
        Format::Json => {
            let span = err.span().map(|s| [s.start, s.end]);
            let out = serde_json::json!({
                "error": err.to_string(),
                "file": filename,
                "span": span,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("error JSON serialization cannot fail")
            );
        }
    }
}

fn render_container_error_pretty(source: &str, filename: &str, err: &ContainerError) {
    let Some(span) = err.span() else {
        eprintln!("error: {filename}: {err}");
        return;
    };

    // Clamp span to source length to avoid panics on truncated input.
    let start = span.start.min(source.len());
    let end = span.end.min(source.len()).max(start);

    let mut cache = (filename, Source::from(source));
    container_report(filename, start..end, err, true)
        .eprint(&mut cache)
        .ok();
}

/// Build the annotated report for `err`. Spans are byte offsets.
fn container_report<'a>(
    filename: &'a str,
    span: Range<usize>,
    err: &ContainerError,
    color: bool,
) -> Report<'a, (&'a str, Range<usize>)> {
    let config = Config::default()
        .with_compact(false)
        .with_color(color)
        .with_index_type(IndexType::Byte);

    Report::build(ReportKind::Error, (filename, span.clone()))
        .with_message("invalid profile")
        .with_config(config)
        .with_label(
            Label::new((filename, span))
                .with_message(err.to_string())
                .with_color(Color::Red),
        )
        .with_help("profiles are INI documents with [general], [metadata] and [values] sections")
        .finish()
}
