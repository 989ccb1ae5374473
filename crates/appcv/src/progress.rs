//! Spinners shown while waiting on the registry.
//!
//! A spinner is a tracing span rendered by the `IndicatifLayer` installed in `main`.
//! Instrumenting a future with it shows the spinner while the future runs, and
//! dropping the span clears it.

use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

pub fn spinner(message: &str) -> Span {
    let span = info_span!("spinner");
    span.pb_set_style(&spinner_style());
    span.pb_set_message(message);
    span
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
