//! FILENAME: core/band-report/src/render.rs
//! Render - The boundary between a grouped stream and whatever draws it.
//!
//! `render` hands bindings to a sink one at a time, in order, and never
//! pulls the next binding before the sink has returned. Aggregate payloads
//! are live: a sink that needs a value later must copy it on receipt.

use band_engine::{BandError, Binding};
use serde::{Deserialize, Serialize};

use crate::band::Band;
use crate::error::ReportError;

/// Receives the bindings of one report, in emission order.
pub trait BindingSink<R, A> {
    fn on_binding(&mut self, band: Band, binding: &Binding<R, A>) -> Result<(), ReportError>;

    /// Called once after the last binding.
    fn finish(&mut self) -> Result<(), ReportError> {
        Ok(())
    }
}

/// Drives `bindings` into `sink`. Returns the number of bindings delivered.
/// Stops at the first error from the stream or the sink; `finish` is only
/// called when every binding was delivered.
pub fn render<R, A, I, S>(bindings: I, level_count: usize, sink: &mut S) -> Result<usize, ReportError>
where
    I: IntoIterator<Item = Result<Binding<R, A>, BandError>>,
    S: BindingSink<R, A> + ?Sized,
{
    let mut delivered = 0;
    for binding in bindings {
        let binding = binding?;
        let band = Band::of(&binding, level_count)?;
        sink.on_binding(band, &binding)?;
        delivered += 1;
    }
    sink.finish()?;
    Ok(delivered)
}

// ============================================================================
// OUTLINE SINK
// ============================================================================

/// One line of an outline, captured when its binding arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandLine {
    pub band: Band,
    /// Number of groups (report included) open around this line.
    pub depth: usize,
    pub text: String,
}

/// A sink that snapshots every binding into text, indented by nesting.
pub struct Outline<R, A> {
    describe: Box<dyn Fn(Band, &Binding<R, A>) -> String>,
    lines: Vec<BandLine>,
    depth: usize,
    report_closed: bool,
}

impl<R, A> Outline<R, A> {
    pub fn new(describe: impl Fn(Band, &Binding<R, A>) -> String + 'static) -> Self {
        Outline {
            describe: Box::new(describe),
            lines: Vec::new(),
            depth: 0,
            report_closed: false,
        }
    }

    pub fn lines(&self) -> &[BandLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<BandLine> {
        self.lines
    }

    /// Texts only, without indentation.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    /// The outline as indented text, two spaces per level of nesting.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&"  ".repeat(line.depth));
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

impl<R, A> BindingSink<R, A> for Outline<R, A> {
    fn on_binding(&mut self, band: Band, binding: &Binding<R, A>) -> Result<(), ReportError> {
        // A report footer after the report closed is the repeated grand
        // footer: it stays at depth 0.
        let repeat = band == Band::ReportFooter && self.report_closed && self.depth == 0;
        if band.is_footer() && !repeat {
            self.depth = self.depth.checked_sub(1).ok_or_else(|| {
                ReportError::Sink(format!("{:?} without an open group", band))
            })?;
        }
        if band == Band::ReportFooter {
            self.report_closed = true;
        }
        let text = (self.describe)(band, binding);
        self.lines.push(BandLine {
            band,
            depth: self.depth,
            text,
        });
        if band.is_header() {
            self.depth += 1;
        }
        Ok(())
    }
}
