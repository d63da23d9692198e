use crate::error::Error;
use config::OutputFormat;
use detector::{Finding, FindingSink};
use serde::Serialize;
use std::io::{self, Write};

/// Version tag of the structured document layout.
pub const JSON_VERSION: &str = "2";

const ARGUMENTS: &str = "ARGUMENTS";

/// Aligned table, one finding per line.
#[derive(Debug)]
pub struct TextSink<W> {
    out: W,
    header: bool,
    width: Option<usize>,
}

impl<W: Write> TextSink<W> {
    /// `width` limits each line when set. The arguments column is the only
    /// one that gets shortened.
    pub fn new(out: W, header: bool, width: Option<usize>) -> Self {
        Self { out, header, width }
    }

    pub fn finish(mut self) -> Result<W, Error> {
        self.out.flush()?;
        Ok(self.out)
    }

    /// `used` is the number of columns already written on the line.
    fn arguments<'a>(&self, used: usize, evidence: &'a str) -> &'a str {
        match self.width {
            Some(width) => {
                let room = width.saturating_sub(used).max(ARGUMENTS.len());
                truncate_chars(evidence, room)
            }
            None => evidence,
        }
    }
}

impl<W: Write> FindingSink for TextSink<W> {
    fn accept(&mut self, finding: Finding) -> io::Result<()> {
        if self.header {
            self.header = false;
            writeln!(
                self.out,
                "{:>5} {:>5} {:<12} {:<12} {:<3} {ARGUMENTS}",
                "PID", "JID", "USER", "COMMAND", "WHY"
            )?;
        }

        // Ids wider than their column push the arguments to the right.
        let prefix = format!(
            "{:>5} {:>5} {:<12.12} {:<12.12} {:<3} ",
            finding.pid,
            finding.jid,
            finding.user,
            finding.command,
            finding.reason.short(),
        );
        let arguments = self.arguments(prefix.chars().count(), &finding.evidence);
        writeln!(self.out, "{prefix}{arguments}")
    }
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "__version")]
    version: &'static str,
    checkrestart: Processes<'a>,
}

#[derive(Serialize)]
struct Processes<'a> {
    process: &'a [Finding],
}

/// Collects findings and writes them as one JSON document, untruncated.
#[derive(Debug)]
pub struct JsonSink<W> {
    out: W,
    findings: Vec<Finding>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            findings: Vec::new(),
        }
    }

    pub fn finish(mut self) -> Result<W, Error> {
        let document = Document {
            version: JSON_VERSION,
            checkrestart: Processes {
                process: &self.findings,
            },
        };
        serde_json::to_writer_pretty(&mut self.out, &document)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> FindingSink for JsonSink<W> {
    fn accept(&mut self, finding: Finding) -> io::Result<()> {
        self.findings.push(finding);
        Ok(())
    }
}

/// Sink selected by the configured output format.
#[derive(Debug)]
pub enum Sink<W> {
    Text(TextSink<W>),
    Json(JsonSink<W>),
}

impl<W: Write> Sink<W> {
    pub fn new(format: OutputFormat, out: W, header: bool, width: Option<usize>) -> Self {
        match format {
            OutputFormat::Text => Self::Text(TextSink::new(out, header, width)),
            OutputFormat::Json => Self::Json(JsonSink::new(out)),
        }
    }

    pub fn finish(self) -> Result<W, Error> {
        match self {
            Self::Text(sink) => sink.finish(),
            Self::Json(sink) => sink.finish(),
        }
    }
}

impl<W: Write> FindingSink for Sink<W> {
    fn accept(&mut self, finding: Finding) -> io::Result<()> {
        match self {
            Self::Text(sink) => sink.accept(finding),
            Self::Json(sink) => sink.accept(finding),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(end, _)| &s[..end])
}
