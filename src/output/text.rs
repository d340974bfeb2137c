//! Plain text report.
//!
//! Each duplicate group is printed as a separator line of 80 `*`
//! characters followed by one path per line. With timings enabled the
//! report begins with the duration of each phase:
//!
//! ```text
//! enumerate_time 0.012
//! dupe_time 0.034
//!
//! ********************************************************************************
//! /data/a.txt
//! /data/b.txt
//! ```

use std::io::{self, Write};

use yansi::{Color, Paint, Style};

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Line printed before every group.
pub const GROUP_SEPARATOR: &str =
    "********************************************************************************";

const SEPARATOR_STYLE: Style = Style::new().fg(Color::Cyan);
const HEADING_STYLE: Style = Style::new().bold();
const WARNING_STYLE: Style = Style::new().fg(Color::Yellow);

/// Text formatter for scan results.
#[derive(Debug)]
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
    color: bool,
    show_timings: bool,
    show_summary: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter with colors, timings and summary off.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &'a ScanSummary) -> Self {
        Self {
            groups,
            summary,
            color: false,
            show_timings: false,
            show_summary: false,
        }
    }

    /// Enable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Print `enumerate_time` and `dupe_time` before the groups.
    #[must_use]
    pub fn with_timings(mut self, show: bool) -> Self {
        self.show_timings = show;
        self
    }

    /// Print totals after the groups.
    #[must_use]
    pub fn with_summary(mut self, show: bool) -> Self {
        self.show_summary = show;
        self
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }

    /// Write the report to `writer`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.show_timings {
            writeln!(
                writer,
                "enumerate_time {:.3}",
                self.summary.enumerate_duration.as_secs_f64()
            )?;
            writeln!(
                writer,
                "dupe_time {:.3}",
                self.summary.resolve_duration.as_secs_f64()
            )?;
            writeln!(writer)?;
        }

        let separator = self.paint(GROUP_SEPARATOR, SEPARATOR_STYLE);
        for group in self.groups {
            writeln!(writer, "{separator}")?;
            for path in &group.files {
                writeln!(writer, "{}", path.display())?;
            }
        }

        if self.show_summary {
            self.write_summary(writer)?;
        }
        Ok(())
    }

    fn write_summary<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let s = self.summary;
        writeln!(writer)?;
        if self.groups.is_empty() {
            writeln!(writer, "{}", self.paint("No duplicates found.", HEADING_STYLE))?;
        } else {
            let heading = format!(
                "{} duplicate groups, {} duplicate files, {} reclaimable",
                s.duplicate_groups,
                s.duplicate_files,
                s.reclaimable_display()
            );
            writeln!(writer, "{}", self.paint(&heading, HEADING_STYLE))?;
        }
        writeln!(
            writer,
            "Scanned {} files ({}) in {} root(s), checksummed {} files",
            s.total_files,
            s.total_size_display(),
            s.roots.len(),
            s.hashed_files
        )?;

        if s.issue_count() > 0 {
            let warning = format!(
                "{} warnings ({} skipped paths, {} unreadable files)",
                s.issue_count(),
                s.scan_warnings.len(),
                s.checksum_errors.len()
            );
            writeln!(writer, "{}", self.paint(&warning, WARNING_STYLE))?;
        }
        Ok(())
    }

    /// Render the report into a string.
    ///
    /// # Errors
    ///
    /// Returns an error only if formatting fails.
    pub fn to_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
