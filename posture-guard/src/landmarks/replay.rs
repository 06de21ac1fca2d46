use super::types::DetectorFrame;
use super::FrameSource;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Replays recorded detector output stored as JSON Lines
///
/// Each non-blank line holds one `DetectorFrame`.
pub struct JsonlReplay<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
    frames_read: u64,
}

impl JsonlReplay<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Opening landmark recording at {}", path.display());

        let file = File::open(path)
            .with_context(|| format!("Failed to open landmark recording at {}", path.display()))?;

        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlReplay<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            frames_read: 0,
        }
    }
}

impl<R: BufRead> FrameSource for JsonlReplay<R> {
    fn next_frame(&mut self) -> Result<Option<DetectorFrame>> {
        for line in self.lines.by_ref() {
            self.line_number += 1;
            let line = line.context("Failed to read landmark recording")?;
            if line.trim().is_empty() {
                continue;
            }

            let frame: DetectorFrame = serde_json::from_str(&line)
                .with_context(|| format!("Malformed frame on line {}", self.line_number))?;
            self.frames_read += 1;
            return Ok(Some(frame));
        }

        Ok(None)
    }

    fn frames_read(&self) -> u64 {
        self.frames_read
    }
}
