//! Output sinks for the spoken trip summary.

use anyhow::Result;
use std::io::Write;

/// Something that can read text aloud.
pub trait SpeechSink: Send + Sync {
    fn speak(&self, text: &str) -> Result<()>;
}

/// Writes the summary to stdout instead of synthesising audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSpeech;

impl SpeechSink for ConsoleSpeech {
    fn speak(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text.trim())?;
        stdout.flush()?;
        Ok(())
    }
}
