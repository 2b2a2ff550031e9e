//! Destinations for synthesized audio bytes.

use crate::error::{SynthesisError, SynthesisResult};
use crate::params::SynthesisParameters;
use std::path::{Path, PathBuf};

/// Persists synthesized WAV bytes under a suggested name
pub trait AudioSink: Send + Sync {
    /// Store the audio and return where it was written
    fn persist(&self, audio: &[u8], suggested_name: &str) -> SynthesisResult<PathBuf>;
}

/// `<voice>_<style>_<unix-seconds>`
pub fn suggested_name(params: &SynthesisParameters) -> String {
    format!(
        "{}_{}_{}",
        params.voice_id(),
        params.style(),
        chrono::Utc::now().timestamp()
    )
}

/// Writes `<dir>/<name>.wav`, creating the directory if needed
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim().trim_end_matches(".wav");
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "audio".to_string()
    } else {
        stem.to_string()
    }
}

impl AudioSink for DirectorySink {
    fn persist(&self, audio: &[u8], suggested_name: &str) -> SynthesisResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            SynthesisError::io_error(e, "create output directory", self.dir.display().to_string())
        })?;

        let path = self.dir.join(format!("{}.wav", file_stem(suggested_name)));
        std::fs::write(&path, audio).map_err(|e| {
            SynthesisError::io_error(e, "write audio file", path.display().to_string())
        })?;

        log::info!("Saved {} bytes of audio to {}", audio.len(), path.display());
        Ok(path)
    }
}
