//! Confirmation sound played once a vote is recorded.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use thiserror::Error;

use super::settings::ChimeSettings;

#[derive(Debug, Error)]
pub enum ChimeError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: String },
    #[error("failed to ring the terminal bell: {0}")]
    Bell(#[from] io::Error),
}

pub trait Chime: Send + Sync {
    fn play(&self) -> Result<(), ChimeError>;
}

/// Hands the sound asset to an external audio player.
#[derive(Debug, Clone)]
pub struct CommandChime {
    program: String,
    args: Vec<String>,
    sound: PathBuf,
}

impl CommandChime {
    pub fn new(program: impl Into<String>, args: Vec<String>, sound: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            sound: sound.into(),
        }
    }
}

impl Chime for CommandChime {
    fn play(&self) -> Result<(), ChimeError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| ChimeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ChimeError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Rings the terminal bell when no player is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellChime;

impl Chime for BellChime {
    fn play(&self) -> Result<(), ChimeError> {
        let mut stdout = io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }
}

impl ChimeSettings {
    pub fn build(&self) -> Arc<dyn Chime> {
        match &self.player {
            Some(program) => Arc::new(CommandChime::new(
                program.clone(),
                self.player_args.clone(),
                self.sound.clone(),
            )),
            None => Arc::new(BellChime),
        }
    }
}
