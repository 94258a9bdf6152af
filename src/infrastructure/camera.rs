//! Still-frame capture for the voter photo.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use super::settings::CameraSource;
use crate::domain::Photo;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("camera returned an empty frame")]
    EmptyFrame,
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start camera worker: {0}")]
    Worker(#[source] io::Error),
}

pub trait Camera: Send + Sync {
    /// Grabs one JPEG frame.
    fn capture(&self) -> Result<Photo, CameraError>;

    /// Checks that frames can be grabbed at all.
    fn check(&self) -> Result<(), CameraError> {
        self.capture().map(|_| ())
    }
}

/// Runs an external program that writes a single JPEG frame to stdout.
#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
}

impl CommandCamera {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Camera for CommandCamera {
    fn capture(&self) -> Result<Photo, CameraError> {
        debug!("Capturing frame with {}", self.program);
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CameraError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CameraError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(CameraError::EmptyFrame);
        }
        Ok(Photo::from_jpeg(output.stdout))
    }
}

/// Reads the latest frame from a file kept current by some other process.
#[derive(Debug, Clone)]
pub struct SnapshotCamera {
    path: PathBuf,
}

impl SnapshotCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Camera for SnapshotCamera {
    fn capture(&self) -> Result<Photo, CameraError> {
        let jpeg = fs::read(&self.path).map_err(|source| CameraError::Snapshot {
            path: self.path.clone(),
            source,
        })?;
        if jpeg.is_empty() {
            return Err(CameraError::EmptyFrame);
        }
        Ok(Photo::from_jpeg(jpeg))
    }

    fn check(&self) -> Result<(), CameraError> {
        fs::metadata(&self.path)
            .map(|_| ())
            .map_err(|source| CameraError::Snapshot {
                path: self.path.clone(),
                source,
            })
    }
}

impl CameraSource {
    pub fn build(&self) -> Arc<dyn Camera> {
        match self {
            CameraSource::Command { program, args } => {
                Arc::new(CommandCamera::new(program.clone(), args.clone()))
            }
            CameraSource::Snapshot { path } => Arc::new(SnapshotCamera::new(path.clone())),
        }
    }
}
