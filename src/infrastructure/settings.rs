//! Kiosk configuration, read from an optional JSON file and the command line.
//!
//! Every field has a default, so the kiosk runs with no file at all. Command
//! line flags take precedence over the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the voter photo comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraSource {
    /// A program printing one JPEG frame on stdout
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// A JPEG file refreshed by another process
    Snapshot { path: PathBuf },
}

impl Default for CameraSource {
    fn default() -> Self {
        let args = [
            "-loglevel", "error", "-f", "v4l2", "-i", "/dev/video0", "-frames:v", "1", "-f",
            "image2pipe", "-vcodec", "mjpeg", "-",
        ];
        CameraSource::Command {
            program: "ffmpeg".to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChimeSettings {
    pub sound: PathBuf,
    /// Audio player program; the terminal bell is used when absent
    pub player: Option<String>,
    pub player_args: Vec<String>,
}

impl Default for ChimeSettings {
    fn default() -> Self {
        Self {
            sound: PathBuf::from("static/sounds/urna.mp3"),
            player: None,
            player_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    pub file: PathBuf,
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("urna.log"),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub reset_delay_secs: u64,
    pub camera: CameraSource,
    pub chime: ChimeSettings,
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
            reset_delay_secs: 4,
            camera: CameraSource::default(),
            chime: ChimeSettings::default(),
            log: LogSettings::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the file named by `--config` (if any) and applies the flags.
    pub fn resolve(args: &Args) -> Result<Self, SettingsError> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply(args);
        Ok(settings)
    }

    fn apply(&mut self, args: &Args) {
        if let Some(server) = &args.server {
            self.server_url = server.clone();
        }
        if let Some(path) = &args.snapshot {
            self.camera = CameraSource::Snapshot { path: path.clone() };
        }
        if let Some(player) = &args.player {
            self.chime.player = Some(player.clone());
        }
        if let Some(sound) = &args.sound {
            self.chime.sound = sound.clone();
        }
        if let Some(secs) = args.reset_delay {
            self.reset_delay_secs = secs;
        }
        if let Some(file) = &args.log_file {
            self.log.file = file.clone();
        }
        if let Some(level) = &args.log_level {
            self.log.level = level.clone();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_secs(self.reset_delay_secs)
    }
}

/// Terminal ballot-box kiosk.
#[derive(Debug, Default, Parser)]
#[command(name = "urna", version)]
pub struct Args {
    /// JSON settings file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the voting server.
    #[arg(short, long)]
    pub server: Option<String>,

    /// Read the voter photo from this JPEG file instead of running a capture command.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Audio player used for the confirmation sound.
    #[arg(long)]
    pub player: Option<String>,

    /// Confirmation sound file handed to the player.
    #[arg(long)]
    pub sound: Option<PathBuf>,

    /// Seconds the thank-you screen stays up before the kiosk resets.
    #[arg(long)]
    pub reset_delay: Option<u64>,

    /// Log file path.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace, off).
    #[arg(long)]
    pub log_level: Option<String>,
}
