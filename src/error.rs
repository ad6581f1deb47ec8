/// Error types shared across the carousel
///
/// Loader and config functions return `Result<_, CarouselError>`.
/// When an error has to travel inside a `Message` it is wrapped in an `Arc`
/// so the message stays `Clone`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarouselError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest entry {index} names no image")]
    MissingImageName { index: usize },

    #[error("none of the images listed in {} could be loaded", .path.display())]
    NoValidPoints { path: PathBuf },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read sound effect {}: {source}", .path.display())]
    SoundRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no audio output: {0}")]
    AudioStream(#[from] rodio::StreamError),

    #[error("could not start playback: {0}")]
    AudioPlay(#[from] rodio::PlayError),

    #[error("could not decode sound effect: {0}")]
    AudioDecode(#[from] rodio::decoder::DecoderError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CarouselError>;
