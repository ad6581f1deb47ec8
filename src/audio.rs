/// Optional navigation sound effect
///
/// The effect file is read into memory once; each play decodes that buffer
/// into a fresh sink so rapid navigation can overlap sounds.

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{CarouselError, Result};

/// Encoded sound bytes (mp3, wav, ogg or flac)
#[derive(Debug, Clone)]
pub struct SoundEffect {
    pub path: PathBuf,
    bytes: Arc<[u8]>,
}

impl SoundEffect {
    /// Read the effect from disk
    pub async fn load(path: PathBuf) -> Result<Self> {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| CarouselError::SoundRead {
                path: path.clone(),
                source,
            })?;

        tracing::info!("🔊 Loaded sound effect {} ({} bytes)", path.display(), bytes.len());
        Ok(Self {
            path,
            bytes: bytes.into(),
        })
    }

    pub fn from_bytes(path: PathBuf, bytes: Vec<u8>) -> Self {
        Self {
            path,
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Fresh decoder over the in-memory buffer
    pub fn decoder(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>> {
        Ok(Decoder::new(Cursor::new(Arc::clone(&self.bytes)))?)
    }
}

/// Plays the effect on the default output device
pub struct AudioPlayer {
    // Dropping the stream silences every sink
    _stream: OutputStream,
    handle: OutputStreamHandle,
    effect: SoundEffect,
    volume: f32,
}

impl AudioPlayer {
    pub fn new(effect: SoundEffect, volume: f32) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            effect,
            volume: volume.clamp(0.0, 1.0),
        })
    }

    pub fn play(&self) -> Result<()> {
        let sink = Sink::try_new(&self.handle)?;
        sink.set_volume(self.volume);
        sink.append(self.effect.decoder()?);
        sink.detach();
        Ok(())
    }
}

impl std::fmt::Debug for AudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPlayer")
            .field("effect", &self.effect.path)
            .field("volume", &self.volume)
            .finish()
    }
}
