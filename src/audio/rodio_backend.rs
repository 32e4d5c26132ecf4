use std::{io::Cursor, path::Path, sync::Arc};

use anyhow::Context;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::AudioBackend;

/// Plays clips on the default output device.
///
/// Clips are kept encoded in memory and decoded again for every playback.
pub struct RodioBackend {
    // dropping the stream stops all sinks
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioBackend {
    pub fn open_default() -> anyhow::Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no audio output device available")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioBackend for RodioBackend {
    type Clip = Arc<[u8]>;
    type Voice = Sink;

    fn load(&mut self, path: &Path) -> anyhow::Result<Self::Clip> {
        let bytes: Arc<[u8]> = std::fs::read(path)
            .with_context(|| format!("cannot read {}", path.display()))?
            .into();
        Decoder::new(Cursor::new(bytes.clone()))
            .with_context(|| format!("cannot decode {}", path.display()))?;
        Ok(bytes)
    }

    fn play(&mut self, clip: &Self::Clip) -> anyhow::Result<Self::Voice> {
        let sink = Sink::try_new(&self.handle)?;
        sink.append(Decoder::new(Cursor::new(clip.clone()))?);
        Ok(sink)
    }

    fn is_playing(&self, voice: &Self::Voice) -> bool {
        !voice.empty()
    }
}
