use crate::error::{SynthesisError, SynthesisResult};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Control surface of an audio output backing a [`PlaybackHandle`]
pub trait PlaybackControl: Send + Sync {
    /// Stop playback immediately
    fn stop(&self);

    /// Whether all queued audio has been played (or dropped)
    fn is_finished(&self) -> bool;
}

struct HandleInner {
    control: Box<dyn PlaybackControl>,
    cancelled: AtomicBool,
}

/// Cancellable reference to live playback. Clones share the same playback.
#[derive(Clone)]
pub struct PlaybackHandle {
    inner: Arc<HandleInner>,
}

impl PlaybackHandle {
    pub fn new(control: impl PlaybackControl + 'static) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                control: Box::new(control),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Stop playback. Idempotent: calls after the first, or after playback finished, do nothing.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if !self.inner.control.is_finished() {
            log::debug!("Stopping playback");
            self.inner.control.stop();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_playing(&self) -> bool {
        !self.is_cancelled() && !self.inner.control.is_finished()
    }
}

impl fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Audio device that plays encoded WAV bytes
pub trait AudioOutput: Send + Sync {
    fn play(&self, wav: Vec<u8>) -> SynthesisResult<PlaybackHandle>;
}

#[cfg(feature = "playback")]
pub use self::rodio_output::RodioOutput;

#[cfg(feature = "playback")]
mod rodio_output {
    use super::*;
    use rodio::{Decoder, OutputStreamBuilder, Sink};
    use std::io::Cursor;
    use std::sync::mpsc;

    struct SinkControl {
        sink: Arc<Sink>,
    }

    impl PlaybackControl for SinkControl {
        fn stop(&self) {
            self.sink.stop();
        }

        fn is_finished(&self) -> bool {
            self.sink.empty()
        }
    }

    fn playback_error(msg: impl Into<String>) -> SynthesisError {
        SynthesisError::EngineError(msg.into(), "playback".to_string())
    }

    /// Default system output device via rodio.
    ///
    /// Each call opens the device on a dedicated thread that keeps the output stream
    /// alive until the sink drains or is stopped.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct RodioOutput;

    impl AudioOutput for RodioOutput {
        fn play(&self, wav: Vec<u8>) -> SynthesisResult<PlaybackHandle> {
            let (tx, rx) = mpsc::channel::<Result<Arc<Sink>, String>>();

            std::thread::Builder::new()
                .name("voicecast-playback".to_string())
                .spawn(move || {
                    let stream = match OutputStreamBuilder::open_default_stream() {
                        Ok(s) => s,
                        Err(e) => {
                            let _ = tx.send(Err(format!("Failed to open audio output: {e}")));
                            return;
                        }
                    };
                    let source = match Decoder::new(Cursor::new(wav)) {
                        Ok(s) => s,
                        Err(e) => {
                            let _ = tx.send(Err(format!("Failed to decode audio: {e}")));
                            return;
                        }
                    };

                    let sink = Arc::new(Sink::connect_new(stream.mixer()));
                    sink.append(source);
                    if tx.send(Ok(Arc::clone(&sink))).is_err() {
                        sink.stop();
                        return;
                    }
                    sink.sleep_until_end();
                    drop(stream);
                })
                .map_err(|e| playback_error(format!("Failed to spawn playback thread: {e}")))?;

            let sink = rx
                .recv()
                .map_err(|_| playback_error("Playback thread exited before starting"))?
                .map_err(playback_error)?;

            Ok(PlaybackHandle::new(SinkControl { sink }))
        }
    }

}
