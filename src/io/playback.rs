// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background frame production.
//!
//! `Playback` runs a thread that keeps fetching from a shared `FrameSource`
//! and delivers each frame over a channel, so decoding never blocks the UI
//! thread. The receiver side is drained by the session controller.

use super::frame_source::{Frame, FrameSource};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Pacing used when the source has no frame rate.
const FALLBACK_FPS: f64 = 10.0;

/// Notification from the playback thread.
#[derive(Debug)]
pub enum PlaybackEvent {
    /// A new frame was decoded; the source is already positioned on it
    Frame(Frame),
    /// The stream ended or a frame failed to decode
    Finished,
}

/// Frame interval for a given rate.
pub fn frame_interval(fps: f64) -> Duration {
    let fps = if fps > 0.0 { fps } else { FALLBACK_FPS };
    Duration::from_secs_f64(1.0 / fps)
}

/// A running playback thread. Dropping it stops the thread.
pub struct Playback {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Playback {
    /// Start fetching from `source`, one frame per `interval`.
    pub fn start(source: Arc<FrameSource>, events: Sender<PlaybackEvent>, interval: Duration) -> Self {
        let (stop_tx, stop_rx): (Sender<()>, Receiver<()>) = channel();

        let handle = std::thread::spawn(move || {
            log::info!("Playback started at frame {}", source.position());
            loop {
                let event = match source.fetch() {
                    Some(frame) => PlaybackEvent::Frame(frame),
                    None => PlaybackEvent::Finished,
                };
                let finished = matches!(event, PlaybackEvent::Finished);
                if events.send(event).is_err() || finished {
                    break;
                }
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    _ => break,
                }
            }
            log::info!("Playback stopped at frame {}", source.position());
        });

        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// True while the thread is still producing frames.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stop the thread and wait for it. A fetch in progress completes first.
    pub fn stop(&mut self) {
        // Dropping the sender wakes the thread out of its wait.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Playback thread panicked");
            }
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::testing::SyntheticClip;

    #[test]
    fn test_plays_to_end() {
        let source = Arc::new(FrameSource::new());
        source.open_backend(Box::new(SyntheticClip::new(6))).unwrap();
        source.set_skip_step(2);

        let (tx, rx) = channel();
        let mut playback = Playback::start(Arc::clone(&source), tx, Duration::from_millis(1));

        let mut indices = Vec::new();
        loop {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                PlaybackEvent::Frame(frame) => indices.push(frame.index),
                PlaybackEvent::Finished => break,
            }
        }
        playback.stop();

        assert_eq!(indices, vec![2, 4]);
        assert_eq!(source.position(), 4);
        assert!(!playback.is_running());
    }

    #[test]
    fn test_stop_while_running() {
        let source = Arc::new(FrameSource::new());
        source.open_backend(Box::new(SyntheticClip::new(100_000))).unwrap();

        let (tx, rx) = channel();
        let mut playback = Playback::start(Arc::clone(&source), tx, Duration::from_secs(60));
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            PlaybackEvent::Frame(_)
        ));

        playback.stop();
        assert!(!playback.is_running());
        assert_eq!(source.position(), 1);
    }

    #[test]
    fn test_interval_fallback() {
        assert_eq!(frame_interval(0.0), Duration::from_millis(100));
        assert_eq!(frame_interval(25.0), Duration::from_millis(40));
    }
}
