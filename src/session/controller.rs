// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame navigation and labeling session state machine.
//!
//! The controller owns the frame source, the canvas, the store and at most
//! one `LabelingSession`. Everything that changes state arrives as a
//! `Command` through one queue, which is drained on the UI thread, so a
//! navigation transition is never interleaved with another one. Frames
//! decoded by the playback thread reach the queue through `poll`.

use super::labeling::LabelingSession;
use crate::error::{ConfigError, EngineError};
use crate::io::media::FrameBackend;
use crate::io::playback::frame_interval;
use crate::io::{Frame, FrameSource, LabelStore, Playback, PlaybackEvent};
use crate::models::{ClassSelection, Settings, Stroke};
use crate::ui::canvas::AnnotationCanvas;
use image::RgbImage;
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No source open
    Idle,
    /// Source open, no labeling session
    Browsing,
    /// One labeling session bound to the displayed frame
    Editing,
}

/// Everything the user or the playback thread can ask the controller to do.
#[derive(Debug, Clone)]
pub enum Command {
    /// Forward by the skip step
    Next,
    /// Back by the skip step
    Previous,
    /// Jump to an absolute frame index (clamped)
    GoTo(usize),
    /// The playback thread moved the source to this frame
    FrameAdvanced(Frame),
    StartEditing,
    StopEditing,
    ToggleEditing,
    /// Commit the session's strokes to the store
    Save,
    OpenStorage,
    ClearStrokes,
    SetAutoLoad(bool),
    SetSkipStep(usize),
    SelectClass(usize),
    StrokeFinished(Stroke),
    Play,
    Pause,
    /// Stop playback and rewind to the first frame
    Stop,
    Quit,
}

/// Notifications wired to the session while it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Save,
    OpenStorage,
    Strokes,
}

/// The frame on screen.
struct Displayed {
    index: usize,
    image: Arc<RgbImage>,
}

/// Drives frame navigation and the labeling session lifecycle.
pub struct SessionController {
    settings: Settings,
    classes: ClassSelection,
    store: Box<dyn LabelStore>,
    source: Option<Arc<FrameSource>>,
    canvas: AnnotationCanvas,
    session: Option<LabelingSession>,
    displayed: Option<Displayed>,
    auto_load: bool,

    playback: Option<Playback>,
    playback_events: Option<Receiver<PlaybackEvent>>,

    pending: VecDeque<Command>,
    /// Set while the queue is being drained; the controller is not reentrant
    processing: bool,
    /// Quit was requested; resources are released at the end of the drain
    teardown_requested: bool,
    torn_down: bool,
    routes: Vec<Route>,

    sessions_opened: usize,
    sessions_closed: usize,
}

impl SessionController {
    /// Create an idle controller. Nothing is opened until `start`.
    pub fn new(settings: Settings, store: Box<dyn LabelStore>) -> Self {
        let classes = ClassSelection::new(settings.labels.clone());
        let auto_load = settings.auto_load_result;
        Self {
            settings,
            classes,
            store,
            source: None,
            canvas: AnnotationCanvas::new(),
            session: None,
            displayed: None,
            auto_load,
            playback: None,
            playback_events: None,
            pending: VecDeque::new(),
            processing: false,
            teardown_requested: false,
            torn_down: false,
            routes: Vec::new(),
            sessions_opened: 0,
            sessions_closed: 0,
        }
    }

    /// Open the input named in the settings and show its first frame.
    ///
    /// A missing input is a configuration error; the controller stays idle
    /// with no source open.
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.settings.validate()?;
        let path = self.settings.input_path.clone();
        if !path.exists() {
            return Err(ConfigError::InputNotFound(path).into());
        }
        let source = FrameSource::new();
        source.open(&path)?;
        log::info!(
            "Opened {} ({} frames, {}x{}, {:.2} fps)",
            path.display(),
            source.frame_count(),
            source.width(),
            source.height(),
            source.fps()
        );
        self.install_source(source);
        Ok(())
    }

    /// Like `start`, with a backend constructed by the caller.
    pub fn start_with_backend(&mut self, backend: Box<dyn FrameBackend>) -> Result<(), EngineError> {
        self.settings.validate()?;
        let source = FrameSource::new();
        source.open_backend(backend)?;
        self.install_source(source);
        Ok(())
    }

    fn install_source(&mut self, source: FrameSource) {
        source.set_skip_step(self.settings.skip_step());
        let source = Arc::new(source);
        match source.fetch_at(0) {
            Some(frame) => self.show_frame(frame),
            None => log::warn!("First frame could not be decoded"),
        }
        self.source = Some(source);
        self.torn_down = false;
        self.teardown_requested = false;
    }

    pub fn state(&self) -> SessionState {
        match (&self.source, &self.session) {
            (None, _) => SessionState::Idle,
            (Some(_), None) => SessionState::Browsing,
            (Some(_), Some(_)) => SessionState::Editing,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn classes(&self) -> &ClassSelection {
        &self.classes
    }

    pub fn source(&self) -> Option<&Arc<FrameSource>> {
        self.source.as_ref()
    }

    pub fn canvas(&self) -> &AnnotationCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut AnnotationCanvas {
        &mut self.canvas
    }

    /// The canvas together with the class provider it draws with.
    pub fn canvas_and_classes(&mut self) -> (&mut AnnotationCanvas, &ClassSelection) {
        (&mut self.canvas, &self.classes)
    }

    pub fn session(&self) -> Option<&LabelingSession> {
        self.session.as_ref()
    }

    /// Index of the frame on screen.
    pub fn current_frame_index(&self) -> Option<usize> {
        self.displayed.as_ref().map(|d| d.index)
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    pub fn auto_load(&self) -> bool {
        self.auto_load
    }

    /// True once a quit has been fully processed.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.sessions_closed
    }

    /// Sessions opened and not yet closed. Never more than one.
    pub fn live_sessions(&self) -> usize {
        self.sessions_opened - self.sessions_closed
    }

    /// Queue a command for the next `process_pending`.
    pub fn post(&mut self, command: Command) {
        if self.teardown_requested || self.torn_down {
            log::debug!("Ignoring {:?} after quit", command);
            return;
        }
        self.pending.push_back(command);
    }

    /// Queue a command and drain the queue.
    pub fn handle(&mut self, command: Command) -> Result<(), EngineError> {
        self.post(command);
        self.process_pending()
    }

    /// Run queued commands in order.
    ///
    /// Every command runs even if an earlier one fails; the first error is
    /// returned. A requested teardown happens after the last command.
    pub fn process_pending(&mut self) -> Result<(), EngineError> {
        if self.processing {
            return Ok(());
        }
        self.processing = true;

        let mut first_error = None;
        while let Some(command) = self.pending.pop_front() {
            if self.teardown_requested {
                log::debug!("Dropping {:?} queued after quit", command);
                continue;
            }
            if let Err(e) = self.dispatch(command) {
                log::error!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        if self.teardown_requested && !self.torn_down {
            self.teardown();
        }
        self.processing = false;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Collect frames from the playback thread and apply the newest one.
    pub fn poll(&mut self) -> Result<(), EngineError> {
        let mut latest = None;
        let mut finished = false;
        if let Some(events) = &self.playback_events {
            for event in events.try_iter() {
                match event {
                    PlaybackEvent::Frame(frame) => latest = Some(frame),
                    PlaybackEvent::Finished => finished = true,
                }
            }
        }
        if let Some(frame) = latest {
            self.post(Command::FrameAdvanced(frame));
        }
        if finished {
            log::info!("Playback reached the end of the stream");
            self.post(Command::Pause);
        }
        self.process_pending()
    }

    fn dispatch(&mut self, command: Command) -> Result<(), EngineError> {
        log::debug!("Command {:?} in state {:?}", command, self.state());
        if self.source.is_none() && !matches!(command, Command::Quit) {
            return Ok(());
        }

        match command {
            Command::Next => self.step_forward(),
            Command::Previous => self.step_backward(),
            Command::GoTo(index) => {
                self.pause_playback();
                self.navigate(|_, _| Some(index));
            }
            Command::FrameAdvanced(frame) => self.frame_advanced(frame),
            Command::StartEditing => self.start_editing(),
            Command::StopEditing => self.close_session(),
            Command::ToggleEditing => match self.state() {
                SessionState::Editing => self.close_session(),
                _ => self.start_editing(),
            },
            Command::Save => return self.save(),
            Command::OpenStorage => return self.open_storage(),
            Command::ClearStrokes => {
                if let Some(session) = self.session.as_mut() {
                    session.clear();
                    log::info!("Cleared strokes of frame {}", session.frame_index());
                }
                self.sync_canvas_strokes();
            }
            Command::SetAutoLoad(enabled) => {
                self.auto_load = enabled;
                if let Some(session) = self.session.as_mut() {
                    session.set_auto_load_prior_result(enabled, self.store.as_ref());
                }
                self.sync_canvas_strokes();
            }
            Command::SetSkipStep(step) => {
                if let Some(source) = &self.source {
                    source.set_skip_step(step);
                    log::info!("Skip step set to {}", source.saved_skip_step());
                }
            }
            Command::SelectClass(index) => {
                if self.classes.select(index) {
                    let (name, color) = match self.classes.current_label() {
                        Some(label) => (label.name.clone(), label.color()),
                        None => return Ok(()),
                    };
                    self.canvas.change_class(&name, color);
                }
            }
            Command::StrokeFinished(stroke) => {
                if !self.routes.contains(&Route::Strokes) {
                    log::debug!("Stroke dropped: no session");
                    return Ok(());
                }
                if let Some(session) = self.session.as_mut() {
                    session.add_stroke(stroke);
                }
                self.sync_canvas_strokes();
            }
            Command::Play => self.play(),
            Command::Pause => self.pause_playback(),
            Command::Stop => {
                self.pause_playback();
                self.navigate(|_, _| Some(0));
            }
            Command::Quit => {
                log::info!("Quit requested");
                self.teardown_requested = true;
            }
        }
        Ok(())
    }

    fn step_forward(&mut self) {
        self.pause_playback();
        self.navigate(|position, step| Some(position + step));
    }

    fn step_backward(&mut self) {
        self.pause_playback();
        self.navigate(|position, step| (position > 0).then(|| position.saturating_sub(step)));
    }

    /// Move to the frame chosen by `target`, reopening the session if one
    /// was active.
    ///
    /// `target` gets the current position and the user's skip step, and
    /// returns `None` to stay put. Stepping past either end of the stream
    /// does nothing.
    fn navigate(&mut self, target: impl FnOnce(usize, usize) -> Option<usize>) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let last = source.frame_count().saturating_sub(1);
        let position = self.current_frame_index().unwrap_or_else(|| source.position());
        let Some(index) = target(position, source.saved_skip_step()) else {
            return;
        };
        if index > last && position >= last {
            log::debug!("Already at the last frame");
            return;
        }
        let index = index.min(last);
        if index == position && self.displayed.is_some() {
            return;
        }

        let was_editing = self.session.is_some();
        self.close_session();

        match source.fetch_at(index) {
            Some(frame) => {
                log::info!("Moved to frame {}", frame.index);
                self.show_frame(frame);
            }
            None => {
                // Keep the source on the frame that is still on screen.
                source.seek(position);
                log::warn!("Frame {} unavailable, staying on {}", index, position);
            }
        }

        if was_editing {
            self.open_session();
        }
    }

    fn frame_advanced(&mut self, frame: Frame) {
        let was_editing = self.session.is_some();
        self.close_session();
        self.show_frame(frame);
        if was_editing {
            self.open_session();
        }
    }

    fn show_frame(&mut self, frame: Frame) {
        let image = Arc::new(frame.image);
        self.canvas.set_image(Arc::clone(&image));
        self.displayed = Some(Displayed {
            index: frame.index,
            image,
        });
    }

    fn start_editing(&mut self) {
        if self.session.is_some() {
            log::debug!("Already editing");
            return;
        }
        self.pause_playback();
        self.open_session();
    }

    /// Bind a fresh session to the displayed frame and wire its routes.
    fn open_session(&mut self) {
        if self.session.is_some() {
            return;
        }
        let (Some(source), Some(displayed)) = (&self.source, &self.displayed) else {
            return;
        };
        source.enter_minimum_step_window();

        let session = LabelingSession::open(
            displayed.index,
            displayed.image.dimensions(),
            self.auto_load,
            self.store.as_ref(),
        );
        log::info!("Opened labeling session on frame {}", session.frame_index());

        self.session = Some(session);
        self.sessions_opened += 1;
        self.routes = vec![Route::Save, Route::OpenStorage, Route::Strokes];

        if let Some(label) = self.classes.current_label() {
            let (name, color) = (label.name.clone(), label.color());
            self.canvas.set_editable(true);
            self.canvas.change_class(&name, color);
        } else {
            self.canvas.set_editable(true);
        }
        self.sync_canvas_strokes();
    }

    /// Unwire and drop the session without saving. Restores the skip step.
    fn close_session(&mut self) {
        let Some(frame_index) = self.session.as_ref().map(|s| s.frame_index()) else {
            return;
        };
        if let Some(source) = &self.source {
            source.restore_skip_step();
        }
        self.routes.clear();
        self.session = None;
        self.sessions_closed += 1;

        self.canvas.set_editable(false);
        self.canvas.set_strokes(Vec::new());
        self.canvas.set_reference(None);
        log::info!("Closed labeling session on frame {}", frame_index);
    }

    fn sync_canvas_strokes(&mut self) {
        match &self.session {
            Some(session) => {
                self.canvas.set_strokes(session.strokes().to_vec());
                self.canvas.set_reference(Some(session.label_mask()));
            }
            None => {
                self.canvas.set_strokes(Vec::new());
                self.canvas.set_reference(None);
            }
        }
    }

    fn save(&mut self) -> Result<(), EngineError> {
        if !self.routes.contains(&Route::Save) {
            log::debug!("Nothing to save outside a labeling session");
            return Ok(());
        }
        let Some(session) = &self.session else {
            return Ok(());
        };
        session
            .commit(self.store.as_mut(), &self.settings.labels)
            .map_err(EngineError::Storage)
    }

    fn open_storage(&mut self) -> Result<(), EngineError> {
        if !self.routes.contains(&Route::OpenStorage) {
            return Ok(());
        }
        self.store.open_storage_location().map_err(EngineError::Storage)
    }

    fn play(&mut self) {
        if self.state() != SessionState::Browsing || self.playback.is_some() {
            return;
        }
        let Some(source) = &self.source else {
            return;
        };
        if let Some(displayed) = &self.displayed {
            source.seek(displayed.index);
        }
        let (events_tx, events_rx) = channel();
        let interval = frame_interval(source.fps());
        self.playback = Some(Playback::start(Arc::clone(source), events_tx, interval));
        self.playback_events = Some(events_rx);
    }

    /// Stop the playback thread and show the last frame it produced.
    fn pause_playback(&mut self) {
        let Some(mut playback) = self.playback.take() else {
            return;
        };
        playback.stop();
        let latest = self
            .playback_events
            .take()
            .and_then(|events| {
                events
                    .try_iter()
                    .filter_map(|event| match event {
                        PlaybackEvent::Frame(frame) => Some(frame),
                        PlaybackEvent::Finished => None,
                    })
                    .last()
            });
        if let Some(frame) = latest {
            self.show_frame(frame);
        }
    }

    /// Release everything. Runs at the end of a queue drain after `Quit`.
    fn teardown(&mut self) {
        self.pause_playback();
        if let Some(session) = &self.session {
            log::info!(
                "Discarding {} unsaved strokes of frame {}",
                session.strokes().len(),
                session.frame_index()
            );
        }
        self.close_session();
        if let Some(source) = self.source.take() {
            source.release();
        }
        self.displayed = None;
        self.canvas = AnnotationCanvas::new();
        self.pending.clear();
        self.torn_down = true;
        log::info!("Controller torn down");
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.pause_playback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::testing::{frame_tag, SyntheticClip};
    use crate::io::store::testing::MemoryStore;
    use crate::models::{Label, LabelSet, Point};
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    fn settings(interval: i64) -> Settings {
        Settings {
            input_path: PathBuf::from("clip.avi"),
            output_dir: PathBuf::from("out"),
            labeling_frame_interval: interval,
            labels: LabelSet::new(vec![
                Label::new("car", 255, 0, 0),
                Label::new("road", 0, 0, 255),
            ])
            .unwrap(),
            auto_load_result: false,
        }
    }

    fn controller(frames: usize, interval: i64) -> (SessionController, MemoryStore) {
        let store = MemoryStore::default();
        let mut controller = SessionController::new(settings(interval), Box::new(store.clone()));
        controller
            .start_with_backend(Box::new(SyntheticClip::new(frames)))
            .unwrap();
        (controller, store)
    }

    fn stroke() -> Stroke {
        Stroke {
            label: "car".into(),
            color: [255, 0, 0],
            width: 1.0,
            points: vec![Point::new(1.0, 1.0), Point::new(3.0, 2.0)],
        }
    }

    fn position(controller: &SessionController) -> usize {
        controller.source().unwrap().position()
    }

    #[test]
    fn test_next_while_editing_reopens_on_new_frame() {
        let (mut c, _) = controller(100, 5);
        assert_eq!(c.state(), SessionState::Browsing);

        c.handle(Command::StartEditing).unwrap();
        assert_eq!(c.session().unwrap().frame_index(), 0);
        c.handle(Command::Next).unwrap();

        assert_eq!(position(&c), 5);
        assert_eq!(c.current_frame_index(), Some(5));
        assert_eq!(c.session().unwrap().frame_index(), 5);
        assert_eq!(c.sessions_opened(), 2);
        assert_eq!(c.sessions_closed(), 1);
        assert_eq!(frame_tag(c.canvas().image().unwrap()), 5);
    }

    #[test]
    fn test_at_most_one_session_under_any_navigation() {
        let (mut c, _) = controller(30, 4);
        let commands = [
            Command::StartEditing,
            Command::Next,
            Command::Next,
            Command::StartEditing,
            Command::Previous,
            Command::GoTo(29),
            Command::Next,
            Command::GoTo(3),
            Command::StopEditing,
            Command::Next,
            Command::ToggleEditing,
            Command::Previous,
            Command::Previous,
            Command::Previous,
        ];
        for command in commands {
            c.post(command);
            c.post(Command::Next);
            c.process_pending().unwrap();
            assert!(c.live_sessions() <= 1);
            assert_eq!(c.live_sessions() == 1, c.state() == SessionState::Editing);
        }
    }

    #[test]
    fn test_missing_input_is_config_error() {
        let mut s = settings(5);
        s.input_path = PathBuf::from("/definitely/not/here.avi");
        let mut c = SessionController::new(s, Box::new(MemoryStore::default()));

        let err = c.start().unwrap_err();
        assert!(err.is_config());
        assert_eq!(c.state(), SessionState::Idle);
        assert!(c.source().is_none());
    }

    #[test]
    fn test_navigation_while_idle_is_noop() {
        let mut c = SessionController::new(settings(5), Box::new(MemoryStore::default()));
        c.handle(Command::Next).unwrap();
        c.handle(Command::StartEditing).unwrap();
        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.sessions_opened(), 0);
    }

    #[test]
    fn test_start_editing_is_idempotent() {
        let (mut c, _) = controller(10, 2);
        c.handle(Command::StartEditing).unwrap();
        c.handle(Command::StartEditing).unwrap();
        assert_eq!(c.sessions_opened(), 1);
        assert_eq!(c.source().unwrap().skip_step(), 1);
        assert_eq!(c.source().unwrap().saved_skip_step(), 2);

        c.handle(Command::StopEditing).unwrap();
        assert_eq!(c.source().unwrap().skip_step(), 2);
        assert_eq!(c.state(), SessionState::Browsing);
    }

    #[test]
    fn test_navigation_stops_at_the_ends() {
        let (mut c, _) = controller(12, 5);
        c.handle(Command::Previous).unwrap();
        assert_eq!(position(&c), 0);

        c.handle(Command::Next).unwrap();
        c.handle(Command::Next).unwrap();
        assert_eq!(position(&c), 10);
        c.handle(Command::Next).unwrap();
        assert_eq!(position(&c), 11);
        c.handle(Command::Next).unwrap();
        assert_eq!(position(&c), 11);

        c.handle(Command::Previous).unwrap();
        assert_eq!(position(&c), 6);
        c.handle(Command::GoTo(500)).unwrap();
        assert_eq!(position(&c), 11);
    }

    #[test]
    fn test_corrupt_frame_does_not_advance() {
        let store = MemoryStore::default();
        let mut c = SessionController::new(settings(5), Box::new(store));
        let mut clip = SyntheticClip::new(20);
        clip.corrupt = vec![5];
        c.start_with_backend(Box::new(clip)).unwrap();
        c.handle(Command::StartEditing).unwrap();

        c.handle(Command::Next).unwrap();
        assert_eq!(position(&c), 0);
        assert_eq!(c.current_frame_index(), Some(0));
        assert_eq!(c.session().unwrap().frame_index(), 0);
        assert_eq!(c.live_sessions(), 1);
    }

    #[test]
    fn test_save_only_on_explicit_request() {
        let (mut c, store) = controller(10, 1);
        c.handle(Command::Save).unwrap();
        assert!(store.log.borrow().saves.is_empty());

        c.handle(Command::StartEditing).unwrap();
        c.handle(Command::StrokeFinished(stroke())).unwrap();
        c.handle(Command::Save).unwrap();
        assert_eq!(store.log.borrow().saves, vec![(0, 1)]);

        c.handle(Command::StrokeFinished(stroke())).unwrap();
        c.handle(Command::Next).unwrap();
        c.handle(Command::StrokeFinished(stroke())).unwrap();
        c.handle(Command::Quit).unwrap();
        assert_eq!(store.log.borrow().saves.len(), 1);
    }

    #[test]
    fn test_strokes_after_stop_are_dropped() {
        let (mut c, _) = controller(10, 1);
        c.handle(Command::StartEditing).unwrap();
        c.handle(Command::StrokeFinished(stroke())).unwrap();
        assert_eq!(c.canvas().strokes().len(), 1);

        c.handle(Command::StopEditing).unwrap();
        c.handle(Command::StrokeFinished(stroke())).unwrap();
        assert!(c.session().is_none());
        assert!(c.canvas().strokes().is_empty());
    }

    #[test]
    fn test_clear_strokes() {
        let (mut c, _) = controller(10, 1);
        c.handle(Command::StartEditing).unwrap();
        c.handle(Command::StrokeFinished(stroke())).unwrap();
        c.handle(Command::ClearStrokes).unwrap();
        assert!(c.session().unwrap().strokes().is_empty());
        assert!(c.canvas().strokes().is_empty());
    }

    #[test]
    fn test_skip_step_set_while_editing_applies_after() {
        let (mut c, _) = controller(50, 5);
        c.handle(Command::StartEditing).unwrap();
        c.handle(Command::SetSkipStep(3)).unwrap();
        assert_eq!(c.source().unwrap().skip_step(), 1);

        c.handle(Command::Next).unwrap();
        assert_eq!(position(&c), 3);
        c.handle(Command::StopEditing).unwrap();
        assert_eq!(c.source().unwrap().skip_step(), 3);
    }

    #[test]
    fn test_auto_load_restores_saved_strokes() {
        let (mut c, _) = controller(10, 1);
        c.handle(Command::StartEditing).unwrap();
        c.handle(Command::StrokeFinished(stroke())).unwrap();
        c.handle(Command::Save).unwrap();
        c.handle(Command::StopEditing).unwrap();

        c.handle(Command::StartEditing).unwrap();
        assert!(c.session().unwrap().strokes().is_empty());
        c.handle(Command::SetAutoLoad(true)).unwrap();
        assert_eq!(c.session().unwrap().strokes().len(), 1);
        assert_eq!(c.canvas().strokes().len(), 1);
    }

    #[test]
    fn test_open_storage_only_while_editing() {
        let (mut c, store) = controller(10, 1);
        c.handle(Command::OpenStorage).unwrap();
        assert_eq!(store.log.borrow().opens, 0);
        c.handle(Command::StartEditing).unwrap();
        c.handle(Command::OpenStorage).unwrap();
        assert_eq!(store.log.borrow().opens, 1);
    }

    #[test]
    fn test_quit_tears_down_after_queue() {
        let (mut c, _) = controller(10, 1);
        c.handle(Command::StartEditing).unwrap();
        c.post(Command::Quit);
        c.post(Command::Next);
        c.process_pending().unwrap();

        assert!(c.is_torn_down());
        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.live_sessions(), 0);
        c.handle(Command::StartEditing).unwrap();
        assert_eq!(c.sessions_opened(), 1);
    }

    #[test]
    fn test_playback_advances_and_pauses_on_edit() {
        let (mut c, _) = controller(1000, 1);
        c.handle(Command::Play).unwrap();
        assert!(c.is_playing());

        let deadline = Instant::now() + Duration::from_secs(5);
        while c.current_frame_index() == Some(0) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
            c.poll().unwrap();
        }
        assert!(c.current_frame_index().unwrap() > 0);

        c.handle(Command::StartEditing).unwrap();
        assert!(!c.is_playing());
        let shown = c.current_frame_index().unwrap();
        assert_eq!(position(&c), shown);
        assert_eq!(c.session().unwrap().frame_index(), shown);

        // Play is refused while editing.
        c.handle(Command::Play).unwrap();
        assert!(!c.is_playing());
    }

    #[test]
    fn test_stop_rewinds() {
        let (mut c, _) = controller(20, 4);
        c.handle(Command::Next).unwrap();
        c.handle(Command::Play).unwrap();
        c.handle(Command::Stop).unwrap();
        assert!(!c.is_playing());
        assert_eq!(c.current_frame_index(), Some(0));
        assert_eq!(position(&c), 0);
    }

    #[test]
    fn test_select_class_changes_pen() {
        let (mut c, _) = controller(10, 1);
        c.handle(Command::StartEditing).unwrap();
        c.handle(Command::SelectClass(1)).unwrap();
        assert_eq!(c.classes().current_index(), 1);
        c.handle(Command::SelectClass(9)).unwrap();
        assert_eq!(c.classes().current_index(), 1);
    }
}
