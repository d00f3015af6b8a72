//! Recording collaborators: `MediaTransport`, `OverlayTransport` and
//! `Navigator` doubles that remember every call.

use std::sync::Mutex;

use videoask_core::transport::{MediaTransport, Navigator, OverlayTransport};

/// A call made against a `RecordingTransport`.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    /// `load(url)`
    Load(String),
    /// `play()`
    Play,
    /// `pause()`
    Pause,
    /// `set_current_time(seconds)`
    Seek(f64),
    /// `set_playback_rate(rate)`
    Rate(f64),
}

#[derive(Debug, Default)]
struct VideoElement {
    calls: Vec<TransportCall>,
    current_time: Option<f64>,
    duration: Option<f64>,
}

/// A video transport that records every call. Tests move its clock with
/// [`RecordingTransport::set_time`] to simulate `timeupdate`.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    inner: Mutex<VideoElement>,
}

impl RecordingTransport {
    /// Create a transport with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the element reaching `seconds`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set_time(&self, seconds: f64) {
        self.inner.lock().unwrap().current_time = Some(seconds);
    }

    /// Simulates the element learning its duration.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set_duration(&self, seconds: f64) {
        self.inner.lock().unwrap().duration = Some(seconds);
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Returns the most recently loaded source, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn loaded_source(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .rev()
            .find_map(|call| match call {
                TransportCall::Load(url) => Some(url.clone()),
                _ => None,
            })
    }
}

impl MediaTransport for RecordingTransport {
    fn load(&self, url: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(TransportCall::Load(url.to_owned()));
        inner.current_time = None;
        inner.duration = None;
    }

    fn play(&self) {
        self.inner.lock().unwrap().calls.push(TransportCall::Play);
    }

    fn pause(&self) {
        self.inner.lock().unwrap().calls.push(TransportCall::Pause);
    }

    fn current_time(&self) -> Option<f64> {
        self.inner.lock().unwrap().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(TransportCall::Seek(seconds));
        inner.current_time = Some(seconds);
    }

    fn duration(&self) -> Option<f64> {
        self.inner.lock().unwrap().duration
    }

    fn set_playback_rate(&self, rate: f64) {
        self.inner.lock().unwrap().calls.push(TransportCall::Rate(rate));
    }
}

/// A call made against a `RecordingOverlay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCall {
    /// `play_source(url)`
    PlaySource(String),
    /// `resume()`
    Resume,
    /// `pause()`
    Pause,
    /// `unload()`
    Unload,
}

/// An overlay transport that records every call.
#[derive(Debug, Default)]
pub struct RecordingOverlay {
    calls: Mutex<Vec<OverlayCall>>,
}

impl RecordingOverlay {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl OverlayTransport for RecordingOverlay {
    fn play_source(&self, url: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(OverlayCall::PlaySource(url.to_owned()));
    }

    fn resume(&self) {
        self.calls.lock().unwrap().push(OverlayCall::Resume);
    }

    fn pause(&self) {
        self.calls.lock().unwrap().push(OverlayCall::Pause);
    }

    fn unload(&self) {
        self.calls.lock().unwrap().push(OverlayCall::Unload);
    }
}

/// A navigator that records every redirect.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every path passed to `redirect`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.redirects.lock().unwrap().push(path.to_owned());
    }
}
