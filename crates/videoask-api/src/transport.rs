//! Transport state mirrored by a remote browser.
//!
//! The server cannot touch a media element, so the session drives a
//! `RemoteTransport` instead: every call updates a desired-state record the
//! browser fetches from `GET /api/v1/transport` and applies. The browser
//! reports position and duration back through the transport routes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use videoask_core::transport::{MediaTransport, Navigator, OverlayTransport};

/// How close (seconds) a reported position must be to clear an outstanding
/// seek instruction.
const SEEK_ARRIVAL_TOLERANCE: f64 = 0.25;

/// Reports away from an outstanding seek that are dropped as predating it.
/// Past this the browser has landed elsewhere and is believed.
const STALE_REPORT_LIMIT: u32 = 3;

/// Desired state of the overlay element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView {
    /// Overlay source; empty when none.
    pub source: String,
    /// Whether the overlay should be playing.
    pub playing: bool,
    /// Bumped when the browser must restart the clip from its position.
    pub resume_count: u64,
}

/// Desired state of the media elements plus the last reported position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportView {
    /// Bumped on every instruction so the browser can skip unchanged polls.
    pub revision: u64,
    /// Main video source; empty for the placeholder.
    pub source: String,
    /// Whether the main video should be playing.
    pub playing: bool,
    /// Playback speed multiplier.
    pub playback_rate: f64,
    /// Position the browser must jump to, if a seek is outstanding.
    pub seek_to: Option<f64>,
    /// Last position reported by the browser.
    pub current_time: Option<f64>,
    /// Last duration reported by the browser.
    pub duration: Option<f64>,
    /// The audio overlay.
    pub overlay: OverlayView,
    /// Set once the sequence has ended; the browser navigates here.
    pub redirect: Option<String>,
    #[serde(skip)]
    stale_reports: u32,
}

impl Default for TransportView {
    fn default() -> Self {
        Self {
            revision: 0,
            source: String::new(),
            playing: false,
            playback_rate: 1.0,
            seek_to: None,
            current_time: None,
            duration: None,
            overlay: OverlayView::default(),
            redirect: None,
            stale_reports: 0,
        }
    }
}

/// A `MediaTransport`, `OverlayTransport` and `Navigator` backed by a
/// browser that polls for instructions.
#[derive(Debug, Default)]
pub struct RemoteTransport {
    view: Mutex<TransportView>,
}

impl RemoteTransport {
    /// Creates a transport with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current desired state.
    #[must_use]
    pub fn view(&self) -> TransportView {
        self.lock().clone()
    }

    /// Browser reported the playhead position. While a seek is outstanding,
    /// reports away from its target predate the seek and are dropped, up to
    /// `STALE_REPORT_LIMIT` of them.
    pub fn report_time(&self, seconds: f64) {
        let mut view = self.lock();
        if let Some(target) = view.seek_to {
            let arrived = (seconds - target).abs() <= SEEK_ARRIVAL_TOLERANCE;
            if !arrived && view.stale_reports < STALE_REPORT_LIMIT {
                view.stale_reports += 1;
                return;
            }
            view.seek_to = None;
            view.stale_reports = 0;
        }
        view.current_time = Some(seconds);
    }

    /// Browser reported the media duration.
    pub fn report_duration(&self, seconds: f64) {
        self.lock().duration = Some(seconds);
    }

    fn lock(&self) -> MutexGuard<'_, TransportView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn instruct(&self, change: impl FnOnce(&mut TransportView)) {
        let mut view = self.lock();
        change(&mut view);
        view.revision += 1;
    }
}

impl MediaTransport for RemoteTransport {
    fn load(&self, url: &str) {
        self.instruct(|view| {
            view.source = url.to_owned();
            view.playing = false;
            view.seek_to = None;
            view.stale_reports = 0;
            view.current_time = None;
            view.duration = None;
        });
    }

    fn play(&self) {
        self.instruct(|view| view.playing = true);
    }

    fn pause(&self) {
        self.instruct(|view| view.playing = false);
    }

    fn current_time(&self) -> Option<f64> {
        self.lock().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        self.instruct(|view| {
            view.seek_to = Some(seconds);
            view.stale_reports = 0;
        });
    }

    fn duration(&self) -> Option<f64> {
        self.lock().duration
    }

    fn set_playback_rate(&self, rate: f64) {
        self.instruct(|view| view.playback_rate = rate);
    }
}

impl OverlayTransport for RemoteTransport {
    fn play_source(&self, url: &str) {
        self.instruct(|view| {
            view.overlay.source = url.to_owned();
            view.overlay.playing = true;
        });
    }

    fn resume(&self) {
        self.instruct(|view| {
            view.overlay.playing = true;
            view.overlay.resume_count += 1;
        });
    }

    fn pause(&self) {
        self.instruct(|view| view.overlay.playing = false);
    }

    fn unload(&self) {
        self.instruct(|view| view.overlay = OverlayView::default());
    }
}

impl Navigator for RemoteTransport {
    fn redirect(&self, path: &str) {
        self.instruct(|view| {
            view.playing = false;
            view.overlay.playing = false;
            view.redirect = Some(path.to_owned());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resets_position_and_bumps_revision() {
        // Arrange
        let transport = RemoteTransport::new();
        transport.report_time(12.0);
        transport.report_duration(30.0);

        // Act
        MediaTransport::load(&transport, "b.mp4");

        // Assert
        let view = transport.view();
        assert_eq!(view.source, "b.mp4");
        assert_eq!(view.current_time, None);
        assert_eq!(view.duration, None);
        assert_eq!(view.revision, 1);
    }

    #[test]
    fn test_seek_is_outstanding_until_browser_arrives() {
        let transport = RemoteTransport::new();

        transport.report_time(12.0);
        transport.set_current_time(40.0);
        assert_eq!(transport.view().seek_to, Some(40.0));
        assert_eq!(transport.current_time(), Some(12.0));
        transport.report_time(12.3);
        assert_eq!(transport.view().seek_to, Some(40.0));
        assert_eq!(transport.current_time(), Some(12.0));
        transport.report_time(40.1);

        assert_eq!(transport.view().seek_to, None);
        assert_eq!(transport.current_time(), Some(40.1));
    }

    #[test]
    fn test_browser_landing_elsewhere_is_believed_eventually() {
        // Arrange
        let transport = RemoteTransport::new();
        transport.report_time(12.0);
        transport.set_current_time(40.0);

        // Act
        for _ in 0..STALE_REPORT_LIMIT {
            transport.report_time(38.0);
        }
        let before_limit = transport.current_time();
        transport.report_time(38.0);

        // Assert
        assert_eq!(before_limit, Some(12.0));
        assert_eq!(transport.current_time(), Some(38.0));
        assert_eq!(transport.view().seek_to, None);
    }

    #[test]
    fn test_overlay_and_video_are_independent() {
        let transport = RemoteTransport::new();

        transport.play();
        transport.play_source("hint.mp3");
        OverlayTransport::pause(&transport);

        let view = transport.view();
        assert!(view.playing);
        assert_eq!(view.overlay.source, "hint.mp3");
        assert!(!view.overlay.playing);
    }

    #[test]
    fn test_redirect_stops_everything() {
        let transport = RemoteTransport::new();
        transport.play();

        transport.redirect("/dashboard");

        let view = transport.view();
        assert!(!view.playing);
        assert_eq!(view.redirect.as_deref(), Some("/dashboard"));
    }
}
