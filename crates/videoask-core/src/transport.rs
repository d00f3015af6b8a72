//! Collaborator ports.
//!
//! The playback engine never touches a media element or a router directly.
//! Hosts hand it implementations of these traits; tests hand it recording
//! doubles.

/// The primary video element as seen by the engine.
pub trait MediaTransport: Send + Sync {
    /// Replaces the media source. Passing an empty string unloads it.
    fn load(&self, url: &str);

    /// Starts playback.
    fn play(&self);

    /// Stops playback without resetting the position.
    fn pause(&self);

    /// Current playback position in seconds, or `None` when nothing is
    /// loaded yet.
    fn current_time(&self) -> Option<f64>;

    /// Moves the playback position.
    fn set_current_time(&self, seconds: f64);

    /// Total media duration in seconds, if known.
    fn duration(&self) -> Option<f64>;

    /// Sets the playback rate multiplier.
    fn set_playback_rate(&self, rate: f64);
}

/// The auxiliary audio overlay element.
pub trait OverlayTransport: Send + Sync {
    /// Loads `url` and starts it from the beginning.
    fn play_source(&self, url: &str);

    /// Resumes the currently loaded clip.
    fn resume(&self);

    /// Pauses the currently loaded clip, keeping its position.
    fn pause(&self);

    /// Unloads the current clip.
    fn unload(&self);
}

/// Route navigation used when the branching sequence terminates.
pub trait Navigator: Send + Sync {
    /// Sends the viewer to an external path.
    fn redirect(&self, path: &str);
}
