//! Shared test doubles for the VideoAsk branching player.

mod clock;
mod transport;

pub use clock::{FixedClock, ManualClock};
pub use transport::{
    OverlayCall, RecordingNavigator, RecordingOverlay, RecordingTransport, TransportCall,
};
