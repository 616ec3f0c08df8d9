//! Collaborator-facing capture steps that happen before a check action:
//! a timeout-bounded location fix and a cancellable evidence capture.

use crate::models::geo::GeoPoint;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Anything able to produce a position fix. `None` means the device
/// could not get one.
pub trait LocationProvider: Send + 'static {
    fn locate(&self) -> Option<GeoPoint>;
}

/// A fix already known up front. Callers holding one can use it directly;
/// the wrapper lets it stand in wherever a provider is expected.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Option<GeoPoint>);

impl LocationProvider for FixedLocation {
    fn locate(&self) -> Option<GeoPoint> {
        self.0
    }
}

/// Run the provider on its own thread and wait at most `timeout`.
/// Meant for device-backed providers that may block.
///
/// A stalled, failed or panicking provider yields `None`; the check action
/// then goes ahead with a null location.
pub fn acquire_location<P: LocationProvider>(provider: P, timeout: Duration) -> Option<GeoPoint> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        // receiver may be gone after a timeout; nothing to do then
        let _ = tx.send(provider.locate());
    });

    rx.recv_timeout(timeout).ok().flatten()
}

/// Evidence capture (a photo, in practice). The content is opaque.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EvidenceCapture {
    #[default]
    Idle,
    Captured(Vec<u8>),
}

impl EvidenceCapture {
    pub fn new() -> Self {
        Self::Idle
    }

    /// Replace whatever was captured before.
    pub fn capture(&mut self, blob: Vec<u8>) {
        *self = Self::Captured(blob);
    }

    /// Drop the in-memory evidence and go back to `Idle`.
    /// Nothing persisted is touched.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Captured(_))
    }

    /// Hand the evidence to a check action, leaving the capture `Idle`.
    pub fn take(&mut self) -> Option<Vec<u8>> {
        match std::mem::take(self) {
            Self::Captured(blob) => Some(blob),
            Self::Idle => None,
        }
    }
}
