//! Outbound side of the duplex channel
//!
//! Sends are fire-and-forget: a `Transport` reports failure, and the
//! controller logs it and carries on.

use std::sync::{Arc, Mutex};

pub type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Anything that can deliver a text frame to the remote side
pub trait Transport: Send {
    fn send(&self, payload: String) -> Result<(), SendError>;
}

/// No remote side; every send fails
#[derive(Debug, Default, Clone, Copy)]
pub struct Disconnected;

impl Transport for Disconnected {
    fn send(&self, _payload: String) -> Result<(), SendError> {
        Err("transport not connected".into())
    }
}

/// Keeps every sent frame in memory, in order
///
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<String>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames sent so far
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Remove and return frames sent so far
    pub fn drain(&self) -> Vec<String> {
        self.sent
            .lock()
            .map(|mut sent| std::mem::take(&mut *sent))
            .unwrap_or_default()
    }
}

impl Transport for MemoryTransport {
    fn send(&self, payload: String) -> Result<(), SendError> {
        self.sent
            .lock()
            .map_err(|_| "memory transport poisoned")?
            .push(payload);
        Ok(())
    }
}

impl<T: Transport + Sync> Transport for Arc<T> {
    fn send(&self, payload: String) -> Result<(), SendError> {
        (**self).send(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_fails() {
        assert!(Disconnected.send("{}".to_string()).is_err());
    }

    #[test]
    fn test_memory_transport_shares_buffer() {
        let transport = MemoryTransport::new();
        let clone = transport.clone();
        clone.send("a".to_string()).unwrap();
        transport.send("b".to_string()).unwrap();
        assert_eq!(transport.sent(), vec!["a", "b"]);
        assert_eq!(clone.drain(), vec!["a", "b"]);
        assert!(transport.sent().is_empty());
    }
}
