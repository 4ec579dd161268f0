//! In-memory transport for tests and simulation

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use super::Transport;

/// In-memory transport. Clones share the same buffers, so a test can keep a
/// handle to inject input and inspect output while a session owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Default)]
struct MockTransportInner {
    read_buffer: VecDeque<u8>,
    write_buffer: Vec<u8>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue bytes for the session to read
    pub fn inject_read(&self, data: &[u8]) {
        self.lock().read_buffer.extend(data);
    }

    /// Everything written so far
    pub fn written(&self) -> Vec<u8> {
        self.lock().write_buffer.clone()
    }

    /// Bytes injected but not yet read
    pub fn pending_read(&self) -> usize {
        self.lock().read_buffer.len()
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        let n = inner.read_buffer.len().min(buffer.len());
        for (dst, src) in buffer.iter_mut().zip(inner.read_buffer.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.lock().write_buffer.extend_from_slice(data);
        Ok(())
    }

    fn available(&mut self) -> io::Result<usize> {
        Ok(self.lock().read_buffer.len())
    }
}
