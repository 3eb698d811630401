//! File handle payload.
//!
//! A `FileHandle` is a shared slot that holds an open `File` until it is
//! explicitly closed. After `close`, the slot is empty and every stream
//! operation reports `None`. Clones share the slot, so closing through one
//! clone closes the stream for all of them.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

struct HandleSlot {
    path: PathBuf,
    stream: Option<File>,
}

/// Shared handle to an OS file stream.
#[derive(Clone)]
pub struct FileHandle(Arc<Mutex<HandleSlot>>);

impl FileHandle {
    /// Wrap a freshly opened stream.
    pub fn open(stream: File, path: impl Into<PathBuf>) -> Self {
        FileHandle(Arc::new(Mutex::new(HandleSlot {
            path: path.into(),
            stream: Some(stream),
        })))
    }

    /// Create a handle with no stream bound to it.
    pub fn closed(path: impl Into<PathBuf>) -> Self {
        FileHandle(Arc::new(Mutex::new(HandleSlot {
            path: path.into(),
            stream: None,
        })))
    }

    /// Check whether a stream is bound to this handle.
    pub fn is_open(&self) -> bool {
        self.0.lock().stream.is_some()
    }

    /// The path the handle was opened with.
    pub fn path(&self) -> PathBuf {
        self.0.lock().path.clone()
    }

    /// Release the stream. Returns `false` if the handle was already closed.
    pub fn close(&self) -> bool {
        // Take the file out before dropping it so the lock is not held
        // across the close syscall.
        let stream = self.0.lock().stream.take();
        stream.is_some()
    }

    /// Run `f` against the open stream.
    ///
    /// Returns `None` without calling `f` when the handle is closed.
    pub fn with_stream<R>(&self, f: impl FnOnce(&mut File) -> R) -> Option<R> {
        let mut slot = self.0.lock();
        slot.stream.as_mut().map(f)
    }

    /// Check whether two handles share the same slot.
    pub fn ptr_eq(&self, other: &FileHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.0.lock();
        if slot.stream.is_some() {
            write!(f, "[filehandle {}]", slot.path.display())
        } else {
            f.write_str("[filehandle closed]")
        }
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.0.lock();
        f.debug_struct("FileHandle")
            .field("path", &slot.path)
            .field("open", &slot.stream.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
