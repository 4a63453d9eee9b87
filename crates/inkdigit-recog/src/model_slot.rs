//! Load-once model storage
//!
//! A [`ModelSlot`] starts empty and is filled exactly once, typically from
//! a background thread. Readers never block: until the slot is filled they
//! see `None` and report [`RecogError::ModelNotReady`].

use crate::{RecogError, RecogResult};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

/// Shared, write-once holder for loaded weights or a model handle
#[derive(Debug)]
pub struct ModelSlot<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> Clone for ModelSlot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for ModelSlot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> ModelSlot<T> {
    /// A slot with nothing loaded yet
    pub fn empty() -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// A slot that is ready immediately
    pub fn ready(value: T) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            cell: Arc::new(cell),
        }
    }

    /// Whether the slot has been filled
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The loaded value, if any
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// The loaded value, or `ModelNotReady`
    pub fn require(&self) -> RecogResult<&T> {
        self.cell.get().ok_or(RecogError::ModelNotReady)
    }

    /// Fill the slot
    ///
    /// # Errors
    ///
    /// Returns the value back if the slot was already filled.
    pub fn fill(&self, value: T) -> Result<(), T> {
        self.cell.set(value)
    }
}

impl<T: Send + Sync + 'static> ModelSlot<T> {
    /// Run `loader` on a new thread and fill the slot with its output
    ///
    /// The returned handle yields the loader's error, if any. A load that
    /// races with another fill is discarded.
    pub fn load_in_background<F>(&self, loader: F) -> JoinHandle<RecogResult<()>>
    where
        F: FnOnce() -> RecogResult<T> + Send + 'static,
    {
        let slot = self.clone();
        thread::spawn(move || match loader() {
            Ok(value) => {
                if slot.fill(value).is_err() {
                    tracing::debug!("model slot already filled, discarding load");
                } else {
                    tracing::info!("model loaded");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "model load failed");
                Err(e)
            }
        })
    }
}
