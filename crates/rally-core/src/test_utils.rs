//! In-memory stand-ins for the browser collaborators.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::autosave::{DraftStorage, StorageError};
use crate::video::VideoPlayback;

/// Scripted video element.
#[derive(Debug, Clone)]
pub struct FakeVideo {
    pub time: f64,
    pub length: f64,
    pub paused: bool,
    /// Every seek target, in order.
    pub seeks: Vec<f64>,
}

impl FakeVideo {
    pub fn new(length: f64) -> Self {
        Self {
            time: 0.0,
            length,
            paused: true,
            seeks: Vec::new(),
        }
    }

    pub fn at(mut self, time: f64) -> Self {
        self.time = time;
        self
    }
}

impl VideoPlayback for FakeVideo {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> f64 {
        self.length
    }

    fn seek_to(&mut self, seconds: f64) {
        self.time = seconds;
        self.seeks.push(seconds);
        self.paused = false;
    }

    fn seek_to_with_preview(&mut self, seconds: f64) {
        self.time = seconds;
        self.seeks.push(seconds);
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Map-backed storage that counts writes and can be told to fail them.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pub items: RefCell<HashMap<String, String>>,
    pub writes: RefCell<usize>,
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

impl DraftStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write("quota exceeded".to_string()));
        }
        *self.writes.borrow_mut() += 1;
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
