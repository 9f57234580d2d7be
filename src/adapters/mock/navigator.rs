//! Navigator that records redirects instead of performing them.

use std::sync::{Arc, Mutex};

use crate::traits::Navigator;

#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    redirects: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs redirected to, in order.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.lock().unwrap().len()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_sign_in(&self, url: &str) {
        self.redirects.lock().unwrap().push(url.to_string());
    }
}
