//! Application state for the NI calculation API.

use std::sync::Arc;

use crate::config::ReferenceDataProvider;

/// Shared application state.
///
/// Holds the NI reference data shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    reference_data: Arc<dyn ReferenceDataProvider>,
}

impl AppState {
    /// Creates a new application state from loaded reference data.
    pub fn new<P: ReferenceDataProvider + 'static>(reference_data: P) -> Self {
        Self {
            reference_data: Arc::new(reference_data),
        }
    }

    /// Returns the reference data.
    pub fn reference_data(&self) -> &dyn ReferenceDataProvider {
        self.reference_data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }
}
