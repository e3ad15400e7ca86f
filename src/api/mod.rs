//! HTTP API module for the payroll NI engine.
//!
//! This module exposes the Class 1 NI calculator over REST for employees
//! and company directors.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DirectorsNiCalculationRequest, NiCalculationRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
