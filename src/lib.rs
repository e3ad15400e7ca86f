//! UK National Insurance and pay run calculation engine.
//!
//! This crate calculates Class 1 NI contributions for employees and company
//! directors using HMRC's stepped thresholds and rounding rules, and
//! sequences NI with income tax, pension, student loan and attachment order
//! calculators to produce one employee's pay for a period together with
//! updated year-to-date figures.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
