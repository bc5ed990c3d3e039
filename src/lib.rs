#![doc(test(attr(deny(warnings))))]

//! Monthly Budget keeps one budget record per calendar month (salary, the
//! shared rent bill, rent detail lines and general charges), persists the
//! whole set as a single JSON document and derives totals, a rent
//! reconciliation check and a money-flow graph from the active month.

pub mod budget;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Monthly Budget tracing initialized.");
    });
}
