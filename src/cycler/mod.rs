//! Idle cycler
//!
//! This module holds the cycler configuration, the highlight styling rules
//! and the state machine that ties them to input and timers.

pub mod config;
pub mod machine;
pub mod shift;
pub mod style;
