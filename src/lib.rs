#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod protocol;
pub mod registers;
pub mod sensors;

pub use error::Error;
pub use registers::{Measurement, RegisterFile};
pub use sensors::{DhtType, RtdPreset};
