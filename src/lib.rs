// src/lib.rs

pub mod cli;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod persistence;
pub use crate::core::engine::NptEngine;
pub use crate::error::{NptError, Result};
