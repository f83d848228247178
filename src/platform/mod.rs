//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (pointer, keyboard) gathered between frames
//! - The wasm-bindgen bridge the page drives (browser only)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputQueue, KeyCommand};
