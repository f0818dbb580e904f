//! Image Utils WASM - WebAssembly bindings for image-utils
//!
//! This crate exposes the image-utils-core operations to JavaScript and
//! TypeScript applications.
//!
//! # Module Structure
//!
//! - `ops` - crop, rotate, resize and resize_to_max
//! - `channel` - method-name dispatch, plan inspection and EXIF rotation
//! - `logging` - browser console backend for `log`
//!
//! # Usage
//!
//! ```typescript
//! import init, { rotate } from '@image-utils/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const rotated = rotate(bytes, 90, 85);
//! ```

use wasm_bindgen::prelude::*;

mod channel;
mod logging;
mod ops;

pub use channel::{handle_method_call, plan_operation, read_rotation};
pub use ops::{crop, resize, resize_to_max, rotate};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install(log::LevelFilter::Warn);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
