//! Canvas 2D rendering module
//!
//! `layout` holds the pure, testable part (what goes where, how bright);
//! `canvas` paints it onto a `CanvasRenderingContext2d` in the browser.

pub mod layout;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
