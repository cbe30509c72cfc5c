//! WASM bindings for vex-playback
//!
//! Binds a [`PlaybackSession`](crate::PlaybackSession) to a real
//! `HTMLAudioElement` so the browser player can drive it from JavaScript.

pub mod manager;
pub mod types;

pub use manager::WasmPlaybackSession;
pub use types::HtmlAudioMedia;
