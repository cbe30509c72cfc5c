//! V3XV0ID Core
//!
//! Platform-agnostic core types, the built-in track catalog and storage URL
//! resolution for the V3XV0ID player.
//!
//! This crate provides the foundational building blocks used by the playback
//! session, the storage client and the console.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Mood`, `ArtPattern`, `Visual`, `VideoCombination`
//! - **Catalog**: the compile-time track list and its lookup helpers
//! - **Resolution**: `SourceResolver` turns a filename into a public URL
//! - **Error Handling**: unified `VexError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use vex_core::{Catalog, Mood, PublicUrlResolver};
//!
//! let catalog = Catalog::builtin();
//! let resolver = PublicUrlResolver::new("https://project.supabase.co", "v3xv0id-music");
//!
//! let track = catalog.by_id("echoes-abyss").unwrap();
//! let sources = track.sources(&resolver);
//! assert_eq!(sources.local, "/music/Echoes in the Abyss.mp3");
//! assert!(sources.remote.unwrap().ends_with("/v3xv0id-music/Echoes%20in%20the%20Abyss.mp3"));
//!
//! let smoky = catalog.by_mood(Mood::Smoky);
//! assert!(!smoky.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod art;
pub mod catalog;
pub mod error;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, RotationCursor};
pub use error::{Result, VexError};
pub use resolver::{LocalOnlyResolver, PublicUrlResolver, SourceResolver};
pub use types::{ArtPattern, Mood, Track, TrackSources, VideoCombination, Visual};
