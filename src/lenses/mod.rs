//! Lens system for prism-chat.
//!
//! A lens is a named prompt fragment representing a persona or mindset.
//! Lenses are injected into the system prompt sent to the chat backend:
//! the composer builds one prompt from the ordered set of active lenses,
//! the catalog resolves lens ids to definitions (bundled presets plus
//! user-authored customs), and the generator creates new custom lenses
//! from a free-text description with a single LLM call.

pub mod catalog;
pub mod compose;
pub mod generator;
pub mod presets;
pub mod types;

pub use catalog::{CreateCustomLens, InMemoryLensStore, LensCatalog};
pub use compose::{compose_lens_prompt, BASELINE_SYSTEM_PROMPT};
pub use generator::{GeneratedLens, LensAssistant};
pub use presets::{find_preset, preset_lenses};
pub use types::{CustomLens, Lens, PresetLens, MAX_ACTIVE_LENSES};
