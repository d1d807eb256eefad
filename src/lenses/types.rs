//! Lens data model.
//!
//! Two lens variants share one id namespace: presets are bundled with the
//! binary and fixed; customs are user-authored and live in the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of lenses that can be active at once on one
/// conversation.
pub const MAX_ACTIVE_LENSES: usize = 5;

/// A bundled, fixed lens definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetLens {
    /// Stable identifier (e.g., "devils-advocate").
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-sentence description.
    pub description: String,
    /// Icon name for renderers.
    pub icon: String,
    /// Grouping category (e.g., "Business", "Reasoning").
    pub category: String,
    /// The prompt fragment injected into the system prompt.
    pub prompt: String,
}

/// A user-authored lens definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLens {
    /// Generated identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-sentence description.
    pub description: String,
    /// The prompt fragment injected into the system prompt.
    pub prompt: String,
    /// Icon name for renderers.
    pub icon: String,
    /// The free-text description this lens was generated from.
    pub original_input: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A resolved lens, preset or custom. Immutable once resolved for a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lens {
    /// A bundled preset lens.
    Preset(PresetLens),
    /// A user-authored custom lens.
    Custom(CustomLens),
}

impl Lens {
    /// The lens identifier.
    pub fn id(&self) -> &str {
        match self {
            Lens::Preset(l) => &l.id,
            Lens::Custom(l) => &l.id,
        }
    }

    /// The display name.
    pub fn name(&self) -> &str {
        match self {
            Lens::Preset(l) => &l.name,
            Lens::Custom(l) => &l.name,
        }
    }

    /// The prompt fragment.
    pub fn prompt(&self) -> &str {
        match self {
            Lens::Preset(l) => &l.prompt,
            Lens::Custom(l) => &l.prompt,
        }
    }

    /// The one-sentence description.
    pub fn description(&self) -> &str {
        match self {
            Lens::Preset(l) => &l.description,
            Lens::Custom(l) => &l.description,
        }
    }

    /// Whether this is a user-authored lens.
    pub fn is_custom(&self) -> bool {
        matches!(self, Lens::Custom(_))
    }
}

impl From<PresetLens> for Lens {
    fn from(lens: PresetLens) -> Self {
        Lens::Preset(lens)
    }
}

impl From<CustomLens> for Lens {
    fn from(lens: CustomLens) -> Self {
        Lens::Custom(lens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_custom() -> CustomLens {
        CustomLens {
            id: "c-1".to_string(),
            name: "Stoic".to_string(),
            description: "Respond with stoic calm.".to_string(),
            prompt: "Respond as a stoic philosopher would.".to_string(),
            icon: "Sparkles".to_string(),
            original_input: "a stoic".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_lens_accessors() {
        let lens: Lens = sample_custom().into();
        assert_eq!(lens.id(), "c-1");
        assert_eq!(lens.name(), "Stoic");
        assert!(lens.prompt().contains("stoic"));
        assert!(lens.is_custom());
    }

    #[test]
    fn test_preset_is_not_custom() {
        let lens: Lens = crate::lenses::presets::preset_lenses()
            .into_iter()
            .next()
            .map(Lens::Preset)
            .expect("at least one preset");
        assert!(!lens.is_custom());
    }
}
