//! Lens catalog: id resolution and custom-lens CRUD.
//!
//! The catalog is the external collaborator the debate core consumes lenses
//! through. The core only ever sees resolved [`Lens`] values; where customs
//! are actually persisted is the catalog implementation's business. The
//! bundled [`InMemoryLensStore`] keeps customs for the process lifetime.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::presets::{find_preset, preset_lenses};
use super::types::{CustomLens, Lens, MAX_ACTIVE_LENSES};
use crate::error::LensError;

/// Bounds for custom lens fields, matching the public API contract.
const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
const PROMPT_MIN: usize = 10;
const PROMPT_MAX: usize = 2000;

/// Input for creating a custom lens.
#[derive(Debug, Clone)]
pub struct CreateCustomLens {
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub icon: String,
    pub original_input: String,
}

impl CreateCustomLens {
    /// Validates field bounds.
    pub fn validate(&self) -> Result<(), LensError> {
        let check = |field: &str, value: &str, min: usize, max: usize| {
            let len = value.chars().count();
            if len < min || len > max {
                return Err(LensError::InvalidField {
                    field: field.to_string(),
                    message: format!("length must be between {} and {} characters", min, max),
                });
            }
            Ok(())
        };

        check("name", &self.name, 1, NAME_MAX)?;
        check("description", &self.description, 1, DESCRIPTION_MAX)?;
        check("prompt", &self.prompt, PROMPT_MIN, PROMPT_MAX)?;
        Ok(())
    }
}

/// Catalog of available lenses: bundled presets plus user-authored customs.
#[async_trait]
pub trait LensCatalog: Send + Sync {
    /// Lists all lenses, presets first.
    async fn list_all(&self) -> Result<Vec<Lens>, LensError>;

    /// Resolves an ordered list of lens ids to lens definitions,
    /// preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::NotFound`] for any unknown id, and
    /// [`LensError::LimitExceeded`] when more than [`MAX_ACTIVE_LENSES`]
    /// ids are requested.
    async fn resolve(&self, ids: &[String]) -> Result<Vec<Lens>, LensError>;

    /// Creates a custom lens.
    async fn create_custom(&self, input: CreateCustomLens) -> Result<CustomLens, LensError>;

    /// Deletes a custom lens by id.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::NotFound`] if no custom lens has that id.
    /// Presets cannot be deleted.
    async fn delete_custom(&self, id: &str) -> Result<(), LensError>;
}

/// In-memory lens store: the bundled presets plus a process-lifetime map of
/// custom lenses.
pub struct InMemoryLensStore {
    customs: RwLock<HashMap<String, CustomLens>>,
}

impl InMemoryLensStore {
    /// Creates an empty store (presets only).
    pub fn new() -> Self {
        Self {
            customs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLensStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LensCatalog for InMemoryLensStore {
    async fn list_all(&self) -> Result<Vec<Lens>, LensError> {
        let mut lenses: Vec<Lens> = preset_lenses().into_iter().map(Lens::Preset).collect();

        let customs = self.customs.read().await;
        let mut custom_lenses: Vec<&CustomLens> = customs.values().collect();
        custom_lenses.sort_by_key(|l| l.created_at);
        lenses.extend(custom_lenses.into_iter().cloned().map(Lens::Custom));

        tracing::debug!(count = lenses.len(), "Listed lens catalog");
        Ok(lenses)
    }

    async fn resolve(&self, ids: &[String]) -> Result<Vec<Lens>, LensError> {
        if ids.len() > MAX_ACTIVE_LENSES {
            return Err(LensError::LimitExceeded {
                limit: MAX_ACTIVE_LENSES,
            });
        }

        let mut resolved = Vec::with_capacity(ids.len());
        let customs = self.customs.read().await;

        // Presets and customs share one id namespace; presets win lookups.
        for id in ids {
            if let Some(preset) = find_preset(id) {
                resolved.push(Lens::Preset(preset));
            } else if let Some(custom) = customs.get(id) {
                resolved.push(Lens::Custom(custom.clone()));
            } else {
                tracing::warn!(lens_id = %id, "Lens not found during resolve");
                return Err(LensError::NotFound(id.clone()));
            }
        }

        Ok(resolved)
    }

    async fn create_custom(&self, input: CreateCustomLens) -> Result<CustomLens, LensError> {
        input.validate()?;

        let lens = CustomLens {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            prompt: input.prompt,
            icon: input.icon,
            original_input: input.original_input,
            created_at: Utc::now(),
        };

        let mut customs = self.customs.write().await;
        customs.insert(lens.id.clone(), lens.clone());

        tracing::info!(lens_id = %lens.id, name = %lens.name, "Created custom lens");
        Ok(lens)
    }

    async fn delete_custom(&self, id: &str) -> Result<(), LensError> {
        let mut customs = self.customs.write().await;
        if customs.remove(id).is_none() {
            return Err(LensError::NotFound(id.to_string()));
        }
        tracing::info!(lens_id = %id, "Deleted custom lens");
        Ok(())
    }
}
