use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::health::HealthConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerCatalog {
    pub schema_version: u32,
    pub trackers: Vec<TrackerDefinition>,
}

/// One spawnable tracker definition from a data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerDefinition {
    pub id: String,
    pub max_health: f32,
    #[serde(default = "default_damage_multiplier")]
    pub damage_multiplier: f32,
    #[serde(default = "default_reset_on_enable")]
    pub reset_on_enable: bool,
    #[serde(default)]
    pub deactivate_on_death: bool,
}

fn default_damage_multiplier() -> f32 {
    1.0
}

fn default_reset_on_enable() -> bool {
    true
}

impl TrackerDefinition {
    pub fn config(&self) -> HealthConfig {
        HealthConfig {
            max_health: self.max_health,
            damage_multiplier: self.damage_multiplier,
            reset_on_enable: self.reset_on_enable,
            deactivate_on_death: self.deactivate_on_death,
        }
    }
}

#[derive(Debug)]
pub enum TrackerDataError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    Validation(String),
}

impl std::fmt::Display for TrackerDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerDataError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            TrackerDataError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            TrackerDataError::Validation(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for TrackerDataError {}

pub fn load_tracker_catalog(path: impl AsRef<Path>) -> Result<TrackerCatalog, TrackerDataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| TrackerDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog: TrackerCatalog =
        serde_json::from_str(&raw).map_err(|source| TrackerDataError::Json {
            path: path.display().to_string(),
            source,
        })?;
    catalog.validate()?;
    Ok(catalog)
}

impl TrackerCatalog {
    pub fn validate(&self) -> Result<(), TrackerDataError> {
        let mut ids = HashSet::new();
        for tracker in &self.trackers {
            if tracker.id.trim().is_empty() {
                return Err(TrackerDataError::Validation(
                    "tracker id cannot be empty".to_string(),
                ));
            }
            if !ids.insert(tracker.id.clone()) {
                return Err(TrackerDataError::Validation(format!(
                    "duplicate tracker id {}",
                    tracker.id
                )));
            }
            if tracker.max_health <= 0.0 {
                return Err(TrackerDataError::Validation(format!(
                    "tracker {} needs a positive max_health",
                    tracker.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_from(json: &str) -> TrackerCatalog {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let catalog = catalog_from(
            r#"{ "schema_version": 1, "trackers": [ { "id": "dummy", "max_health": 30.0 } ] }"#,
        );
        assert!(catalog.validate().is_ok());

        let config = catalog.trackers[0].config();
        assert_eq!(config.max_health, 30.0);
        assert_eq!(config.damage_multiplier, 1.0);
        assert!(config.reset_on_enable);
        assert!(!config.deactivate_on_death);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let catalog = catalog_from(
            r#"{ "schema_version": 1, "trackers": [
                { "id": "thug", "max_health": 40.0 },
                { "id": "thug", "max_health": 40.0 }
            ] }"#,
        );
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn empty_id_is_rejected() {
        let catalog = catalog_from(
            r#"{ "schema_version": 1, "trackers": [ { "id": " ", "max_health": 40.0 } ] }"#,
        );
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn non_positive_max_health_is_rejected() {
        let catalog = catalog_from(
            r#"{ "schema_version": 1, "trackers": [ { "id": "ghost", "max_health": 0.0 } ] }"#,
        );
        assert!(catalog.validate().is_err());
    }
}
