//! Entity allow-list: the only entity names the query routes will resolve.

use crate::config::Settings;
use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Entities served when neither `ENTITIES_PATH` nor `ALLOWED_ENTITIES` is set.
pub const DEFAULT_ENTITIES: &[&str] = &["cargos", "categorias", "fornecedores", "mesas"];

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// One entry of the entities file.
#[derive(Clone, Debug, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    /// Physical table; defaults to `name`.
    #[serde(default)]
    pub table: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDef {
    /// Name used in request paths.
    pub name: String,
    pub table: String,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entities: Vec<EntityDef>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build from entries, rejecting invalid identifiers and duplicate names.
    pub fn from_configs(configs: Vec<EntityConfig>) -> Result<Self, ConfigError> {
        if configs.is_empty() {
            return Err(ConfigError::Validation("at least one entity must be allowed".into()));
        }
        let ident = Regex::new(IDENTIFIER_PATTERN).map_err(|e| ConfigError::Validation(e.to_string()))?;
        let mut catalog = Catalog::default();
        for c in configs {
            let table = c.table.unwrap_or_else(|| c.name.clone());
            if !ident.is_match(&c.name) {
                return Err(ConfigError::InvalidIdentifier { kind: "entity", value: c.name });
            }
            if !ident.is_match(&table) {
                return Err(ConfigError::InvalidIdentifier { kind: "table", value: table });
            }
            if catalog.by_name.contains_key(&c.name) {
                return Err(ConfigError::DuplicateEntity(c.name));
            }
            catalog.by_name.insert(c.name.clone(), catalog.entities.len());
            catalog.entities.push(EntityDef { name: c.name, table });
        }
        Ok(catalog)
    }

    pub fn from_names<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_configs(
            names
                .into_iter()
                .map(|n| EntityConfig { name: n.into(), table: None })
                .collect(),
        )
    }

    /// Resolve the allow-list from settings: entities file, then `ALLOWED_ENTITIES`, then defaults.
    pub async fn load(settings: &Settings) -> Result<Self, ConfigError> {
        if let Some(path) = &settings.entities_path {
            return Self::load_file(path).await;
        }
        match &settings.allowed_entities {
            Some(names) => Self::from_names(names.iter().cloned()),
            None => Self::from_names(DEFAULT_ENTITIES.iter().copied()),
        }
    }

    pub async fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        let configs: Vec<EntityConfig> = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_configs(configs)
    }

    pub fn get(&self, name: &str) -> Option<&EntityDef> {
        self.by_name.get(name).map(|&i| &self.entities[i])
    }

    pub fn entities(&self) -> &[EntityDef] {
        &self.entities
    }
}
