use serde::Deserialize;
use std::path::Path;

use invsee_api::ContainerKind;

/// Service configuration, loaded from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub access: AccessSection,
    #[serde(default)]
    pub titles: TitlesSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccessSection {
    /// Open the actor's own container when no target argument is given,
    /// instead of remembering and reusing the last target.
    #[serde(default)]
    pub no_args_opens_self: bool,
    /// Refuse all access to disconnected targets, regardless of grants.
    #[serde(default)]
    pub disable_offline_access: bool,
}

#[derive(Debug, Deserialize)]
pub struct TitlesSection {
    /// Localization key for inventory view titles.
    #[serde(default = "default_inventory_title_key")]
    pub inventory_key: String,
    /// Localization key for ender chest view titles.
    #[serde(default = "default_ender_chest_title_key")]
    pub ender_chest_key: String,
}

fn default_inventory_title_key() -> String {
    "container.playerInventory".into()
}

fn default_ender_chest_title_key() -> String {
    "container.enderChest".into()
}

impl Default for TitlesSection {
    fn default() -> Self {
        Self {
            inventory_key: default_inventory_title_key(),
            ender_chest_key: default_ender_chest_title_key(),
        }
    }
}

impl ServiceConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Title key for the given container kind.
    pub fn title_key(&self, kind: ContainerKind) -> &str {
        match kind {
            ContainerKind::Inventory => &self.titles.inventory_key,
            ContainerKind::EnderChest => &self.titles.ender_chest_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert!(!config.access.no_args_opens_self);
        assert!(!config.access.disable_offline_access);
        assert_eq!(config.titles.inventory_key, "container.playerInventory");
        assert_eq!(config.titles.ender_chest_key, "container.enderChest");
    }

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [access]
            no_args_opens_self = true
            disable_offline_access = true

            [titles]
            inventory_key = "custom.inventory"
        "#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert!(config.access.no_args_opens_self);
        assert!(config.access.disable_offline_access);
        assert_eq!(config.titles.inventory_key, "custom.inventory");
        // unset keys keep their defaults
        assert_eq!(config.titles.ender_chest_key, "container.enderChest");
    }

    #[test]
    fn title_key_per_kind() {
        let config = ServiceConfig::default();
        assert_eq!(
            config.title_key(ContainerKind::Inventory),
            "container.playerInventory"
        );
        assert_eq!(
            config.title_key(ContainerKind::EnderChest),
            "container.enderChest"
        );
    }
}
