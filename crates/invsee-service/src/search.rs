//! Searching online players' containers for enchanted items.

use invsee_api::{ItemGrid, WorldHost};
use tracing::debug;

/// A parsed search request: an optional enchantment key and a minimum level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnchantQuery {
    /// Namespaced enchantment key. `None` matches any enchantment.
    pub enchantment: Option<String>,
    pub min_level: i32,
}

impl EnchantQuery {
    /// Parse command arguments. Integers set the minimum level; any other
    /// token is read as an enchantment key, defaulting to the `minecraft:`
    /// namespace. Returns `None` when neither a level nor an enchantment
    /// was given.
    pub fn parse(args: &[String]) -> Option<Self> {
        let mut enchantment = None;
        let mut min_level = 0;

        for arg in args {
            if let Ok(level) = arg.parse::<i32>() {
                min_level = level;
                continue;
            }
            let arg = arg.to_lowercase();
            match arg.find(':') {
                Some(colon) if colon + 1 < arg.len() => enchantment = Some(arg),
                // A trailing colon is not a usable key.
                Some(_) => continue,
                None => enchantment = Some(format!("minecraft:{arg}")),
            }
        }

        if min_level == 0 && enchantment.is_none() {
            return None;
        }
        Some(Self {
            enchantment,
            min_level,
        })
    }

    /// Render the query the way result messages describe it.
    pub fn describe(&self) -> String {
        format!(
            "{} >= {}",
            self.enchantment.as_deref().unwrap_or(""),
            self.min_level
        )
    }

    /// Whether any item in the grid satisfies the query.
    fn matches_grid(&self, grid: &ItemGrid) -> bool {
        grid.slots()
            .iter()
            .filter(|item| !item.is_empty())
            .any(|item| match &self.enchantment {
                Some(key) => item
                    .enchantments
                    .iter()
                    .any(|e| e.key == *key && e.level >= self.min_level),
                None => item.enchantments.iter().any(|e| e.level >= self.min_level),
            })
    }
}

/// Scan every online player's inventory and ender chest and report the
/// matches to the actor. Runs entirely on the interactive context.
pub(crate) fn run_search(host: &dyn WorldHost, actor_uuid: &str, query: &EnchantQuery) {
    let mut details: Vec<String> = Vec::new();

    for profile in host.online_profiles() {
        let Some(handle) = host.live_handle(&profile.uuid) else {
            debug!("no live handle for online player {}", profile.name);
            continue;
        };
        let in_inventory = query.matches_grid(&handle.inventory.lock().unwrap());
        let in_ender = query.matches_grid(&handle.ender_chest.lock().unwrap());
        if !in_inventory && !in_ender {
            continue;
        }

        let mut places = Vec::new();
        if in_inventory {
            places.push("inv");
        }
        if in_ender {
            places.push("ender");
        }
        details.push(format!("{} ({})", profile.name, places.join(",")));
    }

    let described = query.describe();
    if details.is_empty() {
        host.send_message(
            actor_uuid,
            "messages.info.player.noMatches",
            &[("%target%", described.as_str())],
        );
    } else {
        let detail = details.join(", ");
        host.send_message(
            actor_uuid,
            "messages.info.player.matches",
            &[
                ("%target%", described.as_str()),
                ("%detail%", detail.as_str()),
            ],
        );
    }
}

// ===========================================================================
// Tests
// ===========================================================================
