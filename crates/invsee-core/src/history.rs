//! Per-actor memory of the last successfully opened target.

use std::collections::HashMap;

use invsee_api::ContainerKind;

/// Last successfully opened target per actor and container kind.
///
/// Entries live for the process lifetime and are overwritten by the next
/// successful open. This is a convenience default for argument-less open
/// commands, not a correctness-critical record.
#[derive(Debug, Default)]
pub struct AccessHistory {
    inventory: HashMap<String, String>,
    ender_chest: HashMap<String, String>,
}

impl AccessHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: ContainerKind) -> &HashMap<String, String> {
        match kind {
            ContainerKind::Inventory => &self.inventory,
            ContainerKind::EnderChest => &self.ender_chest,
        }
    }

    fn map_mut(&mut self, kind: ContainerKind) -> &mut HashMap<String, String> {
        match kind {
            ContainerKind::Inventory => &mut self.inventory,
            ContainerKind::EnderChest => &mut self.ender_chest,
        }
    }

    /// Target UUID recorded for this actor and kind, if any.
    pub fn get(&self, actor_uuid: &str, kind: ContainerKind) -> Option<&str> {
        self.map(kind).get(actor_uuid).map(String::as_str)
    }

    /// Record a target, replacing any earlier entry for this actor and kind.
    pub fn record(&mut self, actor_uuid: &str, kind: ContainerKind, target_uuid: &str) {
        self.map_mut(kind)
            .insert(actor_uuid.to_string(), target_uuid.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_returns_none() {
        let history = AccessHistory::new();
        assert!(history.get("admin", ContainerKind::Inventory).is_none());
    }

    #[test]
    fn record_overwrites_previous_entry() {
        let mut history = AccessHistory::new();
        history.record("admin", ContainerKind::Inventory, "bob");
        history.record("admin", ContainerKind::Inventory, "carol");
        assert_eq!(
            history.get("admin", ContainerKind::Inventory),
            Some("carol")
        );
    }

    #[test]
    fn kinds_are_tracked_independently() {
        let mut history = AccessHistory::new();
        history.record("admin", ContainerKind::Inventory, "bob");
        history.record("admin", ContainerKind::EnderChest, "carol");
        assert_eq!(history.get("admin", ContainerKind::Inventory), Some("bob"));
        assert_eq!(
            history.get("admin", ContainerKind::EnderChest),
            Some("carol")
        );
    }

    #[test]
    fn actors_do_not_share_entries() {
        let mut history = AccessHistory::new();
        history.record("admin", ContainerKind::Inventory, "bob");
        assert!(history.get("mod", ContainerKind::Inventory).is_none());
    }
}
