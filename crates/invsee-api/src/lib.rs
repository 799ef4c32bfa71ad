//! Host API: shared types and the traits the host game server implements.
//!
//! This crate defines the boundary between the inventory access service and
//! the server that owns the actual world state. It has no dependency on
//! invsee-core or invsee-service.

use std::sync::{Arc, Mutex};

// ─── Identity ────────────────────────────────────────────────────────────────

/// A known player: stable UUID plus current display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub uuid: String,
    pub name: String,
}

impl PlayerProfile {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}

/// The two player-bound containers the service can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// The carried main inventory.
    Inventory,
    /// The auxiliary remote storage.
    EnderChest,
}

/// Named grants checked through the host's permission system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Open containers of connected players.
    OpenOnline,
    /// Open containers of disconnected players.
    OpenOffline,
    /// Open one's own carried inventory remotely.
    OpenSelf,
    /// Open other players' ender chests.
    EnderChestAll,
    /// Target-side protection from access.
    Exempt,
    /// Actor-side bypass of target exemption.
    Override,
    /// Access targets in other worlds.
    CrossWorld,
}

// ─── Items and containers ────────────────────────────────────────────────────

/// An enchantment applied to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enchantment {
    /// Namespaced key, e.g. `minecraft:sharpness`.
    pub key: String,
    pub level: i32,
}

/// A stack of items in one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// Namespaced item key. Empty string marks an empty slot.
    pub item: String,
    pub count: u16,
    pub enchantments: Vec<Enchantment>,
}

impl ItemStack {
    /// Create an empty slot.
    pub fn empty() -> Self {
        Self {
            item: String::new(),
            count: 0,
            enchantments: Vec::new(),
        }
    }

    pub fn new(item: impl Into<String>, count: u16) -> Self {
        Self {
            item: item.into(),
            count,
            enchantments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_empty() || self.count == 0
    }

    /// Level of the given enchantment, or 0 if the item does not carry it.
    pub fn enchant_level(&self, key: &str) -> i32 {
        self.enchantments
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.level)
            .unwrap_or(0)
    }
}

/// A mutable grid of item slots, the storage unit behind every container.
#[derive(Debug)]
pub struct ItemGrid {
    slots: Vec<ItemStack>,
}

impl ItemGrid {
    /// Create a grid of `size` empty slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| ItemStack::empty()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)
    }

    /// Replace the contents of a slot. Out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, item: ItemStack) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = item;
        }
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }
}

/// The shared-by-reference form of a container. Every view of the same
/// container observes the same grid; mutations are serialized by the
/// service's single-writer loop.
pub type SharedGrid = Arc<Mutex<ItemGrid>>;

/// Wrap a fresh grid for sharing.
pub fn shared_grid(size: usize) -> SharedGrid {
    Arc::new(Mutex::new(ItemGrid::new(size)))
}

// ─── Target handles ──────────────────────────────────────────────────────────

/// A resolved target with its containers attached, sufficient to read and
/// write them. Produced by the host, either from a live player or from
/// persisted data.
#[derive(Debug, Clone)]
pub struct TargetHandle {
    pub profile: PlayerProfile,
    /// Last known world, if the host tracks one for this player.
    pub world: Option<String>,
    pub inventory: SharedGrid,
    pub ender_chest: SharedGrid,
}

impl TargetHandle {
    /// The container of the requested kind.
    pub fn container(&self, kind: ContainerKind) -> &SharedGrid {
        match kind {
            ContainerKind::Inventory => &self.inventory,
            ContainerKind::EnderChest => &self.ender_chest,
        }
    }
}

/// Host-internal failure, e.g. corrupt player data.
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

// ─── Host traits ─────────────────────────────────────────────────────────────

/// Capability lookups, split out so permission rules can be exercised
/// without a full host behind them.
pub trait CapabilitySource {
    fn has_capability(&self, uuid: &str, capability: Capability) -> bool;
}

/// The host game server as seen by the access service.
///
/// Implementations must be callable from any thread. `load_handle` may block
/// on storage and is only ever invoked off the interactive path; everything
/// else is expected to be a cheap lookup.
pub trait WorldHost: CapabilitySource + Send + Sync {
    /// Best-effort match of a free-form name or UUID against known players.
    fn match_profile(&self, name_or_uuid: &str) -> Option<PlayerProfile>;

    /// Whether this player has ever been seen by the host.
    fn has_played_before(&self, uuid: &str) -> bool;

    fn is_online(&self, uuid: &str) -> bool;

    /// World the player is currently (or was last) in.
    fn world_of(&self, uuid: &str) -> Option<String>;

    /// Current display name, which may differ from the profile name.
    fn display_name(&self, uuid: &str) -> Option<String>;

    /// Handle for a connected player, backed by their live containers.
    fn live_handle(&self, uuid: &str) -> Option<TargetHandle>;

    /// Load a disconnected player's data from storage. `Ok(None)` means no
    /// persisted data exists. May block.
    fn load_handle(&self, profile: &PlayerProfile) -> Result<Option<TargetHandle>, HostError>;

    /// Localized message for the recipient, or `None` if the key has no
    /// translation. Replacement pairs are `(placeholder, value)`.
    fn localize(
        &self,
        recipient_uuid: &str,
        key: &str,
        replacements: &[(&str, &str)],
    ) -> Option<String>;

    /// Deliver a message to a player. Unknown recipients are a no-op.
    fn send_message(&self, recipient_uuid: &str, key: &str, replacements: &[(&str, &str)]);

    /// All currently connected players.
    fn online_profiles(&self) -> Vec<PlayerProfile>;
}

/// Lets the shared host be handed directly to code that only needs
/// capability lookups.
impl CapabilitySource for Arc<dyn WorldHost> {
    fn has_capability(&self, uuid: &str, capability: Capability) -> bool {
        self.as_ref().has_capability(uuid, capability)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_is_empty() {
        assert!(ItemStack::empty().is_empty());
        assert!(ItemStack::new("minecraft:stone", 0).is_empty());
        assert!(!ItemStack::new("minecraft:stone", 1).is_empty());
    }

    #[test]
    fn enchant_level_lookup() {
        let mut item = ItemStack::new("minecraft:diamond_sword", 1);
        item.enchantments.push(Enchantment {
            key: "minecraft:sharpness".into(),
            level: 4,
        });
        assert_eq!(item.enchant_level("minecraft:sharpness"), 4);
        assert_eq!(item.enchant_level("minecraft:smite"), 0);
    }

    #[test]
    fn new_grid_is_all_empty() {
        let grid = ItemGrid::new(27);
        assert_eq!(grid.len(), 27);
        assert!(grid.slots().iter().all(|s| s.is_empty()));
    }

    #[test]
    fn grid_get_set() {
        let mut grid = ItemGrid::new(9);
        grid.set(3, ItemStack::new("minecraft:dirt", 64));
        assert_eq!(grid.get(3).unwrap().item, "minecraft:dirt");
        assert_eq!(grid.get(3).unwrap().count, 64);
    }

    #[test]
    fn grid_set_out_of_range_ignored() {
        let mut grid = ItemGrid::new(9);
        grid.set(40, ItemStack::new("minecraft:dirt", 1));
        assert!(grid.get(40).is_none());
        assert!(grid.slots().iter().all(|s| s.is_empty()));
    }

    #[test]
    fn handle_container_selection() {
        let handle = TargetHandle {
            profile: PlayerProfile::new("uuid-1", "Steve"),
            world: Some("overworld".into()),
            inventory: shared_grid(36),
            ender_chest: shared_grid(27),
        };
        assert_eq!(
            handle
                .container(ContainerKind::Inventory)
                .lock()
                .unwrap()
                .len(),
            36
        );
        assert_eq!(
            handle
                .container(ContainerKind::EnderChest)
                .lock()
                .unwrap()
                .len(),
            27
        );
    }
}
