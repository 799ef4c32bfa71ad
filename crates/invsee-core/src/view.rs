//! The dual-pane virtual view of a target's container.

use std::sync::OnceLock;

use invsee_api::{ContainerKind, PlayerProfile, SharedGrid, TargetHandle, WorldHost};

/// Shape classification of the viewed container, derived from the top pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLayout {
    /// The carried main inventory.
    Player,
    /// A 9-column chest grid.
    Chest { rows: usize },
}

impl ViewLayout {
    fn of(kind: ContainerKind, slots: usize) -> Self {
        match kind {
            ContainerKind::Inventory => ViewLayout::Player,
            ContainerKind::EnderChest => ViewLayout::Chest {
                rows: slots.div_ceil(9),
            },
        }
    }
}

fn title_suffix(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Inventory => "'s Inventory",
        ContainerKind::EnderChest => "'s Ender Chest",
    }
}

/// A live view binding one actor to one of a target's containers.
///
/// The top pane is the target's container itself, not a copy; edits through
/// either pane act on the shared grids directly. The view carries no
/// persistence of its own and dies when the presentation layer closes it.
pub struct InventoryView {
    actor_uuid: String,
    owner: PlayerProfile,
    kind: ContainerKind,
    top: SharedGrid,
    bottom: SharedGrid,
    layout: ViewLayout,
    title_key: String,
    title: OnceLock<String>,
}

impl InventoryView {
    pub fn new(
        actor_uuid: &str,
        target: &TargetHandle,
        kind: ContainerKind,
        actor_inventory: SharedGrid,
        title_key: impl Into<String>,
    ) -> Self {
        let top = target.container(kind).clone();
        let layout = ViewLayout::of(kind, top.lock().unwrap().len());
        Self {
            actor_uuid: actor_uuid.to_string(),
            owner: target.profile.clone(),
            kind,
            top,
            bottom: actor_inventory,
            layout,
            title_key: title_key.into(),
            title: OnceLock::new(),
        }
    }

    pub fn actor_uuid(&self) -> &str {
        &self.actor_uuid
    }

    /// Whose container the top pane shows.
    pub fn owner(&self) -> &PlayerProfile {
        &self.owner
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn layout(&self) -> ViewLayout {
        self.layout
    }

    /// The target's container, shared with every other view of it.
    pub fn top(&self) -> &SharedGrid {
        &self.top
    }

    /// The actor's own carried inventory, whichever kind is viewed on top.
    pub fn bottom(&self) -> &SharedGrid {
        &self.bottom
    }

    /// Window title, computed on first call and cached for the life of the
    /// view. Display-name changes after the first read are not reflected.
    pub fn title(&self, host: &dyn WorldHost) -> &str {
        self.title.get_or_init(|| {
            let name = host
                .display_name(&self.owner.uuid)
                .unwrap_or_else(|| self.owner.name.clone());
            host.localize(
                &self.actor_uuid,
                &self.title_key,
                &[("%player%", name.as_str())],
            )
            .unwrap_or_else(|| format!("{name}{}", title_suffix(self.kind)))
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
