//! Ordered permission rules for remote container access.
//!
//! The rules run in a fixed order and the first denial wins, which makes the
//! tie-break between overlapping denials auditable and testable in
//! isolation.

use invsee_api::{Capability, CapabilitySource, ContainerKind};
use tracing::debug;

/// Whether the target is connected at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

/// Why an access request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Offline access is switched off for the whole server.
    OfflineAccessDisabled,
    /// Actor may not open containers of disconnected players.
    NoOfflineAccess,
    /// Actor may not open containers of connected players.
    NoOnlineAccess,
    /// No usable target handle was attached to the request.
    InvalidTarget,
    /// Actor may not open their own carried inventory remotely.
    NoSelfAccess,
    /// Actor may not open other players' ender chests.
    NoEnderAccess,
    /// Target is protected and the actor holds no override.
    TargetExempt,
    /// Target is in another world.
    CrossWorld,
}

impl DenyReason {
    /// Message key sent to the actor for this denial.
    pub fn message_key(self) -> &'static str {
        match self {
            DenyReason::OfflineAccessDisabled => "messages.error.offlineAccessDisabled",
            DenyReason::NoOfflineAccess => "messages.error.permissionPlayerOffline",
            DenyReason::NoOnlineAccess => "messages.error.permissionPlayerOnline",
            DenyReason::InvalidTarget => "messages.error.invalidPlayer",
            DenyReason::NoSelfAccess => "messages.error.permissionOpenSelf",
            DenyReason::NoEnderAccess => "messages.error.permissionEnderAll",
            DenyReason::TargetExempt => "messages.error.permissionExempt",
            DenyReason::CrossWorld => "messages.error.permissionCrossWorld",
        }
    }

    /// Whether the denial message names the target via a `%target%`
    /// replacement.
    pub fn references_target(self) -> bool {
        matches!(self, DenyReason::TargetExempt | DenyReason::CrossWorld)
    }
}

/// Outcome of evaluating the rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(DenyReason),
}

/// Everything the rules need to decide one access request.
#[derive(Debug, Clone)]
pub struct AccessContext<'a> {
    pub actor_uuid: &'a str,
    pub target_uuid: &'a str,
    pub kind: ContainerKind,
    pub presence: Presence,
    /// Offline access globally disabled by configuration.
    pub offline_access_disabled: bool,
    /// Whether a usable handle for the target is attached to the request.
    pub target_resolved: bool,
    /// Actor and target share a world partition. Callers treat unknown
    /// worlds as shared, so the cross-world rule only fires on a confirmed
    /// mismatch.
    pub same_world: bool,
}

impl AccessContext<'_> {
    fn is_self(&self) -> bool {
        self.actor_uuid == self.target_uuid
    }
}

type RuleFn = fn(&dyn CapabilitySource, &AccessContext) -> Option<DenyReason>;

struct Rule {
    name: &'static str,
    check: RuleFn,
}

const RULES: &[Rule] = &[
    Rule {
        name: "offline-gate",
        check: rule_offline_gate,
    },
    Rule {
        name: "online-gate",
        check: rule_online_gate,
    },
    Rule {
        name: "resolved-target",
        check: rule_resolved_target,
    },
    Rule {
        name: "self-inventory",
        check: rule_self_inventory,
    },
    Rule {
        name: "ender-others",
        check: rule_ender_others,
    },
    Rule {
        name: "exempt-target",
        check: rule_exempt_target,
    },
    Rule {
        name: "cross-world",
        check: rule_cross_world,
    },
];

/// Evaluate an access request against the rule list. First denial wins; no
/// side effects.
pub fn evaluate(caps: &impl CapabilitySource, ctx: &AccessContext) -> Access {
    let caps: &dyn CapabilitySource = caps;
    for rule in RULES {
        if let Some(reason) = (rule.check)(caps, ctx) {
            debug!(
                "{} denied {:?} of {} by {} rule",
                ctx.actor_uuid, ctx.kind, ctx.target_uuid, rule.name
            );
            return Access::Denied(reason);
        }
    }
    Access::Allowed
}

fn actor_has(caps: &dyn CapabilitySource, ctx: &AccessContext, cap: Capability) -> bool {
    caps.has_capability(ctx.actor_uuid, cap)
}

fn rule_offline_gate(caps: &dyn CapabilitySource, ctx: &AccessContext) -> Option<DenyReason> {
    if ctx.presence != Presence::Offline {
        return None;
    }
    if ctx.offline_access_disabled {
        return Some(DenyReason::OfflineAccessDisabled);
    }
    if !actor_has(caps, ctx, Capability::OpenOffline) {
        return Some(DenyReason::NoOfflineAccess);
    }
    None
}

fn rule_online_gate(caps: &dyn CapabilitySource, ctx: &AccessContext) -> Option<DenyReason> {
    if ctx.presence == Presence::Online && !actor_has(caps, ctx, Capability::OpenOnline) {
        return Some(DenyReason::NoOnlineAccess);
    }
    None
}

fn rule_resolved_target(_caps: &dyn CapabilitySource, ctx: &AccessContext) -> Option<DenyReason> {
    if !ctx.target_resolved {
        return Some(DenyReason::InvalidTarget);
    }
    None
}

fn rule_self_inventory(caps: &dyn CapabilitySource, ctx: &AccessContext) -> Option<DenyReason> {
    if ctx.is_self()
        && ctx.kind == ContainerKind::Inventory
        && !actor_has(caps, ctx, Capability::OpenSelf)
    {
        return Some(DenyReason::NoSelfAccess);
    }
    None
}

fn rule_ender_others(caps: &dyn CapabilitySource, ctx: &AccessContext) -> Option<DenyReason> {
    if !ctx.is_self()
        && ctx.kind == ContainerKind::EnderChest
        && !actor_has(caps, ctx, Capability::EnderChestAll)
    {
        return Some(DenyReason::NoEnderAccess);
    }
    None
}

fn rule_exempt_target(caps: &dyn CapabilitySource, ctx: &AccessContext) -> Option<DenyReason> {
    if !ctx.is_self()
        && caps.has_capability(ctx.target_uuid, Capability::Exempt)
        && !actor_has(caps, ctx, Capability::Override)
    {
        return Some(DenyReason::TargetExempt);
    }
    None
}

fn rule_cross_world(caps: &dyn CapabilitySource, ctx: &AccessContext) -> Option<DenyReason> {
    if !ctx.is_self() && !ctx.same_world && !actor_has(caps, ctx, Capability::CrossWorld) {
        return Some(DenyReason::CrossWorld);
    }
    None
}

// ===========================================================================
// Tests
// ===========================================================================
