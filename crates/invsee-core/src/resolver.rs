//! Choosing which target an open request refers to.

use invsee_api::ContainerKind;

use crate::history::AccessHistory;

/// Turn the raw command argument into the token handed to the host's
/// profile matcher.
///
/// An explicit argument always wins. With no argument the choice falls back
/// to the actor itself, either directly (`no_args_opens_self`) or through
/// the remembered last target, seeding the history with the actor when it
/// is empty. No permission checks happen here.
pub fn choose_target(
    actor_uuid: &str,
    kind: ContainerKind,
    raw_arg: Option<&str>,
    no_args_opens_self: bool,
    history: &mut AccessHistory,
) -> String {
    if let Some(arg) = raw_arg {
        return arg.to_string();
    }

    if no_args_opens_self {
        return actor_uuid.to_string();
    }

    match history.get(actor_uuid, kind) {
        Some(target) if !target.is_empty() => target.to_string(),
        _ => {
            history.record(actor_uuid, kind, actor_uuid);
            actor_uuid.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_argument_wins() {
        let mut history = AccessHistory::new();
        history.record("admin", ContainerKind::Inventory, "carol");
        let target = choose_target(
            "admin",
            ContainerKind::Inventory,
            Some("bob"),
            false,
            &mut history,
        );
        assert_eq!(target, "bob");
        // The remembered entry is untouched by an explicit argument.
        assert_eq!(
            history.get("admin", ContainerKind::Inventory),
            Some("carol")
        );
    }

    #[test]
    fn opens_self_flag_ignores_history() {
        let mut history = AccessHistory::new();
        history.record("admin", ContainerKind::Inventory, "carol");
        let target = choose_target("admin", ContainerKind::Inventory, None, true, &mut history);
        assert_eq!(target, "admin");
    }

    #[test]
    fn remembered_target_is_the_default() {
        let mut history = AccessHistory::new();
        history.record("admin", ContainerKind::EnderChest, "carol");
        let target = choose_target("admin", ContainerKind::EnderChest, None, false, &mut history);
        assert_eq!(target, "carol");
    }

    #[test]
    fn empty_history_falls_back_to_self_and_seeds() {
        let mut history = AccessHistory::new();
        let target = choose_target("admin", ContainerKind::Inventory, None, false, &mut history);
        assert_eq!(target, "admin");
        assert_eq!(
            history.get("admin", ContainerKind::Inventory),
            Some("admin")
        );
    }

    #[test]
    fn seeding_is_per_kind() {
        let mut history = AccessHistory::new();
        choose_target("admin", ContainerKind::Inventory, None, false, &mut history);
        assert!(history.get("admin", ContainerKind::EnderChest).is_none());
    }
}
