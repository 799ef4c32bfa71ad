//! Request-level failures of the open pipeline.

use invsee_core::policy::DenyReason;
use thiserror::Error;

/// Why an open request did not produce a view.
///
/// Every variant is recoverable at the request level; nothing is retried
/// automatically and the actor must reissue the command.
#[derive(Debug, Error)]
pub enum OpenError {
    /// No known player matched the request.
    #[error("no known player matched the request")]
    TargetNotFound,

    #[error("access denied: {0:?}")]
    PermissionDenied(DenyReason),

    /// The actor disconnected while the request was in flight.
    #[error("requesting player is no longer online")]
    ActorOffline,

    /// The host produced no handle for a player it claims to know.
    #[error("target handle unavailable")]
    InvalidHandle,

    #[error("player data load failed: {0}")]
    LoadFailure(String),
}

impl OpenError {
    /// Message key reported to the actor, or `None` for outcomes that stay
    /// silent because the actor already left the interaction.
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            OpenError::TargetNotFound | OpenError::InvalidHandle => {
                Some("messages.error.invalidPlayer")
            }
            OpenError::PermissionDenied(reason) => Some(reason.message_key()),
            OpenError::ActorOffline => None,
            OpenError::LoadFailure(_) => Some("messages.error.commandException"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_targets_report_invalid_player() {
        assert_eq!(
            OpenError::TargetNotFound.message_key(),
            Some("messages.error.invalidPlayer")
        );
        assert_eq!(
            OpenError::InvalidHandle.message_key(),
            Some("messages.error.invalidPlayer")
        );
    }

    #[test]
    fn denials_use_the_reason_key() {
        let err = OpenError::PermissionDenied(DenyReason::NoEnderAccess);
        assert_eq!(err.message_key(), Some("messages.error.permissionEnderAll"));
    }

    #[test]
    fn departed_actor_stays_silent() {
        assert_eq!(OpenError::ActorOffline.message_key(), None);
    }

    #[test]
    fn load_failures_report_generically() {
        let err = OpenError::LoadFailure("disk on fire".into());
        assert_eq!(
            err.message_key(),
            Some("messages.error.commandException")
        );
    }
}
