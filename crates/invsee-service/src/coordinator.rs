//! The interactive service loop and the off-path load hop.
//!
//! All mutable service state lives on one spawned task fed by an mpsc
//! channel, so every interactive-side effect is serialized. Requests for
//! disconnected targets hand the match-and-load step to the blocking pool
//! and re-enter the loop as `Resume` commands; the resumption re-validates
//! the actor before anything becomes visible.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use invsee_api::{Capability, ContainerKind, TargetHandle, WorldHost};
use invsee_core::history::AccessHistory;
use invsee_core::policy::{self, Access, AccessContext, DenyReason, Presence};
use invsee_core::resolver;
use invsee_core::view::InventoryView;

use crate::config::ServiceConfig;
use crate::error::OpenError;
use crate::search::{self, EnchantQuery};

/// Where finished views are delivered.
pub trait ViewPresenter: Send + Sync {
    fn present(&self, actor_uuid: &str, view: InventoryView);
}

enum Command {
    Open {
        actor_uuid: String,
        kind: ContainerKind,
        target_arg: Option<String>,
    },
    Search {
        actor_uuid: String,
        query: EnchantQuery,
    },
    Resume {
        actor_uuid: String,
        kind: ContainerKind,
        outcome: Result<TargetHandle, OpenError>,
    },
}

/// Client half of the service: fire-and-forget entry points for the
/// command layer. All outcomes are delivered through the host (messages)
/// or the presenter (views).
#[derive(Clone)]
pub struct ServiceHandle {
    tx: mpsc::Sender<Command>,
}

impl ServiceHandle {
    /// Request a view of a target's container for the actor. With no
    /// argument the target falls back to the remembered or own identity.
    pub async fn request_open(
        &self,
        actor_uuid: &str,
        kind: ContainerKind,
        target_arg: Option<&str>,
    ) {
        let _ = self
            .tx
            .send(Command::Open {
                actor_uuid: actor_uuid.to_string(),
                kind,
                target_arg: target_arg.map(String::from),
            })
            .await;
    }

    /// Search all online players' containers for an enchantment. Callers
    /// parse arguments with [`EnchantQuery::parse`] and show their own
    /// usage text when parsing fails.
    pub async fn request_search(&self, actor_uuid: &str, query: EnchantQuery) {
        let _ = self
            .tx
            .send(Command::Search {
                actor_uuid: actor_uuid.to_string(),
                query,
            })
            .await;
    }
}

/// The service loop state. Constructed and consumed by [`AccessService::spawn`].
pub struct AccessService {
    host: Arc<dyn WorldHost>,
    presenter: Arc<dyn ViewPresenter>,
    config: ServiceConfig,
    history: AccessHistory,
    tx: mpsc::Sender<Command>,
}

impl AccessService {
    /// Spawn the service loop onto the current runtime and return the
    /// handle used to submit requests.
    pub fn spawn(
        host: Arc<dyn WorldHost>,
        presenter: Arc<dyn ViewPresenter>,
        config: ServiceConfig,
    ) -> ServiceHandle {
        let (tx, rx) = mpsc::channel(64);
        let service = Self {
            host,
            presenter,
            config,
            history: AccessHistory::new(),
            tx: tx.clone(),
        };
        tokio::spawn(service.run(rx));
        ServiceHandle { tx }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Open {
                    actor_uuid,
                    kind,
                    target_arg,
                } => self.start_open(actor_uuid, kind, target_arg),
                Command::Search { actor_uuid, query } => {
                    search::run_search(self.host.as_ref(), &actor_uuid, &query);
                }
                Command::Resume {
                    actor_uuid,
                    kind,
                    outcome,
                } => self.finish_open(&actor_uuid, kind, outcome),
            }
        }
    }

    /// Interactive half of an open request: pick the target token, then
    /// hand matching and loading to the blocking pool.
    fn start_open(&mut self, actor_uuid: String, kind: ContainerKind, target_arg: Option<String>) {
        if !self.host.is_online(&actor_uuid) {
            debug!("dropping open request from offline actor {actor_uuid}");
            return;
        }

        let token = resolver::choose_target(
            &actor_uuid,
            kind,
            target_arg.as_deref(),
            self.config.access.no_args_opens_self,
            &mut self.history,
        );
        debug!("{actor_uuid} requested {kind:?} of '{token}'");

        let host = Arc::clone(&self.host);
        let tx = self.tx.clone();
        let offline_disabled = self.config.access.disable_offline_access;
        tokio::task::spawn_blocking(move || {
            let outcome = lookup_target(host.as_ref(), &actor_uuid, &token, offline_disabled);
            if tx
                .blocking_send(Command::Resume {
                    actor_uuid,
                    kind,
                    outcome,
                })
                .is_err()
            {
                debug!("service loop gone, discarding lookup result");
            }
        });
    }

    /// Interactive resumption after the off-path lookup: re-validate the
    /// actor, re-check the full rule list, record history, and present.
    fn finish_open(
        &mut self,
        actor_uuid: &str,
        kind: ContainerKind,
        outcome: Result<TargetHandle, OpenError>,
    ) {
        if !self.host.is_online(actor_uuid) {
            self.report_failure(actor_uuid, &OpenError::ActorOffline, None);
            return;
        }

        let handle = match outcome {
            Ok(handle) => handle,
            Err(error) => {
                self.report_failure(actor_uuid, &error, None);
                return;
            }
        };

        // The target may have connected while the load was in flight; a
        // live handle supersedes the loaded one.
        let target_uuid = handle.profile.uuid.clone();
        let presence = if self.host.is_online(&target_uuid) {
            Presence::Online
        } else {
            Presence::Offline
        };
        let handle = match presence {
            Presence::Online => self.host.live_handle(&target_uuid).unwrap_or(handle),
            Presence::Offline => handle,
        };

        let ctx = AccessContext {
            actor_uuid,
            target_uuid: &target_uuid,
            kind,
            presence,
            offline_access_disabled: self.config.access.disable_offline_access,
            target_resolved: true,
            same_world: self.same_world(actor_uuid, &handle),
        };
        if let Access::Denied(reason) = policy::evaluate(&self.host, &ctx) {
            let target_name = self
                .host
                .display_name(&target_uuid)
                .unwrap_or_else(|| handle.profile.name.clone());
            self.report_failure(
                actor_uuid,
                &OpenError::PermissionDenied(reason),
                Some(&target_name),
            );
            return;
        }

        let Some(actor_handle) = self.host.live_handle(actor_uuid) else {
            debug!("{actor_uuid} has no live handle, abandoning open");
            return;
        };

        if !self.config.access.no_args_opens_self {
            self.history.record(actor_uuid, kind, &target_uuid);
        }

        let view = InventoryView::new(
            actor_uuid,
            &handle,
            kind,
            actor_handle.inventory.clone(),
            self.config.title_key(kind),
        );
        info!("{actor_uuid} opened {kind:?} of {}", handle.profile.name);
        self.presenter.present(actor_uuid, view);
    }

    /// Whether actor and target share a world. Unknown worlds cannot be
    /// compared and count as shared.
    fn same_world(&self, actor_uuid: &str, handle: &TargetHandle) -> bool {
        let actor_world = self.host.world_of(actor_uuid);
        let target_world = self
            .host
            .world_of(&handle.profile.uuid)
            .or_else(|| handle.world.clone());
        match (actor_world, target_world) {
            (Some(actor), Some(target)) => actor == target,
            _ => true,
        }
    }

    fn report_failure(&self, actor_uuid: &str, error: &OpenError, target_name: Option<&str>) {
        let Some(key) = error.message_key() else {
            debug!("abandoning open for {actor_uuid}: {error}");
            return;
        };
        if let OpenError::LoadFailure(detail) = error {
            warn!("open failed for {actor_uuid}: {detail}");
        }
        match error {
            OpenError::PermissionDenied(reason) if reason.references_target() => {
                self.host.send_message(
                    actor_uuid,
                    key,
                    &[("%target%", target_name.unwrap_or("unknown"))],
                );
            }
            _ => self.host.send_message(actor_uuid, key, &[]),
        }
    }
}

/// Match and, for disconnected targets, load the requested player. Runs on
/// the blocking pool. The online/offline gate is checked here so no handle
/// is ever produced for an access the gate would refuse.
fn lookup_target(
    host: &dyn WorldHost,
    actor_uuid: &str,
    token: &str,
    offline_disabled: bool,
) -> Result<TargetHandle, OpenError> {
    let profile = host.match_profile(token).ok_or(OpenError::TargetNotFound)?;

    if host.is_online(&profile.uuid) {
        if !host.has_capability(actor_uuid, Capability::OpenOnline) {
            return Err(OpenError::PermissionDenied(DenyReason::NoOnlineAccess));
        }
        return host
            .live_handle(&profile.uuid)
            .ok_or(OpenError::InvalidHandle);
    }

    if !host.has_played_before(&profile.uuid) {
        return Err(OpenError::TargetNotFound);
    }
    if offline_disabled {
        return Err(OpenError::PermissionDenied(DenyReason::OfflineAccessDisabled));
    }
    if !host.has_capability(actor_uuid, Capability::OpenOffline) {
        return Err(OpenError::PermissionDenied(DenyReason::NoOfflineAccess));
    }

    match host.load_handle(&profile) {
        Ok(Some(handle)) => Ok(handle),
        Ok(None) => Err(OpenError::TargetNotFound),
        Err(error) => Err(OpenError::LoadFailure(error.to_string())),
    }
}
