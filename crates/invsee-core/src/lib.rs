//! Core access logic: permission rules, target selection, access history,
//! and virtual inventory views.
//!
//! Everything here is synchronous and side-effect free apart from history
//! writes; the asynchronous coordination lives in invsee-service.

pub mod history;
pub mod policy;
pub mod resolver;
pub mod view;
