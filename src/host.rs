//! # Host Replication Component Boundary
//!
//! What the resolver and the replication manager need from the surrounding
//! clustering layer. The replication protocol, session format and transport all
//! live behind this trait.

use crate::context::ContainerHandle;
use crate::loader::LoaderRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host clustering component
pub trait ReplicationHost: Send + Sync {
    /// The container this host is attached to, if any
    fn container(&self) -> Option<ContainerHandle>;

    /// Statically known loaders for `container`, in priority order.
    ///
    /// Called while the resolver holds its population guard. Changing the
    /// watched attribute from here is allowed: the invalidation runs on the same
    /// thread and the set computed by that call is returned but not cached.
    fn static_loaders(&self, container: Option<&ContainerHandle>) -> Vec<LoaderRef>;

    /// Hand an incoming replication message to the protocol layer
    fn deliver(&self, message: ClusterMessage);

    /// Request a full session state transfer from the cluster
    fn request_full_sync(&self);
}

/// Opaque replication message received from another cluster member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMessage {
    pub kind: String,
    pub session_id: Option<String>,
    pub payload: Vec<u8>,
    pub received_at: DateTime<Utc>,
}

impl ClusterMessage {
    pub fn new(kind: impl Into<String>, session_id: Option<String>, payload: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            session_id,
            payload,
            received_at: Utc::now(),
        }
    }
}
