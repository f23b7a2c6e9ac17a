//! Attribute store notifications flowing through a started manager.

mod common;

use common::{container_with_context, TestHost};
use replica_loader::context::AttributeValue;
use replica_loader::host::ClusterMessage;
use replica_loader::loader::NamedLoader;
use replica_loader::{ListenerState, ReplicationConfig, ReplicationManager};
use std::sync::Arc;

const WATCHED: &str = "plugins.context";

fn deferred_manager() -> (ReplicationManager, Arc<TestHost>, Arc<replica_loader::context::InMemoryContext>) {
    let (container, context) = container_with_context(Some(NamedLoader::shared("webapp", ["app.Cart"])));
    let host = Arc::new(TestHost::new(Some(container), Vec::new()));
    let config = ReplicationConfig::default()
        .with_attribute_name(WATCHED)
        .with_initialized(false);
    let manager = ReplicationManager::new(host.clone(), config);
    manager.start().unwrap();
    (manager, host, context)
}

#[test]
fn test_every_change_to_watched_key_invalidates() {
    let (manager, _host, context) = deferred_manager();
    let plugin = NamedLoader::shared("plugin", ["p.Widget"]);

    manager.class_loaders();
    context.set_attribute(WATCHED, AttributeValue::loader(plugin.clone()));
    assert_eq!(manager.resolver().cache_stats().invalidations, 1);
    assert!(manager.class_loaders().contains(&plugin));

    let replacement = NamedLoader::shared("replacement", ["p.Widget"]);
    context.set_attribute(WATCHED, AttributeValue::loader(replacement.clone()));
    assert_eq!(manager.resolver().cache_stats().invalidations, 2);
    let loaders = manager.class_loaders();
    assert!(loaders.contains(&replacement) && !loaders.contains(&plugin));

    context.remove_attribute(WATCHED);
    assert_eq!(manager.resolver().cache_stats().invalidations, 3);
    assert_eq!(manager.class_loaders().names(), vec!["webapp"]);
}

#[test]
fn test_unrelated_keys_leave_cache_alone() {
    let (manager, host, context) = deferred_manager();
    let before = manager.class_loaders();

    context.set_attribute("session.timeout", AttributeValue::new(30_u32));
    context.remove_attribute("session.timeout");

    assert!(manager.class_loaders().ptr_eq(&before));
    assert_eq!(manager.resolver().cache_stats().invalidations, 0);
    assert_eq!(manager.state(), ListenerState::Uninitialized);
    assert_eq!(host.full_syncs(), 0);
}

#[test]
fn test_first_publication_initializes_and_requests_one_sync() {
    let (manager, host, context) = deferred_manager();
    let message = || ClusterMessage::new("delta", Some("s-1".to_string()), b"payload".to_vec());

    assert!(!manager.message_data_received(message()));
    assert!(host.delivered.lock().is_empty());

    context.remove_attribute(WATCHED);
    assert_eq!(manager.state(), ListenerState::Uninitialized);

    context.set_attribute(WATCHED, AttributeValue::loader(NamedLoader::shared("p1", ["a.A"])));
    context.set_attribute(WATCHED, AttributeValue::loader(NamedLoader::shared("p2", ["a.A"])));

    assert_eq!(manager.state(), ListenerState::Initialized);
    assert_eq!(host.full_syncs(), 1);
    assert!(manager.message_data_received(message()));
    assert_eq!(host.delivered.lock().len(), 1);
}

#[test]
fn test_stopped_manager_stops_listening() {
    let (manager, _host, context) = deferred_manager();
    manager.class_loaders();

    manager.stop();
    let invalidations = manager.resolver().cache_stats().invalidations;
    assert_eq!(context.listener_count(), 0);

    context.set_attribute(WATCHED, AttributeValue::new("ignored"));
    assert_eq!(manager.resolver().cache_stats().invalidations, invalidations);
    assert!(!manager.is_initialized());
}
