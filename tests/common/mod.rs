//! Shared fixtures: a recording host, a fake module system and a warning counter.

#![allow(dead_code)]

use parking_lot::Mutex;
use replica_loader::constants::{MODULE_ACCESSOR, MODULE_CONTEXT_INTERFACE, SYMBOL_LOADER_METHOD};
use replica_loader::context::in_memory::InMemoryContainer;
use replica_loader::context::{
    AttributeListener, AttributeValue, ContainerContext, ContainerHandle, InMemoryContext, ListenerId,
};
use replica_loader::host::{ClusterMessage, ReplicationHost};
use replica_loader::loader::{DynValue, DynamicObject, InterfaceDescriptor, MethodSignature};
use replica_loader::{InvocationError, LoaderRef, Symbol};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Host with a fixed static loader list that counts every interaction
pub struct TestHost {
    container: Option<ContainerHandle>,
    statics: Vec<LoaderRef>,
    pub static_calls: AtomicUsize,
    pub delivered: Mutex<Vec<ClusterMessage>>,
    pub full_syncs: AtomicUsize,
    /// Artificial delay inside `static_loaders`, to widen race windows
    pub static_delay: Option<Duration>,
}

impl TestHost {
    pub fn new(container: Option<ContainerHandle>, statics: Vec<LoaderRef>) -> Self {
        Self {
            container,
            statics,
            static_calls: AtomicUsize::new(0),
            delivered: Mutex::new(Vec::new()),
            full_syncs: AtomicUsize::new(0),
            static_delay: None,
        }
    }

    pub fn with_static_delay(mut self, delay: Duration) -> Self {
        self.static_delay = Some(delay);
        self
    }

    pub fn static_calls(&self) -> usize {
        self.static_calls.load(Ordering::SeqCst)
    }

    pub fn full_syncs(&self) -> usize {
        self.full_syncs.load(Ordering::SeqCst)
    }
}

impl ReplicationHost for TestHost {
    fn container(&self) -> Option<ContainerHandle> {
        self.container.clone()
    }

    fn static_loaders(&self, _container: Option<&ContainerHandle>) -> Vec<LoaderRef> {
        self.static_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.static_delay {
            std::thread::sleep(delay);
        }
        self.statics.clone()
    }

    fn deliver(&self, message: ClusterMessage) {
        self.delivered.lock().push(message);
    }

    fn request_full_sync(&self) {
        self.full_syncs.fetch_add(1, Ordering::SeqCst);
    }
}

/// Container named `/shop` backed by a fresh in-memory context
pub fn container_with_context(own_loader: Option<LoaderRef>) -> (ContainerHandle, Arc<InMemoryContext>) {
    let context = Arc::new(InMemoryContext::new(own_loader));
    let container: ContainerHandle = Arc::new(InMemoryContainer::new("/shop", Some(context.clone())));
    (container, context)
}

/// Context whose own `loader()` is slow. The resolver asks for it after reading
/// the watched attribute, so the delay opens a window inside the population guard.
pub struct SlowLoaderContext {
    inner: Arc<InMemoryContext>,
    delay: Duration,
}

impl ContainerContext for SlowLoaderContext {
    fn attribute(&self, key: &str) -> Option<AttributeValue> {
        self.inner.attribute(key)
    }

    fn loader(&self) -> Option<LoaderRef> {
        std::thread::sleep(self.delay);
        self.inner.loader()
    }

    fn add_attribute_listener(&self, listener: Arc<dyn AttributeListener>) -> ListenerId {
        self.inner.add_attribute_listener(listener)
    }

    fn remove_attribute_listener(&self, id: ListenerId) -> bool {
        self.inner.remove_attribute_listener(id)
    }
}

/// Container `/shop` whose context delays `loader()`; attributes are changed
/// through the returned in-memory store.
pub fn container_with_slow_loader(delay: Duration) -> (ContainerHandle, Arc<InMemoryContext>) {
    let inner = Arc::new(InMemoryContext::new(None));
    let context = Arc::new(SlowLoaderContext {
        inner: inner.clone(),
        delay,
    });
    let container: ContainerHandle = Arc::new(InMemoryContainer::new("/shop", Some(context)));
    (container, inner)
}

/// Module object exposing the name-based loading method
pub struct FakeBundle {
    pub symbolic_name: String,
    classes: HashSet<String>,
    pub load_calls: AtomicUsize,
}

impl FakeBundle {
    pub fn new(symbolic_name: &str, classes: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            symbolic_name: symbolic_name.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            load_calls: AtomicUsize::new(0),
        })
    }
}

impl DynamicObject for FakeBundle {
    fn type_name(&self) -> &str {
        "org.example.framework.BundleImpl"
    }

    fn interfaces(&self) -> Vec<Arc<InterfaceDescriptor>> {
        vec![InterfaceDescriptor::new("org.osgi.framework.Bundle")]
    }

    fn methods(&self) -> Vec<MethodSignature> {
        vec![MethodSignature::new(SYMBOL_LOADER_METHOD, 1)]
    }

    fn invoke(&self, method: &str, args: Vec<DynValue>) -> Result<DynValue, InvocationError> {
        if method != SYMBOL_LOADER_METHOD {
            return Err(InvocationError::NoSuchMethod {
                type_name: self.type_name().to_string(),
                method: method.to_string(),
            });
        }
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        match args.as_slice() {
            [DynValue::Str(name)] if self.classes.contains(name) => {
                Ok(DynValue::Symbol(Symbol::new(name.clone(), self.symbolic_name.clone())))
            }
            [DynValue::Str(name)] => Err(InvocationError::Raised {
                method: method.to_string(),
                message: format!("ClassNotFound: {name}"),
            }),
            _ => Err(InvocationError::ArityMismatch {
                method: method.to_string(),
                expected: 1,
                actual: args.len(),
            }),
        }
    }
}

/// Module context object; implements the context interface only through a
/// derived interface, so recognition needs the transitive walk.
pub struct FakeBundleContext {
    bundle: Arc<FakeBundle>,
}

impl FakeBundleContext {
    pub fn new(bundle: Arc<FakeBundle>) -> Arc<Self> {
        Arc::new(Self { bundle })
    }
}

impl DynamicObject for FakeBundleContext {
    fn type_name(&self) -> &str {
        "org.example.framework.BundleContextImpl"
    }

    fn interfaces(&self) -> Vec<Arc<InterfaceDescriptor>> {
        let base = InterfaceDescriptor::new(MODULE_CONTEXT_INTERFACE);
        vec![
            InterfaceDescriptor::new("org.example.framework.Lifecycle"),
            InterfaceDescriptor::extending("org.example.framework.ExtendedBundleContext", vec![base]),
        ]
    }

    fn methods(&self) -> Vec<MethodSignature> {
        vec![MethodSignature::new(MODULE_ACCESSOR, 0)]
    }

    fn invoke(&self, method: &str, _args: Vec<DynValue>) -> Result<DynValue, InvocationError> {
        if method == MODULE_ACCESSOR {
            Ok(DynValue::Object(self.bundle.clone()))
        } else {
            Err(InvocationError::NoSuchMethod {
                type_name: self.type_name().to_string(),
                method: method.to_string(),
            })
        }
    }
}

/// Counts WARN events
struct WarningCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` on this thread and count the warnings it logs
pub fn count_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarningCounter(counter.clone()));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, counter.load(Ordering::SeqCst))
}
