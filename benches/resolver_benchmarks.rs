use criterion::{black_box, criterion_group, criterion_main, Criterion};
use replica_loader::context::in_memory::InMemoryContainer;
use replica_loader::context::{AttributeValue, ContainerHandle, InMemoryContext};
use replica_loader::host::{ClusterMessage, ReplicationHost};
use replica_loader::loader::{LoaderRef, NamedLoader};
use replica_loader::LoaderResolver;
use std::sync::Arc;

struct BenchHost {
    container: ContainerHandle,
    statics: Vec<LoaderRef>,
}

impl ReplicationHost for BenchHost {
    fn container(&self) -> Option<ContainerHandle> {
        Some(self.container.clone())
    }

    fn static_loaders(&self, _container: Option<&ContainerHandle>) -> Vec<LoaderRef> {
        self.statics.clone()
    }

    fn deliver(&self, _message: ClusterMessage) {}

    fn request_full_sync(&self) {}
}

fn resolver() -> LoaderResolver {
    let context = Arc::new(InMemoryContext::new(Some(NamedLoader::shared("webapp", ["app.Cart"]))));
    context.set_attribute(
        "plugins",
        AttributeValue::loader(NamedLoader::shared("plugin", ["plugin.Widget"])),
    );
    let container: ContainerHandle = Arc::new(InMemoryContainer::new("/shop", Some(context)));
    let statics = (0..8)
        .map(|i| NamedLoader::shared(format!("shared-{i}"), [format!("lib{i}.Type")]))
        .collect();
    LoaderResolver::new(Arc::new(BenchHost { container, statics }), "plugins")
}

fn benchmark_cached_get_loaders(c: &mut Criterion) {
    let resolver = resolver();
    resolver.get_loaders();
    c.bench_function("get_loaders_cached", |b| b.iter(|| black_box(resolver.get_loaders())));
}

fn benchmark_recompute_get_loaders(c: &mut Criterion) {
    let resolver = resolver();
    c.bench_function("get_loaders_recompute", |b| {
        b.iter(|| {
            resolver.invalidate();
            black_box(resolver.get_loaders())
        })
    });
}

fn benchmark_resolve_symbol(c: &mut Criterion) {
    let loaders = resolver().get_loaders();
    c.bench_function("resolve_symbol_last_loader", |b| {
        b.iter(|| black_box(loaders.resolve_symbol("plugin.Widget")))
    });
}

criterion_group!(
    benches,
    benchmark_cached_get_loaders,
    benchmark_recompute_get_loaders,
    benchmark_resolve_symbol
);
criterion_main!(benches);
