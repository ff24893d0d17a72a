use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use handles::{Handle, Kind, Object, Registry, RegistryConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Tag;

impl Kind for Tag {
    fn name(self) -> &'static str {
        "Tag"
    }
}

struct Payload(#[allow(dead_code)] [u64; 4]);

impl Object<Tag> for Payload {
    const KIND: Tag = Tag;
}

fn insert_release(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> = c.benchmark_group("insert_release");
    for shards in [1usize, 16, 64] {
        let registry: Registry<Tag> = Registry::new(RegistryConfig::default().with_shards(shards));
        let id: BenchmarkId = BenchmarkId::new("shards", shards);
        b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
            b.iter(|| {
                let h: Handle = registry.insert(Payload([0; 4]));
                registry.release(h)
            })
        });
    }
}

fn lookup(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> = c.benchmark_group("lookup");
    for live in [1usize << 10, 1 << 16] {
        let registry: Registry<Tag> = Registry::default();
        let handles: Vec<Handle> = (0..live).map(|i| registry.insert(Payload([i as u64; 4]))).collect();
        let id: BenchmarkId = BenchmarkId::new("live", live);
        let mut i: usize = 0;
        b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
            b.iter(|| {
                i = (i + 1) & (live - 1);
                registry.get::<Payload>(handles[i])
            })
        });
    }
}

criterion_group!(benches, insert_release, lookup);
criterion_main!(benches);
