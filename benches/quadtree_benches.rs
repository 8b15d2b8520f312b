use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use sector_tree::quadtree::QuadTree;
use sector_tree::{Point, Rectangle};

const HALF_EXTENT: i32 = 1 << 20;
const MAX_RECT_EXTENT: i32 = 2048;

fn get_rand() -> SmallRng {
    SmallRng::seed_from_u64(0xdeadbeef)
}

/// Pairwise disjoint rectangles with distinct values, generated by rejection
/// sampling: a candidate overlapping an accepted rectangle is discarded and
/// redrawn.
fn disjoint_rects(rng: &mut SmallRng, count: usize) -> Vec<(Rectangle, u32)> {
    let mut filter = QuadTree::new(HALF_EXTENT);
    let mut data = Vec::with_capacity(count);
    while data.len() < count {
        let x1 = rng.gen_range(-HALF_EXTENT, HALF_EXTENT - MAX_RECT_EXTENT);
        let y1 = rng.gen_range(-HALF_EXTENT + MAX_RECT_EXTENT, HALF_EXTENT);
        let w = rng.gen_range(1, MAX_RECT_EXTENT);
        let h = rng.gen_range(1, MAX_RECT_EXTENT);
        let rect = Rectangle::new(x1, y1, x1 + w, y1 - h);

        let value = data.len() as u32;
        if filter.insert(rect, value).is_ok() {
            data.push((rect, value));
        }
    }
    data
}

fn linear_find<'a>(data: &'a [(Rectangle, u32)], p: Point) -> Option<&'a u32> {
    data.iter()
        .find(|(rect, _)| rect.contains(p))
        .map(|(_, value)| value)
}

fn insert_disjoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_disjoint");
    let mut rng = get_rand();
    for size in 6..11 {
        let size = 1 << size;
        let items = disjoint_rects(&mut rng, size);

        group.bench_with_input(BenchmarkId::new("Quadtree", size), &size, |b, _| {
            b.iter(|| {
                let mut tree = QuadTree::new(HALF_EXTENT);
                for (rect, value) in items.iter() {
                    tree.insert(*rect, *value).unwrap();
                }
                tree
            });
        });
        group.bench_with_input(BenchmarkId::new("Linear", size), &size, |b, _| {
            b.iter(|| {
                // the brute force equivalent still pays the overlap scan
                let mut data: Vec<(Rectangle, u32)> = Vec::with_capacity(items.len());
                for (rect, value) in items.iter() {
                    assert!(!data.iter().any(|(other, _)| other.intersects(rect)));
                    data.push((*rect, *value));
                }
                data
            });
        });
    }
    group.finish();
}

fn find_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("find, all queried points are covered");
    let mut rng = get_rand();
    for size in 6..13 {
        let size = 1 << size;
        let items = disjoint_rects(&mut rng, size);

        let probes: Vec<(Point, u32)> = items
            .iter()
            .map(|(rect, value)| {
                let p = Point::new(
                    rng.gen_range(rect.left(), rect.right() + 1),
                    rng.gen_range(rect.bottom(), rect.top() + 1),
                );
                (p, *value)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("Quadtree", size), &size, |b, _| {
            let mut tree = QuadTree::new(HALF_EXTENT);
            for (rect, value) in items.iter() {
                tree.insert(*rect, *value).unwrap();
            }
            let mut rng = get_rand();

            b.iter(|| {
                let (p, value) = probes[rng.gen_range(0, probes.len())];
                assert_eq!(tree.find(p), Some(&value));
            });
        });
        group.bench_with_input(BenchmarkId::new("Linear", size), &size, |b, _| {
            let mut rng = get_rand();

            b.iter(|| {
                let (p, value) = probes[rng.gen_range(0, probes.len())];
                assert_eq!(linear_find(&items, p), Some(&value));
            });
        });
    }
    group.finish();
}

fn find_rand(c: &mut Criterion) {
    let mut group = c.benchmark_group("find, uniformly random points");
    let mut rng = get_rand();
    for size in 6..13 {
        let size = 1 << size;
        let items = disjoint_rects(&mut rng, size);

        group.bench_with_input(BenchmarkId::new("Quadtree", size), &size, |b, _| {
            let mut tree = QuadTree::new(HALF_EXTENT);
            for (rect, value) in items.iter() {
                tree.insert(*rect, *value).unwrap();
            }
            let mut rng = get_rand();

            b.iter(|| {
                let p = Point::new(
                    rng.gen_range(-HALF_EXTENT, HALF_EXTENT),
                    rng.gen_range(-HALF_EXTENT, HALF_EXTENT),
                );
                black_box(tree.find(p))
            });
        });
        group.bench_with_input(BenchmarkId::new("Linear", size), &size, |b, _| {
            let mut rng = get_rand();

            b.iter(|| {
                let p = Point::new(
                    rng.gen_range(-HALF_EXTENT, HALF_EXTENT),
                    rng.gen_range(-HALF_EXTENT, HALF_EXTENT),
                );
                black_box(linear_find(&items, p))
            });
        });
    }
    group.finish();
}

criterion_group!(quadtree_benches, insert_disjoint, find_hit, find_rand);

criterion_main!(quadtree_benches);
