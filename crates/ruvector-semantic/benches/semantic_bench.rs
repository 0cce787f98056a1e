use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ruvector_semantic::algebra::{bind, random_unit_vector, superpose, unbind, CircularTransform};
use ruvector_semantic::{CleanupMemory, PopulationCode, TransformWeights, Vocabulary};

fn bench_binding(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding");
    let mut rng = StdRng::seed_from_u64(1);

    for dim in [50, 256, 1024].iter() {
        let a = random_unit_vector(*dim, &mut rng);
        let b = random_unit_vector(*dim, &mut rng);
        let bound = bind(&a, &b).unwrap();

        group.bench_with_input(BenchmarkId::new("bind", dim), dim, |bench, _| {
            bench.iter(|| black_box(bind(&a, &b).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("unbind", dim), dim, |bench, _| {
            bench.iter(|| black_box(unbind(&bound, &b).unwrap()));
        });

        // Planned once, reused per call
        let transform = CircularTransform::new(*dim);
        group.bench_with_input(BenchmarkId::new("convolve_planned", dim), dim, |bench, _| {
            bench.iter(|| black_box(transform.convolve(&a, &b).unwrap()));
        });
    }

    group.finish();
}

fn bench_superpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("superpose");
    let mut rng = StdRng::seed_from_u64(2);

    for k in [2, 8, 32].iter() {
        let vectors: Vec<Vec<f64>> = (0..*k).map(|_| random_unit_vector(256, &mut rng)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(k), k, |bench, _| {
            bench.iter(|| black_box(superpose(&vectors).unwrap()));
        });
    }

    group.finish();
}

fn bench_population(c: &mut Criterion) {
    let population = PopulationCode::new(200, 50, Some(3)).unwrap();
    let pointer = random_unit_vector(50, &mut StdRng::seed_from_u64(4));
    let rates = population.encode(&pointer).unwrap();
    population.decoders().unwrap();

    c.bench_function("population_encode", |b| {
        b.iter(|| black_box(population.encode(&pointer).unwrap()));
    });

    c.bench_function("population_decode", |b| {
        b.iter(|| black_box(population.decode(&rates).unwrap()));
    });

    c.bench_function("decoder_fit_40x50", |b| {
        b.iter(|| {
            let fresh = PopulationCode::new(40, 50, Some(5)).unwrap();
            black_box(fresh.decoders().unwrap().nrows())
        });
    });

    let target = PopulationCode::new(200, 50, Some(6)).unwrap();
    let weights = TransformWeights::new(&population, &target).unwrap();
    c.bench_function("binding_weights_200x200", |b| {
        b.iter(|| black_box(weights.binding_weights(&pointer).unwrap()));
    });
}

fn bench_cleanup(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleanup");

    for n_concepts in [3, 10, 30].iter() {
        let mut vocab = Vocabulary::with_seed(50, 7).unwrap();
        for i in 0..*n_concepts {
            vocab.add(format!("C{}", i), None).unwrap();
        }
        vocab.add_noise("C0", 0.5, "noisy").unwrap();
        let noisy = vocab.get("noisy").unwrap().to_vec();
        let memory = CleanupMemory::new(&vocab, 0.001).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(n_concepts),
            n_concepts,
            |b, _| {
                b.iter(|| black_box(memory.cleanup(&noisy, 100).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_binding,
    bench_superpose,
    bench_population,
    bench_cleanup
);
criterion_main!(benches);
