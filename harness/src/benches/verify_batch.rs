use criterion::{criterion_group, Criterion};
use sigbench::{exercise, perturb::OPERATIONS, BatchFixture, BatchView};
use sigbench_cryptography::Context;

fn benchmark_verify_batch(c: &mut Criterion) {
    let context = Context::signing_and_verification();
    for n in [1, 2, 4, 8, 16, 32, 64] {
        let fixture = BatchFixture::build(&context, n).expect("failed to build fixture");

        // Parallel arrays are built outside the timed region
        let mut view = BatchView::new(&fixture);
        c.bench_function(&format!("{}/n={} ops={}", module_path!(), n, OPERATIONS), |b| {
            b.iter(|| {
                if let Err(err) = exercise::verify_batch(&context, &fixture, &mut view, OPERATIONS)
                {
                    panic!("{err}");
                }
            });
        });
        assert!(view.is_consistent(&fixture));
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_verify_batch
}
