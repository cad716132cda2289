use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use splinefit::{
    basis::{
        Basis, CubicPolynomialBasis, CubicSplineBasis, LinearSplineBasis, NaturalSplineProvider,
        TruncatedPowerNaturalSpline,
    },
    knots::KnotSet,
    sample::{MeanCurve, Sample},
    LinearSplineFit, SplineFit,
};
use std::hint::black_box;

/// One full oscillation over the sample, with knots at the quartiles
fn gen_sample_data(n: usize) -> (Vec<(f64, f64)>, KnotSet) {
    let curve = MeanCurve {
        period: n as f64,
        ..MeanCurve::default()
    };
    let sample = Sample::generate(n, 42, &curve, 1.0).expect("Failed to generate sample");

    let n = n as f64;
    let knots = KnotSet::new([0.25 * n, 0.5 * n, 0.75 * n]).expect("Invalid knots");
    (sample.points(), knots)
}

fn fit<B: Basis>(data: &[(f64, f64)], basis: B) -> SplineFit<'_, B> {
    SplineFit::new(data, basis).expect("Failed to fit data")
}

fn criterion_benchmark(c: &mut Criterion) {
    //
    // How the solver scales with data size (cubic spline only)
    println!("Benchmarking fit vs n (cubic spline, 3 knots)...");
    let sizes = [24, 240, 2_400, 24_000];
    let mut group = c.benchmark_group("fit_vs_n");
    for n in sizes {
        let (data, knots) = gen_sample_data(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| fit(black_box(data), CubicSplineBasis::new(knots.clone())));
        });
    }
    group.finish();
    report_scaling("fit_vs_n", &sizes);

    //
    // Every model on the same data
    println!("Benchmarking fit vs model (n=240)...");
    let (data, knots) = gen_sample_data(240);
    let x_range = 1.0..=240.0;
    let mut group = c.benchmark_group("fit_vs_model");
    group.bench_function("Linear spline", |b| {
        b.iter(|| fit(black_box(&data), LinearSplineBasis::new(knots.clone())));
    });
    group.bench_function("Cubic polynomial", |b| {
        b.iter(|| fit(black_box(&data), CubicPolynomialBasis::new()));
    });
    group.bench_function("Cubic spline", |b| {
        b.iter(|| fit(black_box(&data), CubicSplineBasis::new(knots.clone())));
    });
    group.bench_function("Natural spline", |b| {
        b.iter(|| {
            let basis = TruncatedPowerNaturalSpline
                .natural_basis(&knots, x_range.clone())
                .expect("Invalid knots");
            fit(black_box(&data), basis)
        });
    });
    group.finish();

    //
    // Summaries format every statistic; worth keeping an eye on
    let fitted = fit(&data, CubicSplineBasis::new(knots.clone()));
    c.bench_function("summary", |b| {
        b.iter(|| black_box(fitted.summary("Cubic spline").to_string()));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

/// Fits a line through the mean time per iteration of each run, to check the solver stays linear in n
fn report_scaling(group_id: &str, sizes: &[usize]) {
    let timings: Option<Vec<(f64, f64)>> = sizes
        .iter()
        .map(|&n| Some((n as f64, get_sample_for_run(group_id, &n.to_string())?)))
        .collect();
    let Some(timings) = timings else {
        println!("No saved samples for {group_id}; skipping scaling report");
        return;
    };

    let middle = sizes[sizes.len() / 2] as f64;
    let knots = KnotSet::new([middle]).expect("Invalid knots");
    let linear = LinearSplineFit::new(&timings, LinearSplineBasis::new(knots));
    match linear {
        Ok(linear) => println!("{group_id}: {linear} (R² = {:.4})", linear.r_squared()),
        Err(e) => println!("{group_id}: {e}"),
    }
}

fn get_sample_for_run(group_id: &str, test_id: &str) -> Option<f64> {
    #[derive(serde::Deserialize)]
    struct CriterionSamples {
        iters: Vec<f64>,
        times: Vec<f64>,
    }

    let raw = std::fs::read_to_string(format!(
        "target/criterion/{group_id}/{test_id}/new/sample.json"
    ))
    .ok()?;
    let samples: CriterionSamples = serde_json::from_str(&raw).ok()?;

    Some(
        samples
            .iters
            .iter()
            .zip(samples.times.iter())
            .map(|(i, t)| t / i)
            .sum::<f64>()
            / (samples.iters.len() as f64),
    )
}
