//! Benchmark for transition-sample optimization
//!
//! Times complete designs for one and two transition samples across filter
//! lengths, once with the trigonometric response sums and once with the FFT
//! response, so the two evaluation paths can be compared.

use fsamp_fir::{
    BandConfiguration, BandEdges, DesignConfig, DirectionSearchConfig, FilterSpec, ResponseMethod,
    SearchContext, SymmetryType, TransitionPlacement, design,
};
use std::time::Instant;

/// Lowpass spec with its passband edge at a quarter of the fold index
fn lowpass_spec(num_taps: usize, num_trans_samps: usize) -> FilterSpec {
    let n1 = (num_taps - 1) / 8;
    FilterSpec::new(
        num_taps,
        BandConfiguration::Lowpass,
        SymmetryType::EvenSymOddLen,
        BandEdges::two_band(n1, n1 + 1 + num_trans_samps),
    )
    .expect("benchmark spec is valid")
}

/// Benchmark a full design for one configuration
fn benchmark_design(num_taps: usize, num_trans_samps: usize, method: ResponseMethod) {
    let config = DesignConfig::default()
        .with_method(method)
        .with_direction(DirectionSearchConfig::new().with_ripple_tol(0.1));
    let ctx = SearchContext::default();

    println!(
        "Benchmarking {num_taps} taps, {num_trans_samps} transition sample(s), {method:?} response"
    );

    // Warm up
    let _ = design(
        lowpass_spec(num_taps, num_trans_samps),
        &config,
        TransitionPlacement::Optimal,
        &ctx,
    );

    let num_runs = 5;
    let mut times = Vec::with_capacity(num_runs);
    let mut last = None;
    for _ in 0..num_runs {
        let spec = lowpass_spec(num_taps, num_trans_samps);
        let start = Instant::now();
        let outcome = design(spec, &config, TransitionPlacement::Optimal, &ctx);
        times.push(start.elapsed().as_secs_f64() * 1000.0);
        match outcome {
            Ok(outcome) => last = Some(outcome),
            Err(e) => {
                println!("Design failed: {e}");
                println!();
                return;
            }
        }
    }

    times.sort_by(|a, b| a.total_cmp(b));
    let mean = times.iter().sum::<f64>() / times.len() as f64;
    let median = times[times.len() / 2];

    if let Some(outcome) = last {
        println!(
            "Results: {:.2}ms mean, {:.2}ms median, {} evaluations ({:.1}us each), stopband peak {:.2} dB",
            mean,
            median,
            outcome.evaluations,
            mean * 1000.0 / outcome.evaluations.max(1) as f64,
            outcome.stopband_peak
        );
    }
    println!();
}

fn main() {
    println!("Frequency-Sampling FIR Optimizer Benchmark");
    println!("==========================================");
    println!();

    for method in [ResponseMethod::Trigonometric, ResponseMethod::Fft] {
        for num_taps in [21, 63, 127] {
            for num_trans_samps in [1, 2] {
                benchmark_design(num_taps, num_trans_samps, method);
            }
        }
    }

    println!("Benchmark Complete!");
}
