//! Integrand table for one convolution sample, to check overlap bounds by eye

use fourierlab::analyzer::convolution::{
    calculate_product, convolve_at, generate_function_data, generate_shifted_g, overlap,
};
use fourierlab::quadrature::DEFAULT_STEPS;
use fourierlab::signal::build_function;
use fourierlab::Job;
use std::env;

const DEFAULT_POINTS: usize = 21;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: integrand_detail <job.json> <t> [points]");
        std::process::exit(1);
    }

    let t: f64 = match args[2].parse() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid t '{}': {}", args[2], e);
            std::process::exit(1);
        }
    };
    let points = args
        .get(3)
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_POINTS);

    if let Err(e) = run(&args[1], t, points) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(path: &str, t: f64, points: usize) -> Result<(), Box<dyn std::error::Error>> {
    let job = Job::from_path(path)?;
    let kernel = job.kernel.as_deref().ok_or("job has no kernel")?;
    let f = build_function(&job.signal)?;
    let g = build_function(kernel)?;

    println!("\n{}", "=".repeat(60));
    println!("JOB: {}", job.name.as_deref().unwrap_or(path));
    println!("{}", "=".repeat(60));
    println!("f on [{:.4}, {:.4}]", f.domain_start(), f.domain_end());
    println!("g on [{:.4}, {:.4}]", g.domain_start(), g.domain_end());
    println!("t = {}", t);

    let Some((tau_min, tau_max)) = overlap(&f, &g, t) else {
        println!("\nNo overlap: (f * g)({}) = 0", t);
        return Ok(());
    };
    println!("Overlap: tau in [{:.6}, {:.6}]", tau_min, tau_max);

    let f_data = generate_function_data(&f, points);
    let (f_lo, f_hi) = f_data
        .y
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| (lo.min(y), hi.max(y)));
    println!("f ranges over [{:.6}, {:.6}] ({} samples)", f_lo, f_hi, f_data.len());

    // Integrand over the overlap only
    let shifted = generate_shifted_g(&g, t, tau_min, tau_max, points);
    let f_values: Vec<f64> = shifted.x.iter().map(|&tau| f.evaluate_at(tau)).collect();
    let product = calculate_product(&f_values, &shifted.y)?;

    println!("\n{:>12} {:>14} {:>14} {:>14}", "tau", "f(tau)", "g(t-tau)", "product");
    println!("{}", "-".repeat(57));
    for (i, &tau) in shifted.x.iter().enumerate() {
        println!(
            "{:>12.6} {:>14.6} {:>14.6} {:>14.6}",
            tau, f_values[i], shifted.y[i], product[i]
        );
    }

    println!(
        "\n(f * g)({}) = {:.8}  ({} Simpson steps)",
        t,
        convolve_at(&f, &g, t, DEFAULT_STEPS),
        DEFAULT_STEPS
    );
    Ok(())
}
