use chrono::Local;
use clap::Parser;
use fourierlab::analyzer::series::DEFAULT_HARMONICS;
use fourierlab::analyzer::{DEFAULT_OMEGA_MAX, DEFAULT_RESOLUTION};
use fourierlab::quadrature::DEFAULT_STEPS;
use fourierlab::report::Summary;
use fourierlab::{Analyzer, JobResult, Status};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "fourierlab")]
#[command(
    author,
    version,
    about = "Fourier series, transforms and convolutions of piecewise functions"
)]
struct Args {
    /// Job file or directory of job files (*.json)
    path: Option<PathBuf>,

    /// Output report file (.csv, .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for auto-generated reports
    #[arg(long, default_value = "fourierlab-reports")]
    report_dir: PathBuf,

    /// Don't auto-generate CSV report
    #[arg(long)]
    no_report: bool,

    /// Number of parallel workers (default: number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Harmonics for series jobs that don't set their own
    #[arg(long, default_value_t = DEFAULT_HARMONICS)]
    harmonics: usize,

    /// Simpson sub-intervals per integral
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    steps: usize,

    /// Transform grid half-width for jobs that don't set their own
    #[arg(long, default_value_t = DEFAULT_OMEGA_MAX)]
    omega_max: f64,

    /// Transform/convolution grid size for jobs that don't set their own
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: usize,

    /// Show per-job details
    #[arg(short, long)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let Some(path) = args.path.clone() else {
        eprintln!("Usage: fourierlab <PATH>");
        eprintln!("Run 'fourierlab --help' for more options.");
        std::process::exit(1);
    };

    // Set up thread pool
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    // Collect job files
    let files: Vec<PathBuf> = if path.is_dir() {
        let mut files: Vec<PathBuf> = WalkDir::new(&path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files
    } else {
        vec![path.clone()]
    };

    if files.is_empty() {
        eprintln!("No job files found (expected *.json)");
        std::process::exit(1);
    }

    if !args.quiet {
        eprintln!("\x1b[1mfourierlab - Piecewise Fourier Analysis\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        eprintln!("Found {} job file(s)\n", files.len());
    }

    // Set up progress bar
    let pb = if !args.quiet && files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        Some(pb)
    } else {
        None
    };

    let analyzer = Analyzer::new()
        .with_harmonics(args.harmonics)
        .with_steps(args.steps)
        .with_omega_max(args.omega_max)
        .with_resolution(args.resolution);

    // Run jobs in parallel
    let results: Vec<JobResult> = files
        .par_iter()
        .map(|path| {
            let result = analyzer.analyze(path);
            if let Some(ref pb) = pb {
                pb.inc(1);
                pb.set_message(result.file_name.clone());
            }
            result
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    // Print results
    if !args.quiet {
        for r in &results {
            print_result(r, args.verbose);
        }
    }

    let summary = Summary::from_results(&results);

    if !args.quiet {
        eprintln!("\n{}", "─".repeat(70));
        eprintln!("\x1b[1mSummary:\x1b[0m");
        eprintln!("  \x1b[32m✓ Completed:\x1b[0m   {}", summary.ok);
        eprintln!("  \x1b[36mSeries:\x1b[0m      {}", summary.series);
        eprintln!("  \x1b[36mTransform:\x1b[0m   {}", summary.transform);
        eprintln!("  \x1b[36mConvolution:\x1b[0m {}", summary.convolution);
        if summary.error > 0 {
            eprintln!("  \x1b[31m✗ Failed:\x1b[0m      {}", summary.error);
        }
    }

    // Determine report path
    let report_path = if let Some(ref output) = args.output {
        Some(output.clone())
    } else if !args.no_report {
        std::fs::create_dir_all(&args.report_dir).ok();
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("fourierlab_report_{}.csv", timestamp);
        Some(args.report_dir.join(filename))
    } else {
        None
    };

    if let Some(ref output_path) = report_path {
        if let Err(e) = fourierlab::report::generate(output_path, &results) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }
    }

    if !args.quiet {
        eprintln!("\n\x1b[90mAnalysis complete.\x1b[0m");
    }

    if summary.error > 0 {
        std::process::exit(1);
    }
}

fn print_result(r: &JobResult, verbose: bool) {
    let color = match r.status {
        Status::Ok => "\x1b[32m",
        Status::Error => "\x1b[31m",
    };
    let reset = "\x1b[0m";

    let peak = r
        .peak
        .map(|p| format!("peak {:.4} @ {:.3}", p.value, p.at))
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{}{:<8}{} {:<12} {:>6} pts  {:<28}  {:>6}ms  {}",
        color,
        format!("[{}]", r.status),
        reset,
        &r.kind,
        r.points,
        truncate(&peak, 28),
        r.elapsed_ms,
        &r.name
    );

    if let Some(ref error) = r.error {
        eprintln!("    {}", error);
    }

    if !verbose {
        return;
    }

    if let Some(energy) = r.energy {
        eprintln!("    Energy: {:.6}", energy);
    }
    if let Some(ref series) = r.series {
        eprintln!(
            "    Series: period={:.4} a0={:.6} harmonics={}",
            series.period,
            series.a0,
            series.harmonics()
        );
        for (n, a) in series.an.iter().take(5) {
            let b = series.bn.get(n).unwrap_or(0.0);
            eprintln!("      n={:<3} a={:>12.6} b={:>12.6}", n, a, b);
        }
    }
    if let Some(ref transform) = r.transform {
        let phases = transform.unwrapped_phase();
        eprintln!(
            "    Transform: {} samples, unwrapped phase span {:.4} rad",
            transform.len(),
            phases.last().copied().unwrap_or(0.0) - phases.first().copied().unwrap_or(0.0)
        );
    }
    if let Some(ref convolution) = r.convolution {
        eprintln!(
            "    Convolution: t in [{:.4}, {:.4}]",
            convolution.t.first().copied().unwrap_or(0.0),
            convolution.t.last().copied().unwrap_or(0.0)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
