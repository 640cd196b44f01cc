use std::path::PathBuf;
use std::process;

use steppe_bench::report;
use steppe_bench::runner::BenchmarkRunner;
use steppe_bench::scenes;

const USAGE: &str = "\
Usage: bench-runner [OPTIONS]
Renders the standard Steppe scenes (quality strides, fog, water, sprites,
smoothing) on the CPU and reports per-frame timings.

  --frames <n>                   Frames rendered per scene, turning the camera (default: 120)
  --scene <name>                 Only run the named scene
  --output <path>                Write this run's timings as a JSON baseline
  --baseline <path>              Compare mean frame times against a saved baseline
  --regression-threshold <pct>   Slowdown that counts as a regression (default: 10)";

/// Command-line options for one benchmark run.
struct BenchArgs {
    frame_count: u32,
    scene: Option<String>,
    output_path: Option<PathBuf>,
    baseline_path: Option<PathBuf>,
    regression_threshold: f64,
}

impl BenchArgs {
    /// Parse `args` (without the program name). `Ok(None)` means help was
    /// requested.
    fn parse(args: &[String]) -> Result<Option<Self>, String> {
        let mut parsed = Self {
            frame_count: 120,
            scene: None,
            output_path: None,
            baseline_path: None,
            regression_threshold: 10.0,
        };

        let mut iter = args.iter();
        while let Some(flag) = iter.next() {
            let mut value = || {
                iter.next()
                    .map(String::as_str)
                    .ok_or_else(|| format!("{flag} needs a value"))
            };
            match flag.as_str() {
                "--frames" => {
                    let text = value()?;
                    parsed.frame_count = text
                        .parse()
                        .map_err(|_| format!("invalid frame count: {text}"))?;
                }
                "--scene" => parsed.scene = Some(value()?.to_string()),
                "--output" => parsed.output_path = Some(PathBuf::from(value()?)),
                "--baseline" => parsed.baseline_path = Some(PathBuf::from(value()?)),
                "--regression-threshold" => {
                    let text = value()?;
                    parsed.regression_threshold = text
                        .parse()
                        .map_err(|_| format!("invalid regression threshold: {text}"))?;
                }
                "--help" | "-h" => return Ok(None),
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(Some(parsed))
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match BenchArgs::parse(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            eprintln!("{USAGE}");
            process::exit(0);
        }
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            process::exit(1);
        }
    };

    let scene_configs: Vec<_> = scenes::standard_scenes()
        .into_iter()
        .filter(|s| options.scene.as_deref().map_or(true, |name| s.name == name))
        .collect();
    if scene_configs.is_empty() {
        eprintln!("No scene named '{}'", options.scene.unwrap_or_default());
        process::exit(1);
    }

    log::info!("Generating terrain, texturemaps and sky...");
    let runner = match BenchmarkRunner::new(options.frame_count) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    };

    let mut results = Vec::with_capacity(scene_configs.len());
    for config in &scene_configs {
        match runner.run_scene(config) {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("ERROR: scene '{}': {e}", config.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Steppe frame timings ({} frames per scene)\n", options.frame_count);
    println!("{}", report::format_markdown(&results));

    if let Some(path) = &options.output_path {
        let baseline = report::Baseline {
            timestamp: run_label(),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            eprintln!("ERROR: could not write baseline {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Wrote baseline {}", path.display());
    }

    if let Some(path) = &options.baseline_path {
        match report::load_baseline(path) {
            Some(baseline) => {
                let regressions =
                    report::compare(&results, &baseline, options.regression_threshold);
                println!(
                    "{}",
                    report::format_comparison(&regressions, options.regression_threshold)
                );
                if !regressions.is_empty() {
                    eprintln!(
                        "ERROR: {} scene(s) rendered slower than the baseline",
                        regressions.len()
                    );
                    process::exit(1);
                }
            }
            None => log::warn!("No readable baseline at {}", path.display()),
        }
    }
}

/// Label stored with a saved baseline; the process id tells runs apart.
fn run_label() -> String {
    format!("steppe-bench-{}", process::id())
}
