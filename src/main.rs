//! Train a C4.5 tree on a training file and score it on a test file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use c45_census::app_dirs;
use c45_census::config::RunConfig;
use c45_census::dataset::load_delimited;
use c45_census::logging::{self, LogOptions};
use c45_census::ml::evaluate::confusion_matrix;
use c45_census::ml::metrics::ClassificationReport;
use c45_census::pipeline::{describe_tree, train_and_evaluate};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init(&LogOptions {
        log_file: !options.no_log_file,
        ..LogOptions::default()
    }) {
        eprintln!("Logging disabled: {err}");
    }

    let mut config = resolve_config(options.config.as_deref())?;
    options.apply(&mut config);
    config.validate().map_err(|err| err.to_string())?;

    tracing::info!("Loading data");
    let training = load_delimited(
        &options.training_path,
        "training",
        &config.delimited_options(config.data.max_training_rows),
    )
    .map_err(|err| err.to_string())?;
    let test = load_delimited(&options.test_path, "test", &config.delimited_options(None))
        .map_err(|err| err.to_string())?;
    tracing::info!(
        training_rows = training.len(),
        test_rows = test.len(),
        "Done loading data"
    );

    let spec = config.run_spec(training.columns());
    let result = train_and_evaluate(&training, &test, &spec).map_err(|err| err.to_string())?;

    if result.timed_out {
        println!("warning: time limit reached, the tree is partial");
    }
    println!("training error: {:.6}", result.training_error);
    println!("test error: {:.6}", result.test_error);
    println!(
        "tree: {} nodes, {} leaves, depth {}",
        result.model.node_count(),
        result.model.leaf_count(),
        result.model.depth()
    );

    let bundle = result.bundle(&spec);
    let classes = bundle.class_names();
    let cm = confusion_matrix(
        &result.model,
        &result.evaluation.matrix,
        &result.evaluation.labels,
        classes.len(),
    )
    .map_err(|err| err.to_string())?;
    let report = ClassificationReport::from_confusion(&cm, &classes);
    println!("test accuracy: {:.4}", report.accuracy);
    for (idx, class) in report.per_class.iter().enumerate() {
        println!(
            "class {:>2} {:<16}  precision={:.3}  recall={:.3}  f1={:.3}  support={}",
            idx, class.class, class.precision, class.recall, class.f1, class.support
        );
    }

    if options.print_tree {
        println!();
        print!(
            "{}",
            describe_tree(&result.model, &result.codebook, &spec.label_column)
        );
    }

    if let Some(out) = &options.model_out {
        bundle.save_json(out).map_err(|err| err.to_string())?;
        println!("model written to {}", out.display());
    }
    Ok(())
}

fn resolve_config(path: Option<&Path>) -> Result<RunConfig, String> {
    if let Some(path) = path {
        return RunConfig::load(path).map_err(|err| err.to_string());
    }
    let Ok(dir) = app_dirs::app_root_dir() else {
        return Ok(RunConfig::default());
    };
    Ok(RunConfig::load_from_dir(&dir)
        .map_err(|err| err.to_string())?
        .unwrap_or_default())
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    training_path: PathBuf,
    test_path: PathBuf,
    config: Option<PathBuf>,
    model_out: Option<PathBuf>,
    min_leaf: Option<usize>,
    max_rows: Option<usize>,
    all_rows: bool,
    time_limit: Option<f64>,
    parallel: bool,
    print_tree: bool,
    no_log_file: bool,
}

impl CliOptions {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(min_leaf) = self.min_leaf {
            config.model.min_samples_per_leaf = min_leaf;
        }
        if self.all_rows {
            config.data.max_training_rows = None;
        } else if let Some(max_rows) = self.max_rows {
            config.data.max_training_rows = Some(max_rows);
        }
        if let Some(secs) = self.time_limit {
            config.model.time_limit_secs = Some(secs);
        }
        if self.parallel {
            config.model.parallel = true;
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions::default();
    let mut positional = Vec::new();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                options.model_out = Some(PathBuf::from(value));
            }
            "--min-leaf" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--min-leaf requires a value".to_string())?;
                options.min_leaf = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --min-leaf value: {value}"))?,
                );
            }
            "--max-rows" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--max-rows requires a value".to_string())?;
                options.max_rows = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --max-rows value: {value}"))?,
                );
            }
            "--all-rows" => options.all_rows = true,
            "--time-limit" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--time-limit requires a value".to_string())?;
                let secs = value
                    .parse::<f64>()
                    .ok()
                    .filter(|&secs| Duration::try_from_secs_f64(secs).is_ok())
                    .ok_or_else(|| format!("Invalid --time-limit value: {value}"))?;
                options.time_limit = Some(secs);
            }
            "--parallel" => options.parallel = true,
            "--print-tree" => options.print_tree = true,
            "--no-log-file" => options.no_log_file = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            path => positional.push(PathBuf::from(path)),
        }
        idx += 1;
    }

    let mut positional = positional.into_iter();
    match (positional.next(), positional.next(), positional.next()) {
        (Some(training), Some(test), None) => {
            options.training_path = training;
            options.test_path = test;
            Ok(Some(options))
        }
        _ => Err(help_text()),
    }
}

fn help_text() -> String {
    [
        "c45-census",
        "",
        "Trains a C4.5 decision tree and reports training and test error.",
        "",
        "Usage:",
        "  c45-census <training data> <test data> [options]",
        "",
        "Options:",
        "  --config <file>       Run configuration TOML (default: run.toml in the app dir, else census layout).",
        "  --min-leaf <n>        Minimum samples per leaf (default: 2).",
        "  --max-rows <n>        Cap on training rows (default: 10000).",
        "  --all-rows            Read every training row.",
        "  --time-limit <secs>   Stop induction after this long and keep the partial tree.",
        "  --parallel            Score split candidates on all cores.",
        "  --print-tree          Print the induced rules.",
        "  --out <file>          Write the model bundle as JSON.",
        "  --no-log-file         Log to stdout only.",
    ]
    .join("\n")
}
