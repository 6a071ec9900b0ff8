//! Score a saved model bundle against a delimited data file.

use std::path::PathBuf;

use c45_census::config::RunConfig;
use c45_census::dataset::load_delimited;
use c45_census::logging::{self, LogOptions};
use c45_census::ml::bundle::ModelBundle;
use c45_census::ml::evaluate::{classification_error, confusion_matrix};
use c45_census::ml::metrics::ClassificationReport;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    model_path: PathBuf,
    data_path: PathBuf,
    config: Option<PathBuf>,
    report_out: Option<PathBuf>,
    top: usize,
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init(&LogOptions {
        log_file: false,
        ..LogOptions::default()
    }) {
        eprintln!("Logging disabled: {err}");
    }

    let bundle = ModelBundle::load_json(&options.model_path).map_err(|err| err.to_string())?;
    let config = match &options.config {
        Some(path) => RunConfig::load(path).map_err(|err| err.to_string())?,
        None => RunConfig::default(),
    };
    let table = load_delimited(&options.data_path, "evaluation", &config.delimited_options(None))
        .map_err(|err| err.to_string())?;
    tracing::info!(rows = table.len(), "Loaded evaluation data");

    let encoded = bundle.encode(&table).map_err(|err| err.to_string())?;
    let error = classification_error(&bundle.tree, &encoded.matrix, &encoded.labels)
        .map_err(|err| err.to_string())?;
    let classes = bundle.class_names();
    let cm = confusion_matrix(&bundle.tree, &encoded.matrix, &encoded.labels, classes.len())
        .map_err(|err| err.to_string())?;

    let report = ClassificationReport::from_confusion(&cm, &classes);
    println!("error: {error:.6}");
    println!("accuracy: {:.4}", report.accuracy);
    for (idx, class) in report.per_class.iter().enumerate() {
        println!(
            "class {:>2} {:<16}  precision={:.3}  recall={:.3}  f1={:.3}  support={}",
            idx, class.class, class.precision, class.recall, class.f1, class.support
        );
    }
    println!("confusion matrix (rows=true, cols=pred):");
    for truth in 0..cm.n_classes {
        let mut row = String::new();
        for pred in 0..cm.n_classes {
            row.push_str(&format!("{:6}", cm.get(truth, pred)));
        }
        println!("{row}");
    }

    let confusions = cm.top_confusions(options.top);
    if !confusions.is_empty() {
        println!();
        println!("Top confusions:");
        for confusion in confusions {
            println!(
                "- {} -> {}: {}",
                report.per_class[confusion.truth].class,
                report.per_class[confusion.predicted].class,
                confusion.count
            );
        }
    }

    if let Some(path) = &options.report_out {
        let json = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        std::fs::write(path, json)
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut model_path: Option<PathBuf> = None;
    let mut data_path: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut report_out: Option<PathBuf> = None;
    let mut top = 10usize;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                model_path = Some(PathBuf::from(value));
            }
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                data_path = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                config = Some(PathBuf::from(value));
            }
            "--report" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--report requires a value".to_string())?;
                report_out = Some(PathBuf::from(value));
            }
            "--top" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--top requires a value".to_string())?;
                top = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --top value: {value}"))?;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let model_path = model_path.ok_or_else(|| "--model is required".to_string())?;
    let data_path = data_path.ok_or_else(|| "--data is required".to_string())?;
    Ok(Some(CliOptions {
        model_path,
        data_path,
        config,
        report_out,
        top,
    }))
}

fn help_text() -> String {
    [
        "c45-eval",
        "",
        "Usage:",
        "  c45-eval --model <model.json> --data <file> [options]",
        "",
        "Options:",
        "  --config <file>  Run configuration describing the file layout (default: census layout).",
        "  --report <file>  Write the classification report as JSON.",
        "  --top <n>        Top N confusions (default: 10).",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
        assert!(parse_args(args(&["-h", "--bogus"])).unwrap().is_none());
    }

    #[test]
    fn requires_model_and_data() {
        let options = parse_args(args(&["--model", "m.json", "--data", "adult.test"]))
            .unwrap()
            .unwrap();
        assert_eq!(options.model_path, PathBuf::from("m.json"));
        assert_eq!(options.top, 10);
        assert_eq!(options.report_out, None);
        assert!(parse_args(args(&["--model", "m.json"])).is_err());
        assert!(parse_args(args(&["--data", "adult.test", "--top", "x"])).is_err());
    }

    #[test]
    fn report_flag_takes_a_path() {
        let options = parse_args(args(&[
            "--model", "m.json", "--data", "adult.test", "--report", "report.json",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(options.report_out, Some(PathBuf::from("report.json")));
        assert!(parse_args(args(&["--model", "m.json", "--data", "d", "--report"])).is_err());
    }
}
