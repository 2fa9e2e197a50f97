use std::fs;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::{json, Value};
use strata_merge::{
    classify, create, ArrayHooks, ArrayMerge, Change, ChangeLog, ChangeReport, Traced,
};
use tracing::info;

use crate::cli::*;
use crate::config::CliConfig;
use crate::diff::{diff_lines, print_diff};
use crate::input::{load_layer, parse_inline, render};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, cli.format),
        Command::Arrays(args) => cmd_arrays(args, cli.format),
        Command::Classify(args) => cmd_classify(args),
    }
}

/// Merge `layers` onto an empty object, recording what each commit changed.
pub fn merge_layers(layers: &[Value], arrays: ArrayMerge) -> anyhow::Result<ChangeReport> {
    let merger = create(Traced::new(ChangeLog::new(ArrayHooks::new(arrays))));
    let out = merger.merge(json!({}), layers)?;
    Ok(ChangeReport::from_value(out)?)
}

fn cmd_merge(args: MergeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    }
    .with_overrides(&args);

    if config.layers.is_empty() {
        bail!("no layers given: pass files or set `layers` in --config");
    }

    let layers = config
        .layers
        .iter()
        .map(|p| load_layer(p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    info!(layers = layers.len(), arrays = %config.arrays, "merging layers");

    let report = merge_layers(&layers, config.arrays)?;
    let rendered = render(&report.merged, format)?;

    if args.changes {
        print_changes(&report.changes);
    }
    if args.diff {
        let before = render(&layers[0], format)?;
        print_diff(&diff_lines(&before, &rendered));
    }

    match &config.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!(
                "{} Merged {} layers into {}",
                "✓".green().bold(),
                layers.len().to_string().bold(),
                path.display()
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn print_changes(changes: &[Change]) {
    if changes.is_empty() {
        eprintln!("{}", "No keys changed.".dimmed());
        return;
    }
    for change in changes {
        eprintln!("  {:<14} {}", change.op.to_string().cyan(), change.key_path.yellow());
    }
}

fn cmd_arrays(args: ArraysArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (Value::Array(target), Value::Array(source)) =
        (parse_inline(&args.target)?, parse_inline(&args.source)?)
    else {
        bail!("both arguments must be JSON arrays");
    };
    let merged = Value::Array(args.strategy.apply(&target, &source));
    match format {
        OutputFormat::Json => println!("{merged}"),
        OutputFormat::Toml => print!("{}", render(&json!({ "result": merged }), format)?),
    }
    Ok(())
}

fn cmd_classify(args: ClassifyArgs) -> anyhow::Result<()> {
    let value = parse_inline(&args.json)?;
    let Value::Object(map) = &value else {
        println!("{}", classify(Some(&value)).to_string().cyan());
        return Ok(());
    };
    for (key, v) in map {
        println!("{:<20} {}", key.bold(), classify(Some(v)).to_string().cyan());
    }
    Ok(())
}
