use anyhow::{Context, Result};
use comfy_table::Table;
use relink_cli::pipeline::{RunOptions, load_config, run_normalize};
use relink_cli::types::RunResult;
use relink_model::FieldKind;
use relink_output::OutputOptions;
use tracing::info_span;

use crate::cli::{ConfigArgs, RunArgs};
use crate::summary::apply_table_style;

pub fn run_normalize_command(args: &RunArgs) -> Result<RunResult> {
    let _span = info_span!("run", input_dir = %args.input_dir.display()).entered();
    let config = load_config(args.config.config.as_deref())?;
    let options = RunOptions {
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| args.input_dir.join("output")),
        dry_run: args.dry_run,
        output: OutputOptions {
            quote_all: args.quote_all,
        },
    };
    run_normalize(&args.input_dir, &config, &options)
}

pub fn run_collections(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let schemas = config.schemas().context("validate config")?;
    let mut table = Table::new();
    table.set_header(vec!["Collection", "Slug source", "Field", "Kind", "Target"]);
    apply_table_style(&mut table);
    for schema in &schemas {
        for (idx, field) in schema.fields().iter().enumerate() {
            let (collection, slug_source) = if idx == 0 {
                (schema.name(), schema.slug_source())
            } else {
                ("", "")
            };
            let target = match &field.kind {
                FieldKind::Plain | FieldKind::Aggregated => "",
                kind => kind.target().unwrap_or("(unknown)"),
            };
            table.add_row(vec![
                collection,
                slug_source,
                field.name.as_str(),
                field.kind.label(),
                target,
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    println!("{}", config.to_json_pretty().context("serialize config")?);
    Ok(())
}
