use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use dsnorm_core::NormalizerUnit;
use dsnorm_model::{FieldName, NormalizedRecord, RawMetadata};
use dsnorm_providers::UnitRegistry;
use serde_json::Value;
use tracing::{info, info_span, warn};

use dsnorm_cli::config::Config;
use dsnorm_cli::render::{UnitRow, record_table, supported_fields, term_table, units_table};

use crate::cli::{NormalizeArgs, OutputFormatArg, VocabArgs};

/// Outcome of a `normalize` run.
pub struct NormalizeReport {
    pub records: Vec<NormalizedRecord>,
    /// Input index and message of every record that failed.
    pub failures: Vec<(usize, String)>,
    /// The input was a single object rather than an array.
    pub single: bool,
}

impl NormalizeReport {
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }
}

fn read_input(path: &Path) -> Result<Value> {
    let content = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("read raw metadata from stdin")?;
        buffer
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    serde_json::from_str(&content).with_context(|| format!("parse {} as JSON", path.display()))
}

pub fn run_normalize(args: &NormalizeArgs, config: &Config) -> Result<NormalizeReport> {
    let mut engine_config = config.engine.clone();
    if let Some(mode) = args.mode {
        engine_config.mode = mode;
    }
    let resolver = config.build_resolver().context("load vocabulary")?;
    let engine = UnitRegistry::builtin()
        .build_engine(&engine_config, resolver)
        .context("build normalization engine")?;
    let fields: Vec<FieldName> = if args.fields.is_empty() {
        FieldName::ALL.to_vec()
    } else {
        args.fields.clone()
    };

    let (inputs, single) = match read_input(&args.input)? {
        Value::Array(items) => (items, false),
        Value::Object(map) => (vec![Value::Object(map)], true),
        _ => bail!("{} must hold a JSON object or an array of objects", args.input.display()),
    };

    let span = info_span!("normalize", input = %args.input.display(), records = inputs.len());
    let _guard = span.enter();
    let mut report = NormalizeReport {
        records: Vec::new(),
        failures: Vec::new(),
        single,
    };
    for (index, value) in inputs.into_iter().enumerate() {
        let outcome = RawMetadata::from_value(value)
            .map_err(|error| error.to_string())
            .and_then(|raw| engine.normalize(&raw, &fields).map_err(|error| error.to_string()));
        match outcome {
            Ok(record) => report.records.push(record),
            Err(message) => {
                warn!(index, %message, "record failed");
                report.failures.push((index, message));
            }
        }
    }
    info!(
        normalized = report.records.len(),
        failed = report.failures.len(),
        "normalization finished"
    );
    Ok(report)
}

pub fn print_normalize_report(report: &NormalizeReport, format: OutputFormatArg) -> Result<()> {
    match format {
        OutputFormatArg::Json => {
            let rendered = match (report.single, report.records.as_slice()) {
                (true, [record]) => serde_json::to_string_pretty(record)?,
                (true, []) => String::new(),
                _ => serde_json::to_string_pretty(&report.records)?,
            };
            if !rendered.is_empty() {
                println!("{rendered}");
            }
        }
        OutputFormatArg::Table => {
            for (position, record) in report.records.iter().enumerate() {
                if !report.single {
                    println!("Record {}", position + 1);
                }
                println!("{}", record_table(record));
            }
        }
    }
    for (index, message) in &report.failures {
        eprintln!("error: record {index}: {message}");
    }
    Ok(())
}

pub fn run_vocab(args: &VocabArgs, config: &Config) -> Result<()> {
    let resolver = config.build_resolver().context("load vocabulary")?;
    let disambiguators: Vec<&str> = args.disambiguators.iter().map(String::as_str).collect();
    let term = resolver
        .resolve(args.category, &args.keyword, &disambiguators)
        .with_context(|| format!("resolve {} '{}'", args.category, args.keyword))?;
    match args.format {
        OutputFormatArg::Json => println!("{}", serde_json::to_string_pretty(&term)?),
        OutputFormatArg::Table => {
            println!("{}", term_table(&term));
            if term.is_placeholder() {
                println!("No canonical term matched; placeholder synthesized.");
            }
        }
    }
    Ok(())
}

pub fn run_units(config: &Config) -> Result<()> {
    let registry = UnitRegistry::builtin();
    let resolver = config.build_resolver().context("load vocabulary")?;
    let engine = registry
        .build_engine(&config.engine, resolver)
        .context("build normalization engine")?;
    let descriptions: BTreeMap<&str, &str> = registry.describe().collect();
    let units = engine.units();
    let last = units.len().saturating_sub(1);
    let rows: Vec<UnitRow> = units
        .iter()
        .enumerate()
        .map(|(position, unit)| UnitRow {
            position: position + 1,
            name: unit.name().to_string(),
            fields: supported_fields(unit.getters()),
            description: descriptions
                .get(unit.name())
                .copied()
                .unwrap_or_else(|| unit.description())
                .to_string(),
            terminal: position == last,
        })
        .collect();
    println!("Mode: {:?}", engine.mode());
    println!("{}", units_table(&rows));
    Ok(())
}
