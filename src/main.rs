use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use probekit::cli::{Cli, Commands, PresetCommands};
use probekit::reporter::{ConsoleReporter, CsvExporter, JsonExporter};
use probekit::runner::{BarSink, RunPhase, Runner};
use probekit::store::{self, PresetStore, StoredSettings};
use probekit::{Catalog, CategoryId, ReqwestTransport, RunConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            target,
            preset,
            categories,
            delay_ms,
            timeout,
            concurrency,
            output,
            csv,
            verbose,
        } => {
            run(
                &cli.config_dir,
                target,
                preset,
                categories,
                delay_ms,
                timeout,
                concurrency,
                output,
                csv,
                verbose,
            )
            .await
        }
        Commands::List => {
            list_catalog();
            Ok(())
        }
        Commands::Report {
            input,
            format,
            output,
        } => report(&input, &format, output.as_deref()),
        Commands::Preset { command } => preset_command(&cli.config_dir, command),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run(
    config_dir: &std::path::Path,
    target: Option<String>,
    preset: Option<String>,
    categories: Option<String>,
    delay_ms: Option<u64>,
    timeout: Option<u64>,
    concurrency: Option<usize>,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let settings = StoredSettings::load(&store::settings_path(config_dir))?;

    let target = match (target, preset) {
        (Some(t), _) => t,
        (None, Some(name)) => {
            let presets = PresetStore::load(&store::presets_path(config_dir))?;
            presets
                .find(&name)
                .map(|p| p.target_url.clone())
                .with_context(|| format!("No preset named '{}'", name))?
        }
        (None, None) => bail!("Either --target or --preset is required"),
    };

    let selected = match categories {
        Some(list) => parse_categories(&list)?,
        None => settings.selected_categories(),
    };

    let mut run_settings = settings.run_settings();
    if let Some(v) = delay_ms {
        run_settings.delay_ms = v;
    }
    if let Some(v) = timeout {
        run_settings.timeout_secs = v;
    }
    if let Some(v) = concurrency {
        run_settings.concurrency = v.max(1);
    }
    run_settings.verbose = run_settings.verbose || verbose;
    run_settings.auto_export = run_settings.auto_export || output.is_some();

    let config = RunConfig::new(target, selected).with_settings(run_settings.clone());

    let transport = ReqwestTransport::new()?;
    let mut runner = Runner::new(Catalog::builtin(), transport);

    let cancel = runner.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let sink = BarSink::new(run_settings.verbose);
    let outcome = runner.start(config, &sink).await?;
    sink.finish(match outcome.phase {
        RunPhase::Cancelled => "Run cancelled",
        _ => "Run complete",
    });

    let reporter = ConsoleReporter::new();
    reporter.print_summary(&outcome.summary);
    reporter.print_findings(&outcome.summary);

    if outcome.phase == RunPhase::Cancelled {
        println!("\n{}", "Cancelled: partial results shown above.".yellow());
    }

    if let Some(bytes) = &outcome.export {
        let path = output.unwrap_or_else(default_report_path);
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("JSON report written to {}", path.display());
    }

    if let Some(path) = csv {
        let doc = CsvExporter::to_csv(&outcome.summary, &outcome.results);
        fs::write(&path, doc).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("CSV report written to {}", path.display());
    }

    Ok(())
}

fn parse_categories(list: &str) -> Result<Vec<CategoryId>> {
    let mut selected = Vec::new();
    for token in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match CategoryId::parse(token) {
            Some(id) => selected.push(id),
            None => bail!("Unknown technique category: {}", token),
        }
    }
    Ok(selected)
}

fn default_report_path() -> PathBuf {
    PathBuf::from(format!(
        "probekit-report-{}.json",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ))
}

fn list_catalog() {
    let catalog = Catalog::builtin();
    println!("{}", "Technique catalogue:".bold());
    for category in catalog.categories() {
        println!(
            "  {:10} {:32} {} cases",
            category.id.to_string().cyan(),
            category.id.display_name(),
            category.cases.len()
        );
    }
}

fn report(input: &std::path::Path, format: &str, output: Option<&std::path::Path>) -> Result<()> {
    let bytes =
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let doc = JsonExporter::parse(&bytes)?;

    let rendered = match format {
        "csv" => CsvExporter::from_document(&doc),
        "json" => serde_json::to_string_pretty(&doc)? + "\n",
        other => bail!("Unsupported report format: {}", other),
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn preset_command(config_dir: &std::path::Path, command: PresetCommands) -> Result<()> {
    let mut presets = PresetStore::load(&store::presets_path(config_dir))?;

    match command {
        PresetCommands::List => {
            if presets.list().is_empty() {
                println!("No presets saved.");
            }
            for preset in presets.list() {
                println!("{:4}  {:20} {}", preset.id, preset.name, preset.target_url);
            }
        }
        PresetCommands::Add { name, url } => {
            let preset = presets.create(&name, &url)?;
            println!("Saved preset {} ({})", preset.name, preset.id);
        }
        PresetCommands::Delete { id } => {
            if presets.delete(id)? {
                println!("Deleted preset {}", id);
            } else {
                bail!("No preset with id {}", id);
            }
        }
    }
    Ok(())
}
