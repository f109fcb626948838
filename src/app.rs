use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::FilterCriteria;
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat};
use crate::page::PageContent;
use crate::runner::{Options, Runner};
use crate::signing::{SasSigner, StorageCredentials};

fn print_banner() {
    const BANNER: &str = r#"
       __
  ___ / /  ___ _    _____ ___ ____ ___ ___
 (_-</ _ \/ _ \ |/|/ / __/ _ `(_-</ -_) -_)
/___/_//_/\___/__,__/\__/\_,_/___/\__/\__/
"#;
    eprint!("{}", BANNER);
    eprintln!(
        "       v{} - AI application marketplace renderer",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn warn_line(message: &str) {
    eprintln!("{} {}", "[WRN]".yellow().bold(), message);
}

fn format_set(values: &std::collections::BTreeSet<String>) -> String {
    if values.is_empty() {
        "any".to_string()
    } else {
        values.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn signing_label(credentials: &StorageCredentials) -> String {
    match SasSigner::from_credentials(credentials) {
        Ok(_) => "enabled".to_string(),
        Err(e) => format!("disabled ({e})"),
    }
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, no_color: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color),
        )
        .try_init();
}

struct RunConfig {
    options: Options,
    criteria: FilterCriteria,
    content: PageContent,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
}

fn pick(cli: Option<String>, cfg: Option<String>) -> Option<String> {
    cli.or(cfg).filter(|v| !v.trim().is_empty())
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let defaults = Options::default();

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(defaults.timeout_seconds);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let link_validity = args
        .link_validity
        .or(cfg.link_validity)
        .unwrap_or(defaults.link_validity_seconds);

    let archive_path = pick(args.archive, cfg.archive)
        .map(|p| config::expand_tilde(&p))
        .unwrap_or(defaults.archive_path);
    let catalog_path = pick(args.catalog, cfg.catalog)
        .map(|p| config::expand_tilde(&p))
        .unwrap_or(defaults.catalog_path);

    let output = pick(args.output, cfg.output)
        .map(|p| config::expand_tilde(&p).to_string_lossy().to_string());
    let output_format = match pick(args.output_format, cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected html or json"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Html),
    };

    // Flag values replace config lists as a whole.
    let choose = |cli: Vec<String>, cfg: Option<Vec<String>>| {
        if cli.is_empty() {
            cfg.unwrap_or_default()
        } else {
            cli
        }
    };
    let ai_types = crate::utils::parse_criteria_values(&choose(args.ai_type, cfg.ai_types))
        .map_err(|e| format!("invalid ai types: {e}"))?;
    let business_lines =
        crate::utils::parse_criteria_values(&choose(args.business_line, cfg.business_lines))
            .map_err(|e| format!("invalid business lines: {e}"))?;
    let functions = crate::utils::parse_criteria_values(&choose(args.function, cfg.functions))
        .map_err(|e| format!("invalid functions: {e}"))?;
    let criteria = FilterCriteria {
        search: args.search.or(cfg.search).unwrap_or_default(),
        ai_types,
        business_lines,
        functions,
    };

    let credentials = StorageCredentials {
        account: pick(args.storage_account, cfg.storage_account),
        key: pick(args.storage_key, cfg.storage_key),
        container: pick(args.storage_container, cfg.storage_container),
    };

    let options = Options {
        archive_path,
        catalog_path,
        timeout_seconds: timeout,
        logo_fallback_url: cfg.logo_fallback_url.unwrap_or(defaults.logo_fallback_url),
        hero_fallback_url: cfg.hero_fallback_url.unwrap_or(defaults.hero_fallback_url),
        contact_icon_url: cfg.contact_icon_url.unwrap_or(defaults.contact_icon_url),
        search_icon_url: cfg.search_icon_url.unwrap_or(defaults.search_icon_url),
        credentials,
        link_validity_seconds: link_validity,
    };

    Ok(RunConfig {
        options,
        criteria,
        content: PageContent::default(),
        output,
        output_format,
        no_color,
        verbose: args.verbose,
    })
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();

    let RunConfig {
        options,
        criteria,
        content,
        output,
        output_format,
        ..
    } = run;

    format_kv_line("Archive", &options.archive_path.display().to_string());
    format_kv_line("Catalog", &options.catalog_path.display().to_string());
    format_kv_line("Timeout", &format!("{}s", options.timeout_seconds));
    format_kv_line("Signing", &signing_label(&options.credentials));
    format_kv_line(
        "Search",
        if criteria.search.is_empty() {
            "any"
        } else {
            criteria.search.as_str()
        },
    );
    format_kv_line("AI types", &format_set(&criteria.ai_types));
    format_kv_line("Lines", &format_set(&criteria.business_lines));
    format_kv_line("Functions", &format_set(&criteria.functions));
    eprintln!();

    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    let pb = spinner("resolving assets");
    let startup = runner.startup().await;
    pb.finish_and_clear();
    let startup = startup.map_err(|e| format!("startup failed: {e}"))?;

    format_kv_line("Resources", &startup.archive_resources.to_string());
    format_kv_line("Fonts", &startup.assets.fonts.faces().len().to_string());
    for w in startup.warnings.iter() {
        warn_line(w);
    }

    let view = runner
        .render_view(&criteria)
        .await
        .map_err(|e| e.to_string())?;
    for w in view.warnings.iter() {
        warn_line(w);
    }

    let rendered = output::render(output_format, &startup.assets, &content, &criteria, &view);

    match output.as_deref() {
        Some(path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file '{path}': {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output file '{path}': {e}"))?;
            format_kv_line("Output", path);
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }

    eprintln!();
    eprintln!(
        ":: Completed :: {} cards, {} warnings, startup took {}ms ::",
        view.cards.len(),
        view.warnings.len() + startup.warnings.len(),
        startup.elapsed.as_millis()
    );

    Ok(())
}

fn config_path(args: &CliArgs) -> Option<(PathBuf, bool)> {
    match args.config.as_deref() {
        Some(p) => Some((config::expand_tilde(p), false)),
        None => config::default_config_path().map(|p| (p, true)),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    if args.init_config {
        let (path, _) = config_path(&args)
            .ok_or_else(|| "could not determine home directory for config".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!("config: {}", path.display());
        return Ok(());
    }

    let cfg = match config_path(&args) {
        Some((path, allow_missing)) => config::load_config(&path, allow_missing)?,
        None => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;
    init_tracing(run.verbose, run.no_color);
    tracing::debug!(catalog = %run.options.catalog_path.display(), format = ?run.output_format, "configuration resolved");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
