use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use photo_organizer_core::{
    app_paths, apply_plan, load_config, plan_move, AppConfig, Catalog, DirectoryRecord,
    DirectoryScheme, DirectoryType, MoveMode, MoveOptions, MovePlan, MoveResult, SchemeToken,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "photo-organizer-cli")]
#[command(about = "Moves new images from source directories into organized target directories")]
struct Cli {
    /// Catalog file to use instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a source or target directory
    DirectoryAdd(DirectoryAddArgs),
    /// List registered directories
    DirectoryList(DirectoryListArgs),
    /// Remove a registered directory by alias or path
    DirectoryRemove(IdentifierArgs),
    /// Add a directory scheme
    SchemeAdd(SchemeAddArgs),
    /// List directory schemes
    SchemeList,
    /// Remove a directory scheme by name or format string
    SchemeRemove(IdentifierArgs),
    /// List the tokens a scheme format string may use
    Tokens,
    /// Move images missing from the target out of the source
    ExecMove(ExecMoveArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Source,
    Target,
}

impl From<KindArg> for DirectoryType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Source => DirectoryType::Source,
            KindArg::Target => DirectoryType::Target,
        }
    }
}

#[derive(Debug, Args)]
struct DirectoryAddArgs {
    #[arg(short = 't', long = "type", value_enum)]
    kind: KindArg,
    #[arg(short, long)]
    directory: PathBuf,
    #[arg(short, long)]
    alias: Option<String>,
    /// Scan subdirectories too (sources only)
    #[arg(short, long, default_value_t = false)]
    recursive: bool,
    /// Scheme name or format string (targets only)
    #[arg(short, long)]
    scheme: Option<String>,
}

#[derive(Debug, Args)]
struct DirectoryListArgs {
    #[arg(short = 't', long = "type", value_enum)]
    kind: Option<KindArg>,
}

#[derive(Debug, Args)]
struct IdentifierArgs {
    identifier: String,
}

#[derive(Debug, Args)]
struct SchemeAddArgs {
    #[arg(short, long)]
    alias: String,
    #[arg(short, long)]
    format: String,
    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct ExecMoveArgs {
    /// Alias or path of the source directory
    #[arg(short, long)]
    source: String,
    /// Alias or path of the target directory
    #[arg(short, long)]
    target: String,
    /// Show what would be moved without touching any file
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Keep going after a failed move
    #[arg(long, default_value_t = false)]
    continue_on_error: bool,
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config()?;
    let catalog_path = match cli.catalog {
        Some(path) => path,
        None => config.resolve_catalog_path(&app_paths()?),
    };

    match cli.command {
        Commands::DirectoryAdd(args) => cmd_directory_add(&catalog_path, args),
        Commands::DirectoryList(args) => cmd_directory_list(&catalog_path, args),
        Commands::DirectoryRemove(args) => {
            let mut catalog = Catalog::load(&catalog_path)?;
            catalog.remove_directory(&args.identifier)?;
            catalog.save(&catalog_path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::SchemeAdd(args) => {
            let mut catalog = Catalog::load(&catalog_path)?;
            catalog.add_scheme(DirectoryScheme::new(
                args.format,
                args.alias,
                args.description,
            ))?;
            catalog.save(&catalog_path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::SchemeList => cmd_scheme_list(&catalog_path),
        Commands::SchemeRemove(args) => {
            let mut catalog = Catalog::load(&catalog_path)?;
            catalog.remove_scheme(&args.identifier)?;
            catalog.save(&catalog_path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tokens => {
            for token in SchemeToken::ALL {
                println!("{{{}}}\t{}", token.name(), token.description());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::ExecMove(args) => cmd_exec_move(&catalog_path, &config, args),
        Commands::Config(config_args) => match config_args.action {
            ConfigAction::Show => cmd_config_show(&config, &catalog_path),
        },
    }
}

fn cmd_directory_add(catalog_path: &Path, args: DirectoryAddArgs) -> Result<ExitCode> {
    let path = fs::canonicalize(&args.directory)
        .with_context(|| format!("could not resolve directory: {}", args.directory.display()))?;
    if !path.is_dir() {
        anyhow::bail!("not a directory: {}", path.display());
    }

    let mut catalog = Catalog::load(catalog_path)?;
    let kind: DirectoryType = args.kind.into();
    let record = match kind {
        DirectoryType::Source => {
            if args.scheme.is_some() {
                warn!("--scheme only applies to target directories, ignoring it");
            }
            DirectoryRecord::source(path, args.alias, args.recursive)
        }
        DirectoryType::Target => {
            if args.recursive {
                warn!("--recursive only applies to source directories, ignoring it");
            }
            DirectoryRecord::target(path, args.alias, args.scheme)
        }
    };

    catalog.add_directory(record)?;
    catalog.save(catalog_path)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_directory_list(catalog_path: &Path, args: DirectoryListArgs) -> Result<ExitCode> {
    let catalog = Catalog::load(catalog_path)?;
    for record in catalog.directories(args.kind.map(Into::into)) {
        let mut line = record.directory_type().to_string();
        if record.is_recursive() {
            line.push_str(" (R)");
        }
        line.push('\t');
        line.push_str(&record.path.display().to_string());
        if let Some(alias) = &record.alias {
            line.push('\t');
            line.push_str(alias);
        }
        if let Some(scheme) = record.scheme_name() {
            line.push_str(&format!("\t[{scheme}]"));
        }
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_scheme_list(catalog_path: &Path) -> Result<ExitCode> {
    let catalog = Catalog::load(catalog_path)?;
    for scheme in catalog.schemes() {
        match &scheme.description {
            Some(desc) => println!("{}\t{}\t{}", scheme.format_string, scheme.name, desc),
            None => println!("{}\t{}", scheme.format_string, scheme.name),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_exec_move(catalog_path: &Path, config: &AppConfig, args: ExecMoveArgs) -> Result<ExitCode> {
    let catalog = Catalog::load(catalog_path)?;
    let mode = if args.continue_on_error {
        MoveMode::ContinueOnError
    } else {
        config.move_mode()
    };
    let options = MoveOptions {
        timestamp_source: config.timestamp_source,
        mode,
    };

    let plan = match plan_move(&catalog, &args.source, &args.target, &options) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.dry_run {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print_plan(&plan);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let result = apply_plan(plan, options.mode);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !result.successful {
        print_failure(&result);
    }

    Ok(if result.successful {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_config_show(config: &AppConfig, catalog_path: &Path) -> Result<ExitCode> {
    let paths = app_paths()?;
    println!("config file: {}", paths.config_path.display());
    println!("catalog file: {}", catalog_path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(ExitCode::SUCCESS)
}

fn print_plan(plan: &MovePlan) {
    println!("source -> destination");
    for planned in &plan.pending {
        println!(
            "{} -> {}",
            planned.image.path.display(),
            planned.destination.display()
        );
    }
    println!(
        "\nsummary: pending={} already_present={}",
        plan.pending.len(),
        plan.already_present.len()
    );
}

fn print_failure(result: &MoveResult) {
    eprintln!("{}", result.message);
    eprintln!("moved {} image(s); not moved:", result.moved_count);
    for image in &result.unmoved_images {
        eprintln!("  {}", image.path.display());
    }
}
