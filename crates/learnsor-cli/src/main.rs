//! CLI binary for LearnSor: generate tiered hints, merge saved levels, inspect context.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use learnsor_core::config::LearnsorConfig;
use learnsor_core::markers::wrap_markers;
use learnsor_core::{HintDepth, Language, merge_texts};
use learnsor_gen::{HintOrchestrator, HintRequest, HintResponse, provider_from_config};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "learnsor", about = "Tiered programming hints: concepts, guidance, blanks")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate hints for a task up to the requested depth
    Hint {
        /// What the learner is trying to build
        #[arg(short, long)]
        task: String,

        /// File with the learner's current code ("-" reads stdin)
        #[arg(short, long)]
        code_file: Option<PathBuf>,

        /// Language identifier (overrides filename detection)
        #[arg(short, long)]
        lang: Option<String>,

        /// Filename used for language detection (defaults to --code-file)
        #[arg(long)]
        filename: Option<String>,

        /// File the learner is editing, summarized into the prompt
        #[arg(long)]
        active_file: Option<PathBuf>,

        /// Extra instructions passed to every level
        #[arg(short, long)]
        instructions: Option<String>,

        /// Target depth: level1, level2, level3 (or an alias such as "full")
        #[arg(short, long, default_value = "level1")]
        depth: String,

        /// Provider override: anthropic, openai
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also print each level's raw text (text format only)
        #[arg(long)]
        levels: bool,
    },

    /// Merge saved level texts without calling a provider
    Merge {
        /// Level 1 text file
        level1: PathBuf,

        /// Level 2 text file
        #[arg(long)]
        level2: Option<PathBuf>,

        /// Level 3 text file
        #[arg(long)]
        level3: Option<PathBuf>,

        /// Language identifier (defaults to detection from the level 1 filename)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Print the project summary used as hint context
    Scan {
        /// Also summarize this file
        #[arg(long)]
        active_file: Option<PathBuf>,
    },

    /// List supported languages, extensions, and comment markers
    Languages,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "info" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        tracing::warn!("failed to load .env: {}", e);
    }

    let project_root = get_project_root(&cli)?;

    match cli.command {
        Commands::Hint {
            task,
            code_file,
            lang,
            filename,
            active_file,
            instructions,
            depth,
            provider,
            model,
            format,
            levels,
        } => {
            let depth: HintDepth = depth.parse()?;
            let filename = filename.or_else(|| {
                code_file
                    .as_ref()
                    .filter(|p| p.as_os_str() != "-")
                    .map(|p| p.to_string_lossy().into_owned())
            });
            let request = HintRequest {
                user_code: read_code(code_file.as_deref())?,
                task,
                language: lang,
                filename,
                project_path: cli.project.clone(),
                instructions,
                active_file,
                depth,
            };
            cmd_hint(&project_root, &request, provider, model, format, levels)
        }
        Commands::Merge {
            level1,
            level2,
            level3,
            lang,
        } => cmd_merge(&level1, level2.as_deref(), level3.as_deref(), lang.as_deref()),
        Commands::Scan { active_file } => cmd_scan(&project_root, active_file.as_deref()),
        Commands::Languages => {
            cmd_languages();
            Ok(())
        }
    }
}

/// Read the learner's code from a file, from stdin for `-`, or nothing at all.
fn read_code(code_file: Option<&Path>) -> Result<String> {
    match code_file {
        None => Ok(String::new()),
        Some(path) if path.as_os_str() == "-" => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("failed to read code from stdin")?;
            Ok(code)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read code file {}", path.display())),
    }
}

fn read_level(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))
}

fn cmd_hint(
    project_root: &Path,
    request: &HintRequest,
    provider: Option<String>,
    model: Option<String>,
    format: OutputFormat,
    show_levels: bool,
) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let mut config = LearnsorConfig::load(project_root)?;
    if let Some(name) = provider {
        config.provider.name = name.trim().to_lowercase();
    }
    if model.is_some() {
        config.provider.model = model;
    }

    let llm = provider_from_config(&config.provider)
        .with_context(|| format!("failed to set up provider '{}'", config.provider.name))?;
    let orchestrator = HintOrchestrator::new(llm.as_ref(), &config.generation, &config.scan);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    spinner.set_message(format!("Generating {} hints...", request.depth));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let response = orchestrator.generate(request);
    spinner.finish_and_clear();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => print_text(&response, show_levels),
    }

    eprintln!("{}", response.usage);
    let failed = response.levels.iter().filter(|l| l.failed).count();
    if failed > 0 {
        eprintln!("Warning: {failed} level(s) failed; their error text is included above.");
    }
    Ok(())
}

fn print_text(response: &HintResponse, show_levels: bool) {
    if show_levels {
        for level in &response.levels {
            println!("=== {} ===", level.level);
            println!("{}", level.text.trim_end());
            println!();
        }
        println!("=== merged ===");
    }
    print!("{}", response.wrapped());
}

fn cmd_merge(
    level1: &Path,
    level2: Option<&Path>,
    level3: Option<&Path>,
    lang: Option<&str>,
) -> Result<()> {
    let level1_name = level1.to_string_lossy();
    let language = Language::resolve(lang, Some(&level1_name), None);
    let syntax = language.comment_syntax();

    let level1_text = read_level(level1)?;
    let level2_text = level2.map(read_level).transpose()?;
    let level3_text = level3.map(read_level).transpose()?;

    let merged = merge_texts(
        &level1_text,
        level2_text.as_deref(),
        level3_text.as_deref(),
        &syntax,
    );
    print!("{}", wrap_markers(&merged, &syntax));
    Ok(())
}

fn cmd_scan(project_root: &Path, active_file: Option<&Path>) -> Result<()> {
    let config = LearnsorConfig::load(project_root)?;

    let summary = learnsor_scan::scan_project(project_root, &config.scan)
        .with_context(|| format!("failed to scan {}", project_root.display()))?;
    println!("{}", summary.render());

    if summary.skipped > 0 {
        eprintln!("Skipped {} unreadable or oversized file(s)", summary.skipped);
    }

    if let Some(path) = active_file {
        let file = learnsor_scan::summarize_file(path, &config.scan)
            .with_context(|| format!("failed to summarize {}", path.display()))?;
        println!();
        println!("Active file:");
        println!("{}", file.render());
    }
    Ok(())
}

fn cmd_languages() {
    println!("{:<12} {:<28} MARKERS", "LANGUAGE", "EXTENSIONS");
    for language in Language::all() {
        let syntax = language.comment_syntax();
        println!(
            "{:<12} {:<28} {} ... {}",
            language.name(),
            language.extensions().join(" "),
            syntax.start,
            syntax.end
        );
    }
    println!(
        "{:<12} {:<28} {} ... {}",
        "(other)",
        "-",
        learnsor_core::CommentSyntax::DEFAULT.start,
        learnsor_core::CommentSyntax::DEFAULT.end
    );
}
