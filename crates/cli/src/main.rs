use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cli::{launch, render};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};
use watchyo_core::config::{self, AppConfig};
use watchyo_core::grid::{GridLayout, DEFAULT_COLUMNS};
use watchyo_core::scanner::{self, VideoMatcher};
use watchyo_core::{models, setup, LibraryError, LibraryService};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "watchyo=debug,cli=debug,watchyo_core=debug,providers=debug,storage=debug".to_string()
        } else {
            "warn".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    // A `.env` in the working directory may carry TMDB_API_KEY; real env vars win.
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("ignoring .env: {e}"),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[command(name = "watchyo")]
#[command(about = "Personal movie library with TMDB metadata", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look a video file up and add it to the library
    Add {
        /// Video file to catalogue
        file: PathBuf,
        /// Title to search for; prompted for (defaulting to the file name) when omitted
        #[arg(short, long)]
        title: Option<String>,
        /// Accept files whose extension is not a configured video type
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// List the library in display order
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the library as a poster grid
    Grid {
        /// Posters per row
        #[arg(long, default_value_t = DEFAULT_COLUMNS)]
        columns: usize,
        /// Characters per cell
        #[arg(long, default_value_t = render::DEFAULT_CELL_WIDTH)]
        width: usize,
    },
    /// Show one movie's details
    Show {
        /// Entry number as printed by `list` or `grid`
        index: usize,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Open a movie's file with the default application
    Play {
        /// Entry number as printed by `list` or `grid`
        index: usize,
    },
    /// Find video files that are not in the library yet
    Scan {
        /// Directories to search
        #[arg(required = true)]
        dirs: Vec<PathBuf>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove cached posters no library entry refers to
    PrunePosters {
        /// Delete the files; otherwise only list them
        #[arg(long, default_value_t = false)]
        apply: bool,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Add { file, title, force } => run_add(cfg, &file, title, force).await,
        Commands::List { json } => run_list(cfg, json),
        Commands::Grid { columns, width } => run_grid(cfg, columns, width),
        Commands::Show { index, json } => run_show(cfg, index, json),
        Commands::Play { index } => run_play(cfg, index),
        Commands::Scan { dirs, json } => run_scan(cfg, dirs, json).await,
        Commands::PrunePosters { apply } => run_prune(cfg, apply),
    }
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<LibraryError>() {
        Some(LibraryError::NotFound { title }) => eprintln!("Movie not found: {title:?}"),
        Some(LibraryError::Auth(msg)) => eprintln!("Authentication failed: {msg}"),
        _ => eprintln!("Error: {err:#}"),
    }
}

async fn run_add(cfg: AppConfig, file: &Path, title: Option<String>, force: bool) -> Result<()> {
    let file = std::fs::canonicalize(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    if !file.is_file() {
        bail!("{} is not a file", file.display());
    }
    let matcher = VideoMatcher::new(&cfg.library.video_globs, &cfg.library.exclude)?;
    if !force && !matcher.is_video(&file) {
        bail!(
            "{} does not look like a video file (expected {}); pass --force to add it anyway",
            file.display(),
            cfg.library.video_globs.join(", ")
        );
    }

    let suggested = models::suggested_title(&file);
    let title = match title {
        Some(t) => t,
        None => prompt_title(suggested.as_deref())?,
    };

    let mut service = setup::open_library(&cfg)?;
    let file_path = file.to_string_lossy();
    let record = service.add_movie(&file_path, &title).await?;
    println!(
        "Added {}",
        render::list_line(service.list_movies().len() - 1, &record)
    );
    Ok(())
}

fn prompt_title(suggested: Option<&str>) -> Result<String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return suggested
            .map(str::to_string)
            .context("no title given and none can be derived from the file name");
    }
    match suggested {
        Some(s) => print!("Movie title [{s}]: "),
        None => print!("Movie title: "),
    }
    io::stdout().flush()?;
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let entered = line.trim();
    if entered.is_empty() {
        return suggested
            .map(str::to_string)
            .ok_or_else(|| LibraryError::EmptyTitle.into());
    }
    Ok(entered.to_string())
}

fn run_list(cfg: AppConfig, json: bool) -> Result<()> {
    let service = setup::open_library_offline(&cfg)?;
    if json {
        println!("{}", serde_json::to_string_pretty(service.list_movies())?);
    } else if service.list_movies().is_empty() {
        println!("Library is empty. Add a movie with `watchyo add <FILE>`.");
    } else {
        print!("{}", render::render_list(service.list_movies()));
    }
    Ok(())
}

fn run_grid(cfg: AppConfig, columns: usize, width: usize) -> Result<()> {
    let service = setup::open_library_offline(&cfg)?;
    if service.list_movies().is_empty() {
        println!("Library is empty. Add a movie with `watchyo add <FILE>`.");
        return Ok(());
    }
    print!(
        "{}",
        render::render_grid(service.list_movies(), GridLayout::new(columns), width)
    );
    Ok(())
}

fn entry(service: &LibraryService, index: usize) -> Result<&storage::MovieRecord> {
    index
        .checked_sub(1)
        .and_then(|i| service.get(i))
        .with_context(|| {
            format!(
                "no entry {index}; the library has {} movie(s)",
                service.list_movies().len()
            )
        })
}

fn run_show(cfg: AppConfig, index: usize, json: bool) -> Result<()> {
    let service = setup::open_library_offline(&cfg)?;
    let movie = entry(&service, index)?;
    if json {
        println!("{}", serde_json::to_string_pretty(movie)?);
    } else {
        let poster = service.poster_file(movie);
        print!("{}", render::render_detail(movie, poster.as_deref()));
    }
    Ok(())
}

fn run_play(cfg: AppConfig, index: usize) -> Result<()> {
    let service = setup::open_library_offline(&cfg)?;
    let movie = entry(&service, index)?;
    println!("Playing {} ({})", movie.title, movie.year);
    launch::open_with_default(Path::new(&movie.file_path))
}

async fn run_scan(cfg: AppConfig, dirs: Vec<PathBuf>, json: bool) -> Result<()> {
    let service = setup::open_library_offline(&cfg)?;
    let matcher = VideoMatcher::new(&cfg.library.video_globs, &cfg.library.exclude)?;
    let found = scanner::scan(&dirs, &matcher).await?;
    let candidates = scanner::uncatalogued(found, service.list_movies());
    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }
    if candidates.is_empty() {
        println!("No new video files found.");
    }
    for c in &candidates {
        println!(
            "{}\t{}",
            c.path.display(),
            c.suggested_title.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn run_prune(cfg: AppConfig, apply: bool) -> Result<()> {
    let service = setup::open_library_offline(&cfg)?;
    let posters = service.posters();
    let orphans = if apply {
        posters.remove_orphans(service.list_movies())?
    } else {
        posters.orphans(service.list_movies())?
    };
    let verb = if apply { "removed" } else { "would remove" };
    for path in &orphans {
        println!("{verb} {}", path.display());
    }
    println!("{} orphaned poster(s) {verb}", orphans.len());
    Ok(())
}
