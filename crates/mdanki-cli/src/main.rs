//! Send an annotated Markdown document to Anki.
//!
//! ```text
//! mdanki notes/rust.md
//! mdanki --dry-run notes/rust.md
//! mdanki --config mdanki.toml --deck Inbox --use-default-deck scratch.md
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use mdanki::{SendReport, Sender, Settings};
use tracing::{info, warn};

/// Send an annotated Markdown document to Anki via AnkiConnect.
#[derive(Parser, Debug)]
#[command(name = "mdanki")]
#[command(version, about, long_about = None)]
struct Args {
    /// Markdown document to send
    file: PathBuf,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// AnkiConnect URL, overrides the settings file
    #[arg(long)]
    url: Option<String>,

    /// Deck for documents without a `# Title`
    #[arg(long)]
    deck: Option<String>,

    /// Send titleless documents to the default deck instead of failing
    #[arg(long, default_value_t = false)]
    use_default_deck: bool,

    /// Base directory for media references (default: the document's directory)
    #[arg(long)]
    media_dir: Option<PathBuf>,

    /// Print the parsed cards and media as JSON without contacting Anki
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Load the settings file, if any, and apply command-line overrides.
    fn settings(&self) -> mdanki::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        if let Some(url) = &self.url {
            settings.connect.url = url.clone();
        }
        if let Some(deck) = &self.deck {
            settings.default_deck = deck.clone();
        }
        if self.use_default_deck {
            settings.use_default_deck = true;
        }
        settings.media_dir = match &self.media_dir {
            Some(dir) => dir.clone(),
            None => resolve_media_dir(&settings.media_dir, &self.file),
        };

        settings.validate()?;
        Ok(settings)
    }
}

/// Relative media directories are taken relative to the document.
fn resolve_media_dir(media_dir: &Path, document: &Path) -> PathBuf {
    if media_dir.is_absolute() {
        return media_dir.to_path_buf();
    }
    match document.parent() {
        Some(parent) => parent.join(media_dir),
        None => media_dir.to_path_buf(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every card reached Anki.
async fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let settings = args.settings()?;
    info!(
        file = %args.file.display(),
        anki_url = %settings.connect.url,
        dry_run = args.dry_run,
        "Starting mdanki"
    );

    let sender = Sender::from_settings(&settings);

    if args.dry_run {
        let text = tokio::fs::read_to_string(&args.file).await?;
        let parsed = sender.parse(&text).await?;
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(true);
    }

    let report = sender.send_file(&args.file).await?;
    print_report(&report);
    Ok(report.is_clean())
}

fn print_report(report: &SendReport) {
    println!(
        "{}: {} added, {} updated, {} media file(s) stored",
        report.deck.name, report.sync.added, report.sync.updated, report.media_stored
    );
    for issue in &report.sync.missing {
        warn!(index = issue.index, front = %issue.front, "card skipped");
        println!("  skipped #{}: {} ({})", issue.index, issue.front, issue.error);
    }
    for issue in &report.sync.failures {
        println!("  failed #{}: {} ({})", issue.index, issue.front, issue.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "mdanki",
            "--url",
            "http://localhost:9000",
            "--deck",
            "Inbox",
            "--use-default-deck",
            "-vv",
            "notes/rust.md",
        ]);
        assert_eq!(args.verbose, 2);
        assert!(!args.dry_run);

        let settings = args.settings().unwrap();
        assert_eq!(settings.connect.url, "http://localhost:9000");
        assert_eq!(settings.default_deck, "Inbox");
        assert!(settings.use_default_deck);
        assert_eq!(settings.media_dir, PathBuf::from("notes/."));
    }

    #[test]
    fn test_media_dir_resolution() {
        assert_eq!(
            resolve_media_dir(Path::new("assets"), Path::new("docs/a.md")),
            PathBuf::from("docs/assets")
        );
        assert_eq!(
            resolve_media_dir(Path::new("/srv/media"), Path::new("docs/a.md")),
            PathBuf::from("/srv/media")
        );
        assert_eq!(
            resolve_media_dir(Path::new("assets"), Path::new("a.md")),
            PathBuf::from("assets")
        );
    }
}
