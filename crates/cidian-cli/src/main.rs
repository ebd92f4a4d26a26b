//! cidian: look up Chinese words on Wiktionary and find pronunciation audio.

use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use cidian::{AudioFinder, AudioSite, Config, Dictionary, HttpFetcher, LookupOutcome};

#[derive(Parser)]
#[command(
    name = "cidian",
    about = "Look up Chinese words: headword forms, pinyin, part of speech and definitions",
    version
)]
struct Cli {
    /// Path to a YAML config file.
    /// Also reads from CIDIAN_CONFIG env var.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a word (Simplified or Traditional).
    Lookup {
        /// The word to look up, e.g. 关系 or 知道.
        word: String,

        /// Print the entry as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Find a pronunciation recording and print its download URL.
    Audio {
        /// Site to search (forvo, chinesepod).
        site: AudioSite,

        /// The word to search for.
        word: String,
    },

    /// Print the effective configuration as YAML.
    Config,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   cidian completions bash > ~/.local/share/bash-completion/completions/cidian
    ///   cidian completions zsh > ~/.zfunc/_cidian
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "cidian", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let (config, config_path) = Config::resolve(cli.config.as_deref())?;
    if let Some(path) = &config_path {
        tracing::info!("Config: {}", path.display());
    }

    match cli.command {
        Commands::Lookup { word, json } => {
            let dictionary = Dictionary::from_config(&config)?;
            match dictionary.lookup(&word).await? {
                LookupOutcome::Found { entry, warnings } => {
                    for warning in &warnings {
                        eprintln!("warning: {warning}");
                    }
                    if json {
                        println!("{}", serde_json::to_string_pretty(&entry)?);
                    } else {
                        print!("{entry}");
                    }
                }
                LookupOutcome::NotFound { query } => {
                    eprintln!("No dictionary entry for {query}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Audio { site, word } => {
            let fetcher = HttpFetcher::new(&config.fetch)?;
            let finder = AudioFinder::new(fetcher, &config.audio)?;
            let link = finder.find(site, word.trim()).await?;
            println!("{}", link.url);
            println!("file: {}", link.file_name);
        }

        Commands::Config => {
            match &config_path {
                Some(path) => println!("# {}", path.display()),
                None => println!("# built-in defaults"),
            }
            print!("{}", config.to_yaml()?);
        }

        Commands::Completions { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}
