//! Agent Portal CLI
//!
//! Browse the demo catalogue, search it, and chat with an agent page.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use agent_portal::catalogue::{
    build_catalogue_report, filter_with_matches, find_record, CatalogueReport, DemoRecord,
    MatchKind,
};
use agent_portal::chat::{AgentEndpoint, ChatClient, SessionStore, Typewriter};
use agent_portal::config::{load_config, load_config_from_path, Config};
use agent_portal::error::{PortalError, ResultExt};
use agent_portal::logging::{self, log_catalogue_event, log_error};
use agent_portal::render;

#[derive(Parser, Debug)]
#[clap(
    name = "agent-portal",
    about = "Catalogue and chat client for AI agent demo pages",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Directory containing the demo pages (overrides config)
    #[clap(long, global = true)]
    pages_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.agent-portal/config.json
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the landing page
    Home,

    /// List every demo in catalogue order
    List {
        /// Print JSON instead of cards
        #[clap(long)]
        json: bool,
    },

    /// Filter demos by title, category, tag, ordinal or icon
    Search {
        query: String,

        /// Print JSON instead of cards
        #[clap(long)]
        json: bool,

        /// Show which criterion matched each demo
        #[clap(long)]
        explain: bool,
    },

    /// Show one demo by ordinal, filename or title
    Show { page: String },

    /// Send a prompt to a demo's agent, or print the history when no prompt is given
    Chat {
        /// Demo ordinal, filename or title
        page: String,

        prompt: Option<String>,

        /// Print the reply at once
        #[clap(long)]
        no_typewriter: bool,

        /// End the current session for this page before sending
        #[clap(long)]
        reset: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };
    if let Some(dir) = &cli.pages_dir {
        config.pages_dir = Some(dir.display().to_string());
    }

    match cli.command {
        Command::Home => {
            let report = load_catalogue(&config);
            let home =
                render::render_home(&config.get_page_title(), &config.get_title(), &report.records);
            println!("{}", home);
        }
        Command::List { json } => {
            let report = load_catalogue(&config);
            let matches = filter_with_matches(&report.records, "");
            print_matches(&matches, json, false)?;
        }
        Command::Search {
            query,
            json,
            explain,
        } => {
            let report = load_catalogue(&config);
            let matches = filter_with_matches(&report.records, &query);
            log_catalogue_event("search", matches.len(), report.skipped_count());

            if matches.is_empty() && !json {
                println!("{}", render::render_zero_results(&query));
            } else {
                print_matches(&matches, json, explain)?;
            }
        }
        Command::Show { page } => {
            let report = load_catalogue(&config);
            let record = find_record(&report.records, &page)
                .ok_or_else(|| anyhow!("No demo matches '{}'", page))?;
            println!("{}", render::render_detail(record));
        }
        Command::Chat {
            page,
            prompt,
            no_typewriter,
            reset,
        } => chat(&config, &page, prompt.as_deref(), no_typewriter, reset)?,
    }

    Ok(())
}

/// Build the catalogue and print a banner for every warning
fn load_catalogue(config: &Config) -> CatalogueReport {
    let pages_dir = config.get_pages_dir();
    let report = build_catalogue_report(&pages_dir, &config.get_catalogue());
    for banner in render::render_warnings(&report.warnings) {
        eprintln!("{}", banner);
    }
    report
}

fn print_matches(
    matches: &[(&DemoRecord, Option<MatchKind>)],
    json: bool,
    explain: bool,
) -> Result<()> {
    if json {
        let out = render::render_json(matches, explain).context("Failed to serialize catalogue")?;
        println!("{}", out);
    } else {
        println!("{}", render::render_catalogue(matches, explain));
    }
    Ok(())
}

fn chat(
    config: &Config,
    page: &str,
    prompt: Option<&str>,
    no_typewriter: bool,
    reset: bool,
) -> Result<()> {
    let report = load_catalogue(config);
    let record = find_record(&report.records, page)
        .ok_or_else(|| anyhow!("No demo matches '{}'", page))?;
    let filename = record.filename().to_string();

    let chat_config = config.get_chat();
    let session_path = chat_config.session_path();
    let mut store = SessionStore::load_or_quarantine(&session_path)?;

    if reset {
        store.end_session(&filename);
        store.save(&session_path)?;
        info!(page = %filename, "Chat session reset");
    }

    let Some(prompt) = prompt else {
        match store.session(&filename) {
            Some(session) if !session.is_empty() => {
                println!("{}", render::render_history(session))
            }
            _ => println!("No conversation with {} yet.", record.label()),
        }
        return Ok(());
    };

    let endpoint = AgentEndpoint::from_config(&filename, config).map_err(PortalError::from)?;
    let speed = if no_typewriter {
        0
    } else {
        endpoint.typewriter_speed
    };
    let client = ChatClient::new(filename.clone(), endpoint);
    debug!(page = %filename, "Chat client ready");

    let session = store.session_mut(&filename);
    let result = session.exchange(prompt, &client);
    store.save(&session_path).log_err();

    let reply = match result {
        Ok(reply) => reply,
        Err(e) => {
            let err = PortalError::from(e);
            log_error("chat", &err.to_string(), Some(&filename));
            return Err(anyhow!(err.user_message()));
        }
    };

    let mut stdout = io::stdout().lock();
    Typewriter::new(&reply.answer, speed)
        .play(&mut stdout)
        .context("Failed to write reply")?;
    if let Some(summary) = &reply.summary {
        writeln!(stdout, "\nSummary:\n{}", summary).context("Failed to write summary")?;
    }
    Ok(())
}
