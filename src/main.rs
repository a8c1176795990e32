// src/main.rs
//
// Assistant maths : point d’entrée CLI
// ------------------------------------
// But:
// - un message en argument -> une réponse sur stdout (texte, html ou json)
// - journal (tracing) sur stderr : stdout reste propre pour les scripts
// - --window : fenêtre de chat (feature "fenetre")

use anyhow::Result;
use chrono::Timelike;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod conversation;
mod noyau;
mod reglages;
mod rendu;

#[cfg(feature = "fenetre")]
mod app;

use conversation::memoire::Memoire;
use conversation::notes::CarnetNotes;
use conversation::Session;
use reglages::{FormatSortie, Reglages, CHIFFRES_DEFAUT, DECIMALES_DROITE_DEFAUT};

#[derive(Parser, Debug)]
#[command(name = "assistant_maths")]
#[command(about = "Solves math questions written in plain text, with exact steps", long_about = None)]
#[command(version)]
struct Cli {
    /// Message, e.g. "what is 7 times 4?" or "solve 2x+3=7"
    #[arg(required_unless_present = "window")]
    message: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatSortie::Texte)]
    format: FormatSortie,

    /// Decimal digits of the truncated readings (max 200)
    #[arg(long, default_value_t = CHIFFRES_DEFAUT)]
    digits: usize,

    /// Rounding of the line coefficients
    #[arg(long, default_value_t = DECIMALES_DROITE_DEFAUT)]
    line_decimals: usize,

    /// Report every root instead of the first one
    #[arg(long)]
    all_roots: bool,

    /// JSON file where definitions and past exchanges are kept
    #[arg(long, value_name = "FILE")]
    memory: Option<PathBuf>,

    /// Directory of <topic>.json math notes
    #[arg(long, value_name = "DIR")]
    notes: Option<PathBuf>,

    /// Open the chat window instead of answering once
    #[arg(long)]
    window: bool,

    /// Debug logging on stderr (RUST_LOG still wins)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn reglages(&self) -> Reglages {
        let mut r = Reglages {
            format: self.format,
            ..Reglages::default()
        }
        .avec_toutes_racines(self.all_roots);
        r.set_chiffres(self.digits);
        r.set_decimales_droite(self.line_decimals);
        r
    }

    fn session(&self) -> Session {
        let mut session = Session::nouvelle(self.reglages());
        if let Some(dossier) = &self.notes {
            session = session.avec_notes(CarnetNotes::nouveau(dossier));
        }
        if let Some(chemin) = &self.memory {
            session = session.avec_memoire(Memoire::charger(chemin));
        }
        session
    }
}

fn init_journal(verbose: bool) {
    let defaut = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(defaut)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "fenetre")]
fn fenetre(session: Session) -> Result<()> {
    app::lancer(session)
}

#[cfg(not(feature = "fenetre"))]
fn fenetre(_session: Session) -> Result<()> {
    anyhow::bail!("this build has no window; rebuild with `--features fenetre`")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_journal(cli.verbose);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "assistant_maths");

    let mut session = cli.session();
    let Some(message) = cli.message.as_deref().filter(|_| !cli.window) else {
        return fenetre(session);
    };

    let heure = chrono::Local::now().hour();
    let reponse = session.repondre(message, heure);
    let sortie = rendu::rendre(&reponse, session.reglages.format)?;
    println!("{sortie}");

    session.terminer();
    Ok(())
}
