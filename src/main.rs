//! Terminal front end for codebreaker.
//!
//! # Usage
//!
//! ```bash
//! # Start an interactive session with the configured defaults
//! cargo run -- play
//!
//! # Choose the first game's pool and length, emit JSON instead of text
//! cargo run -- play --pool 0123456789 --length 5 --json
//!
//! # Score a single guess against a secret
//! cargo run -- score ABACAB AABBCC
//! ```
//!
//! # Environment Variables
//!
//! See [`codebreaker::config`]. A `.env` file in the working directory is
//! loaded first if present.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use codebreaker::application::services::{
    GameService, GuessOutcome, MaintenanceService, run_sweeper,
};
use codebreaker::cli::{Command, HELP};
use codebreaker::config::{self, Config};
use codebreaker::domain::clock::{Clock, SystemClock};
use codebreaker::domain::entities::{Guess, NewGame};
use codebreaker::domain::scoring;
use codebreaker::error::AppError;
use codebreaker::infrastructure::persistence::InMemoryGameRepository;
use codebreaker::utils::random::{OsRandom, RandomSource, SeededRandom};
use codebreaker::view::{ErrorView, GameView, GuessView};

/// Mastermind-style code-breaking game.
#[derive(Parser)]
#[command(name = "codebreaker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive game session
    Play {
        /// Symbol pool of the first game (default: CODEBREAKER_POOL)
        #[arg(short, long)]
        pool: Option<String>,

        /// Code length of the first game (default: CODEBREAKER_LENGTH)
        #[arg(short, long)]
        length: Option<usize>,

        /// Draw secrets from a seeded generator instead of the OS CSPRNG
        #[arg(long)]
        seed: Option<u64>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score one guess against a secret
    Score { secret: String, guess: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env().context("Failed to load configuration")?;
    init_tracing(&config);

    match cli.command {
        Commands::Play {
            pool,
            length,
            seed,
            json,
        } => play(config, pool, length, seed, json).await,
        Commands::Score { secret, guess } => score(&secret, &guess),
    }
}

/// Logs go to stderr so they never interleave with prompts on stdout.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn score(secret: &str, guess: &str) -> Result<()> {
    let secret: Vec<char> = secret.chars().collect();
    let guess: Vec<char> = guess.chars().collect();

    if secret.len() != guess.len() {
        anyhow::bail!(
            "guess must have exactly {} characters, got {}",
            secret.len(),
            guess.len()
        );
    }

    let result = scoring::score(&secret, &guess);
    println!(
        "{} exact, {} near{}",
        result.exact_matches.to_string().green().bold(),
        result.near_matches.to_string().yellow().bold(),
        if result.is_solution(secret.len()) {
            " (solved)".green().to_string()
        } else {
            String::new()
        }
    );
    Ok(())
}

async fn play(
    config: Config,
    pool: Option<String>,
    length: Option<usize>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    config.print_summary();

    let repository = Arc::new(InMemoryGameRepository::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let rng: Arc<dyn RandomSource> = match seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(OsRandom::new()),
    };

    let games = GameService::new(
        repository.clone(),
        config.key_format.codec(),
        rng,
        clock.clone(),
    );

    let maintenance = Arc::new(MaintenanceService::new(
        repository,
        games.locks().clone(),
        clock,
        config.stale_game_days,
    ));
    let sweeper = tokio::spawn(run_sweeper(
        maintenance,
        Duration::from_secs(config.sweep_interval_seconds),
    ));

    let mut session = Session {
        games,
        config,
        current: None,
        json,
    };

    if !json {
        println!("{}", "🔐 Codebreaker".bright_blue().bold());
        println!("{}", "Type 'help' for commands.".dimmed());
        println!();
    }

    session.dispatch(Command::New { pool, length }).await;

    loop {
        let line = prompt(session.prompt_label()).await?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                session.report(&e);
                continue;
            }
        };
        if !session.dispatch(command).await {
            break;
        }
    }

    sweeper.abort();
    Ok(())
}

/// Reads one line without blocking the async runtime.
async fn prompt(label: String) -> Result<String> {
    let line = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
    })
    .await
    .context("Prompt task failed")??;
    Ok(line)
}

struct Session {
    games: GameService<InMemoryGameRepository>,
    config: Config,
    current: Option<String>,
    json: bool,
}

impl Session {
    fn prompt_label(&self) -> String {
        match &self.current {
            Some(key) => format!("guess [{}]", &key[..key.len().min(8)]),
            None => "codebreaker".to_string(),
        }
    }

    /// Runs a command, reporting any error. Returns `false` when the session
    /// should end.
    async fn dispatch(&mut self, command: Command) -> bool {
        match self.handle(command).await {
            Ok(keep_going) => keep_going,
            Err(e) => {
                self.report(&e);
                true
            }
        }
    }

    async fn handle(&mut self, command: Command) -> Result<bool, AppError> {
        match command {
            Command::Nothing => {}
            Command::Guess(text) => self.guess(&text).await?,
            Command::New { pool, length } => self.new_game(pool, length).await?,
            Command::Games(filter) => {
                let games = self.games.list(filter).await?;
                if self.json {
                    let views: Vec<GameView> = games
                        .iter()
                        .map(|game| GameView::simple(game, self.games.codec()))
                        .collect();
                    self.emit(&views)?;
                } else if games.is_empty() {
                    println!("{}", "No games.".dimmed());
                } else {
                    for game in &games {
                        let key = self.games.encode_key(game.external_key());
                        let marker = if self.current.as_deref() == Some(key.as_str()) {
                            "*"
                        } else {
                            " "
                        };
                        let status = if game.is_solved() {
                            "solved".green()
                        } else {
                            "active".yellow()
                        };
                        println!(
                            "{marker} {}  {}  pool {}  length {}  {} guesses  {}",
                            key.cyan(),
                            game.created().format("%Y-%m-%d %H:%M:%S"),
                            game.pool(),
                            game.length(),
                            game.guess_count(),
                            status
                        );
                    }
                }
            }
            Command::Use(key) => {
                let game = self.games.get(&key).await?;
                if !self.json {
                    println!(
                        "Switched to {} ({} symbols from {}, {} guesses)",
                        key.cyan(),
                        game.length(),
                        game.pool(),
                        game.guess_count()
                    );
                }
                self.current = Some(key);
            }
            Command::Show(key) => {
                let key = self.resolve(key)?;
                let game = self.games.get(&key).await?;
                self.emit(&GameView::detailed(&game, self.games.codec()))?;
            }
            Command::History => {
                let key = self.resolve(None)?;
                let guesses = self.games.list_guesses(&key).await?;
                if self.json {
                    let views: Vec<GuessView> = guesses
                        .iter()
                        .map(|guess| GuessView::new(guess, self.games.codec()))
                        .collect();
                    self.emit(&views)?;
                } else if guesses.is_empty() {
                    println!("{}", "No guesses yet.".dimmed());
                } else {
                    for (i, guess) in guesses.iter().enumerate() {
                        println!("{}", describe_guess(i + 1, guess));
                    }
                }
            }
            Command::Delete(key) => {
                let key = self.resolve(key)?;
                self.games.remove(&key).await?;
                if self.current.as_deref() == Some(key.as_str()) {
                    self.current = None;
                }
                if !self.json {
                    println!("Deleted {}", key.cyan());
                }
            }
            Command::Clear => {
                let removed = self.games.clear().await?;
                self.current = None;
                if !self.json {
                    println!("Deleted {removed} games");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    async fn new_game(
        &mut self,
        pool: Option<String>,
        length: Option<usize>,
    ) -> Result<(), AppError> {
        let new_game = NewGame::new(
            pool.unwrap_or_else(|| self.config.default_pool.clone()),
            length.unwrap_or(self.config.default_length),
        );
        let game = self.games.create(new_game).await?;
        let key = self.games.encode_key(game.external_key());

        if self.json {
            self.emit(&GameView::simple(&game, self.games.codec()))?;
        } else {
            println!(
                "New game {}: {} symbols from {}",
                key.cyan(),
                game.length().to_string().bold(),
                game.pool().to_string().bold()
            );
        }

        self.current = Some(key);
        Ok(())
    }

    async fn guess(&mut self, text: &str) -> Result<(), AppError> {
        let key = self.resolve(None)?;
        let GuessOutcome { game, guess } = self.games.record_guess(&key, text).await?;

        if self.json {
            return self.emit(&GuessView::new(&guess, self.games.codec()));
        }

        println!("{}", describe_guess(game.guess_count(), &guess));
        if let Some(secret) = game.reveal_secret() {
            println!(
                "{}",
                format!(
                    "✅ Solved in {} guesses! The code was {secret}.",
                    game.guess_count()
                )
                .green()
                .bold()
            );
            println!("{}", "Type 'new' to play again.".dimmed());
        }
        Ok(())
    }

    fn resolve(&self, key: Option<String>) -> Result<String, AppError> {
        key.or_else(|| self.current.clone()).ok_or_else(|| {
            AppError::not_found("No current game; start one with 'new'", json!({}))
        })
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<(), AppError> {
        let out = serde_json::to_string_pretty(value).map_err(|e| {
            AppError::internal(
                "Failed to serialize output",
                json!({ "reason": e.to_string() }),
            )
        })?;
        println!("{out}");
        Ok(())
    }

    fn report(&self, error: &AppError) {
        if self.json {
            if let Ok(out) = serde_json::to_string(&ErrorView::from(error)) {
                println!("{out}");
            }
        } else {
            println!("{} {}", "✗".red().bold(), error.to_string().red());
        }
    }
}

fn describe_guess(number: usize, guess: &Guess) -> String {
    format!(
        "#{number:<3} {}  {} exact  {} near",
        guess.text().bold(),
        guess.exact_matches().to_string().green(),
        guess.near_matches().to_string().yellow()
    )
}
