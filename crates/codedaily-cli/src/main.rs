use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod tui;

#[derive(Parser)]
#[command(name = "codedaily", version, about = "Code Daily focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive timer (default)
    Run,
    /// Print the current view as JSON
    Status,
    /// Sign in with a display name
    Login {
        /// Name to greet you with
        name: String,
    },
    /// Sign out and forget the display name
    Logout,
    /// List timer durations and whether they are unlocked
    Durations,
    /// Show the feature roadmap
    Roadmap,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(),
        Commands::Status => commands::profile::status(),
        Commands::Login { name } => commands::profile::login(&name),
        Commands::Logout => commands::profile::logout(),
        Commands::Durations => commands::unlocks::durations(),
        Commands::Roadmap => commands::unlocks::roadmap(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
