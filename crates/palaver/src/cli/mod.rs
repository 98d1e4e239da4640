//! CLI command definitions and handlers.

mod chat;
mod commands;
mod file;
mod message;
mod output;

pub use commands::{Cli, Commands};

use palaver::{PalaverConfig, PalaverResult, PostgresChatRepository, connect, run_migrations};
use tracing::info;

/// Connect to the database and run the requested command.
pub fn dispatch(cli: Cli, config: &PalaverConfig) -> PalaverResult<()> {
    let mut conn = connect(&config.database)?;
    let format = cli.output_format();

    match cli.command {
        Commands::Migrate => {
            let applied = run_migrations(&mut conn)?;
            info!(applied, "Migrations complete");
            println!("Applied {} migration(s)", applied);
            Ok(())
        }
        Commands::Chat(cmd) => {
            chat::handle(&mut PostgresChatRepository::new(&mut conn), cmd, format)
        }
        Commands::Message(cmd) => {
            message::handle(&mut PostgresChatRepository::new(&mut conn), cmd, format)
        }
        Commands::File(cmd) => {
            file::handle(&mut PostgresChatRepository::new(&mut conn), cmd, format)
        }
    }
}
