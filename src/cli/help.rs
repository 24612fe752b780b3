//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name recorded on command log events (e.g. "commit", "cat-object").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init => "init",
        Commands::Commit { .. } => "commit",
        Commands::Branch { .. } => "branch",
        Commands::Checkout { .. } => "checkout",
        Commands::Revert { .. } => "revert",
        Commands::Log { .. } => "log",
        Commands::Status { .. } => "status",
        Commands::CatObject { .. } => "cat-object",
        Commands::Verify { .. } => "verify",
    }
}

/// Whether the command only reads repository state.
pub fn is_read_only(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Log { .. }
            | Commands::Status { .. }
            | Commands::CatObject { .. }
            | Commands::Verify { .. }
    )
}
