mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();
    cli::context::init(args.quiet, args.verbose);

    let env = args.env.as_deref();
    let config = args.config.as_path();

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(config, env, args.dry_run),
        Commands::Sync => cli::commands::sync::execute(config, env, args.dry_run),
        Commands::Publish => cli::commands::publish::execute(config, env, args.dry_run),
        Commands::Db { action } => cli::commands::db::execute(action, config, env, args.dry_run),
        Commands::Bucket { action } => {
            cli::commands::bucket::execute(action, config, env, args.dry_run)
        }
        Commands::Show => cli::commands::show::execute(config, env),
        Commands::Bump { level, file } => {
            cli::commands::bump::execute(*level, file.as_deref(), config, env, args.dry_run)
        }
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(e.exit_code());
    }
}
