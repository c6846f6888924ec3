use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command, arg, command, crate_name, value_parser};
use kernel::{SharePlatform, SortKey};
use tracing_subscriber::EnvFilter;

mod cli;

const DEFAULT_LOG_FILTER: &str = "myfiles=info,client=info";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = build_cli().get_matches();

    if cli.subcommand_matches(cli::VERSION_SUBCOMMAND).is_some() {
        cli::version::run();
        return ExitCode::SUCCESS;
    }
    if cli.subcommand_matches(cli::BUGREPORT_SUBCOMMAND).is_some() {
        cli::bugreport::run();
        return ExitCode::SUCCESS;
    }

    init_logging();
    let config = match cli::files::config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let done = match cli.subcommand() {
        Some((cli::LIST_SUBCOMMAND, matches)) => cli::files::list(&config, matches).await,
        Some((cli::DOWNLOAD_SUBCOMMAND, matches)) => cli::files::download(&config, matches).await,
        Some((cli::DELETE_SUBCOMMAND, matches)) => cli::files::delete(&config, matches).await,
        Some((cli::SHARE_SUBCOMMAND, matches)) => cli::files::share(&config, matches).await,
        _ => true,
    };
    if done {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn search_arg() -> Arg {
    arg!(-s --search <QUERY>).help("Only files whose name or CID contains QUERY, ignoring case")
}

fn yes_arg() -> Arg {
    arg!(-y --yes).help("Do not ask for confirmation")
}

fn build_cli() -> Command {
    command!(crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .arg(
            arg!(-u --uri <URI>)
                .global(true)
                .help("Backend URI. Overrides MYFILES_URL"),
        )
        .arg(
            arg!(-k --key <KEY>)
                .global(true)
                .help("Public API key. Overrides MYFILES_ANON_KEY"),
        )
        .arg(
            arg!(-t --token <TOKEN>)
                .global(true)
                .help("Access token of the signed in user. Overrides MYFILES_ACCESS_TOKEN"),
        )
        .arg(
            arg!(--origin <ORIGIN>)
                .global(true)
                .help("Origin of share links. Overrides MYFILES_ORIGIN"),
        )
        .subcommand(Command::new(cli::VERSION_SUBCOMMAND).about(cli::VERSION_DESCRIPTION))
        .subcommand(Command::new(cli::BUGREPORT_SUBCOMMAND).about(cli::BUGREPORT_DESCRIPTION))
        .subcommand(
            Command::new(cli::LIST_SUBCOMMAND)
                .about(cli::LIST_DESCRIPTION)
                .arg(search_arg())
                .arg(
                    arg!(--sort <KEY>)
                        .value_parser(|s: &str| s.parse::<SortKey>())
                        .help("Sort by name, date, size or verified. Newest first when omitted"),
                )
                .arg(arg!(--desc).help("Sort in descending order")),
        )
        .subcommand(
            Command::new(cli::DOWNLOAD_SUBCOMMAND)
                .about(cli::DOWNLOAD_DESCRIPTION)
                .arg(arg!(<ID>).id("id").help("Id of the file to download"))
                .arg(
                    arg!(-o --output <DIR>)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory to save the file into. Current directory by default"),
                )
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new(cli::DELETE_SUBCOMMAND)
                .about(cli::DELETE_DESCRIPTION)
                .arg(
                    Arg::new("id")
                        .value_name("ID")
                        .action(ArgAction::Append)
                        .num_args(1..)
                        .required_unless_present("all")
                        .conflicts_with("all")
                        .help("Ids of the files to delete"),
                )
                .arg(arg!(-a --all).help("Delete every file, or every file matching --search"))
                .arg(search_arg().requires("all"))
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new(cli::SHARE_SUBCOMMAND)
                .about(cli::SHARE_DESCRIPTION)
                .arg(arg!(<ID>).id("id").help("Id of the file to share"))
                .arg(
                    arg!(-p --platform <PLATFORM>)
                        .required(true)
                        .value_parser(|s: &str| s.parse::<SharePlatform>())
                        .help("whatsapp, gmail, telegram or copy"),
                ),
        )
        .arg_required_else_help(true)
        .disable_version_flag(true)
}
