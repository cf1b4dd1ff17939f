use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("greenlight")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch build and test status from a Greenlight backend")
        .long_about("Greenlight reruns build and test jobs whenever their watched files change. This CLI reads the backend's project list, shows one project with its captured output, or keeps polling and redraws only when something changed.")
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .help("Backend base URL (overrides config and GREENLIGHT_API_URL)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List all projects with their status")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("show")
                .about("Show one project with its captured output")
                .arg(
                    Arg::new("id")
                        .help("Project id")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("watch")
                .about("Poll the backend and redraw whenever a project changes")
                .arg(
                    Arg::new("id")
                        .help("Watch a single project instead of the whole list")
                        .index(1)
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Poll interval in milliseconds (overrides config)")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print every new snapshot as one JSON line")
                        .action(ArgAction::SetTrue)
                )
        )
}
