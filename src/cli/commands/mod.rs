use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};
use std::path::PathBuf;

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("porta")
        .about("Auth Gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .help("Identity provider web API key")
                .env("PORTA_API_KEY")
                .required(true),
        )
        .arg(
            Arg::new("service-account")
                .short('s')
                .long("service-account")
                .help("Path to the service-account descriptor file")
                .default_value("service_account.json")
                .env("PORTA_SERVICE_ACCOUNT")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("project-id")
                .short('p')
                .long("project-id")
                .help("Provider project identifier")
                .env("PORTA_PROJECT_ID")
                .required(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("PORTA_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account with email and password")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Email address")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Password")
                        .required(true),
                )
                .arg(
                    Arg::new("display-name")
                        .long("display-name")
                        .help("Display name for the profile (default: empty)"),
                ),
        )
        .subcommand(
            Command::new("signin")
                .about("Sign in with email and password")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Email address")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Password")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Verify a bearer token and print its claims")
                .arg(Arg::new("token").help("Bearer token").required(true)),
        )
        .subcommand(
            Command::new("profile")
                .about("Read or update a user profile document")
                .subcommand_required(true)
                .subcommand(
                    Command::new("get")
                        .about("Print the profile document for a user id")
                        .arg(Arg::new("uid").help("User id").required(true)),
                )
                .subcommand(
                    Command::new("set")
                        .about("Merge-write fields into the profile document")
                        .arg(Arg::new("uid").help("User id").required(true))
                        .arg(
                            Arg::new("fields")
                                .help("JSON object of fields to merge-write")
                                .required(true),
                        ),
                ),
        )
}
