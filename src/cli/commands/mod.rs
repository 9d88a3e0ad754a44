pub mod validation;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};
use tracing::Level;

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";
pub const ARG_DB_USERNAME: &str = "db-username";
pub const ARG_DB_PASSWORD: &str = "db-password";
pub const ARG_VERBOSITY: &str = "verbosity";

/// Accepts a level name (`warn`, `DEBUG`, ...) or its `-v` count, 0 (error) to 4 (trace).
fn verbosity_from_env(value: &str) -> Result<u8, String> {
    if let Ok(count @ 0..=4) = value.parse::<u8>() {
        return Ok(count);
    }

    let level = value
        .parse::<Level>()
        .map_err(|_| format!("unknown log level '{value}'"))?;

    Ok(match level {
        Level::ERROR => 0,
        Level::WARN => 1,
        Level::INFO => 2,
        Level::DEBUG => 3,
        _ => 4,
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("unisignup")
        .about("University signup validation service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("UNISIGNUP_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("Account store connection string, example: postgres://host:5432/unisignup")
                .env("UNISIGNUP_DSN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_USERNAME)
                .long(ARG_DB_USERNAME)
                .help("Database username, overrides the one in the DSN")
                .env("UNISIGNUP_DB_USERNAME"),
        )
        .arg(
            Arg::new(ARG_DB_PASSWORD)
                .long(ARG_DB_PASSWORD)
                .help("Database password, overrides the one in the DSN")
                .env("UNISIGNUP_DB_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Log more: -v warnings, -vv requests, -vvv validation details")
                .env("UNISIGNUP_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(verbosity_from_env),
        );

    validation::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DSN: &str = "postgres://localhost:5432/unisignup";

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "unisignup");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("University signup validation service".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_port_and_dsn() {
        temp_env::with_vars_unset(["UNISIGNUP_PORT", "UNISIGNUP_DSN"], || {
            let matches = new().get_matches_from(vec!["unisignup", "--port", "9090", "--dsn", DSN]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(9090));
            assert_eq!(
                matches.get_one::<String>(ARG_DSN).cloned(),
                Some(DSN.to_string())
            );
            assert!(matches.get_one::<String>(ARG_DB_PASSWORD).is_none());
        });
    }

    #[test]
    fn test_missing_dsn_is_an_error() {
        temp_env::with_vars_unset(["UNISIGNUP_DSN"], || {
            let result = new().try_get_matches_from(vec!["unisignup"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_validation_defaults() {
        temp_env::with_vars_unset(
            [
                "UNISIGNUP_DIRECTORY_URL",
                "UNISIGNUP_DIRECTORY_DOMAINS",
                "UNISIGNUP_DIRECTORY_TIMEOUT_SECONDS",
                "UNISIGNUP_STORE_TIMEOUT_SECONDS",
                "UNISIGNUP_START_YEAR_PAST",
                "UNISIGNUP_START_YEAR_FUTURE",
            ],
            || {
                let matches = new().get_matches_from(vec!["unisignup", "--dsn", DSN]);

                assert_eq!(
                    matches
                        .get_one::<String>(validation::ARG_DIRECTORY_URL)
                        .cloned(),
                    Some("http://universities.hipolabs.com/search".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<u64>(validation::ARG_DIRECTORY_TIMEOUT)
                        .copied(),
                    Some(5)
                );
                assert_eq!(
                    matches
                        .get_one::<u16>(validation::ARG_START_YEAR_FUTURE)
                        .copied(),
                    Some(10)
                );
            },
        );
    }

    #[test]
    fn test_start_year_future_is_capped() {
        let result = new().try_get_matches_from(vec![
            "unisignup",
            "--dsn",
            DSN,
            "--start-year-future",
            "11",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("UNISIGNUP_PORT", Some("443")),
                ("UNISIGNUP_DSN", Some(DSN)),
                ("UNISIGNUP_DB_USERNAME", Some("signup")),
                ("UNISIGNUP_DB_PASSWORD", Some("secret")),
                ("UNISIGNUP_DIRECTORY_DOMAINS", Some("uni.edu,college.edu")),
                ("UNISIGNUP_START_YEAR_PAST", Some("4")),
                ("UNISIGNUP_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["unisignup"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_DSN).cloned(),
                    Some(DSN.to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_DB_USERNAME).cloned(),
                    Some("signup".to_string())
                );
                assert_eq!(
                    matches
                        .get_many::<String>(validation::ARG_DIRECTORY_DOMAINS)
                        .map(|values| values.cloned().collect::<Vec<_>>()),
                    Some(vec!["uni.edu".to_string(), "college.edu".to_string()])
                );
                assert_eq!(
                    matches
                        .get_one::<u16>(validation::ARG_START_YEAR_PAST)
                        .copied(),
                    Some(4)
                );
                assert_eq!(
                    matches.get_one::<u8>(ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("UNISIGNUP_LOG_LEVEL", Some(level)),
                    ("UNISIGNUP_DSN", Some(DSN)),
                ],
                || {
                    let matches = new().get_matches_from(vec!["unisignup"]);
                    assert_eq!(
                        matches.get_one::<u8>(ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_verbosity_from_env() {
        assert_eq!(verbosity_from_env("WARN"), Ok(1));
        assert_eq!(verbosity_from_env("3"), Ok(3));
        assert!(verbosity_from_env("loud").is_err());
        assert!(verbosity_from_env("9").is_err());
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("UNISIGNUP_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "unisignup".to_string(),
                    "--dsn".to_string(),
                    DSN.to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
