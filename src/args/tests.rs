use clap::Parser;

use super::cli::NodeArgs;
use super::parsers::parse_bool_env;

#[test]
fn bare_invocation_parses_with_defaults() -> Result<(), String> {
    let args = NodeArgs::try_parse_from(["spaceport"])
        .map_err(|err| format!("Failed to parse: {}", err))?;
    if args.planet_id.is_some() {
        return Err("planet id must default to unset".to_owned());
    }
    if args.fleet_api_base_url != "http://localhost:4006/api/fleet" {
        return Err(format!("Unexpected fleet URL {}", args.fleet_api_base_url));
    }
    if args.planet_service_template != "http://{planet}-service" {
        return Err(format!("Unexpected template {}", args.planet_service_template));
    }
    if args.verbose {
        return Err("verbose must default to off".to_owned());
    }
    Ok(())
}

#[test]
fn long_flags_map_to_their_fields() -> Result<(), String> {
    let args = NodeArgs::try_parse_from([
        "spaceport",
        "--planet-id",
        "vastaya",
        "--chaos-experiments-enabled",
        "true",
        "--chaos-failure-rate",
        "0.5",
        "--port",
        "9000",
        "--verbose",
    ])
    .map_err(|err| format!("Failed to parse: {}", err))?;

    if args.planet_id.as_deref() != Some("vastaya") {
        return Err("planet id flag ignored".to_owned());
    }
    if args.chaos_experiments_enabled.as_deref() != Some("true") {
        return Err("chaos toggle flag ignored".to_owned());
    }
    if args.chaos_failure_rate.as_deref() != Some("0.5") {
        return Err("failure rate flag ignored".to_owned());
    }
    if args.port.as_deref() != Some("9000") {
        return Err("port flag ignored".to_owned());
    }
    if !args.verbose {
        return Err("verbose flag ignored".to_owned());
    }
    Ok(())
}

#[test]
fn bool_parser_accepts_the_fleet_spellings() -> Result<(), String> {
    for raw in ["1", "true", "YES", "y", "On"] {
        if parse_bool_env(raw) != Ok(true) {
            return Err(format!("'{}' must parse to true", raw));
        }
    }
    for raw in ["0", "false", "NO", "n", "Off"] {
        if parse_bool_env(raw) != Ok(false) {
            return Err(format!("'{}' must parse to false", raw));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err("Garbage booleans must be rejected".to_owned());
    }
    Ok(())
}
