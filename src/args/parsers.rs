/// Parses the boolean spellings accepted across the fleet deployment
/// manifests.
pub(crate) fn parse_bool_env(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(format!(
            "Invalid boolean '{}'. Expected true/false, yes/no, on/off, or 1/0.",
            s
        )),
    }
}
