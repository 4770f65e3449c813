//! `profiles` command: list the impersonation catalog

use crate::commands::write_output;
use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_ERROR;
use webfetch_camouflage_web::impersonate::alias_names;
use webfetch_camouflage_web::{BrowserProfile, REALWORLD};

/// Render the catalog as plain text or JSON
pub fn render_profiles(json: bool) -> CliResult<String> {
    if json {
        let aliases: serde_json::Map<String, serde_json::Value> = alias_names()
            .into_iter()
            .map(|(alias, target)| (alias.to_string(), target.into()))
            .collect();
        let catalog = serde_json::json!({
            "profiles": BrowserProfile::all(),
            "aliases": aliases,
            "random": REALWORLD,
        });
        return serde_json::to_string_pretty(&catalog).map_err(|e| CliError {
            message: format!("Failed to serialize profiles: {e}"),
            exit_code: EXIT_ERROR,
            source: Some(e.into()),
        });
    }

    let mut out = String::from("Profiles:\n");
    for profile in BrowserProfile::all() {
        out.push_str(&format!(
            "  {:<20} {:<16} {}\n",
            profile.name,
            profile.family.to_string(),
            profile.version
        ));
    }
    out.push_str("\nAliases:\n");
    for (alias, target) in alias_names() {
        out.push_str(&format!("  {alias:<20} -> {target}\n"));
    }
    out.push_str(&format!(
        "\n  {REALWORLD:<20} random profile weighted by real-world browser usage\n"
    ));
    Ok(out)
}

/// Handle the profiles command
pub fn handle_command(json: bool) -> CliResult<()> {
    write_output(std::io::stdout().lock(), &render_profiles(json)?)
}
