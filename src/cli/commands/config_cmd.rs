//! Configuration commands.

use console::style;

use crate::config::{Config, Settings};

/// Print the resolved settings and the config file they came from.
pub fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none (defaults and environment)".to_string());

    println!("\n{}", style("Configuration").bold());
    println!("{}", "-".repeat(60));
    println!("{:<18} {}", "Config file:", source);
    println!("{:<18} {}", "API URL:", settings.api_url);
    println!("{:<18} {}s", "Timeout:", settings.request_timeout);
    println!("{:<18} {}", "User agent:", settings.user_agent);
    println!("{:<18} {}", "Download dir:", settings.download_dir.display());
    println!("{:<18} {}", "kDrive default:", settings.use_kdrive);

    let session = &settings.session;
    println!("\n{}", style("Session").bold());
    println!("{}", "-".repeat(60));
    let token = if session.is_authenticated() {
        style("set").green()
    } else {
        style("not set").yellow()
    };
    println!("{:<18} {}", "Token:", token);
    println!(
        "{:<18} {}",
        "Auth scheme:",
        session
            .auth_scheme
            .as_deref()
            .unwrap_or(crate::session::DEFAULT_AUTH_SCHEME)
    );
    println!("{:<18} {}", "Role:", session.role.as_deref().unwrap_or("-"));
    println!("{:<18} {}", "User id:", session.user_id.as_deref().unwrap_or("-"));

    Ok(())
}
