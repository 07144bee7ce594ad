//! External tool checks.

use crate::download;

/// Check if the external tools songgrab shells out to are installed.
pub fn cmd_check_tools() -> anyhow::Result<()> {
    println!("Checking external tools...\n");

    if let Some(version) = download::get_ytdlp_version() {
        println!("✓ yt-dlp: {}", version);
    } else {
        println!("✗ yt-dlp: NOT FOUND");
        print_ytdlp_install_instructions();
    }

    Ok(())
}

/// Write a default config file if none exists yet.
pub fn cmd_init_config() -> anyhow::Result<()> {
    let path = crate::config::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    crate::config::save(&crate::config::Config::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// Print installation instructions for yt-dlp.
pub fn print_ytdlp_install_instructions() {
    eprintln!("yt-dlp is required to download audio.");
    eprintln!("Install it:");
    eprintln!("  Windows: winget install yt-dlp");
    eprintln!("  macOS:   brew install yt-dlp");
    eprintln!("  Linux:   pip install yt-dlp (or your package manager)");
    eprintln!("See: https://github.com/yt-dlp/yt-dlp");
}
