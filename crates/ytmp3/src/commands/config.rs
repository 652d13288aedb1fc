use anyhow::Result;
use std::path::Path;
use ytmp3_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytmp3 configuration\n");
    print!("{}", toml::to_string_pretty(&config)?);

    println!("\nResolved binaries:");
    match config.yt_dlp_path() {
        Ok(p) => println!("  yt-dlp = {}", p.display()),
        Err(_) => println!("  yt-dlp = (not found)"),
    }
    match config.ffmpeg_path() {
        Ok(p) => println!("  ffmpeg = {}", p.display()),
        Err(_) => println!("  ffmpeg = (not found)"),
    }

    println!("\nConfig file locations (in priority order):");
    if let Some(p) = config_path {
        println!("  1. {} (specified)", p.display());
    }
    if let Some(config_dir) = dirs::config_dir() {
        println!("  2. {}/ytmp3/config.toml", config_dir.display());
    }
    println!("  3. Environment variables (YTMP3_*)");

    Ok(())
}
