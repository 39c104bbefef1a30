use anyhow::Result;
use calview_core::config::CalviewConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = CalviewConfig::config_path()?;

    if !config_path.exists() {
        CalviewConfig::create_default_config(&config_path)?;
        println!("{}", format!("Created {}", config_path.display()).green());
    }

    let config = CalviewConfig::load_from(&config_path)?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    match config.events_path() {
        Some(path) => println!("  Events:  {}", path.display()),
        None => println!("  Events:  {}", "(sample events)".dimmed()),
    }

    println!();
    println!("{}", "Display".bold());
    println!("  Offset:      {}", config.offset_label());
    println!("  Week start:  {:?}", config.week_start.weekday());
    println!("  Duration:    {} min", config.default_duration_minutes);

    Ok(())
}
