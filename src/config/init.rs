use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{get_config_path, Config, SearchConfig};
use crate::scoring::{PricingConfig, DEFAULT_ALPHA, DEFAULT_DELTA_BAR};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep prompting until the input parses and passes `check`.
fn prompt_parsed<T, F>(message: &str, default: &str, check: F) -> Result<T>
where
    T: FromStr,
    F: Fn(&T) -> Result<(), String>,
{
    loop {
        let input = prompt_with_default(message, default)?;
        match input.parse::<T>() {
            Ok(value) => match check(&value) {
                Ok(()) => return Ok(value),
                Err(msg) => println!("  Invalid: {}. Try again.", msg),
            },
            Err(_) => println!("  Invalid: '{}' is not a number. Try again.", input),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("park2go Configuration Wizard");
    println!("============================");
    println!();

    // 1. Pricing
    let configure_pricing = prompt_yes_no("Configure pricing? (n accepts defaults)", true)?;
    let pricing = if configure_pricing {
        println!();
        println!("Alpha controls how much the price moves. 0.5 is balanced, 0.8 aggressive, 0.2 conservative.");
        let alpha: f64 = prompt_parsed("Alpha", &DEFAULT_ALPHA.to_string(), |v: &f64| {
            if v.is_finite() {
                Ok(())
            } else {
                Err("must be a finite number".to_string())
            }
        })?;

        println!();
        println!("Delta-bar is the 'normal' composite score for your city or zone, the baseline each slot is compared against.");
        let delta_bar: f64 =
            prompt_parsed("Delta-bar", &DEFAULT_DELTA_BAR.to_string(), |v: &f64| {
                if (0.0..=1.0).contains(v) {
                    Ok(())
                } else {
                    Err("must be between 0 and 1".to_string())
                }
            })?;

        PricingConfig {
            alpha: Some(alpha),
            delta_bar: Some(delta_bar),
            weights: None,
        }
    } else {
        PricingConfig::default()
    };

    // 2. Search
    println!();
    let defaults = SearchConfig::default();
    let radius_km: f64 = prompt_parsed(
        "Search radius (km)",
        &defaults.radius_km.to_string(),
        |v: &f64| {
            if v.is_finite() && *v > 0.0 {
                Ok(())
            } else {
                Err("must be positive".to_string())
            }
        },
    )?;
    let limit: usize = prompt_parsed(
        "Number of recommendations",
        &defaults.limit.to_string(),
        |v: &usize| {
            if *v > 0 {
                Ok(())
            } else {
                Err("must be at least 1".to_string())
            }
        },
    )?;

    // 3. Slot store
    println!();
    let default_slots = crate::slots::get_slots_path();
    let slots_str = prompt_with_default(
        "Slot time-series file",
        &default_slots.display().to_string(),
    )?;
    let slots_path = PathBuf::from(slots_str);

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        pricing: Some(pricing),
        search: Some(SearchConfig {
            radius_km,
            limit,
            ..defaults
        }),
        slots_path: Some(slots_path),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(&config_path)
        .with_context(|| format!("Failed to open atomic write file at {}", config_path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    file.commit().context("Failed to save config")?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `park2go recommend --location gulshan` to get started.");

    Ok(())
}
