use avatar_service::{logging, AvatarJobService, Config};
use anyhow::Context;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    logging::setup_logging(&config.logging)?;
    log::info!("Starting avatar-service demo...");

    let service = AvatarJobService::from_config(&config)
        .context("Failed to build avatar service")?;

    let requests = [
        ("user123", "A friendly robot avatar with blue eyes and a smile"),
        ("user456", "Violent avatar with weapons and blood"),
    ];

    for (user_id, prompt) in requests {
        let job = service.submit(user_id, prompt).await?;
        println!("Job {} for {}: {}", job.id, job.user_id, job.status);
        if let Some(ref url) = job.output_ref {
            println!("  Avatar URL: {}", url);
        }
        if let Some(ref message) = job.error_message {
            println!("  Message:    {}", message);
        }
    }

    if let Some(first) = service.jobs().first() {
        let retrieved = service.get_status(&first.id)?;
        println!("Retrieved job {}: {} (created {})", retrieved.id, retrieved.status, retrieved.created_at);
    }

    println!("{}", serde_json::to_string_pretty(&service.jobs())?);
    log::info!("Processed {} jobs", service.job_count());

    Ok(())
}

fn load_config() -> anyhow::Result<Config> {
    let path = std::env::var("AVATAR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(common::DEFAULT_CONFIG_PATH));

    let mut config = if path.exists() {
        Config::from_file(&path)?
    } else {
        Config::default()
    };
    config.apply_env();
    Ok(config)
}
