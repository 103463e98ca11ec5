//! promptgen CLI - Submit tasks and follow generated prompts
//!
//! Talks to the prompt generator's HTTP API with a stored bearer token.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::Password;
use std::time::{Duration, Instant};

use api::{PromptClient, PromptResponse};
use config::Config;

#[derive(Parser)]
#[command(name = "promptgen")]
#[command(about = "promptgen CLI - Turn a task into a ready-to-use prompt", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the bearer token used for API calls
    Login {
        /// API key or identity token (will prompt if not provided)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Show or change configuration
    Config {
        /// Set the API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Submit a task for prompt generation
    Create {
        /// What the generated prompt should accomplish
        #[arg(short, long)]
        task: String,
        /// Input variable the prompt should use (repeatable)
        #[arg(short, long = "var")]
        vars: Vec<String>,
        /// Wait for the prompt and print it
        #[arg(short, long)]
        wait: bool,
    },

    /// List prompts
    List {
        /// Include every owner's prompts
        #[arg(short, long)]
        all: bool,
    },

    /// Show a prompt
    Get {
        /// Prompt ID
        id: String,
    },

    /// Delete a prompt
    Delete {
        /// Prompt ID
        id: String,
    },

    /// Follow a prompt until generation finishes
    Watch {
        /// Prompt ID
        id: String,
        /// Seconds between polls
        #[arg(short, long, default_value = "2")]
        interval: u64,
        /// Give up after this many seconds
        #[arg(long, default_value = "300")]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { token } => cmd_login(token).await,
        Commands::Config { base_url } => cmd_config(base_url).await,
        Commands::Create { task, vars, wait } => cmd_create(task, vars, wait).await,
        Commands::List { all } => cmd_list(all).await,
        Commands::Get { id } => cmd_get(id).await,
        Commands::Delete { id } => cmd_delete(id).await,
        Commands::Watch {
            id,
            interval,
            timeout,
        } => {
            let client = client()?;
            watch(&client, &id, interval, timeout).await.map(|_| ())
        }
    }
}

fn client() -> Result<PromptClient> {
    let config = Config::load()?;
    let token = config.require_token()?;
    Ok(PromptClient::new(&config.base_url, token))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(token: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let token = match token {
        Some(t) => t,
        None => Password::new()
            .with_prompt("Token")
            .interact()
            .context("Failed to read token")?,
    };

    let client = PromptClient::new(&config.base_url, &token);
    print!("Testing credentials... ");

    match client.list_prompts(false).await {
        Ok(_) => println!("{}", "OK".green()),
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not authenticate against {}: {}", config.base_url, e);
        }
    }

    config.set_token(token);
    config.save()?;

    println!("{} Token saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

async fn cmd_config(base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = base_url {
        config.set_base_url(&url);
        config.save()?;
        println!("{} Base URL set to {}", "✓".green(), config.base_url);
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  Token: {}",
        if config.token.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );

    let reachable = PromptClient::new(&config.base_url, config.token.as_deref().unwrap_or(""))
        .health()
        .await
        .unwrap_or(false);
    println!(
        "  API: {}",
        if reachable {
            "Reachable".green()
        } else {
            "Unreachable".red()
        }
    );

    Ok(())
}

async fn cmd_create(task: String, vars: Vec<String>, wait: bool) -> Result<()> {
    let client = client()?;
    let created = client.create_prompt(&task, &vars).await?;

    println!(
        "{} Generation started for {}",
        "✓".green(),
        created.prompt_id.cyan()
    );
    println!("  {}", created.execution_id.dimmed());

    if wait {
        let prompt = watch(&client, &created.prompt_id, 2, 300).await?;
        if let Some(text) = prompt.prompt {
            println!("\n{}", text);
        }
    }

    Ok(())
}

async fn cmd_list(all: bool) -> Result<()> {
    let prompts = client()?.list_prompts(all).await?;

    if prompts.is_empty() {
        println!("No prompts found.");
        println!("\n{}", "Create one with:".dimmed());
        println!("  promptgen create --task \"<what the prompt should do>\"");
        return Ok(());
    }

    println!("{}", "Prompts:".bold());
    for prompt in prompts {
        let owner = if all {
            format!(" ({})", prompt.owner).dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} [{}] {}{}",
            prompt.id.dimmed(),
            status_badge(&prompt.status),
            truncate_string(&prompt.task, 60),
            owner
        );
    }

    Ok(())
}

async fn cmd_get(id: String) -> Result<()> {
    let prompt = client()?.get_prompt(&id).await?;

    eprintln!("{} {}", "Prompt".dimmed(), prompt.id.cyan());
    eprintln!("  Status: {}", status_badge(&prompt.status));
    eprintln!("  Task: {}", prompt.task);
    if !prompt.variables.is_empty() {
        eprintln!("  Variables: {}", prompt.variables.join(", "));
    }
    if let Some(created_at) = &prompt.created_at {
        eprintln!("  Created: {}", created_at.dimmed());
    }

    // Generated text goes to stdout so it can be piped
    if let Some(text) = &prompt.prompt {
        eprintln!("{}", "---".dimmed());
        println!("{}", text);
    }

    Ok(())
}

async fn cmd_delete(id: String) -> Result<()> {
    if client()?.delete_prompt(&id).await? {
        println!("{} Prompt '{}' deleted", "✓".green(), id);
        Ok(())
    } else {
        bail!("Prompt '{}' not found", id);
    }
}

/// Poll until the prompt is GENERATED or ERROR, printing each status change
async fn watch(
    client: &PromptClient,
    id: &str,
    interval: u64,
    timeout: u64,
) -> Result<PromptResponse> {
    let started = Instant::now();
    let deadline = Duration::from_secs(timeout);
    let mut last_status: Option<String> = None;

    loop {
        let prompt = client.get_prompt(id).await?;

        if last_status.as_deref() != Some(prompt.status.as_str()) {
            println!("  {} {}", "→".dimmed(), status_badge(&prompt.status));
            last_status = Some(prompt.status.clone());
        }

        if prompt.is_finished() {
            if prompt.status == "ERROR" {
                bail!("Generation failed for {}", id);
            }
            return Ok(prompt);
        }

        if started.elapsed() >= deadline {
            bail!("Gave up waiting for {} after {}s", id, timeout);
        }

        tokio::time::sleep(Duration::from_secs(interval.max(1))).await;
    }
}

fn status_badge(status: &str) -> ColoredString {
    match status {
        "GENERATED" => status.green(),
        "GENERATING" => status.yellow(),
        "ERROR" => status.red(),
        _ => status.normal(),
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}
