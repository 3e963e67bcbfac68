//! GrabQA command-line companion.
//!
//! Operates on the same storage area the embedded widget writes to:
//! renders the captured annotations as Markdown or AI prompts, and pushes
//! them to GitHub as issues.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use grabqa::application::export;
use grabqa::config::Brand;
use grabqa::domain::{Annotation, GitHubConfig};
use grabqa::infra::clipboard::{ClipboardSink, SystemClipboard};
use grabqa::infra::github::{GitHubClient, create_issues};
use grabqa::infra::storage::{FileStorage, load_annotations};

#[derive(Parser, Debug)]
#[command(name = "grabqa")]
#[command(about = "QA annotation exporter", long_about = None)]
struct Args {
    /// Storage directory (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Brand namespace the widget was embedded with
    #[arg(long, default_value = "qaflow")]
    brand: String,

    /// Storage key override for the annotation collection
    #[arg(long)]
    storage_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the captured annotations
    Export {
        #[arg(long, value_enum, default_value = "markdown")]
        format: ExportFormat,

        /// Copy the result to the clipboard instead of printing it
        #[arg(long)]
        clipboard: bool,

        /// Write the result to a file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create one GitHub issue per unresolved annotation
    Issues {
        /// Repository owner
        #[arg(long)]
        owner: String,

        /// Repository name
        #[arg(long)]
        repo: String,

        /// API token (falls back to $GITHUB_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Also create issues for resolved annotations
        #[arg(long)]
        include_resolved: bool,
    },

    /// Check that a token authenticates
    Verify {
        #[arg(long)]
        token: Option<String>,
    },

    /// List repositories the token can reach
    Repos {
        #[arg(long)]
        token: Option<String>,
    },

    /// List project boards for a login
    Projects {
        #[arg(long)]
        owner: String,

        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ExportFormat {
    Markdown,
    Ai,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let storage = FileStorage::new(
        args.data_dir
            .clone()
            .unwrap_or_else(FileStorage::default_dir),
    );
    let brand = Brand::new(args.brand.clone());
    let key = args
        .storage_key
        .clone()
        .unwrap_or_else(|| brand.annotations_key());

    match args.command {
        Commands::Export {
            format,
            clipboard,
            output,
        } => {
            let annotations = load_annotations(&storage, &key);
            let rendered = match format {
                ExportFormat::Markdown => export::export_all_to_markdown(&annotations),
                ExportFormat::Ai => annotations
                    .iter()
                    .map(export::ai_prompt)
                    .collect::<Vec<_>>()
                    .join("\n\n---\n\n"),
            };

            if clipboard {
                SystemClipboard.set_text(&rendered)?;
                eprintln!("Copied {} annotation(s) to the clipboard", annotations.len());
            } else if let Some(path) = output {
                std::fs::write(&path, rendered).context("write export file")?;
                eprintln!("Wrote {}", path.display());
            } else {
                println!("{rendered}");
            }
        }

        Commands::Issues {
            owner,
            repo,
            token,
            include_resolved,
        } => {
            let token = resolve_token(token)?;
            let annotations: Vec<Annotation> = load_annotations(&storage, &key)
                .into_iter()
                .filter(|a| include_resolved || !a.resolved)
                .collect();
            if annotations.is_empty() {
                eprintln!("Nothing to export");
                return Ok(());
            }

            let config = GitHubConfig {
                token,
                owner,
                repo,
                project_id: None,
            };
            let client = GitHubClient::new();
            let batch = grabqa::block_on(create_issues(&client, &config, &annotations));

            for issue in &batch.created {
                println!("created #{}: {}", issue.number, issue.html_url);
            }
            for failure in &batch.failed {
                eprintln!("failed \"{}\": {}", failure.annotation.title, failure.error);
            }
            if !batch.failed.is_empty() {
                bail!(
                    "{} of {} issue(s) failed",
                    batch.failed.len(),
                    annotations.len()
                );
            }
        }

        Commands::Verify { token } => {
            let token = resolve_token(token)?;
            let client = GitHubClient::new();
            let verification = grabqa::block_on(client.verify_token(&token));

            if verification.valid {
                println!(
                    "token ok: {} (scopes: {})",
                    verification.username.unwrap_or_default(),
                    verification.scopes.join(", ")
                );
            } else {
                bail!(
                    "token rejected: {}",
                    verification.error.unwrap_or_else(|| "unknown".into())
                );
            }
        }

        Commands::Repos { token } => {
            let token = resolve_token(token)?;
            let client = GitHubClient::new();
            for repo in grabqa::block_on(client.list_user_repos(&token)) {
                println!("{}", repo.full_name);
            }
        }

        Commands::Projects { owner, token } => {
            let token = resolve_token(token)?;
            let client = GitHubClient::new();
            for project in grabqa::block_on(client.list_projects(&token, &owner)) {
                println!("{}\t{}\t{}", project.id, project.title, project.url);
            }
        }
    }

    Ok(())
}

fn resolve_token(flag: Option<String>) -> Result<String> {
    if let Some(token) = flag {
        return Ok(token);
    }
    match std::env::var("GITHUB_TOKEN") {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => bail!("no token given; pass --token or set GITHUB_TOKEN"),
    }
}
