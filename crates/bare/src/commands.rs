use std::path::PathBuf;
use std::sync::Arc;

use clap::ArgMatches;
use tracing::{error, info, warn};

use bare_core::config::{BareConfig, Config, JsonConfigStore, WorktreeConfig, WorktreeConfigStore};
use bare_core::events;
use bare_core::git;
use bare_core::{Pipeline, TextSink};

use crate::table::TableFormatter;

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user
/// via stderr and a structured log event.
fn load_config_with_warning() -> BareConfig {
    match BareConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.bare/config.toml and ./.bare/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            BareConfig::default()
        }
    }
}

fn build_pipeline() -> Pipeline {
    let config = Config::new();
    let settings = load_config_with_warning();
    let store = JsonConfigStore::new(config.worktree_config_file());
    Pipeline::new(config, settings, Arc::new(store))
}

fn repo_path(matches: &ArgMatches) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let repo = matches
        .get_one::<String>("repo")
        .ok_or("Repository path is required")?;
    Ok(PathBuf::from(repo))
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("clone", sub_matches)) => handle_clone_command(sub_matches),
        Some(("add", sub_matches)) => handle_add_command(sub_matches),
        Some(("remove", sub_matches)) => handle_remove_command(sub_matches),
        Some(("list", sub_matches)) => handle_list_command(sub_matches),
        Some(("branches", sub_matches)) => handle_branches_command(sub_matches),
        Some(("sync", sub_matches)) => handle_sync_command(sub_matches),
        Some(("config", sub_matches)) => handle_config_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

fn handle_clone_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let url = matches.get_one::<String>("url").ok_or("URL is required")?;
    let name = matches
        .get_one::<String>("name")
        .ok_or("Target name is required")?;

    info!(event = "cli.clone_started", url = url, name = name);

    let pipeline = build_pipeline();
    match pipeline.clone_repository(url, name, Box::new(TextSink::stdout())) {
        Ok(repository) => {
            println!("Cloned {} ({})", repository.path.display(), repository.kind);
            info!(
                event = "cli.clone_completed",
                repository_id = repository.id,
                path = %repository.path.display()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to clone: {}", e);
            error!(event = "cli.clone_failed", error = %e);
            Err(e.into())
        }
    }
}

fn handle_add_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repo_path(matches)?;
    let name = matches
        .get_one::<String>("name")
        .ok_or("Worktree name is required")?;
    let branch = matches.get_one::<String>("branch").map(String::as_str);

    info!(
        event = "cli.add_started",
        name = name,
        branch = branch.unwrap_or("<new>"),
        repo = %repo.display()
    );

    let pipeline = build_pipeline();
    match pipeline.add_worktree(&repo, name, branch, Box::new(TextSink::stdout())) {
        Ok(path) => {
            println!("Worktree ready: {}", path.display());
            info!(event = "cli.add_completed", path = %path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to add worktree: {}", e);
            error!(event = "cli.add_failed", name = name, error = %e);
            Err(e.into())
        }
    }
}

fn handle_remove_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repo_path(matches)?;
    let name = matches
        .get_one::<String>("name")
        .ok_or("Worktree name is required")?;

    info!(event = "cli.remove_started", name = name, repo = %repo.display());

    let pipeline = build_pipeline();
    match pipeline.remove_worktree(&repo, name) {
        Ok(()) => {
            println!("Removed worktree '{}'", name);
            info!(event = "cli.remove_completed", name = name);
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to remove worktree: {}", e);
            error!(event = "cli.remove_failed", name = name, error = %e);
            Err(e.into())
        }
    }
}

fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repo_path(matches)?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.list_started", repo = %repo.display());

    let worktrees = git::list_worktrees(&repo)?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&worktrees)?);
    } else if worktrees.is_empty() {
        println!("No worktrees found.");
    } else {
        TableFormatter::new(&worktrees).print_table(&worktrees);
    }

    Ok(())
}

fn handle_branches_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repo_path(matches)?;

    let branches = git::list_branches(&repo)?;
    for branch in branches {
        println!("{}", branch);
    }
    Ok(())
}

fn handle_sync_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repo_path(matches)?;

    info!(event = "cli.sync_started", repo = %repo.display());

    let pipeline = build_pipeline();
    match pipeline.sync_main(&repo, Box::new(TextSink::stdout())) {
        Ok(()) => {
            info!(event = "cli.sync_completed", repo = %repo.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to sync __main__: {}", e);
            error!(event = "cli.sync_failed", error = %e);
            Err(e.into())
        }
    }
}

fn handle_config_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repo_path(matches)?;
    let config = Config::new();
    let store = JsonConfigStore::new(config.worktree_config_file());

    let symlink: Vec<String> = matches
        .get_many::<String>("symlink")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let copy: Vec<String> = matches
        .get_many::<String>("copy")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let upstream = matches.get_one::<String>("upstream").cloned();

    if symlink.is_empty() && copy.is_empty() && upstream.is_none() {
        // Show the stored config
        let current = store.get(&repo);
        println!("{}", serde_json::to_string_pretty(&current)?);
        return Ok(());
    }

    let updated = WorktreeConfig {
        symlink,
        copy,
        upstream_remote: upstream,
    };
    store.set(&repo, &updated)?;
    println!("{}", serde_json::to_string_pretty(&updated)?);
    info!(event = "cli.config_updated", repo = %repo.display());
    Ok(())
}
