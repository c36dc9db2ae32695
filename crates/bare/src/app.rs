use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("bare")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn one bare clone into many independently usable worktrees")
        .long_about(
            "bare clones repositories as a shared bare object store plus a canonical \
            __main__ worktree, then stamps out additional worktrees per branch. New \
            worktrees get configured files propagated from __main__ and a fresh \
            dependency install, so each is immediately usable.",
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("clone")
                .about("Bare-clone a remote and create the __main__ worktree")
                .arg(
                    Arg::new("url")
                        .help("Remote URL (SSH or HTTPS)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("name")
                        .help("Target directory name under the workspace root")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Create a worktree (updates and installs __main__ first)")
                .arg(
                    Arg::new("repo")
                        .help("Repository root path")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("name")
                        .help("Worktree (and branch) name")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("branch")
                        .long("branch")
                        .short('b')
                        .help("Check out this existing branch instead of branching from upstream main"),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a worktree and best-effort delete its branch")
                .arg(
                    Arg::new("repo")
                        .help("Repository root path")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("name")
                        .help("Worktree name")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List the repository's worktrees")
                .arg(
                    Arg::new("repo")
                        .help("Repository root path")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("branches")
                .about("List local and remote branches")
                .arg(
                    Arg::new("repo")
                        .help("Repository root path")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Update __main__ from upstream and install its dependencies")
                .arg(
                    Arg::new("repo")
                        .help("Repository root path")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or set a repository's worktree propagation config")
                .arg(
                    Arg::new("repo")
                        .help("Repository root path")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("symlink")
                        .long("symlink")
                        .help("Entry to symlink into new worktrees (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("copy")
                        .long("copy")
                        .help("Entry to copy into new worktrees (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("upstream")
                        .long("upstream")
                        .help("Upstream remote for this repository"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add_with_branch() {
        let matches = build_cli()
            .try_get_matches_from(["bare", "add", "/repos/widgets", "feat-a", "-b", "release"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "add");
        assert_eq!(sub.get_one::<String>("branch").unwrap(), "release");
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(build_cli().try_get_matches_from(["bare"]).is_err());
    }

    #[test]
    fn test_cli_config_collects_repeated_patterns() {
        let matches = build_cli()
            .try_get_matches_from([
                "bare", "config", "/repos/widgets", "--symlink", ".env", "--symlink",
                ".env.local", "--copy", ".env.example",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let symlinks: Vec<&String> = sub.get_many::<String>("symlink").unwrap().collect();
        assert_eq!(symlinks, vec![".env", ".env.local"]);
    }
}
