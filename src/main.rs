use clap::{Parser, Subcommand};
use std::process::ExitCode;
use twig::areas::repository::Repository;

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A tiny local version-control system",
    long_about = "twig records snapshots of a working directory as commits, \
    with branches, a staging area and three-way merges. \
    It keeps everything in a .twig directory next to the tracked files.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "The repository root (defaults to the current directory)"
    )]
    path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .twig directory, the root commit and the master branch."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, help = "The file to stage")]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staging area as a new commit on the current branch."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file or stage its removal",
        long_about = "This command unstages a pending addition. If the file is tracked by the \
        current commit, it is staged for removal and deleted from the working tree."
    )]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with a matching message")]
    Find {
        #[arg(index = 1, help = "Text the commit message must contain")]
        message: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "Use `checkout -- <file>` to restore a file from HEAD, \
        `checkout <commit> -- <file>` to restore it from a commit, \
        and `checkout <branch>` to switch branches."
    )]
    Checkout {
        #[arg(help = "The branch to switch to, or the commit to restore from")]
        target: Option<String>,
        #[arg(last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1, help = "The name of the new branch")]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1, help = "The branch to delete")]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1, help = "The commit id or a unique prefix of it")]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir()?.to_string_lossy().to_string(),
    };
    let repository = Repository::new(&path, Box::new(std::io::stdout()))?;

    if !matches!(cli.command, Commands::Init) {
        repository.ensure_initialized()?;
    }

    match cli.command {
        Commands::Init => repository.init(),
        Commands::Add { file } => repository.add(&file),
        Commands::Commit { message } => repository.commit(&message),
        Commands::Rm { file } => repository.rm(&file),
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(&message),
        Commands::Status => repository.status(),
        Commands::Checkout { target, file } => match (target, file) {
            (target, Some(file)) => repository.checkout_file(target.as_deref(), &file),
            (Some(branch), None) => repository.checkout_branch(&branch),
            (None, None) => Err(anyhow::anyhow!("Incorrect operands.")),
        },
        Commands::Branch { name } => repository.branch(&name),
        Commands::RmBranch { name } => repository.rm_branch(&name),
        Commands::Reset { commit } => repository.reset(&commit),
        Commands::Merge { branch } => repository.merge(&branch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["twig", "checkout", "feature"], Some("feature"), None)]
    #[case(&["twig", "checkout", "--", "a.txt"], None, Some("a.txt"))]
    #[case(&["twig", "checkout", "1a2b3c", "--", "a.txt"], Some("1a2b3c"), Some("a.txt"))]
    fn checkout_operands_are_split_on_the_separator(
        #[case] args: &[&str],
        #[case] expected_target: Option<&str>,
        #[case] expected_file: Option<&str>,
    ) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();

        match cli.command {
            Commands::Checkout { target, file } => {
                assert_eq!(target.as_deref(), expected_target);
                assert_eq!(file.as_deref(), expected_file);
            }
            _ => panic!("expected a checkout command"),
        }
    }
}
