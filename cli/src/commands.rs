//! Command line surface and verb dispatch.

use std::io::{self, Write};

use clap::{ArgAction, Parser, Subcommand};
use tasker_backend::{Listing, TaskRepository};
use tracing::debug;

use crate::display;

pub const ADD_HINT: &str = "Nothing to see here.\nRun `add 'task'` to add a task";
pub const DONE_HINT: &str = "Nothing to see here.\nRun `done 'task'` to complete a task";

/// A simple CLI program to manage your tasks
#[derive(Debug, Parser)]
#[command(name = "tasker", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a task to the list
    #[command(visible_alias = "a")]
    Add {
        /// Task text
        text: Option<String>,
    },

    /// List all tasks
    #[command(visible_alias = "l")]
    All,

    /// Complete a task on the list
    #[command(visible_alias = "d")]
    Done {
        /// Exact text of the task to complete
        text: String,
    },

    /// List completed tasks
    #[command(visible_alias = "f")]
    Finished,

    /// Delete a task on the list
    Rm {
        /// Exact text of the task to delete
        text: String,
    },
}

/// Runs one command. With no subcommand, shows the pending tasks.
pub async fn execute<W: Write>(
    command: Option<Command>,
    repo: &TaskRepository,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        None => show(repo.list_pending().await?, ADD_HINT, out)?,
        Some(Command::Add { text }) => {
            let task = repo.add(text.as_deref().unwrap_or_default()).await?;
            debug!(id = %task.id, "task added");
        }
        Some(Command::All) => show(repo.list_all().await?, ADD_HINT, out)?,
        Some(Command::Done { text }) => {
            let before = repo.complete(&text).await?;
            debug!(id = %before.id, was_completed = before.completed, "task completed");
        }
        Some(Command::Finished) => show(repo.list_finished().await?, DONE_HINT, out)?,
        Some(Command::Rm { text }) => repo.delete(&text).await?,
    }
    Ok(())
}

fn show<W: Write>(listing: Listing, hint: &str, out: &mut W) -> io::Result<()> {
    match listing {
        Listing::Tasks(tasks) => display::print_tasks(out, &tasks),
        Listing::Empty => writeln!(out, "{hint}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rstest::{fixture, rstest};
    use tasker_backend::{Error, MemoryStore};

    #[fixture]
    fn repo() -> TaskRepository {
        TaskRepository::new(Arc::new(MemoryStore::new()))
    }

    async fn run(repo: &TaskRepository, args: &[&str]) -> anyhow::Result<String> {
        colored::control::set_override(false);
        let cli = Cli::try_parse_from(std::iter::once("tasker").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        execute(cli.command, repo, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[rstest]
    #[case(&["add", "x"], "add")]
    #[case(&["a", "x"], "add")]
    #[case(&["all"], "all")]
    #[case(&["l"], "all")]
    #[case(&["done", "x"], "done")]
    #[case(&["d", "x"], "done")]
    #[case(&["finished"], "finished")]
    #[case(&["f"], "finished")]
    #[case(&["rm", "x"], "rm")]
    fn verbs_and_aliases_parse(#[case] args: &[&str], #[case] verb: &str) {
        let cli = Cli::try_parse_from(std::iter::once("tasker").chain(args.iter().copied())).unwrap();

        let parsed = match cli.command {
            Some(Command::Add { .. }) => "add",
            Some(Command::All) => "all",
            Some(Command::Done { .. }) => "done",
            Some(Command::Finished) => "finished",
            Some(Command::Rm { .. }) => "rm",
            None => "none",
        };
        assert_eq!(parsed, verb);
    }

    #[test]
    fn no_arguments_means_default_action() {
        let cli = Cli::try_parse_from(["tasker"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn verbose_flag_is_global_and_counted() {
        let cli = Cli::try_parse_from(["tasker", "all", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn done_and_rm_require_text() {
        assert!(Cli::try_parse_from(["tasker", "done"]).is_err());
        assert!(Cli::try_parse_from(["tasker", "rm"]).is_err());
    }

    #[rstest]
    #[case(&["add"])]
    #[case(&["add", ""])]
    #[tokio::test]
    async fn add_without_text_fails(repo: TaskRepository, #[case] args: &[&str]) {
        let err = run(&repo, args).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::EmptyTask)));
        assert_eq!(err.to_string(), "cannot add an empty task");
        assert_eq!(repo.list_all().await.unwrap(), Listing::Empty);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_lists_print_hints(repo: TaskRepository) {
        assert_eq!(run(&repo, &[]).await.unwrap(), format!("{ADD_HINT}\n"));
        assert_eq!(run(&repo, &["all"]).await.unwrap(), format!("{ADD_HINT}\n"));
        assert_eq!(run(&repo, &["finished"]).await.unwrap(), format!("{DONE_HINT}\n"));
    }

    #[rstest]
    #[tokio::test]
    async fn default_action_shows_only_pending(repo: TaskRepository) {
        run(&repo, &["add", "buy milk"]).await.unwrap();
        run(&repo, &["add", "walk dog"]).await.unwrap();
        run(&repo, &["done", "buy milk"]).await.unwrap();

        assert_eq!(run(&repo, &[]).await.unwrap(), "1: walk dog\n");
    }

    #[rstest]
    #[tokio::test]
    async fn done_on_unknown_text_is_an_error(repo: TaskRepository) {
        let err = run(&repo, &["done", "buy milk"]).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn rm_on_unknown_text_is_an_error(repo: TaskRepository) {
        let err = run(&repo, &["rm", "buy milk"]).await.unwrap_err();
        assert_eq!(err.to_string(), "no tasks were deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn add_complete_remove_round_trip(repo: TaskRepository) {
        run(&repo, &["add", "buy milk"]).await.unwrap();
        assert_eq!(run(&repo, &["all"]).await.unwrap(), "1: buy milk\n");
        let pending = repo.list_all().await.unwrap().into_tasks();
        assert_eq!(display::task_color(&pending[0]), colored::Color::Yellow);

        run(&repo, &["done", "buy milk"]).await.unwrap();
        assert_eq!(run(&repo, &["finished"]).await.unwrap(), "1: buy milk\n");
        assert_eq!(run(&repo, &["all"]).await.unwrap(), "1: buy milk\n");
        let all = repo.list_all().await.unwrap().into_tasks();
        assert_eq!(all.len(), 1);
        assert_eq!(display::task_color(&all[0]), colored::Color::Green);

        run(&repo, &["rm", "buy milk"]).await.unwrap();
        assert_eq!(run(&repo, &["all"]).await.unwrap(), format!("{ADD_HINT}\n"));
    }
}
