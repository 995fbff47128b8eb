use std::process::ExitCode;

use clap::Parser;
use console::Style;
use futures::FutureExt;
use indicatif::ProgressBar;
use todo_search_lib::{
    finder,
    report::{self, Palette},
    search_files, FailurePolicy, FileFailure, Marker, Message, SearchReport, SearchRequest,
};

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// List the TODOs in files matching a glob pattern
    #[command(alias = "t")]
    Todo {
        /// Glob pattern of files to search, eg "src/**/*.rs"
        pattern: String,
    },
    /// List the FIXMEs in files matching a glob pattern
    #[command(alias = "f")]
    Fixme {
        /// Glob pattern of files to search, eg "src/**/*.rs"
        pattern: String,
    },
}

impl Command {
    fn into_marker_and_pattern(self) -> (Marker, String) {
        match self {
            Command::Todo { pattern } => (Marker::Todo, pattern),
            Command::Fixme { pattern } => (Marker::Fixme, pattern),
        }
    }
}

#[derive(clap::Parser, Debug)]
#[command(
    version,
    about,
    help_template(
        "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
    )
)]
struct Cli {
    #[clap(short, long, global = true)]
    /// Glob of files to skip, relative to the current directory,
    /// may be supplied multiple times.
    exclude: Vec<String>,

    #[clap(long, global = true)]
    /// Report unreadable files and keep searching the rest instead of
    /// failing the whole search.
    keep_going: bool,

    #[clap(long, global = true)]
    /// Print the results as JSON instead of a colored list.
    json: bool,

    #[clap(subcommand)]
    command: Command,
}

struct Printer {
    red: Style,
    yellow: Style,
    dim: Style,
    searching_progress: ProgressBar,
    files_to_search: usize,
    files_searched: usize,
}

impl Default for Printer {
    fn default() -> Self {
        let spinner_style = indicatif::ProgressStyle::with_template("{spinner} {wide_msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
        let searching_progress = ProgressBar::new_spinner();
        searching_progress.set_style(spinner_style);

        Self {
            red: Style::new().red(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
            searching_progress,
            files_to_search: 0,
            files_searched: 0,
        }
    }
}

impl Printer {
    fn print(&mut self, msg: Message) {
        use Message::*;

        match msg {
            FindingFiles { pattern } => {
                self.searching_progress
                    .enable_steady_tick(std::time::Duration::from_millis(1000 / 12));
                self.searching_progress
                    .set_message(format!("Finding files matching '{pattern}'"));
            }
            FoundFiles { count } => {
                self.files_to_search = count;
                self.files_searched = 0;
                self.searching_progress
                    .set_message(format!("Searching {count} files"));
            }

            SearchedFile { path, matches } => {
                log::trace!("{path:?} had {matches} matches");
                self.files_searched += 1;
                self.searching_progress.set_message(format!(
                    "Searched {}/{} files",
                    self.files_searched, self.files_to_search
                ));
            }
            FoundMatches { files, total } => {
                self.searching_progress.finish_and_clear();
                eprintln!(
                    "{}",
                    self.dim.apply_to(format!(
                        "Found {total} match{} in {files} file{}",
                        if total == 1 { "" } else { "es" },
                        if files == 1 { "" } else { "s" },
                    ))
                );
            }
        }
    }

    fn print_error(&self, err: &impl std::fmt::Display) {
        self.searching_progress.finish_and_clear();
        eprintln!("{}", self.red.apply_to(err.to_string()));
    }

    fn print_failures(&self, failures: &[FileFailure]) {
        eprintln!(
            "{}",
            self.yellow.apply_to(format!(
                "Could not search {} file{}:",
                failures.len(),
                if failures.len() == 1 { "" } else { "s" }
            ))
        );
        for failure in failures {
            eprintln!("  {}", self.red.apply_to(&failure.error));
        }
    }

    async fn message_loop<T>(
        &mut self,
        handle: tokio::task::JoinHandle<T>,
    ) -> Result<T, tokio::task::JoinError> {
        let recv = todo_search_lib::Message::receiver();
        let mut handle = handle.fuse();
        let outcome = loop {
            let mut get_msg = std::pin::pin!(recv.recv().fuse());
            futures::select! {
                msg = get_msg => if let Ok(msg) = msg {
                    self.print(msg);
                },
                outcome = handle => break outcome,
            }
        };
        while let Ok(msg) = recv.try_recv() {
            self.print(msg);
        }
        self.searching_progress.finish_and_clear();
        outcome
    }
}

/// Search and render, returning the report alongside the text for stdout.
async fn run(
    request: SearchRequest,
    json: bool,
) -> Result<(SearchReport, String), todo_search_lib::Error> {
    let cwd = finder::current_dir()?;
    let search_report = search_files(&request, &cwd).await?;

    let output = if json {
        report::render_json(&search_report.results)? + "\n"
    } else {
        report::render_text(&search_report.results, &request.keyword, &Palette::default())
    };
    Ok((search_report, output))
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::builder().init();

    let Cli {
        exclude,
        keep_going,
        json,
        command,
    } = Cli::parse();
    let (marker, pattern) = command.into_marker_and_pattern();
    let policy = if keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::FailFast
    };
    let request = SearchRequest::for_marker(marker, pattern)
        .with_excludes(exclude)
        .with_policy(policy);
    log::debug!("{request:#?}");

    let mut printer = Printer::default();
    let handle = tokio::task::spawn(run(request, json));

    // While the search is running, print its progress to the terminal
    match printer.message_loop(handle).await {
        Ok(Ok((search_report, output))) => {
            print!("{output}");
            if search_report.failures.is_empty() {
                ExitCode::SUCCESS
            } else {
                printer.print_failures(&search_report.failures);
                ExitCode::FAILURE
            }
        }
        Ok(Err(err)) => {
            printer.print_error(&err);
            ExitCode::FAILURE
        }
        Err(err) => {
            printer.print_error(&err);
            ExitCode::FAILURE
        }
    }
}
