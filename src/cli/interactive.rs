//! Line-oriented generate/refine/rate loop.
//!
//! The shell first asks for the four form fields and generates a result.
//! After that, every plain line is a refinement instruction and lines
//! starting with `:` are commands (see [`ShellCommand`]).

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::content::{GenerationRequest, TaskType};
use crate::error::{SessionError, ValidationError};
use crate::feedback::FeedbackLog;
use crate::session::AgentSession;

const HELP: &str = "\
Type a change request to refine the result (e.g. \"make it shorter and funnier\").
Commands:
  :rate N [comment]  rate the current result from 1 to 5
  :show              print the current result again
  :reset             discard the result and start over
  :help              show this help
  :quit              exit";

/// A parsed line entered after a result exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Refine(String),
    Rate { rating: i64, comment: Option<String> },
    Show,
    Reset,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Errors are user-facing messages.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Ok(ShellCommand::Refine(line.to_string()));
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name.to_lowercase().as_str() {
            "rate" => {
                let (rating, comment) = match rest.split_once(char::is_whitespace) {
                    Some((rating, comment)) => (rating, Some(comment.trim().to_string())),
                    None => (rest, None),
                };
                let rating = rating
                    .parse::<i64>()
                    .map_err(|_| "Usage: :rate N [comment], with N from 1 to 5".to_string())?;
                Ok(ShellCommand::Rate { rating, comment })
            }
            "show" => Ok(ShellCommand::Show),
            "reset" | "clear" => Ok(ShellCommand::Reset),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            other => Err(format!("Unknown command ':{}'. Type :help for help.", other)),
        }
    }
}

/// Interactive front end driving one session.
pub struct InteractiveShell<R, W> {
    session: AgentSession,
    feedback: FeedbackLog,
    input: R,
    output: W,
}

impl<R, W> InteractiveShell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(session: AgentSession, feedback: FeedbackLog, input: R, output: W) -> Self {
        Self {
            session,
            feedback,
            input,
            output,
        }
    }

    /// Consume the shell, returning the session for inspection.
    pub fn into_session(self) -> AgentSession {
        self.session
    }

    /// Run until `:quit` or end of input.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Marketing content generator. Press Ctrl-D to exit.")?;

        let mut retry: Option<GenerationRequest> = None;

        'form: loop {
            let request = match retry.take() {
                Some(request) => request,
                None => match self.read_request().await? {
                    Some(request) => request,
                    None => return Ok(()),
                },
            };

            writeln!(self.output, "Generating...")?;
            let outcome = self
                .session
                .generate(request.clone())
                .await
                .map(|result| result.content.clone());
            match outcome {
                Ok(content) => self.print_result(&content)?,
                Err(err) => {
                    tracing::debug!(error = %err, "Generation rejected");
                    writeln!(self.output, "{}", err.user_message())?;
                    if matches!(err, SessionError::Oracle(_)) {
                        let Some(answer) = self.prompt("Retry with the same fields? [Y/n] ").await?
                        else {
                            return Ok(());
                        };
                        if wants_retry(&answer) {
                            retry = Some(request);
                        }
                    }
                    continue 'form;
                }
            }
            writeln!(self.output, "{}", HELP)?;

            loop {
                let Some(line) = self.prompt("refine> ").await? else {
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match ShellCommand::parse(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        writeln!(self.output, "{}", message)?;
                        continue;
                    }
                };

                match command {
                    ShellCommand::Refine(instruction) => {
                        writeln!(self.output, "Refining...")?;
                        match self.session.refine(&instruction).await {
                            Ok(result) => {
                                let content = result.content.clone();
                                self.print_result(&content)?;
                            }
                            Err(err) => writeln!(self.output, "{}", err.user_message())?,
                        }
                    }
                    ShellCommand::Rate { rating, comment } => {
                        self.rate(rating, comment.as_deref()).await?;
                    }
                    ShellCommand::Show => {
                        if let Some(result) = self.session.current() {
                            let content = result.content.clone();
                            self.print_result(&content)?;
                        }
                    }
                    ShellCommand::Reset => {
                        self.session.reset();
                        writeln!(self.output, "Session cleared.")?;
                        continue 'form;
                    }
                    ShellCommand::Help => writeln!(self.output, "{}", HELP)?,
                    ShellCommand::Quit => return Ok(()),
                }
            }
        }
    }

    async fn rate(&mut self, rating: i64, comment: Option<&str>) -> anyhow::Result<()> {
        let record = match self.session.feedback(rating, comment) {
            Ok(record) => record,
            Err(err) => {
                writeln!(self.output, "{}", err.user_message())?;
                return Ok(());
            }
        };

        match self.feedback.record(&record).await {
            Ok(()) => writeln!(self.output, "{}", record.summary())?,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to store feedback");
                writeln!(self.output, "Could not save feedback: {}", err)?;
            }
        }
        Ok(())
    }

    /// Ask for the four form fields. `None` means input ended.
    async fn read_request(&mut self) -> anyhow::Result<Option<GenerationRequest>> {
        loop {
            let Some(subject) = self.prompt("Product / service: ").await? else {
                return Ok(None);
            };
            let Some(audience) = self.prompt("Target audience: ").await? else {
                return Ok(None);
            };
            let Some(objective) = self.prompt("Marketing objective: ").await? else {
                return Ok(None);
            };
            let Some(task) = self
                .prompt("Task [campaign-idea | ad-copy | product-description] (campaign-idea): ")
                .await?
            else {
                return Ok(None);
            };

            let task_type = if task.trim().is_empty() {
                TaskType::default()
            } else {
                match task.parse::<TaskType>() {
                    Ok(task_type) => task_type,
                    Err(err) => {
                        writeln!(self.output, "{}", err)?;
                        continue;
                    }
                }
            };

            let request = GenerationRequest::new(subject, audience, objective, task_type);
            if let Err(err) = request.validate() {
                writeln!(self.output, "{}", field_message(&err))?;
                continue;
            }
            return Ok(Some(request));
        }
    }

    async fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn print_result(&mut self, content: &str) -> anyhow::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", content)?;
        writeln!(self.output)?;
        Ok(())
    }
}

/// Blank or any form of "yes" keeps the last request.
fn wants_retry(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.is_empty() || answer == "y" || answer == "yes"
}

fn field_message(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyField { field } => {
            format!("Please fill in all fields: '{}' is empty.", field)
        }
        other => other.to_string(),
    }
}
