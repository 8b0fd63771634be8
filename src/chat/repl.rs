use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::time::Duration;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::assistant::{
    ChatSession, HttpBackend, InferenceBackend, ProbeTask, SessionEvent, quick_questions,
    welcome_message,
};
use crate::ui::{Spinner, Style};

const HELP_MESSAGE: &str = "Ask a question, /help for commands, Ctrl+C to quit";

/// What the loop does after a slash command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
    Ask(&'static str),
}

/// Interactive front end for a [`ChatSession`].
///
/// Reads questions and slash commands from the terminal, probes the endpoint
/// in the background and prints connection changes between prompts.
pub struct ChatRepl<B = HttpBackend> {
    session: ChatSession<B>,
    provider_name: String,
    probe_interval: Option<Duration>,
}

impl<B: InferenceBackend> ChatRepl<B> {
    pub fn new(
        session: ChatSession<B>,
        provider_name: impl Into<String>,
        probe_interval: Option<Duration>,
    ) -> Self {
        Self {
            session,
            provider_name: provider_name.into(),
            probe_interval,
        }
    }

    pub async fn run(&self) -> Result<()> {
        ui::print_header(&self.provider_name);

        let mut events = self.session.subscribe();
        let probe = match self.probe_interval {
            Some(interval) => Some(ProbeTask::spawn(self.session.clone(), interval)),
            None => {
                self.session.probe_connection().await;
                None
            }
        };

        let history = self.session.transcript();
        if history.is_empty() {
            let language = self.session.language();
            println!("{}", welcome_message(language));
            println!();
            ui::print_quick_questions(quick_questions(language));
        } else {
            ui::print_transcript(&history);
        }

        let render_config = render_config();
        let result = loop {
            print_connection_notices(&mut events);

            let input = tokio::task::spawn_blocking(move || {
                Text::new("")
                    .with_render_config(render_config)
                    .with_autocomplete(SlashCommandCompleter)
                    .with_help_message(HELP_MESSAGE)
                    .prompt()
            })
            .await?;

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => match self.handle_command(cmd) {
                        Flow::Continue => {}
                        Flow::Quit => break Ok(()),
                        Flow::Ask(question) => {
                            println!("{} {question}", Style::secondary("❯"));
                            self.ask_and_print(question).await;
                        }
                    },
                    Input::Text(text) => self.ask_and_print(&text).await,
                },
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!(); // Clear line before goodbye message
                    break Ok(());
                }
                Err(e) => break Err(e.into()),
            }
        };

        if let Some(probe) = probe {
            probe.stop().await;
        }
        if result.is_ok() {
            ui::print_goodbye();
        }
        result
    }

    /// Applies a slash command.
    fn handle_command(&self, cmd: SlashCommand) -> Flow {
        match cmd {
            SlashCommand::Clear => {
                self.session.clear();
                ui::print_success("Conversation cleared");
            }
            SlashCommand::Config => ui::print_config(
                &self.provider_name,
                self.session.config(),
                &self.session.status(),
                self.probe_interval,
            ),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::History => ui::print_transcript(&self.session.transcript()),
            SlashCommand::Lang => {
                let language = self.session.toggle_language();
                ui::print_success(&format!("Language set to {}", language.name()));
            }
            SlashCommand::Model(None) => {
                let model = self.session.cycle_model();
                ui::print_success(&format!("Model set to {model}"));
            }
            SlashCommand::Model(Some(id)) => {
                if self.session.set_model(&id) {
                    ui::print_success(&format!("Model set to {}", id.trim()));
                } else {
                    ui::print_error("Usage: /model <name>");
                }
            }
            SlashCommand::Quit => return Flow::Quit,
            SlashCommand::Status => ui::print_status(&self.session.status()),
            SlashCommand::Suggest(None) => {
                ui::print_quick_questions(quick_questions(self.session.language()));
            }
            SlashCommand::Suggest(Some(n)) => {
                let questions = quick_questions(self.session.language());
                match n.checked_sub(1).and_then(|i| questions.get(i)) {
                    Some(question) => return Flow::Ask(*question),
                    None => ui::print_error(&format!("Usage: /suggest <1-{}>", questions.len())),
                }
            }
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
            }
        }
        Flow::Continue
    }

    async fn ask_and_print(&self, text: &str) {
        let Some(submission) = self.session.submit(text) else {
            return;
        };

        let spinner = Spinner::new("Thinking...");
        let reply = submission.await;
        spinner.stop();

        ui::print_message(&reply);
    }
}

fn render_config() -> RenderConfig<'static> {
    let prompt_style = Styled::new("❯")
        .with_fg(Color::LightBlue)
        .with_attr(Attributes::BOLD);
    let mut render_config = RenderConfig::default()
        .with_prompt_prefix(prompt_style)
        .with_answered_prompt_prefix(prompt_style);

    render_config.option = StyleSheet::new().with_fg(Color::Grey);
    render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));
    render_config
}

fn print_connection_notices(events: &mut Receiver<SessionEvent>) {
    loop {
        match events.try_recv() {
            Ok(SessionEvent::ConnectionChanged { previous, current }) => {
                ui::print_connection_notice(previous, current);
            }
            Ok(_) => {}
            Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "missed session events"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}
