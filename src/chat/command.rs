use inquire::autocompletion::{Autocomplete, Replacement};

// Available slash commands: (command, description)
const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/clear", "Forget the conversation"),
    ("/config", "Show current configuration"),
    ("/help", "Show available commands"),
    ("/history", "Show the conversation so far"),
    ("/lang", "Switch between English and Portuguese"),
    ("/model", "Cycle models, or /model <name> to pick one"),
    ("/quit", "Exit chat mode"),
    ("/status", "Show connection, language and model"),
    ("/suggest", "List quick questions, or /suggest <n> to ask one"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// Slash command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Clear,
    Config,
    Help,
    History,
    Lang,
    /// `None` cycles through the configured models.
    Model(Option<String>),
    Quit,
    Status,
    /// `None` lists the quick questions; `Some(n)` asks the n-th (1-based).
    Suggest(Option<usize>),
    Unknown(String),
}

/// Input types
#[derive(Debug)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    let command = match parts.first().copied() {
        Some("clear") => SlashCommand::Clear,
        Some("config") => SlashCommand::Config,
        Some("help") => SlashCommand::Help,
        Some("history") => SlashCommand::History,
        Some("lang") => SlashCommand::Lang,
        Some("model") => SlashCommand::Model(parts.get(1).map(|m| (*m).to_string())),
        Some("quit" | "exit" | "q") => SlashCommand::Quit,
        Some("status") => SlashCommand::Status,
        Some("suggest") => match parts.get(1) {
            None => SlashCommand::Suggest(None),
            Some(n) => n.parse().map_or_else(
                |_| SlashCommand::Unknown(parts.join(" ")),
                |n| SlashCommand::Suggest(Some(n)),
            ),
        },
        _ => SlashCommand::Unknown(parts.join(" ")),
    };
    Input::Command(command)
}

/// Slash commands with their descriptions, for the help screen.
pub fn commands() -> &'static [(&'static str, &'static str)] {
    SLASH_COMMANDS
}
