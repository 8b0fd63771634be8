//! Chat mode UI components.

use chrono::Local;
use std::time::Duration;

use crate::assistant::{ChatMessage, ConnectionState, SessionConfig, SessionStatus};
use crate::ui::Style;

use super::command;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(provider_name: &str) {
    println!(
        "{} {} - Illunare Assistant ({})",
        Style::header("illunare-ai"),
        Style::version(format!("v{VERSION}")),
        Style::value(provider_name)
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_message(message: &ChatMessage) {
    println!(
        "{} {}",
        Style::role(message.role()),
        Style::secondary(
            message
                .created_at()
                .with_timezone(&Local)
                .format("%H:%M")
        )
    );
    println!("{}", message.text());
    println!();
}

pub fn print_transcript(messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!("{}", Style::hint("No messages yet."));
        println!();
        return;
    }
    for message in messages {
        print_message(message);
    }
}

pub fn print_config(
    provider_name: &str,
    config: &SessionConfig,
    status: &SessionStatus,
    probe_interval: Option<Duration>,
) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}   {}",
        Style::label("provider"),
        Style::value(provider_name)
    );
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::secondary(&config.endpoint.url)
    );
    println!(
        "  {}     {}",
        Style::label("flavor"),
        Style::value(config.endpoint.flavor.as_str())
    );
    println!(
        "  {}      {}",
        Style::label("model"),
        Style::value(&status.model)
    );
    println!(
        "  {}   {} {}",
        Style::label("language"),
        Style::code(status.language.code()),
        Style::secondary(status.language.name())
    );
    println!(
        "  {}    {}",
        Style::label("timeout"),
        Style::value(format!("{}s", config.timeout.as_secs()))
    );
    println!(
        "  {}      {}",
        Style::label("probe"),
        probe_interval.map_or_else(
            || Style::secondary("disabled"),
            |interval| Style::value(format!("every {}s", interval.as_secs()))
        )
    );
    println!(
        "  {}    {}",
        Style::label("history"),
        Style::secondary(format!(
            "{} (keeps {})",
            config.history_key, config.history_limit
        ))
    );
    println!();
}

pub fn print_status(status: &SessionStatus) {
    println!("{}", Style::header("Status"));
    println!(
        "  {}  {}",
        Style::label("connection"),
        Style::connection(status.connection)
    );
    println!(
        "  {}    {}",
        Style::label("language"),
        Style::code(status.language.code())
    );
    println!(
        "  {}       {}",
        Style::label("model"),
        Style::value(&status.model)
    );
    println!(
        "  {}    {}",
        Style::label("messages"),
        Style::value(status.transcript_len)
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    let width = command::commands()
        .iter()
        .map(|(cmd, _)| cmd.len())
        .max()
        .unwrap_or(0);
    for (cmd, description) in command::commands() {
        println!(
            "  {}{}  {}",
            Style::command(cmd),
            " ".repeat(width - cmd.len()),
            Style::secondary(description)
        );
    }
    println!();
}

/// Numbered quick questions, picked with `/suggest <n>`.
pub fn print_quick_questions(questions: &[&str]) {
    println!("{}", Style::header("Quick questions"));
    for (i, question) in questions.iter().enumerate() {
        println!("  {} {question}", Style::command(format!("{}.", i + 1)));
    }
    println!();
}

/// One-line notice for a connection change observed between prompts.
pub fn print_connection_notice(previous: ConnectionState, current: ConnectionState) {
    let note = match current {
        ConnectionState::Connected => "assistant is online",
        ConnectionState::Degraded => "assistant is unreachable, answering offline",
        ConnectionState::Connecting => "checking assistant endpoint",
        ConnectionState::Disconnected => "assistant is disconnected",
    };
    println!(
        "{} {} {} {}",
        Style::connection(previous),
        Style::secondary("->"),
        Style::connection(current),
        Style::hint(note)
    );
    println!();
}

pub fn print_success(message: &str) {
    println!("{} {message}", Style::success("✓"));
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
