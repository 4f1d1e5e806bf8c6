use crate::core::error::AitermError;
use crate::core::executor::CommandOutput;
use console::{measure_text_width, style};
use is_terminal::IsTerminal;
use termimad::MadSkin;

const RULE: &str = "-----------------------------------------------------";

fn box_width() -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), 100).max(50)
}

/// Splits `text` into lines no wider than `max` columns, preferring spaces.
fn wrap_line(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measure_text_width(&candidate) <= max {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        // A single word wider than the box is cut at character boundaries.
        let mut chunk = String::new();
        for ch in word.chars() {
            if measure_text_width(&chunk) + 1 > max {
                lines.push(std::mem::take(&mut chunk));
            }
            chunk.push(ch);
        }
        current = chunk;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn print_info(message: &str) {
    println!("{}", style(message).blue());
}

pub fn print_error(message: &str) {
    eprintln!("{}", style(format!("Error: {}", message)).red());
}

/// Prints an error and, when the server sent one, its raw diagnostic text.
pub fn display_error(err: &AitermError) {
    print_error(&err.to_string());
    match err.diagnostic() {
        Some(raw) if !raw.trim().is_empty() => {
            eprintln!("{}", style(format!("Response content: {}", raw.trim())).red().dim())
        }
        Some(_) => eprintln!("{}", style("Response content: <empty>").red().dim()),
        None => {}
    }
    if let AitermError::Clipboard(_) = err {
        print_info("You may need to install a copy/paste mechanism for your system, e.g.,");
        print_info("sudo apt-get install xclip  OR  sudo apt-get install xsel");
    }
}

pub fn display_welcome(username: &str, os_info: &str) {
    println!(
        "{}",
        style(format!("Welcome, {}, to your AI Terminal Assistant!", username))
            .bold()
            .blue()
    );
    println!("{}", style(format!("Running on {}", os_info)).dim());
    print_info(RULE);
}

pub fn display_credential_warning(err: &AitermError, env_name: &str) {
    print_error(&err.to_string());
    print_info("AI Chat will fail until the API key is set.");
    print_info(&format!("Example: export {}='your_actual_key_here'", env_name));
}

pub fn display_menu() {
    println!();
    println!("{}", style("Please choose an option:").bold().blue());
    print_info("1. Use normal terminal (Exit)");
    print_info("2. Chat with AI (OpenRouter)");
    print_info(RULE);
}

pub fn display_chat_banner(model: &str) {
    print_info(&format!("Entering AI Chat Mode with model: {}", model));
    print_info("Type 'exit' or 'quit' to return to the main menu.");
}

/// Prints an assistant reply, rendering markdown when stdout is a terminal.
pub fn display_ai_message(message: &str) {
    print!("{} ", style("AI:").bold().green());
    if std::io::stdout().is_terminal() {
        println!();
        MadSkin::default().print_text(message);
    } else {
        println!("{}", message);
    }
}

/// Frames a suggested command so it stands out from the reply.
pub fn display_command(command: &str) {
    let width = box_width();
    let inner = width.saturating_sub(6);

    let header = "┌─ suggested command ".to_string() + &"─".repeat(width.saturating_sub(22)) + "┐";
    let footer = "└".to_string() + &"─".repeat(width.saturating_sub(2)) + "┘";

    println!();
    println!("{}", style(&header).dim().green());
    let mut first = true;
    for source_line in command.lines() {
        for line in wrap_line(source_line, inner) {
            let prompt = if first { "$ " } else { "  " };
            first = false;
            let padding = width.saturating_sub(measure_text_width(&line) + prompt.len() + 3);
            println!(
                "│ {}{}{}│",
                style(prompt).bold().green(),
                style(&line).bold().white(),
                " ".repeat(padding)
            );
        }
    }
    println!("{}", style(&footer).dim().green());
}

pub fn display_running(command: &str) {
    println!("{} {}", style("Running:").bold().green(), style(command).yellow());
}

/// Shows captured stdout and stderr (each only when non-empty) and the exit code.
/// The framed stderr section, written as one piece to a single stream.
fn stderr_block(stderr: &str) -> Option<String> {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        return None;
    }
    Some(format!(
        "\n{}\n{}\n{}",
        style("--- Command STDERR ---").bold().red(),
        style(stderr).red(),
        style("--- End STDERR ---").bold().red()
    ))
}

pub fn display_command_output(output: &CommandOutput) {
    let stdout = output.stdout.trim();
    if !stdout.is_empty() {
        println!("\n{}", style("--- Command STDOUT ---").bold().blue());
        println!("{}", stdout);
        println!("{}", style("--- End STDOUT ---").bold().blue());
    }

    if let Some(block) = stderr_block(&output.stderr) {
        eprintln!("{}", block);
    }

    match output.exit_code {
        Some(0) => println!("{}", style("Command finished with exit code: 0").green()),
        Some(code) => println!(
            "{}",
            style(format!("Command finished with exit code: {}", code)).red()
        ),
        None => println!("{}", style("Command was terminated by a signal").red()),
    }
}
