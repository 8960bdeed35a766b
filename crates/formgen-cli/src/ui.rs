//! formgen CLI UI primitives.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Color palette
pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const VIOLET: Color = Color::Color256(135);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}";          // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}";  // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}";    // ◉
    pub const TRIANGLE: &str = "\u{25B8}";         // ▸
    pub const PROGRESS_FILLED: &str = "\u{25B0}";  // ▰
    pub const PROGRESS_EMPTY: &str = "\u{25B1}";   // ▱
    pub const DOT: &str = "\u{00B7}";              // ·
    pub const ARROW: &str = "\u{2500}\u{25B8}";    // ─▸
}

/// Print a success message
pub fn success(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        msg
    );
}

/// Print an error message
pub fn error(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA),
        style(msg).fg(colors::MAGENTA)
    );
}

/// Print an info message
pub fn info(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        msg
    );
}

/// Print a dim/secondary message
pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("\u{25CE}\u{25C9}\u{25CE}\u{25C9}") // ◎◉◎◉
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(150));
    pb
}

/// Print a box header
pub fn box_header(title: &str) {
    let width = 55;
    let title_padded = format!(" {} ", title);
    let title_len = title_padded.chars().count();
    let dashes = width - title_len.min(width - 4) - 4;

    println!(
        "  {}{}{}{}",
        style("\u{256D}\u{2500}").fg(colors::CYAN), // ╭─
        style(title_padded).fg(colors::CYAN).bold(),
        style("\u{2500}".repeat(dashes)).fg(colors::CYAN),
        style("\u{256E}").fg(colors::CYAN) // ╮
    );
}

/// Print a box line
pub fn box_line(content: &str) {
    let width: usize = 53;
    let content_len = content.chars().count();
    let padding = width.saturating_sub(content_len);
    println!(
        "  {} {}{}{}",
        style("\u{2502}").fg(colors::CYAN), // │
        content,
        " ".repeat(padding),
        style("\u{2502}").fg(colors::CYAN)
    );
}

/// Print a box footer
pub fn box_footer() {
    let width = 55;
    println!(
        "  {}{}{}",
        style("\u{2570}").fg(colors::CYAN), // ╰
        style("\u{2500}".repeat(width - 2)).fg(colors::CYAN),
        style("\u{256F}").fg(colors::CYAN) // ╯
    );
}

/// Print one generated form: its identifier, leaf control count and a bar
/// relative to the largest form.
pub fn form_line(ident: &str, controls: usize, largest: usize) {
    println!(
        "  {}   {:28} {}   {}",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        style(ident).bold(),
        controls_label(controls),
        style(bar(controls, largest)).fg(colors::VIOLET)
    );
}

fn controls_label(controls: usize) -> String {
    let unit = if controls == 1 { "control" } else { "controls" };
    format!("{:>3} {}", controls, unit)
}

fn bar(value: usize, largest: usize) -> String {
    let filled = ((value * 8) / largest.max(1)).min(8);
    format!(
        "{}{}",
        symbols::PROGRESS_FILLED.repeat(filled),
        symbols::PROGRESS_EMPTY.repeat(8 - filled)
    )
}

/// Print a generated file path
pub fn file_line(path: &str) {
    println!(
        "  {} {}",
        style(symbols::ARROW).fg(colors::DIM),
        style(path).fg(colors::CYAN)
    );
}

/// Print timing information
pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        label,
        duration_ms
    );
}

/// Print "Nope" error header (for check failures)
pub fn nope_header() {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA).bold(),
        style("Nope.").fg(colors::MAGENTA).bold()
    );
    println!();
}

/// Print "Looking good" success for check
pub fn looking_good() {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        style("Looking good.").bold()
    );
}
