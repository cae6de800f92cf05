use std::time::Duration;

use ratatui_image::picker::{Picker, ProtocolType, cap_parser::QueryStdioOptions};

fn term_is_xterm_kitty() -> bool {
    std::env::var("TERM")
        .ok()
        .is_some_and(|term| term.trim().starts_with("xterm-kitty"))
}

fn in_kitty_env() -> bool {
    std::env::var("KITTY_WINDOW_ID")
        .ok()
        .is_some_and(|s| !s.trim().is_empty())
}

fn in_iterm_env() -> bool {
    std::env::var("ITERM_SESSION_ID")
        .ok()
        .is_some_and(|s| !s.trim().is_empty())
        || std::env::var("TERM_PROGRAM")
            .ok()
            .is_some_and(|term| term.contains("iTerm"))
}

/// Whether the terminal is likely to answer a graphics capability query.
pub(crate) fn should_query_stdio() -> bool {
    if std::env::var_os("PHOTODB_HALFBLOCKS").is_some() {
        return false;
    }
    in_kitty_env() || term_is_xterm_kitty() || in_iterm_env()
}

/// Must be called after the terminal entered raw mode.
pub(crate) fn detect() -> Picker {
    let mut picker = if should_query_stdio() {
        let mut options = QueryStdioOptions::default();
        options.timeout = Duration::from_millis(1500);
        options.text_sizing_protocol = false;
        Picker::from_query_stdio_with_options(options).unwrap_or_else(|_| Picker::halfblocks())
    } else {
        Picker::halfblocks()
    };
    picker.set_background_color(image::Rgba([255u8, 255u8, 255u8, 255u8]));
    tracing::debug!(protocol = protocol_label(&picker), "image protocol selected");
    picker
}

pub(crate) fn protocol_label(picker: &Picker) -> &'static str {
    match picker.protocol_type() {
        ProtocolType::Halfblocks => "halfblocks",
        ProtocolType::Sixel => "sixel",
        ProtocolType::Kitty => "kitty",
        ProtocolType::Iterm2 => "iterm2",
    }
}
