//! Utility functions for DOM processing

/// Cap text length to keep diagnostic dumps readable
pub fn cap_text_length(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Round a layout dimension to whole pixels
pub fn round_px(value: f64) -> i32 {
    value.round() as i32
}
