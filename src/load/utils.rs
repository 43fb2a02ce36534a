/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Drop a UTF-8 byte-order mark, which spreadsheet exports like to prepend.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_quotes_and_space() {
        assert_eq!(clean_str("  \" Subdiv 1 \" "), "Subdiv 1");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str(" Budget "), "Budget");
    }

    #[test]
    fn strips_bom_only_at_start() {
        assert_eq!(strip_bom("\u{feff}Perspective"), "Perspective");
        assert_eq!(strip_bom("Perspective"), "Perspective");
    }
}
