pub mod emoji;
pub mod matchers;

pub use emoji::Emoji;

const MARKDOWN_CHARACTERS: [char; 7] = ['\\', '*', '_', '~', '|', '`', '>'];

/// Escapes anything Discord would otherwise render as markdown.
pub fn escape_markdown(msg: &str) -> String {
    let mut escaped = String::with_capacity(msg.len());
    for c in msg.chars() {
        if MARKDOWN_CHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_gets_escaped() {
        assert_eq!(escape_markdown("Ferris"), "Ferris");
        assert_eq!(escape_markdown("**bold** _it_"), "\\*\\*bold\\*\\* \\_it\\_");
        assert_eq!(escape_markdown("a\\b|c"), "a\\\\b\\|c");
    }

    #[test]
    fn emojis_render_for_chat() {
        assert_eq!(Emoji::Yes.to_string(), "✅");
        assert_eq!(Emoji::Bug.for_chat(), "🐛");
    }
}
