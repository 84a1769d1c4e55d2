//! Commands understood by the bot

/// A parsed command.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// `/start` optionally carries the deep-link payload, which is a referral
    /// code when the player followed a friend's invite link.
    Start { code: Option<String> },
}

pub(crate) fn parse_command(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let arg = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    // In groups commands may be addressed as /start@bot_name.
    let cmd = cmd.split('@').next().unwrap_or(cmd);

    match cmd {
        "/start" => Some(Command::Start { code: arg }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_without_payload() {
        assert_eq!(parse_command("/start"), Some(Command::Start { code: None }));
        assert_eq!(
            parse_command("/start   "),
            Some(Command::Start { code: None })
        );
    }

    #[test]
    fn start_with_referral_code() {
        assert_eq!(
            parse_command("/start AB12CD34"),
            Some(Command::Start {
                code: Some("AB12CD34".to_string())
            })
        );
    }

    #[test]
    fn start_addressed_to_bot() {
        assert_eq!(
            parse_command("/start@tap_game_bot"),
            Some(Command::Start { code: None })
        );
    }

    #[test]
    fn plain_text_and_unknown_commands() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/help"), None);
    }
}
