use reqwest::Url;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};

pub(crate) const WELCOME_TEXT: &str = "Hi! Tap the button below to open the game:";

pub(crate) fn game_keyboard(webapp_url: &Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::web_app(
        "Open the game",
        WebAppInfo {
            url: webapp_url.clone(),
        },
    )]])
}

pub(crate) fn echo_text(text: &str) -> String {
    format!("You said: {text}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn keyboard_opens_web_app() {
        let url = Url::parse("https://example.com/game").unwrap();
        let kb = game_keyboard(&url);

        assert_eq!(kb.inline_keyboard.len(), 1);
        let button = &kb.inline_keyboard[0][0];
        match &button.kind {
            InlineKeyboardButtonKind::WebApp(info) => assert_eq!(info.url, url),
            other => panic!("unexpected button kind: {other:?}"),
        }
    }

    #[test]
    fn echo_repeats_text() {
        assert_eq!(echo_text("hello"), "You said: hello");
    }
}
