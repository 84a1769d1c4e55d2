use teloxide::{prelude::*, types::User};

use crate::{
    ConfigParameters,
    commands::{Command, parse_command},
    ui,
};

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    match parse_command(text) {
        Some(Command::Start { code }) => {
            if let Some(from) = msg.from.as_ref() {
                register(&cfg, from, code.as_deref()).await;
            }
            bot.send_message(msg.chat.id, ui::WELCOME_TEXT)
                .reply_markup(ui::game_keyboard(&cfg.webapp_url))
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, ui::echo_text(text)).await?;
        }
    }

    Ok(())
}

/// Registration failures never block the greeting: the web app registers
/// the player again on its first request.
async fn register(cfg: &ConfigParameters, from: &User, code: Option<&str>) {
    let Some(api) = cfg.api.as_ref() else {
        return;
    };

    match api.register(from.id.0, from.username.as_deref(), code).await {
        Ok(user) if user.created => {
            tracing::info!(
                "registered telegram user {} (referred by {:?})",
                user.telegram_user_id,
                user.referred_by
            );
        }
        Ok(_) => {}
        Err(err) => tracing::warn!("failed to register telegram user {}: {err}", from.id),
    }
}
