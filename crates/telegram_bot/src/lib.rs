//! Telegram bot.
//!
//! The bot is a thin client: it greets players with a button opening the
//! game's web app and registers them through the HTTP server API. It never
//! accesses the database directly.

use reqwest::{Client, Url};
use teloxide::prelude::*;

mod api;
mod commands;
mod handlers;
mod ui;

#[derive(Clone)]
pub struct ConfigParameters {
    api: Option<api::ApiClient>,
    webapp_url: Url,
}

pub struct Bot {
    token: String,
    webapp_url: Url,
    server: Option<String>,
    client: Client,
}

impl Bot {
    pub fn new(token: &str, webapp_url: &str, server: Option<&str>) -> Result<Self, String> {
        if token.trim().is_empty() {
            return Err("telegram token must not be empty".to_string());
        }
        let webapp_url = Url::parse(webapp_url)
            .map_err(|err| format!("invalid web app url {webapp_url}: {err}"))?;
        // Telegram only opens web apps served over HTTPS.
        if webapp_url.scheme() != "https" {
            return Err(format!("web app url must use https: {webapp_url}"));
        }

        let client = Client::builder()
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;

        Ok(Self {
            token: token.to_string(),
            webapp_url,
            server: server.map(ToString::to_string),
            client,
        })
    }

    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        let parameters = ConfigParameters {
            api: self
                .server
                .clone()
                .map(|server| api::ApiClient::new(self.client.clone(), server)),
            webapp_url: self.webapp_url.clone(),
        };
        if parameters.api.is_none() {
            tracing::info!("No server configured, players are registered on first game load");
        }

        let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    webapp_url: String,
    server: Option<String>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    /// HTTPS address of the game opened by the welcome button.
    pub fn webapp_url(mut self, url: &str) -> BotBuilder {
        self.webapp_url = url.to_string();
        self
    }

    /// Base URL of the HTTP API used to register players.
    pub fn server(mut self, server: &str) -> BotBuilder {
        self.server = Some(server.to_string());
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        Bot::new(&self.token, &self.webapp_url, self.server.as_deref())
    }
}
