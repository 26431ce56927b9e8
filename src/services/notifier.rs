use crate::error::NotifyError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardLayout {
    pub inline_keyboard: Vec<Vec<KeyboardButton>>,
}

/// Layout attached to every admin notification.
pub fn admin_keyboard() -> KeyboardLayout {
    let button = |text: &str, callback_data: &str| KeyboardButton {
        text: text.to_string(),
        callback_data: callback_data.to_string(),
    };

    KeyboardLayout {
        inline_keyboard: vec![
            vec![button("📊 Statistics", "admin_stats"), button("👥 Users", "admin_users")],
            vec![button("⚙️ Admin panel", "admin_panel")],
        ],
    }
}

/// Chat delivery side of the bot.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: ParseMode,
        keyboard: &KeyboardLayout,
    ) -> Result<(), NotifyError>;
}

pub fn subscription_confirmed_message(
    order_id: &str,
    tariff_name: &str,
    activated_at: NaiveDateTime,
) -> String {
    format!(
        "🎉 New subscription! 🏆\n\
         <blockquote>\
         🧾 Order: {}\n\
         💳 Tariff: {}\n\
         📅 Activated: {}\n\
         🚀 Subscription is active!</blockquote>",
        escape_html(order_id),
        escape_html(tariff_name),
        activated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: ParseMode,
    reply_markup: &'a KeyboardLayout,
}

/// Bot API `sendMessage` over plain HTTPS.
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    bot_token: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, api_url: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            bot_token: bot_token.into(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: ParseMode,
        keyboard: &KeyboardLayout,
    ) -> Result<(), NotifyError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.bot_token
        );
        let body = SendMessage {
            chat_id,
            text,
            parse_mode,
            reply_markup: keyboard,
        };

        let response: Value = self.client.post(&url).json(&body).send().await?.json().await?;

        if response.get("ok").and_then(Value::as_bool) == Some(true) {
            debug!("Notification delivered to chat {}", chat_id);
            Ok(())
        } else {
            let description = response
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            Err(NotifyError::Rejected(description))
        }
    }
}
