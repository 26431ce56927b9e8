use crate::app::config::Config;
use crate::error::{ConfigError, ProcessorError};
use crate::models::payment::{
    Customer, InitRequest, PaymentSession, ProcessorResponse, StateRequest,
};
use crate::models::settings::Credentials;
use crate::services::notifier::{admin_keyboard, subscription_confirmed_message, Notifier, ParseMode};
use crate::services::settings_store::SettingsStore;
use crate::services::signing::{self, TERMINAL_KEY_FIELD, TOKEN_FIELD};
use crate::utils::money::{format_minor_units, to_minor_units};
use parking_lot::RwLock;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const INIT_ENDPOINT: &str = "Init";
pub const GET_STATE_ENDPOINT: &str = "GetState";

/// Fixed redirect and callback targets sent with every `Init`.
#[derive(Debug, Clone)]
pub struct ReturnUrls {
    pub success_url: String,
    pub fail_url: String,
    pub notification_url: String,
}

pub struct TBankClient {
    client: Client,
    base_url: String,
    urls: ReturnUrls,
    settings: Arc<dyn SettingsStore>,
    // Read-mostly; re-initialization replaces the whole value.
    credentials: RwLock<Option<Credentials>>,
}

impl TBankClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        urls: ReturnUrls,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            urls,
            settings,
            credentials: RwLock::new(None),
        }
    }

    pub fn from_config(config: &Config, settings: Arc<dyn SettingsStore>) -> Result<Self, ConfigError> {
        let client = http_client(config.request_timeout_ms)?;
        let urls = ReturnUrls {
            success_url: config.success_url.clone(),
            fail_url: config.fail_url.clone(),
            notification_url: config.notification_url.clone(),
        };
        Ok(Self::new(client, config.processor_base_url()?, urls, settings))
    }

    pub fn is_initialized(&self) -> bool {
        self.credentials.read().is_some()
    }

    /// Loads credentials from the settings store, replacing any cached pair.
    pub async fn initialize(&self) -> bool {
        let settings = match self.settings.processor_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                error!("Error initializing TBank: {}", e);
                return false;
            }
        };

        match settings.as_ref().and_then(|s| s.credentials()) {
            Some(credentials) => {
                info!("TBank initialized with terminal_key: {}", credentials.terminal_key);
                *self.credentials.write() = Some(credentials);
                true
            }
            None => {
                error!("TBank settings are not configured");
                false
            }
        }
    }

    async fn credentials(&self) -> Option<Credentials> {
        let cached = self.credentials.read().clone();
        if cached.is_some() {
            return cached;
        }
        if !self.initialize().await {
            return None;
        }
        self.credentials.read().clone()
    }

    /// Signs `payload` and POSTs it to `{base_url}{endpoint}`.
    ///
    /// `Ok(None)` means credentials are unavailable and nothing was sent.
    /// Transport and parse failures come back as `Err`. A response with
    /// `Success: false` is logged but still returned.
    pub async fn signed_post(
        &self,
        endpoint: &str,
        mut payload: Map<String, Value>,
    ) -> Result<Option<ProcessorResponse>, ProcessorError> {
        let Some(credentials) = self.credentials().await else {
            return Ok(None);
        };

        payload.insert(
            TERMINAL_KEY_FIELD.to_string(),
            Value::String(credentials.terminal_key.clone()),
        );
        let token = signing::token(&payload, &credentials.password);
        payload.insert(TOKEN_FIELD.to_string(), Value::String(token));

        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let raw: Value = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        let response: ProcessorResponse = serde_json::from_value(raw.clone())?;
        if !response.success {
            error!(
                "TBank API error at {} (code {}, {}): {}",
                endpoint,
                response.error_code.as_deref().unwrap_or("-"),
                response.message.as_deref().unwrap_or("no message"),
                raw
            );
        }

        Ok(Some(response))
    }

    /// Opens a hosted payment page. `None` on any failure.
    pub async fn create_payment(
        &self,
        amount: Decimal,
        description: &str,
        customer: &Customer,
    ) -> Option<PaymentSession> {
        match self.try_create_payment(amount, description, customer).await {
            Ok(session) => session,
            Err(e) => {
                error!("Error creating TBank payment: {}", e);
                None
            }
        }
    }

    async fn try_create_payment(
        &self,
        amount: Decimal,
        description: &str,
        customer: &Customer,
    ) -> Result<Option<PaymentSession>, ProcessorError> {
        let amount = to_minor_units(amount).ok_or(ProcessorError::InvalidAmount(amount))?;

        let request = InitRequest {
            order_id: Uuid::new_v4().to_string(),
            amount,
            description: description.to_string(),
            customer_key: customer.user_id.map(|id| id.to_string()),
            data: customer.metadata(),
            success_url: self.urls.success_url.clone(),
            fail_url: self.urls.fail_url.clone(),
            notification_url: self.urls.notification_url.clone(),
        };
        info!(
            "Creating TBank payment {} for {}",
            request.order_id,
            format_minor_units(amount)
        );

        let response = self.signed_post(INIT_ENDPOINT, into_fields(&request)?).await?;
        let session = response.as_ref().and_then(ProcessorResponse::session);

        if session.is_none() {
            warn!("TBank payment {} was not created", request.order_id);
        }
        Ok(session)
    }

    /// `true` iff the processor reports the payment as `CONFIRMED`. On
    /// confirmation the admin chat is notified when one is configured;
    /// delivery failures are logged and do not change the result.
    pub async fn check_payment(&self, payment_id: &str, notifier: Option<&dyn Notifier>) -> bool {
        match self.try_check_payment(payment_id, notifier).await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                error!("Error checking TBank payment: {}", e);
                false
            }
        }
    }

    async fn try_check_payment(
        &self,
        payment_id: &str,
        notifier: Option<&dyn Notifier>,
    ) -> Result<bool, ProcessorError> {
        let request = StateRequest {
            payment_id: payment_id.to_string(),
        };
        let Some(response) = self.signed_post(GET_STATE_ENDPOINT, into_fields(&request)?).await? else {
            warn!("Payment {} not checked: processor unavailable", payment_id);
            return Ok(false);
        };

        if !response.is_confirmed() {
            let status = response.status.as_ref().map(|s| s.as_str()).unwrap_or("none");
            info!("Payment {} status: {}", payment_id, status);
            return Ok(false);
        }

        info!("Payment {} succeeded", payment_id);

        let target = self.settings.notification_target().await?;
        match (target.filter(|chat_id| *chat_id != 0), notifier) {
            (Some(chat_id), Some(notifier)) => {
                let text = subscription_confirmed_message(
                    response.order_id.as_deref().unwrap_or("N/A"),
                    response.tariff_name(),
                    chrono::Local::now().naive_local(),
                );
                if let Err(e) = notifier
                    .send_message(chat_id, &text, ParseMode::Html, &admin_keyboard())
                    .await
                {
                    error!("Failed to send payment notification: {}", e);
                }
            }
            (Some(_), None) => warn!("Payment {} confirmed but no notifier was supplied", payment_id),
            (None, _) => debug!("Payment notifications are disabled"),
        }

        Ok(true)
    }
}

/// HTTP client that keeps no idle connections, so each call opens and
/// releases its own.
pub fn http_client(timeout_ms: Option<u64>) -> Result<Client, ConfigError> {
    let mut builder = Client::builder().pool_max_idle_per_host(0);
    if let Some(ms) = timeout_ms {
        builder = builder.timeout(Duration::from_millis(ms));
    }
    builder.build().map_err(|e| ConfigError::HttpClient(e.to_string()))
}

fn into_fields<T: Serialize>(request: &T) -> Result<Map<String, Value>, ProcessorError> {
    match serde_json::to_value(request)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(ProcessorError::InvalidPayload),
    }
}
