use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// Payload do Init enviado ao processor
#[derive(Debug, Clone, Serialize)]
pub struct InitRequest {
    #[serde(rename = "OrderId")]
    pub order_id: String,
    #[serde(rename = "Amount")]
    pub amount: u64, // em copeques
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "CustomerKey", skip_serializing_if = "Option::is_none")]
    pub customer_key: Option<String>,
    #[serde(rename = "DATA")]
    pub data: PaymentMetadata,
    #[serde(rename = "SuccessURL")]
    pub success_url: String,
    #[serde(rename = "FailURL")]
    pub fail_url: String,
    #[serde(rename = "NotificationURL")]
    pub notification_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<String>,
    pub username: String,
    pub tariff_name: String,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateRequest {
    #[serde(rename = "PaymentId")]
    pub payment_id: String,
}

/// Who is buying what; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct Customer {
    pub email: Option<String>,
    pub user_id: Option<i64>,
    pub tariff_name: Option<String>,
    pub username: Option<String>,
}

impl Customer {
    pub fn metadata(&self) -> PaymentMetadata {
        PaymentMetadata {
            telegram_id: self.user_id.map(|id| id.to_string()),
            username: self.username.clone().unwrap_or_else(|| "unknown".to_string()),
            tariff_name: self.tariff_name.clone().unwrap_or_else(|| "none".to_string()),
            email: self.email.clone(),
        }
    }
}

/// Hosted payment page handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub payment_id: String,
    pub payment_url: String,
}

/// Processor reply. Only `Success` and `Status` drive decisions, so every
/// field tolerates shapes it does not expect instead of failing the parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessorResponse {
    #[serde(rename = "Success", default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(rename = "PaymentId", default, deserialize_with = "string_or_number")]
    pub payment_id: Option<String>,
    #[serde(rename = "PaymentURL", default, deserialize_with = "string_or_number")]
    pub payment_url: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "status_or_none")]
    pub status: Option<PaymentStatus>,
    #[serde(rename = "OrderId", default, deserialize_with = "string_or_number")]
    pub order_id: Option<String>,
    #[serde(rename = "DATA", default, deserialize_with = "object_or_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(rename = "ErrorCode", default, deserialize_with = "string_or_number")]
    pub error_code: Option<String>,
    #[serde(rename = "Message", default, deserialize_with = "string_or_number")]
    pub message: Option<String>,
}

impl ProcessorResponse {
    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, Some(PaymentStatus::Confirmed))
    }

    pub fn tariff_name(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|data| data.get("tariff_name"))
            .and_then(Value::as_str)
            .unwrap_or("N/A")
    }

    pub fn session(&self) -> Option<PaymentSession> {
        if !self.success {
            return None;
        }
        Some(PaymentSession {
            payment_id: self.payment_id.clone()?,
            payment_url: self.payment_url.clone()?,
        })
    }
}

/// JSON truthiness: `false`, `0`, `""`, `null` and empty containers are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.as_ref().map_or(false, is_truthy))
}

fn status_or_none<'de, D>(deserializer: D) -> Result<Option<PaymentStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(PaymentStatus::from(s)),
        _ => None,
    })
}

fn object_or_none<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    New,
    FormShowed,
    Authorizing,
    Authorized,
    Confirming,
    Confirmed,
    Rejected,
    Canceled,
    Refunded,
    DeadlineExpired,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::New => "NEW",
            PaymentStatus::FormShowed => "FORM_SHOWED",
            PaymentStatus::Authorizing => "AUTHORIZING",
            PaymentStatus::Authorized => "AUTHORIZED",
            PaymentStatus::Confirming => "CONFIRMING",
            PaymentStatus::Confirmed => "CONFIRMED",
            PaymentStatus::Rejected => "REJECTED",
            PaymentStatus::Canceled => "CANCELED",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::DeadlineExpired => "DEADLINE_EXPIRED",
            PaymentStatus::Other(s) => s,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NEW" => PaymentStatus::New,
            "FORM_SHOWED" => PaymentStatus::FormShowed,
            "AUTHORIZING" => PaymentStatus::Authorizing,
            "AUTHORIZED" => PaymentStatus::Authorized,
            "CONFIRMING" => PaymentStatus::Confirming,
            "CONFIRMED" => PaymentStatus::Confirmed,
            "REJECTED" => PaymentStatus::Rejected,
            "CANCELED" => PaymentStatus::Canceled,
            "REFUNDED" => PaymentStatus::Refunded,
            "DEADLINE_EXPIRED" => PaymentStatus::DeadlineExpired,
            _ => PaymentStatus::Other(value),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
