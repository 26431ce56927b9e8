#![allow(dead_code)]

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tbank_checkout::error::NotifyError;
use tbank_checkout::models::settings::ProcessorSettings;
use tbank_checkout::services::notifier::{KeyboardLayout, ParseMode};
use tbank_checkout::services::processor_client::ReturnUrls;
use tbank_checkout::{InMemorySettingsStore, Notifier, TBankClient};
use tokio::net::TcpListener;

pub const TERMINAL_KEY: &str = "TinkoffBankTest";
pub const PASSWORD: &str = "TinkoffBankTest-secret";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

/// Local stand-in for the processor API. Every request is recorded and
/// answered with whatever `reply` returns for its path and body.
pub struct MockProcessor {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProcessor {
    pub async fn start<F>(reply: F) -> Self
    where
        F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let reply = Arc::new(reply);

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let reply = reply.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let reply = reply.clone();
                        let recorded = recorded.clone();
                        async move {
                            let path = req.uri().path().to_string();
                            let bytes = req.into_body().collect().await?.to_bytes();
                            let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
                            let answer = (*reply)(&path, &body);
                            recorded.lock().unwrap().push(RecordedRequest { path, body });

                            Ok::<_, hyper::Error>(
                                Response::builder()
                                    .header("content-type", "application/json")
                                    .body(Full::new(Bytes::from(answer.to_string())))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            base_url: format!("http://{}/v2/", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Address with nothing listening on it.
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v2/", addr)
}

pub fn configured_store(notification_target: Option<i64>) -> Arc<InMemorySettingsStore> {
    Arc::new(InMemorySettingsStore::new(
        Some(ProcessorSettings::new(TERMINAL_KEY, PASSWORD)),
        notification_target,
    ))
}

pub fn client(base_url: &str, store: Arc<InMemorySettingsStore>) -> TBankClient {
    TBankClient::new(
        reqwest::Client::new(),
        base_url,
        ReturnUrls {
            success_url: "https://t.me/test_bot".to_string(),
            fail_url: "https://t.me/test_bot".to_string(),
            notification_url: "https://example.test/tbank/callback".to_string(),
        },
        store,
    )
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: ParseMode,
    pub keyboard: KeyboardLayout,
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: ParseMode,
        keyboard: &KeyboardLayout,
    ) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            parse_mode,
            keyboard: keyboard.clone(),
        });
        if self.fail {
            return Err(NotifyError::Rejected("chat not found".to_string()));
        }
        Ok(())
    }
}
