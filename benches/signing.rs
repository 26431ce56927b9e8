use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map, Value};
use tbank_checkout::services::signing;

fn init_payload() -> Map<String, Value> {
    match json!({
        "TerminalKey": "TinkoffBankTest",
        "OrderId": "6f1c2a54-3c1e-4d59-9a57-8a0f4a1d9b11",
        "Amount": 29900,
        "Description": "Subscription: Premium, 1 month",
        "CustomerKey": "123456789",
        "DATA": {"telegram_id": "123456789", "username": "buyer", "tariff_name": "Premium"},
        "SuccessURL": "https://t.me/BURYAT_VPN_BOT",
        "FailURL": "https://t.me/BURYAT_VPN_BOT",
        "NotificationURL": "https://your-server.com/tbank/callback"
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn bench_token(c: &mut Criterion) {
    let payload = init_payload();

    c.bench_function("token_init_payload", |b| {
        b.iter(|| signing::token(black_box(&payload), black_box("secret")))
    });
}

criterion_group!(benches, bench_token);
criterion_main!(benches);
