use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const TERMINAL_KEY_FIELD: &str = "TerminalKey";
pub const PASSWORD_FIELD: &str = "Password";
pub const TOKEN_FIELD: &str = "Token";

/// Concatenation of the root-level scalar values, ordered by key, with the
/// password mixed in under `Password`. Nested objects and arrays (`DATA`,
/// `Receipt`) and nulls take no part in the signature.
pub fn signing_string(fields: &Map<String, Value>, password: &str) -> String {
    let mut sorted: BTreeMap<&str, String> = fields
        .iter()
        .filter(|(key, _)| key.as_str() != TOKEN_FIELD)
        .filter_map(|(key, value)| scalar_repr(value).map(|repr| (key.as_str(), repr)))
        .collect();
    sorted.insert(PASSWORD_FIELD, password.to_string());

    sorted.into_values().collect()
}

/// Lowercase hex SHA-256 of [`signing_string`].
pub fn token(fields: &Map<String, Value>, password: &str) -> String {
    let digest = Sha256::digest(signing_string(fields, password).as_bytes());
    hex::encode(digest)
}

fn scalar_repr(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_known_vector() {
        let payload = fields(json!({
            "TerminalKey": "MerchantTerminalKey",
            "Amount": 19200,
            "OrderId": "21090",
            "Description": "Подарочная карта на 1000 рублей"
        }));

        assert_eq!(
            signing_string(&payload, "usaf8fw8fsw21g"),
            "19200Подарочная карта на 1000 рублей21090usaf8fw8fsw21gMerchantTerminalKey"
        );
        assert_eq!(
            token(&payload, "usaf8fw8fsw21g"),
            "0024a00af7c350a3a67ca168ce06502aa72772456662e38696d48b56ee9c97d9"
        );
    }

    #[test]
    fn test_nested_values_and_token_are_skipped() {
        let payload = fields(json!({
            "TerminalKey": "MerchantTerminalKey",
            "Amount": 19200,
            "OrderId": "21090",
            "Description": "Gift card",
            "DATA": {"tariff_name": "Pro"},
            "Receipt": [1, 2],
            "CustomerKey": null,
            "Token": "stale"
        }));

        assert_eq!(
            signing_string(&payload, "usaf8fw8fsw21g"),
            "19200Gift card21090usaf8fw8fsw21gMerchantTerminalKey"
        );
        assert_eq!(
            token(&payload, "usaf8fw8fsw21g"),
            "c9ccf0ee4910e0021a59b1820f1d11af0d11ecd049aa4c6a13c1eaa515c40a99"
        );
    }

    #[test]
    fn test_booleans_render_lowercase() {
        let payload = fields(json!({"Recurrent": true}));
        assert_eq!(signing_string(&payload, "p"), "ptrue");
    }

    #[test]
    fn test_password_changes_token() {
        let payload = fields(json!({"OrderId": "1"}));
        assert_ne!(token(&payload, "one"), token(&payload, "two"));
    }

    proptest! {
        #[test]
        fn prop_token_ignores_insertion_order(
            entries in proptest::collection::btree_map("[A-Za-z]{1,12}", "[a-z0-9 ]{0,16}", 1..12),
            password in "[a-z0-9]{1,16}",
        ) {
            let forward: Map<String, Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            let reversed: Map<String, Value> = entries
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();

            prop_assert_eq!(token(&forward, &password), token(&reversed, &password));
        }
    }
}
