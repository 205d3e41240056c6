use crate::core::fee::FeeConfig;
use anyhow::{Context, Result, anyhow};
use serde_json::Value;

/// Decodes either a bare JSON array of fee configurations or a `{"data": [...]}`
/// envelope. Blank bodies and `null` data decode to an empty list.
pub fn decode_fee_configs(body: &str) -> Result<Vec<FeeConfig>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let payload: Value =
        serde_json::from_str(body).context("Failed to parse fee configuration payload")?;
    let list = match payload {
        Value::Array(_) => payload,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Null) => return Ok(Vec::new()),
            Some(data) => data,
            None => return Err(anyhow!("Fee configuration payload has no \"data\" field")),
        },
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(anyhow!(
                "Unexpected fee configuration payload: {}",
                other
            ));
        }
    };

    serde_json::from_value(list).context("Failed to decode fee configurations")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = r#"[
        {
            "currency": "USD",
            "transaction_fees": [
                {"start_amount": 0, "end_amount": 100, "fee_amount": 1, "fee_type": "fixed"}
            ],
            "allocate_details": [{"id": "self", "name": "Self", "isDisabled": true}]
        },
        {"currency": "KHR"}
    ]"#;

    #[test]
    fn test_decode_bare_list() {
        let configs = decode_fee_configs(LIST).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].transaction_fees[0].end_amount, Some(100.0));
        assert!(configs[1].transaction_fees.is_empty());
        assert!(configs[1].allocate_details.is_empty());
    }

    #[test]
    fn test_decode_envelope() {
        let body = format!(r#"{{"data": {LIST}}}"#);
        assert_eq!(decode_fee_configs(&body).unwrap().len(), 2);
        assert!(decode_fee_configs(r#"{"data": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_decode_blank_and_invalid() {
        assert!(decode_fee_configs("  \n").unwrap().is_empty());
        assert!(decode_fee_configs("<html>oops</html>").is_err());
        assert!(decode_fee_configs(r#"{"currency": "USD"}"#).is_err());
        assert!(decode_fee_configs("42").is_err());
    }

    #[test]
    fn test_decode_keeps_records_with_null_fields() {
        let body = r#"[
            {
                "currency": "KHR",
                "transaction_fees": [
                    {"start_amount": 0, "fee_amount": 1, "unlimited": null, "fee_type": null}
                ]
            },
            {"currency": "USD", "transaction_fees": null, "allocate_details": null}
        ]"#;

        let configs = decode_fee_configs(body).unwrap();
        assert_eq!(configs.len(), 2);
        assert!(!configs[0].transaction_fees[0].unlimited);
        assert_eq!(configs[0].transaction_fees[0].fee_amount, 1.0);
        assert!(configs[1].transaction_fees.is_empty());
    }

    #[test]
    fn test_decode_error_names_the_failing_field() {
        let body = r#"[{"currency": "USD", "transaction_fees": [{"fee_type": "tiered"}]}]"#;

        let err = decode_fee_configs(body).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Failed to decode fee configurations"));
        assert!(message.contains("tiered"));
        assert!(!message.contains("untagged"));
    }
}
