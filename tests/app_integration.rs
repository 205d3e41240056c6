use settlefee::core::fee::FeeType;
use settlefee::core::{FeeConfigurationEngine, FeeError};
use settlefee::providers::management::ManagementApiSource;
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fee-configurations"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, content).expect("Failed to write config file");
        config_path
    }
}

const TIERED_USD: &str = r#"[
    {
        "currency": "USD",
        "transaction_fees": [
            {
                "start_amount": 1000.01,
                "end_amount": null,
                "fee_amount": 7.5,
                "fee_type": "fixed",
                "unlimited": false,
                "supplier_sharings": [{"id": "self", "value": 100}]
            },
            {
                "start_amount": 0,
                "end_amount": 1000,
                "fee_amount": 5,
                "fee_type": "percentage",
                "unlimited": false,
                "supplier_sharings": [{"id": "bank", "value": 60}, {"id": "self", "value": 40}]
            }
        ],
        "allocate_details": [
            {"id": "self", "name": "Merchant", "isDisabled": true},
            {"id": "bank", "name": "Acme Bank", "isDisabled": false}
        ]
    }
]"#;

#[test_log::test(tokio::test)]
async fn test_engine_with_management_api() {
    let mock_server = test_utils::create_mock_server(200, TIERED_USD).await;
    let source = ManagementApiSource::new(&mock_server.uri(), Some("token")).unwrap();
    let mut engine = FeeConfigurationEngine::new(Arc::new(source));

    engine.initialize(None, None).await;

    let usd = engine.currency_fees("USD").unwrap();
    assert!(usd.is_sorted());
    assert_eq!(usd.transaction_fees[0].fee_type, FeeType::Percentage);
    assert!(engine.has_currency("KHR"));

    let at_boundary = engine.calculate_fees("USD", 1000.0).unwrap();
    info!(?at_boundary, "Calculated fee at tier boundary");
    assert_eq!(at_boundary.transaction_fee, 50.0);
    assert_eq!(
        at_boundary.distribution,
        BTreeMap::from([
            ("Acme Bank".to_string(), 30.0),
            ("Merchant".to_string(), 20.0)
        ])
    );

    let above = engine.calculate_fees("USD", 5000.0).unwrap();
    assert_eq!(above.transaction_fee, 7.5);
    assert_eq!(
        above.distribution,
        BTreeMap::from([("Merchant".to_string(), 7.5)])
    );
}

#[test_log::test(tokio::test)]
async fn test_engine_falls_back_when_api_fails() {
    let mock_server = test_utils::create_mock_server(500, "internal error").await;
    let source = ManagementApiSource::new(&mock_server.uri(), None).unwrap();
    let mut engine = FeeConfigurationEngine::new(Arc::new(source));

    engine.initialize(Some("m-1"), Some("Merchant")).await;

    let configs = engine.all_config_fees().unwrap();
    let currencies: Vec<_> = configs.iter().map(|c| c.currency.as_str()).collect();
    assert_eq!(currencies, vec!["KHR", "USD"]);

    let result = engine.calculate_fees("KHR", 40_000.0).unwrap();
    assert_eq!(result.transaction_fee, 0.0);
    assert_eq!(
        result.distribution,
        BTreeMap::from([("Merchant".to_string(), 0.0)])
    );

    assert_eq!(
        engine.add_supplier("KHR", "m-2", "Merchant").unwrap_err(),
        FeeError::DuplicateSupplierName {
            currency: "KHR".to_string(),
            name: "Merchant".to_string(),
        }
    );
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(200, TIERED_USD).await;
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = test_utils::write_config(
        &dir,
        &format!(
            r#"
        management:
          base_url: {}
          timeout_secs: 5
    "#,
            mock_server.uri()
        ),
    );

    let result = settlefee::run_command(
        settlefee::AppCommand::Calc {
            currency: "USD".to_string(),
            amount: 250.0,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Calc command failed with: {:?}",
        result.err()
    );

    let result = settlefee::run_command(
        settlefee::AppCommand::Schedule { currency: None },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Schedule command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_fee_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let fee_path = dir.path().join("fees.json");
    fs::write(&fee_path, TIERED_USD).unwrap();
    let config_path = test_utils::write_config(
        &dir,
        &format!(
            r#"
        fee_file: "{}"
        default_supplier:
          id: "self"
          name: "Merchant"
    "#,
            fee_path.display()
        ),
    );

    let mut engine = settlefee::load_engine(Some(config_path.to_str().unwrap()))
        .await
        .unwrap();
    assert_eq!(engine.default_supplier().name, "Merchant");
    assert_eq!(
        engine.calculate_fees("USD", 100.0).unwrap().transaction_fee,
        5.0
    );

    let result = settlefee::run_command(
        settlefee::AppCommand::Schedule {
            currency: Some("EUR".to_string()),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Schedule failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_unreachable_fee_file_uses_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = test_utils::write_config(
        &dir,
        &format!(
            "fee_file: \"{}\"\n",
            dir.path().join("missing.json").display()
        ),
    );

    let mut engine = settlefee::load_engine(Some(config_path.to_str().unwrap()))
        .await
        .unwrap();
    assert!(engine.is_initialized());
    let result = engine.calculate_fees("USD", 500.0).unwrap();
    assert_eq!(result.transaction_fee, 0.0);
    assert_eq!(result.distribution, BTreeMap::from([("Self".to_string(), 0.0)]));
}

#[test_log::test(tokio::test)]
async fn test_missing_config_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("absent.yaml");

    let result = settlefee::run_command(
        settlefee::AppCommand::Schedule { currency: None },
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}
