//! Address directory loader
//!
//! The address book is a community-maintained JSON document listing every
//! deployed injector per active network, nested under
//! `active.<network>.maxiKeepers.gaugeRewardsInjectors.<token>`. Any level
//! may be missing for a given network; such networks are skipped rather than
//! treated as errors.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Published address book location.
pub const ADDRESSBOOK_URL: &str =
    "https://raw.githubusercontent.com/BalancerMaxis/bal_addresses/main/outputs/addressbook.json";

/// One selectable injector deployment.
///
/// `value` is the `<network>-<address>` composite the selector understands;
/// `label` is the human-facing form including the token tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("address book returned HTTP {status}")]
    Http { status: u16 },
}

/// Fetches the address book and flattens it into selectable options.
pub async fn fetch_directory(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<DirectoryOption>, DirectoryError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(DirectoryError::Http {
            status: response.status().as_u16(),
        });
    }

    let document: Value = response.json().await?;
    let options = parse_directory(&document);
    tracing::info!("loaded {} injector entries from address book", options.len());
    Ok(options)
}

/// Flattens the address book document into `(network, address, token)`
/// options. Non-object sections and non-string addresses are skipped.
pub fn parse_directory(document: &Value) -> Vec<DirectoryOption> {
    let mut options = Vec::new();

    let Some(active) = document.get("active").and_then(Value::as_object) else {
        return options;
    };

    for (network, section) in active {
        let Some(injectors) = section
            .pointer("/maxiKeepers/gaugeRewardsInjectors")
            .and_then(Value::as_object)
        else {
            continue;
        };

        for (token, address) in injectors {
            let Some(address) = address.as_str() else {
                continue;
            };
            options.push(DirectoryOption {
                label: format!("{network} - {address} [{token}]"),
                value: format!("{network}-{address}"),
            });
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_directory_flattens_networks() {
        let document = json!({
            "active": {
                "polygon": {
                    "maxiKeepers": {
                        "gaugeRewardsInjectors": {
                            "USDC": "0x1111111111111111111111111111111111111111",
                        }
                    }
                },
                "gnosis": {
                    "maxiKeepers": {
                        "gaugeRewardsInjectors": {
                            "GNO": "0x2222222222222222222222222222222222222222",
                        }
                    }
                },
            }
        });

        let options = parse_directory(&document);
        assert_eq!(options.len(), 2);
        assert_eq!(
            options[0],
            DirectoryOption {
                label: "gnosis - 0x2222222222222222222222222222222222222222 [GNO]"
                    .to_string(),
                value: "gnosis-0x2222222222222222222222222222222222222222".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_directory_skips_missing_keys() {
        let document = json!({
            "active": {
                "polygon": {
                    "maxiKeepers": {
                        "gaugeRewardsInjectors": {
                            "USDC": "0x1111111111111111111111111111111111111111",
                        }
                    }
                },
                "mainnet": { "maxiKeepers": {} },
                "base": {},
                "avalanche": { "maxiKeepers": { "gaugeRewardsInjectors": { "bad": 7 } } },
            }
        });

        let options = parse_directory(&document);
        assert_eq!(options.len(), 1);
        assert!(options[0].value.starts_with("polygon-"));
    }

    #[test]
    fn test_parse_directory_no_active_section() {
        assert_eq!(parse_directory(&json!({})), vec![]);
        assert_eq!(parse_directory(&json!({ "active": [] })), vec![]);
    }
}
