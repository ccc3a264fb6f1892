//! HTTP client for the custody service that issues deposit addresses.

use std::time::Duration;

use async_trait::async_trait;
use engine::{AddressIssuer, DepositMethod, EngineError, IssuedAddress, ResultEngine};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::Custody;

#[derive(Debug, Serialize)]
struct AddressRequest<'a> {
    method: &'a str,
    deposit_request_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct AddressResponse {
    address: String,
    required_confirmations: i32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Asks the custody service for a fresh address via `POST {base_url}/addresses`.
#[derive(Debug, Clone)]
pub struct HttpAddressIssuer {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpAddressIssuer {
    pub fn new(settings: &Custody) -> ResultEngine<Self> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| EngineError::Config(format!("invalid custody base_url: {err}")))?;
        let endpoint = base_url
            .join("addresses")
            .map_err(|err| EngineError::Config(format!("invalid custody base_url: {err}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| EngineError::Config(format!("custody client: {err}")))?;

        Ok(Self { endpoint, http })
    }
}

#[async_trait]
impl AddressIssuer for HttpAddressIssuer {
    async fn issue_address(
        &self,
        method: DepositMethod,
        deposit_request_id: Uuid,
    ) -> ResultEngine<IssuedAddress> {
        let payload = AddressRequest {
            method: method.as_str(),
            deposit_request_id,
        };

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|err| EngineError::Custody(err.to_string()))?;

        if res.status().is_success() {
            let body = res
                .json::<AddressResponse>()
                .await
                .map_err(|err| EngineError::Custody(err.to_string()))?;
            return Ok(IssuedAddress {
                address: body.address,
                required_confirmations: body.required_confirmations,
            });
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(EngineError::Custody(format!("{status}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custody(base_url: &str) -> Custody {
        Custody {
            base_url: base_url.to_string(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn endpoint_is_relative_to_base_url() {
        let issuer = HttpAddressIssuer::new(&custody("http://custody.internal/v1/")).unwrap();
        assert_eq!(
            issuer.endpoint.as_str(),
            "http://custody.internal/v1/addresses"
        );
        assert!(!issuer.is_placeholder());
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = HttpAddressIssuer::new(&custody("not a url")).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
