use crate::domain::environment::Environment;
use crate::error::{PaysafecardError, Result};
use crate::infrastructure::soap::SoapTransport;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Merchant settings shared by every payment attempt, read from TOML.
///
/// ```toml
/// environment = "test"
/// username = "soap_user"
/// password = "soap_password"
/// client_id = "merchant-client"
/// shop_id = "shop-1"
/// shop_label = "My Shop"
/// ok_url = "https://shop.example/ok"
/// nok_url = "https://shop.example/nok"
/// pn_url = "https://shop.example/notify"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MerchantConfig {
    #[serde(default)]
    pub environment: Environment,
    pub username: String,
    pub password: String,
    pub client_id: Option<String>,
    pub shop_id: Option<String>,
    pub shop_label: Option<String>,
    pub sub_id: Option<String>,
    pub currency: Option<String>,
    pub ok_url: Option<String>,
    pub nok_url: Option<String>,
    pub pn_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl MerchantConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| PaysafecardError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// SOAP transport for the configured environment, honouring `timeout_secs`.
    pub fn transport(&self) -> Result<SoapTransport> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(PaysafecardError::HttpClient)?;
        Ok(SoapTransport::with_client(
            client,
            self.environment.endpoints().service_url(),
        ))
    }
}
