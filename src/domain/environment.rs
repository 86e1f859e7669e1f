use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const TEST_WSDL: &str = "https://soatest.paysafecard.com/psc/services/PscService?wsdl";
pub const TEST_PAYMENT_PANEL: &str =
    "https://customer.test.at.paysafecard.com/psccustomer/GetCustomerPanelServlet?";

pub const LIVE_WSDL: &str = "https://soa.paysafecard.com/psc/services/PscService?wsdl";
pub const LIVE_PAYMENT_PANEL: &str =
    "https://customer.cc.at.paysafecard.com/psccustomer/GetCustomerPanelServlet?";

/// Which of the provider's two installations a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Test,
    Production,
}

/// Endpoint pair used by one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub wsdl_url: &'static str,
    pub panel_url: &'static str,
}

impl Endpoints {
    /// Location SOAP requests are posted to: the WSDL URL without its query.
    pub fn service_url(&self) -> &'static str {
        self.wsdl_url
            .split_once('?')
            .map_or(self.wsdl_url, |(base, _)| base)
    }
}

impl Environment {
    pub fn endpoints(self) -> Endpoints {
        match self {
            Environment::Test => Endpoints {
                wsdl_url: TEST_WSDL,
                panel_url: TEST_PAYMENT_PANEL,
            },
            Environment::Production => Endpoints {
                wsdl_url: LIVE_WSDL,
                panel_url: LIVE_PAYMENT_PANEL,
            },
        }
    }
}

/// Only the exact name `production` selects the live installation; every
/// other name (`development`, `staging`, `test`, ...) maps to the test one.
impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim() == "production" {
            Environment::Production
        } else {
            Environment::Test
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}
