use crate::config::MerchantConfig;
use crate::domain::environment::{Endpoints, Environment};
use crate::domain::fields::{Field, MissingFields, require};
use crate::domain::money::{AmountOutOfRange, DEFAULT_CURRENCY, format_amount};
use crate::domain::ports::{Operation, Payload, PscTransportBox};
use crate::domain::response::{MID, ResultCodes, StatusRecord, descend, text};
use crate::error::{PaysafecardError, Result};
use crate::infrastructure::soap::SoapTransport;
use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

const AUTHORIZE_FIELDS: &[Field] = &[
    Field::Username,
    Field::Password,
    Field::TransactionId,
    Field::Amount,
    Field::Currency,
    Field::OkUrl,
    Field::NokUrl,
    Field::PnUrl,
    Field::ClientId,
    Field::ShopId,
    Field::ShopLabel,
];

const CAPTURE_FIELDS: &[Field] = &[
    Field::Username,
    Field::Password,
    Field::TransactionId,
    Field::Amount,
    Field::Currency,
];

const STATUS_FIELDS: &[Field] = &[
    Field::Username,
    Field::Password,
    Field::TransactionId,
    Field::Currency,
];

const PANEL_FIELDS: &[Field] = &[
    Field::TransactionId,
    Field::Amount,
    Field::Currency,
    Field::Mid,
];

/// Characters escaped in redirect URLs sent inside a request. Spaces become `+`.
const FORM_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Characters escaped in payment panel query values.
const PANEL_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A single payment attempt against the provider.
///
/// Fields are filled in by the caller (directly, through [`TransactionClient::with`],
/// or from a [`MerchantConfig`]); each operation checks the subset it needs and
/// reports every unset one at once.
///
/// ```ignore
/// let mut tx = TransactionClient::with(Environment::Test, transport, |t| {
///     t.username = Some("soap_user".into());
///     t.password = Some("soap_password".into());
///     t.transaction_id = Some("order-123".into());
///     t.amount = Some(dec!(10.00));
/// });
/// tx.authorize(true).await?;
/// let redirect = tx.payment_panel_url()?;
/// // ...after the notification arrives at `pn_url`:
/// tx.capture(true).await?;
/// ```
pub struct TransactionClient {
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub shop_id: Option<String>,
    pub shop_label: Option<String>,
    pub sub_id: Option<String>,
    pub transaction_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub ok_url: Option<String>,
    pub nok_url: Option<String>,
    pub pn_url: Option<String>,
    /// Set by a successful [`TransactionClient::authorize`].
    pub mid: Option<String>,
    environment: Environment,
    endpoints: Endpoints,
    transport: PscTransportBox,
}

impl TransactionClient {
    pub fn new(environment: Environment, transport: PscTransportBox) -> Self {
        Self {
            username: None,
            password: None,
            client_id: None,
            shop_id: None,
            shop_label: None,
            sub_id: None,
            transaction_id: None,
            amount: None,
            currency: Some(DEFAULT_CURRENCY.to_string()),
            ok_url: None,
            nok_url: None,
            pn_url: None,
            mid: None,
            environment,
            endpoints: environment.endpoints(),
            transport,
        }
    }

    /// Creates a client and hands it to `configure` before returning it.
    pub fn with<F>(environment: Environment, transport: PscTransportBox, configure: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut client = Self::new(environment, transport);
        configure(&mut client);
        client
    }

    /// Creates a client talking SOAP to the environment's service endpoint.
    pub fn connect(environment: Environment) -> Self {
        let transport = SoapTransport::new(environment.endpoints().service_url());
        Self::new(environment, Box::new(transport))
    }

    /// Creates a client carrying the merchant fields of `config`.
    pub fn from_config(config: &MerchantConfig, transport: PscTransportBox) -> Self {
        Self::with(config.environment, transport, |t| {
            t.username = Some(config.username.clone());
            t.password = Some(config.password.clone());
            t.client_id = config.client_id.clone();
            t.shop_id = config.shop_id.clone();
            t.shop_label = config.shop_label.clone();
            t.sub_id = config.sub_id.clone();
            t.ok_url = config.ok_url.clone();
            t.nok_url = config.nok_url.clone();
            t.pn_url = config.pn_url.clone();
            if let Some(currency) = &config.currency {
                t.currency = Some(currency.clone());
            }
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn endpoints(&self) -> Endpoints {
        self.endpoints
    }

    /// Reserves the amount with the provider and, when `set_mid` is true,
    /// stores the merchant transaction id it hands back.
    pub async fn authorize(&mut self, set_mid: bool) -> Result<()> {
        self.check(AUTHORIZE_FIELDS)?;
        let payload = self.authorize_payload()?;
        let record = self.invoke(Operation::CreateDisposition, payload).await?;

        let codes = read_codes(Operation::CreateDisposition, &record)?;
        if !codes.is_success() {
            return Err(PaysafecardError::Authorization {
                result_code: codes.result_code,
                error_code: codes.error_code,
            });
        }

        if set_mid {
            self.mid = Some(text(&record, MID)?);
        }
        info!(mtid = ?self.transaction_id, mid = ?self.mid, "disposition created");
        Ok(())
    }

    /// Debits the reserved amount; `close_transaction` ends the disposition.
    pub async fn capture(&mut self, close_transaction: bool) -> Result<()> {
        self.check(CAPTURE_FIELDS)?;
        let payload = self.capture_payload(close_transaction)?;
        let record = self.invoke(Operation::ExecuteDebit, payload).await?;

        let codes = read_codes(Operation::ExecuteDebit, &record)?;
        if !codes.is_success() {
            return Err(PaysafecardError::Capture {
                result_code: codes.result_code,
                error_code: codes.error_code,
            });
        }
        info!(mtid = ?self.transaction_id, close = close_transaction, "debit executed");
        Ok(())
    }

    /// Queries the provider for the serial numbers attached to the transaction.
    pub async fn status(&self) -> Result<StatusRecord> {
        self.check(STATUS_FIELDS)?;
        let record = self
            .invoke(Operation::GetSerialNumbers, self.status_payload())
            .await?;

        let status = StatusRecord::from_value(&record)?;
        debug!(
            operation = %Operation::GetSerialNumbers,
            result_code = status.codes.result_code,
            error_code = status.codes.error_code,
            "result codes read"
        );
        if !status.codes.is_success() {
            return Err(PaysafecardError::Status {
                result_code: status.codes.result_code,
                error_code: status.codes.error_code,
            });
        }
        Ok(status)
    }

    /// URL of the hosted panel the end user is redirected to.
    pub fn payment_panel_url(&self) -> Result<String> {
        self.check(PANEL_FIELDS)?;
        let amount = self
            .amount
            .map(format_amount)
            .transpose()?
            .unwrap_or_default();
        let params = [
            ("mid", self.mid.as_deref().unwrap_or_default()),
            ("mtid", self.transaction_id.as_deref().unwrap_or_default()),
            ("amount", amount.as_str()),
            ("currency", self.currency.as_deref().unwrap_or_default()),
        ];
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", utf8_percent_encode(value, PANEL_VALUE)))
            .collect::<Vec<_>>()
            .join("&");
        Ok(format!("{}{}", self.endpoints.panel_url, query))
    }

    fn is_set(&self, field: Field) -> bool {
        match field {
            Field::Username => self.username.is_some(),
            Field::Password => self.password.is_some(),
            Field::ClientId => self.client_id.is_some(),
            Field::ShopId => self.shop_id.is_some(),
            Field::ShopLabel => self.shop_label.is_some(),
            Field::SubId => self.sub_id.is_some(),
            Field::TransactionId => self.transaction_id.is_some(),
            Field::Amount => self.amount.is_some(),
            Field::Currency => self.currency.is_some(),
            Field::OkUrl => self.ok_url.is_some(),
            Field::NokUrl => self.nok_url.is_some(),
            Field::PnUrl => self.pn_url.is_some(),
            Field::Mid => self.mid.is_some(),
        }
    }

    fn check(&self, required: &[Field]) -> std::result::Result<(), MissingFields> {
        let checks: Vec<(Field, bool)> = required.iter().map(|f| (*f, self.is_set(*f))).collect();
        require(&checks)
    }

    async fn invoke(&self, operation: Operation, payload: Payload) -> Result<Value> {
        debug!(
            %operation,
            environment = %self.environment,
            mtid = ?self.transaction_id,
            "calling payment service"
        );
        let response = self.transport.call(operation, payload).await?;
        let record = descend(&response, &operation.response_path())?;
        Ok(record.clone())
    }

    fn base_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("username".into(), opt(&self.username));
        payload.insert("password".into(), opt(&self.password));
        payload.insert("mtid".into(), opt(&self.transaction_id));
        payload.insert(
            "subId".into(),
            Value::String(self.sub_id.clone().unwrap_or_default()),
        );
        payload
    }

    fn formatted_amount(&self) -> std::result::Result<Value, AmountOutOfRange> {
        Ok(self
            .amount
            .map(format_amount)
            .transpose()?
            .map_or(Value::Null, Value::String))
    }

    fn authorize_payload(&self) -> std::result::Result<Payload, AmountOutOfRange> {
        let mut payload = self.base_payload();
        payload.insert("amount".into(), self.formatted_amount()?);
        payload.insert("currency".into(), opt(&self.currency));
        payload.insert("okUrl".into(), escaped(&self.ok_url));
        payload.insert("nokUrl".into(), escaped(&self.nok_url));
        payload.insert("pnUrl".into(), escaped(&self.pn_url));
        payload.insert("merchantclientid".into(), opt(&self.client_id));
        payload.insert("shopId".into(), opt(&self.shop_id));
        payload.insert("shopLabel".into(), opt(&self.shop_label));
        Ok(payload)
    }

    fn capture_payload(
        &self,
        close_transaction: bool,
    ) -> std::result::Result<Payload, AmountOutOfRange> {
        let mut payload = self.base_payload();
        payload.insert("amount".into(), self.formatted_amount()?);
        payload.insert("currency".into(), opt(&self.currency));
        payload.insert("close".into(), Value::from(u8::from(close_transaction)));
        Ok(payload)
    }

    fn status_payload(&self) -> Payload {
        let mut payload = self.base_payload();
        payload.insert("currency".into(), opt(&self.currency));
        payload
    }
}

impl fmt::Debug for TransactionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionClient")
            .field("environment", &self.environment)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("client_id", &self.client_id)
            .field("shop_id", &self.shop_id)
            .field("shop_label", &self.shop_label)
            .field("sub_id", &self.sub_id)
            .field("transaction_id", &self.transaction_id)
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .field("mid", &self.mid)
            .finish_non_exhaustive()
    }
}

fn read_codes(operation: Operation, record: &Value) -> Result<ResultCodes> {
    let codes = ResultCodes::read(record)?;
    debug!(
        %operation,
        result_code = codes.result_code,
        error_code = codes.error_code,
        "result codes read"
    );
    Ok(codes)
}

fn opt(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::String)
}

fn escaped(value: &Option<String>) -> Value {
    value.as_deref().map_or(Value::Null, |url| Value::String(form_escape(url)))
}

fn form_escape(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, FORM_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}
