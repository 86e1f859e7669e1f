use std::fmt;
use thiserror::Error;

/// Every settable attribute of a transaction client, by the name used in
/// validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
    ClientId,
    ShopId,
    ShopLabel,
    SubId,
    TransactionId,
    Amount,
    Currency,
    OkUrl,
    NokUrl,
    PnUrl,
    Mid,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::ClientId => "client_id",
            Field::ShopId => "shop_id",
            Field::ShopLabel => "shop_label",
            Field::SubId => "sub_id",
            Field::TransactionId => "transaction_id",
            Field::Amount => "amount",
            Field::Currency => "currency",
            Field::OkUrl => "ok_url",
            Field::NokUrl => "nok_url",
            Field::PnUrl => "pn_url",
            Field::Mid => "mid",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more required fields were unset when an operation started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("required options missing: {}", join(.0))]
pub struct MissingFields(pub Vec<Field>);

impl MissingFields {
    pub fn fields(&self) -> &[Field] {
        &self.0
    }
}

fn join(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks `(field, is_set)` pairs in the order given and reports every unset
/// one, not only the first.
pub fn require(checks: &[(Field, bool)]) -> Result<(), MissingFields> {
    let missing: Vec<Field> = checks
        .iter()
        .filter(|(_, is_set)| !is_set)
        .map(|(field, _)| *field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingFields(missing))
    }
}
