use crate::apis::FormParams;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A new collection on an existing mandate.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct NewTransactionRequest {
    pub mandate_number: String,
    /// Message shown on the bank statement of the debtor.
    pub message: String,
    pub amount: f64,
    /// Date of the transaction, as `YYYY-MM-DD`.
    #[builder(default)]
    pub date: Option<String>,
    /// Requested collection date, as `YYYY-MM-DD`.
    #[builder(default)]
    pub reqcolldt: Option<String>,
    #[builder(default)]
    pub reference: Option<String>,
    #[builder(default)]
    pub place: Option<String>,
    /// Use the reference as end-to-end identifier.
    #[builder(default)]
    pub refase2e: Option<bool>,
}

impl NewTransactionRequest {
    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("mndtId", &self.mandate_number)
            .push_opt("date", self.date.as_deref())
            .push_opt("reqcolldt", self.reqcolldt.as_deref())
            .push("message", &self.message)
            .push_opt("ref", self.reference.as_deref())
            .push("amount", self.amount)
            .push_opt("place", self.place.as_deref())
            .push_opt("refase2e", self.refase2e);
        form
    }
}

/// Extra objects that can be sideloaded with a transaction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionInclude {
    Collection,
    LastUpdate,
    Link,
}

impl TransactionInclude {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionInclude::Collection => "collection",
            TransactionInclude::LastUpdate => "lastupdate",
            TransactionInclude::Link => "link",
        }
    }
}

/// Lookup of the status of one or more transactions.
#[derive(Debug, Clone, Default, Eq, PartialEq, Builder)]
#[builder(default, setter(into, strip_option))]
pub struct StatusRequest {
    pub id: Option<String>,
    pub reference: Option<String>,
    pub mandate_number: Option<String>,
    pub state: Option<String>,
    #[builder(setter(each(name = "include")))]
    pub includes: Vec<TransactionInclude>,
}

impl StatusRequest {
    pub fn to_query(&self) -> FormParams {
        let mut query = FormParams::new();
        query
            .push_opt("id", self.id.as_deref())
            .push_opt("ref", self.reference.as_deref())
            .push_opt("mndtId", self.mandate_number.as_deref())
            .push_opt("state", self.state.as_deref());
        for include in &self.includes {
            query.push("include", include.as_str());
        }
        query
    }
}

/// Changes to a transaction which has not been sent to the bank yet.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct UpdateTransactionRequest {
    pub id: String,
    #[builder(default)]
    pub reqcolldt: Option<String>,
    #[builder(default)]
    pub message: Option<String>,
    #[builder(default)]
    pub reference: Option<String>,
    #[builder(default)]
    pub amount: Option<f64>,
    #[builder(default)]
    pub place: Option<String>,
}

impl UpdateTransactionRequest {
    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("id", &self.id)
            .push_opt("reqcolldt", self.reqcolldt.as_deref())
            .push_opt("message", self.message.as_deref())
            .push_opt("ref", self.reference.as_deref())
            .push_opt("amount", self.amount)
            .push_opt("place", self.place.as_deref());
        form
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionAction {
    /// Mark the transaction as paid outside of Twikey.
    Paid,
    /// Collect the transaction again.
    Reoffer,
    /// Collect the transaction through the backup mandate.
    Backup,
    /// Undo the settlement of a transaction.
    Unsettle,
    Archive,
}

impl fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionAction::Paid => "paid",
            TransactionAction::Reoffer => "reoffer",
            TransactionAction::Backup => "backup",
            TransactionAction::Unsettle => "unsettle",
            TransactionAction::Archive => "archive",
        })
    }
}

/// Refund of a collected transaction to the debtor.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct RefundRequest {
    /// Id of the transaction to refund.
    pub id: String,
    pub message: String,
    pub amount: f64,
    #[builder(default)]
    pub reference: Option<String>,
    #[builder(default)]
    pub place: Option<String>,
    /// Account to refund to, defaults to the account of the mandate.
    #[builder(default)]
    pub iban: Option<String>,
    #[builder(default)]
    pub bic: Option<String>,
}

impl RefundRequest {
    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("id", &self.id)
            .push("message", &self.message)
            .push("amount", self.amount)
            .push_opt("ref", self.reference.as_deref())
            .push_opt("place", self.place.as_deref())
            .push_opt("iban", self.iban.as_deref())
            .push_opt("bic", self.bic.as_deref());
        form
    }
}

/// Identifies the transaction(s) to remove.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TransactionSelector {
    Id(String),
    Ref(String),
    IdAndRef { id: String, reference: String },
}

impl TransactionSelector {
    pub fn to_query(&self) -> FormParams {
        let mut query = FormParams::new();
        match self {
            TransactionSelector::Id(id) => query.push("id", id),
            TransactionSelector::Ref(reference) => query.push("ref", reference),
            TransactionSelector::IdAndRef { id, reference } => {
                query.push("id", id).push("ref", reference)
            }
        };
        query
    }
}

/// Lists transactions created after a given transaction.
#[derive(Debug, Clone, Default, Eq, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct TransactionQuery {
    /// Only return transactions with an id greater than this one.
    pub from_id: u64,
    #[builder(default)]
    pub mandate_number: Option<String>,
}

impl TransactionQuery {
    pub fn to_query(&self) -> FormParams {
        let mut query = FormParams::new();
        query
            .push("fromId", self.from_id)
            .push_opt("mndtId", self.mandate_number.as_deref());
        query
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    #[serde(default)]
    pub contract_id: Option<u64>,
    #[serde(rename = "mndtId", default)]
    pub mandate_number: Option<String>,
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub admincharge: Option<f64>,
    #[serde(rename = "msg", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub r#ref: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// No further state changes are expected.
    #[serde(rename = "final", default)]
    pub is_final: bool,
    /// `OPEN`, `PENDING`, `PAID`, `ERROR`, ...
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub bkerror: Option<String>,
    #[serde(default)]
    pub bkmsg: Option<String>,
    #[serde(default)]
    pub bkdate: Option<String>,
    #[serde(default)]
    pub bkamount: Option<f64>,
    #[serde(default)]
    pub collection: Option<u64>,
    #[serde(default)]
    pub reqcolldt: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub actions: Vec<TransactionHistoryEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct TransactionHistoryEntry {
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransactionRefund {
    pub id: String,
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default)]
    pub bic: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(rename = "msg", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub r#ref: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}
