use crate::apis::{FormParams, Language};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A credit transfer (refund) to a registered beneficiary account of a customer.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct NewCreditTransferRequest {
    pub customer_number: String,
    pub message: String,
    pub amount: f64,
    /// Beneficiary account, required when the customer has more than one.
    #[builder(default)]
    pub iban: Option<String>,
    #[builder(default)]
    pub reference: Option<String>,
    /// Execution date, as `YYYY-MM-DD`.
    #[builder(default)]
    pub date: Option<String>,
    #[builder(default)]
    pub place: Option<String>,
}

impl NewCreditTransferRequest {
    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("customerNumber", &self.customer_number)
            .push_opt("iban", self.iban.as_deref())
            .push("message", &self.message)
            .push("amount", self.amount)
            .push_opt("ref", self.reference.as_deref())
            .push_opt("date", self.date.as_deref())
            .push_opt("place", self.place.as_deref());
        form
    }
}

/// Registers a bank account to which refunds of a customer can be sent.
#[derive(Debug, Clone, Default, Eq, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct AddBeneficiaryRequest {
    pub iban: String,
    #[builder(default)]
    pub bic: Option<String>,
    #[builder(default)]
    pub customer_number: Option<String>,
    /// Name of the account holder.
    #[builder(default)]
    pub name: Option<String>,
    #[builder(default)]
    pub email: Option<String>,
    #[builder(default)]
    pub l: Option<Language>,
    #[builder(default)]
    pub mobile: Option<String>,
    #[builder(default)]
    pub address: Option<String>,
    #[builder(default)]
    pub city: Option<String>,
    #[builder(default)]
    pub zip: Option<String>,
    #[builder(default)]
    pub country: Option<String>,
    #[builder(default)]
    pub company_name: Option<String>,
    #[builder(default)]
    pub vatno: Option<String>,
}

impl AddBeneficiaryRequest {
    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("iban", &self.iban)
            .push_opt("customerNumber", self.customer_number.as_deref())
            .push_opt("name", self.name.as_deref())
            .push_opt("email", self.email.as_deref())
            .push_opt("l", self.l)
            .push_opt("mobile", self.mobile.as_deref())
            .push_opt("address", self.address.as_deref())
            .push_opt("city", self.city.as_deref())
            .push_opt("zip", self.zip.as_deref())
            .push_opt("country", self.country.as_deref())
            .push_opt("companyName", self.company_name.as_deref())
            .push_opt("vatno", self.vatno.as_deref())
            .push_opt("bic", self.bic.as_deref());
        form
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
#[serde(default)]
pub struct BeneficiaryAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct Beneficiary {
    #[serde(default)]
    pub name: Option<String>,
    pub iban: String,
    #[serde(default)]
    pub bic: Option<String>,
    /// Whether refunds can be sent to this account.
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub address: Option<BeneficiaryAddress>,
}

/// Batch of credit transfers sent (or to be sent) to the bank.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct CreditTransferBatch {
    pub id: u64,
    /// Payment information id, as used in the pain.001 file.
    #[serde(default)]
    pub pmtinfid: Option<String>,
    #[serde(default)]
    pub progress: Option<String>,
    /// Number of credit transfers in the batch.
    #[serde(default)]
    pub entries: u32,
}

/// Identifies a credit transfer batch.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CreditTransferBatchSelector {
    Id(String),
    PaymentInformationId(String),
}

impl CreditTransferBatchSelector {
    pub fn to_query(&self) -> FormParams {
        let mut query = FormParams::new();
        match self {
            CreditTransferBatchSelector::Id(id) => query.push("id", id),
            CreditTransferBatchSelector::PaymentInformationId(pmtinfid) => {
                query.push("pmtinfid", pmtinfid)
            }
        };
        query
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Refund {
    pub id: String,
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default)]
    pub bic: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "msg", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub r#ref: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// `OPEN`, `PENDING`, `PAID`, ...
    #[serde(default)]
    pub state: Option<String>,
    /// Date on which the bank executed the transfer.
    #[serde(default)]
    pub bkdate: Option<String>,
}
