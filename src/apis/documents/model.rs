use crate::{
    apis::{Account, Customer, FormParams, Language},
    feed::FeedPage,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Request to invite a debtor to sign a new mandate.
///
/// Only `ct` (the template/contract type) is mandatory; all other fields are only sent when set.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct InviteRequest {
    /// Template to base the mandate on.
    pub ct: u64,
    #[builder(default)]
    pub customer: Option<Customer>,
    #[builder(default)]
    pub account: Option<Account>,
    /// Language of the invite, overriding the language of the customer.
    #[builder(default)]
    pub l: Option<Language>,
    #[builder(default)]
    pub mandate_number: Option<String>,
    #[builder(default)]
    pub contract_number: Option<String>,
    #[builder(default)]
    pub campaign: Option<String>,
    #[builder(default)]
    pub prefix: Option<String>,
    /// Expiry of the invite, as epoch seconds.
    #[builder(default)]
    pub ed: Option<i64>,
    /// Token returned in the exit URL.
    #[builder(default)]
    pub token: Option<String>,
    /// Contract in PDF, base64 encoded.
    #[builder(default)]
    pub document: Option<String>,
    #[builder(default)]
    pub transaction_message: Option<String>,
    #[builder(default)]
    pub transaction_ref: Option<String>,
    #[builder(default)]
    pub transaction_amount: Option<f64>,
    /// Name of a payment plan to attach.
    #[builder(default)]
    pub plan: Option<String>,
    #[builder(default)]
    pub subscription_start: Option<String>,
    #[builder(default)]
    pub subscription_recurrence: Option<String>,
    #[builder(default)]
    pub subscription_message: Option<String>,
    #[builder(default)]
    pub subscription_ref: Option<String>,
    #[builder(default)]
    pub subscription_amount: Option<f64>,
    #[builder(default)]
    pub subscription_stop_after: Option<u32>,
    /// Only create a new mandate if no valid one exists for this customer.
    #[builder(default)]
    pub check: Option<bool>,
    #[builder(default)]
    pub send_invite: Option<bool>,
    #[builder(default)]
    pub require_validation: Option<bool>,
    #[builder(default)]
    pub reminder_days: Option<u32>,
}

impl InviteRequest {
    /// Returns a request for the given template, without any other field.
    pub fn new(ct: u64) -> Self {
        Self {
            ct,
            customer: None,
            account: None,
            l: None,
            mandate_number: None,
            contract_number: None,
            campaign: None,
            prefix: None,
            ed: None,
            token: None,
            document: None,
            transaction_message: None,
            transaction_ref: None,
            transaction_amount: None,
            plan: None,
            subscription_start: None,
            subscription_recurrence: None,
            subscription_message: None,
            subscription_ref: None,
            subscription_amount: None,
            subscription_stop_after: None,
            check: None,
            send_invite: None,
            require_validation: None,
            reminder_days: None,
        }
    }

    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("ct", self.ct);
        if let Some(account) = &self.account {
            account.push_into(&mut form);
        }
        if let Some(customer) = &self.customer {
            customer.push_into(&mut form, "vatno");
        }
        form.push_opt(
            "l",
            self.l
                .or_else(|| self.customer.as_ref().and_then(|c| c.lang)),
        )
        .push_opt("mandateNumber", self.mandate_number.as_deref())
        .push_opt("contractNumber", self.contract_number.as_deref())
        .push_opt("campaign", self.campaign.as_deref())
        .push_opt("prefix", self.prefix.as_deref())
        .push_opt("ed", self.ed)
        .push_opt("token", self.token.as_deref())
        .push_opt("document", self.document.as_deref())
        .push_opt("transactionMessage", self.transaction_message.as_deref())
        .push_opt("transactionRef", self.transaction_ref.as_deref())
        .push_opt("plan", self.plan.as_deref())
        .push_opt("subscriptionStart", self.subscription_start.as_deref())
        .push_opt("subscriptionRecurrence", self.subscription_recurrence.as_deref())
        .push_opt("subscriptionMessage", self.subscription_message.as_deref())
        .push_opt("subscriptionRef", self.subscription_ref.as_deref())
        .push_opt("subscriptionAmount", self.subscription_amount)
        .push_opt("subscriptionStopAfter", self.subscription_stop_after)
        .push_opt("check", self.check)
        .push_opt("sendInvite", self.send_invite)
        .push_opt("requireValidation", self.require_validation)
        .push_opt("reminderDays", self.reminder_days)
        .push_opt("transactionAmount", self.transaction_amount);
        form
    }
}

/// The way a mandate created through `/sign` was signed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum SignMethod {
    #[serde(rename = "sms")]
    Sms,
    #[serde(rename = "digisign")]
    Digisign,
    #[serde(rename = "import")]
    Import,
    #[serde(rename = "itsme")]
    Itsme,
    #[serde(rename = "emachtiging")]
    Emachtiging,
    #[serde(rename = "paper")]
    Paper,
    #[serde(rename = "iDIN")]
    Idin,
}

impl fmt::Display for SignMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignMethod::Sms => "sms",
            SignMethod::Digisign => "digisign",
            SignMethod::Import => "import",
            SignMethod::Itsme => "itsme",
            SignMethod::Emachtiging => "emachtiging",
            SignMethod::Paper => "paper",
            SignMethod::Idin => "iDIN",
        })
    }
}

/// Request to create a mandate that is signed in the same call.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct SignRequest {
    pub invite: InviteRequest,
    pub method: SignMethod,
    /// Signature as a base64 encoded image, for `digisign`.
    #[builder(default)]
    pub digsig: Option<String>,
    /// Key returned by a previous invite, to sign that mandate.
    #[builder(default)]
    pub key: Option<String>,
    #[builder(default)]
    pub sign_date: Option<String>,
    #[builder(default)]
    pub place: Option<String>,
    /// Whether a B2B mandate is offered to the bank for signature.
    #[builder(default = "true")]
    pub bank_signature: bool,
}

impl SignRequest {
    pub fn to_form(&self) -> FormParams {
        let mut form = self.invite.to_form();
        form.push("method", self.method)
            .push_opt("digsig", self.digsig.as_deref())
            .push_opt("key", self.key.as_deref())
            .push_opt("signDate", self.sign_date.as_deref())
            .push_opt("place", self.place.as_deref())
            .push("bankSignature", self.bank_signature);
        form
    }
}

/// Actions that can be triggered on an existing mandate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum MandateActionType {
    /// Send the invite again.
    Invite,
    /// Send a reminder.
    Reminder,
    /// Send the debtor a link to access the mandate.
    Access,
    /// Run the automatic validation of the mandate.
    AutomaticCheck,
    /// Mark the mandate as manually checked.
    ManualCheck,
}

impl fmt::Display for MandateActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MandateActionType::Invite => "invite",
            MandateActionType::Reminder => "reminder",
            MandateActionType::Access => "access",
            MandateActionType::AutomaticCheck => "automaticCheck",
            MandateActionType::ManualCheck => "manualCheck",
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Builder)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
pub struct MandateActionRequest {
    pub mandate_number: String,
    pub action: MandateActionType,
    /// Which reminder to send, from 1 to 4.
    #[builder(default)]
    pub reminder: Option<u8>,
}

impl MandateActionRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.reminder {
            Some(Some(reminder)) if !(1..=4).contains(&reminder) => {
                Err(format!("reminder must be between 1 and 4, got {}", reminder))
            }
            _ => Ok(()),
        }
    }
}

impl MandateActionRequest {
    /// The mandate number travels in the path, not in the form.
    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("type", self.action)
            .push_opt("reminder", self.reminder);
        form
    }
}

/// Search for contracts by debtor.
#[derive(Debug, Clone, Default, Eq, PartialEq, Builder)]
#[builder(default, setter(into, strip_option))]
pub struct MandateQuery {
    pub iban: Option<String>,
    pub customer_number: Option<String>,
    pub email: Option<String>,
    pub state: Option<String>,
    pub page: Option<u32>,
}

impl MandateQuery {
    pub fn to_query(&self) -> FormParams {
        let mut query = FormParams::new();
        query
            .push_opt("iban", self.iban.as_deref())
            .push_opt("customerNumber", self.customer_number.as_deref())
            .push_opt("email", self.email.as_deref())
            .push_opt("state", self.state.as_deref())
            .push_opt("page", self.page);
        query
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Builder)]
#[builder(setter(into))]
pub struct MandateDetailRequest {
    pub mandate_number: String,
    /// Also return mandates that are not signed yet.
    #[builder(default)]
    pub force: bool,
}

impl MandateDetailRequest {
    pub fn to_query(&self) -> FormParams {
        let mut query = FormParams::new();
        query
            .push("mndtId", &self.mandate_number)
            .push("force", self.force);
        query
    }
}

/// Request to update the details of an existing mandate.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct UpdateMandateRequest {
    pub mandate_number: String,
    /// Move the mandate to another template.
    #[builder(default)]
    pub ct: Option<u64>,
    /// `active` or `passive`.
    #[builder(default)]
    pub state: Option<String>,
    #[builder(default)]
    pub account: Option<Account>,
    #[builder(default)]
    pub customer: Option<Customer>,
}

impl UpdateMandateRequest {
    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("mndtId", &self.mandate_number)
            .push_opt("ct", self.ct)
            .push_opt("state", self.state.as_deref());
        if let Some(account) = &self.account {
            account.push_into(&mut form);
        }
        if let Some(customer) = &self.customer {
            customer.push_into(&mut form, "coc");
            form.push_opt("l", customer.lang);
        }
        form
    }
}

/// Upload of a signed mandate document.
#[derive(Clone, Eq, PartialEq)]
pub struct UploadPdfRequest {
    pub mandate_number: String,
    pub pdf: Vec<u8>,
    /// Whether a B2B mandate is offered to the bank for signature.
    pub bank_signature: bool,
}

impl UploadPdfRequest {
    pub fn new(mandate_number: impl Into<String>, pdf: Vec<u8>) -> Self {
        Self {
            mandate_number: mandate_number.into(),
            pdf,
            bank_signature: false,
        }
    }

    pub fn to_query(&self) -> FormParams {
        let mut query = FormParams::new();
        query
            .push("mndtId", &self.mandate_number)
            .push("bankSignature", self.bank_signature);
        query
    }
}

impl fmt::Debug for UploadPdfRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadPdfRequest")
            .field("mandate_number", &self.mandate_number)
            .field("size", &self.pdf.len())
            .field("bank_signature", &self.bank_signature)
            .finish()
    }
}

/// Response to an invite or sign request.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct MandateCreationResponse {
    #[serde(rename = "mndtId", alias = "MndtId")]
    pub mandate_number: String,
    /// Link to the signing page.
    pub url: Option<String>,
    /// Key to use when signing this mandate through `/sign`. Only returned by invites.
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct CustomerAccessResponse {
    pub token: String,
    pub url: String,
}

/// Summary of a contract, as returned by a query.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub mandate_number: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub sign_date: Option<String>,
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default)]
    pub bic: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ContractsResponse {
    #[serde(rename = "Contracts", default)]
    pub(crate) contracts: Vec<Contract>,
}

/// A mandate, flattened from the pain.012-like structure Twikey returns.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "RawMandate")]
pub struct Document {
    pub mandate_number: String,
    /// State of the mandate. Only known for responses carrying the `X-STATE` header.
    pub state: Option<String>,
    /// `CORE` or `B2B`.
    pub r#type: Option<String>,
    pub sequence_type: Option<String>,
    pub sign_date: Option<String>,
    pub debtor_name: Option<String>,
    pub debtor_street: Option<String>,
    pub debtor_city: Option<String>,
    pub debtor_zip: Option<String>,
    pub debtor_country: Option<String>,
    /// Company number of the debtor.
    pub debtor_company_id: Option<String>,
    pub country_of_residence: Option<String>,
    pub debtor_email: Option<String>,
    pub customer_number: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub debtor_bank: Option<String>,
    pub contract_number: Option<String>,
    pub supplementary_data: HashMap<String, String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawMandate {
    mndt_id: String,
    lcl_instrm: Option<String>,
    ocrncs: Option<RawOccurrences>,
    dbtr: Option<RawDebtor>,
    dbtr_acct: Option<String>,
    dbtr_agt: Option<RawDebtorAgent>,
    rfrd_doc: Option<String>,
    splmtry_data: Vec<RawKeyValue>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawOccurrences {
    seq_tp: Option<String>,
    drtn: Option<RawDuration>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawDuration {
    fr_dt: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawDebtor {
    nm: Option<String>,
    pstl_adr: Option<RawAddress>,
    id: Option<String>,
    ctry_of_res: Option<String>,
    ctct_dtls: Option<RawContactDetails>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawAddress {
    adr_line: Option<String>,
    twn_nm: Option<String>,
    pst_cd: Option<String>,
    ctry: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawContactDetails {
    email_adr: Option<String>,
    othr: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawDebtorAgent {
    fin_instn_id: Option<RawFinancialInstitution>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawFinancialInstitution {
    #[serde(rename = "BICFI")]
    bicfi: Option<String>,
    #[serde(rename = "Nm")]
    nm: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawKeyValue {
    key: String,
    #[serde(default)]
    value: serde_json::Value,
}

impl From<RawMandate> for Document {
    fn from(raw: RawMandate) -> Self {
        let ocrncs = raw.ocrncs.unwrap_or_default();
        let dbtr = raw.dbtr.unwrap_or_default();
        let address = dbtr.pstl_adr.unwrap_or_default();
        let contact = dbtr.ctct_dtls.unwrap_or_default();
        let agent = raw
            .dbtr_agt
            .and_then(|agent| agent.fin_instn_id)
            .unwrap_or_default();

        Document {
            mandate_number: raw.mndt_id,
            state: None,
            r#type: raw.lcl_instrm,
            sequence_type: ocrncs.seq_tp,
            sign_date: ocrncs.drtn.and_then(|drtn| drtn.fr_dt),
            debtor_name: dbtr.nm,
            debtor_street: address.adr_line,
            debtor_city: address.twn_nm,
            debtor_zip: address.pst_cd,
            debtor_country: address.ctry,
            debtor_company_id: dbtr.id,
            country_of_residence: dbtr.ctry_of_res,
            debtor_email: contact.email_adr,
            customer_number: contact.othr,
            iban: raw.dbtr_acct,
            bic: agent.bicfi,
            debtor_bank: agent.nm,
            contract_number: raw.rfrd_doc,
            supplementary_data: raw
                .splmtry_data
                .into_iter()
                .filter(|kv| !kv.key.is_empty())
                .map(|kv| {
                    let value = match kv.value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (kv.key, value)
                })
                .collect(),
        }
    }
}

/// Body of `/mandate/detail`.
#[derive(Deserialize, Debug)]
pub(crate) struct MandateDetailResponse {
    #[serde(rename = "Mndt")]
    pub(crate) mndt: Document,
}

/// A change to a mandate, as delivered by the mandate feed.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawDocumentEvent")]
pub enum DocumentEvent {
    /// A new mandate was signed.
    New {
        document: Document,
        event_time: Option<String>,
    },
    /// An existing mandate was amended.
    Updated {
        document: Document,
        /// Mandate number before the amendment.
        original_mandate_number: String,
        reason: Option<String>,
        author: Option<String>,
        event_time: Option<String>,
    },
    /// A mandate was cancelled.
    Cancelled {
        mandate_number: String,
        reason: Option<String>,
        author: Option<String>,
        event_time: Option<String>,
    },
}

impl DocumentEvent {
    /// Mandate number the event refers to.
    pub fn mandate_number(&self) -> &str {
        match self {
            DocumentEvent::New { document, .. } | DocumentEvent::Updated { document, .. } => {
                &document.mandate_number
            }
            DocumentEvent::Cancelled { mandate_number, .. } => mandate_number,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDocumentEvent {
    mndt: Option<Document>,
    orgnl_mndt_id: Option<String>,
    #[serde(default, deserialize_with = "present")]
    cxl_rsn: Option<Option<RawReason>>,
    #[serde(default, deserialize_with = "present")]
    amdmnt_rsn: Option<Option<RawReason>>,
    evt_time: Option<String>,
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawReason {
    rsn: Option<String>,
    orgtr: Option<RawOriginator>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawOriginator {
    nm: Option<String>,
}

impl RawReason {
    fn into_parts(self) -> (Option<String>, Option<String>) {
        (self.rsn, self.orgtr.and_then(|orgtr| orgtr.nm))
    }
}

impl TryFrom<RawDocumentEvent> for DocumentEvent {
    type Error = String;

    fn try_from(raw: RawDocumentEvent) -> Result<Self, Self::Error> {
        if let Some(cxl_rsn) = raw.cxl_rsn {
            let (reason, author) = cxl_rsn.unwrap_or_default().into_parts();
            let mandate_number = raw
                .orgnl_mndt_id
                .or_else(|| raw.mndt.map(|mndt| mndt.mandate_number))
                .ok_or("cancelled mandate without OrgnlMndtId")?;
            return Ok(DocumentEvent::Cancelled {
                mandate_number,
                reason,
                author,
                event_time: raw.evt_time,
            });
        }

        let document = raw.mndt.ok_or("mandate event without Mndt")?;

        match raw.amdmnt_rsn {
            Some(amdmnt_rsn) => {
                let (reason, author) = amdmnt_rsn.unwrap_or_default().into_parts();
                Ok(DocumentEvent::Updated {
                    original_mandate_number: raw
                        .orgnl_mndt_id
                        .unwrap_or_else(|| document.mandate_number.clone()),
                    document,
                    reason,
                    author,
                    event_time: raw.evt_time,
                })
            }
            None => Ok(DocumentEvent::New {
                document,
                event_time: raw.evt_time,
            }),
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct MandateFeedPage {
    #[serde(rename = "Messages")]
    messages: Vec<DocumentEvent>,
}

impl FeedPage for MandateFeedPage {
    type Entry = DocumentEvent;

    fn into_entries(self) -> Vec<DocumentEvent> {
        self.messages
    }
}
