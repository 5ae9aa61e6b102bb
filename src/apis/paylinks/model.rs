use crate::{
    apis::{Customer, FormParams, Language},
    feed::FeedPage,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Request to create a link through which a customer can pay a given amount.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct PaylinkRequest {
    /// Template (profile) the paylink belongs to.
    pub ct: u64,
    pub amount: f64,
    #[builder(default)]
    pub customer: Option<Customer>,
    #[builder(default)]
    pub l: Option<Language>,
    #[builder(default)]
    pub title: Option<String>,
    /// Message shown to the customer on the payment page.
    #[builder(default)]
    pub message: Option<String>,
    #[builder(default)]
    pub reference: Option<String>,
    /// Remittance information used on the bank statement.
    #[builder(default)]
    pub remittance: Option<String>,
    #[builder(default)]
    pub redirect_url: Option<String>,
    #[builder(default)]
    pub place: Option<String>,
    /// Expiry of the link, as `YYYY-MM-DD`.
    #[builder(default)]
    pub expiry: Option<String>,
    /// Restricts the payment methods offered, e.g. `bancontact` or `ideal`.
    #[builder(default)]
    pub method: Option<String>,
    /// Invoice number the link pays for.
    #[builder(default)]
    pub invoice: Option<String>,
    #[builder(default)]
    pub send_invite: Option<bool>,
}

impl PaylinkRequest {
    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("ct", self.ct);
        if let Some(customer) = &self.customer {
            customer.push_into(&mut form, "coc");
        }
        form.push_opt(
            "l",
            self.l
                .or_else(|| self.customer.as_ref().and_then(|c| c.lang)),
        )
        .push_opt("title", self.title.as_deref())
        .push_opt("message", self.message.as_deref())
        .push_opt("ref", self.reference.as_deref())
        .push("amount", self.amount)
        .push_opt("remittance", self.remittance.as_deref())
        .push_opt("redirectUrl", self.redirect_url.as_deref())
        .push_opt("place", self.place.as_deref())
        .push_opt("expiry", self.expiry.as_deref())
        .push_opt("method", self.method.as_deref())
        .push_opt("invoice", self.invoice.as_deref())
        .push_opt("sendInvite", self.send_invite);
        form
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Paylink {
    pub id: u64,
    pub amount: f64,
    #[serde(rename = "msg", default)]
    pub message: Option<String>,
    pub url: String,
    #[serde(default)]
    pub r#ref: Option<String>,
    /// `created`, `started`, `paid`, `expired`, ...
    #[serde(default)]
    pub state: Option<String>,
}

/// The status endpoint answers either with a single link or with a `Links` array.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum PaylinkStatusResponse {
    Links {
        #[serde(rename = "Links")]
        links: Vec<Paylink>,
    },
    Single(Paylink),
}

#[derive(Deserialize, Debug)]
pub(crate) struct PaylinkFeedPage {
    #[serde(rename = "Links")]
    links: Vec<Paylink>,
}

impl FeedPage for PaylinkFeedPage {
    type Entry = Paylink;

    fn into_entries(self) -> Vec<Paylink> {
        self.links
    }
}
