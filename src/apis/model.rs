use crate::{apis::FormParams, common::filename_from_content_disposition, feed::FeedPage, Error};
use derive_builder::Builder;
use reqwest::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fmt, path::Path};

/// Languages supported by Twikey for communication with a debtor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Nl,
    Fr,
    En,
    Pt,
    Es,
    It,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Nl => "nl",
            Language::Fr => "fr",
            Language::En => "en",
            Language::Pt => "pt",
            Language::Es => "es",
            Language::It => "it",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A debtor (or beneficiary) as known by Twikey.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq, Builder)]
#[builder(default, setter(into, strip_option))]
pub struct Customer {
    #[serde(rename = "customerNumber", skip_serializing_if = "Option::is_none")]
    pub customer_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(rename = "l", skip_serializing_if = "Option::is_none")]
    pub lang: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(rename = "address", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "companyName", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Chamber of commerce or VAT number of the company.
    #[serde(rename = "vatno", alias = "coc", skip_serializing_if = "Option::is_none")]
    pub coc: Option<String>,
}

impl Customer {
    /// Appends the customer fields to a form, except for the language which every
    /// endpoint carries in its own `l` field.
    ///
    /// Depending on the endpoint, the company number is expected as `vatno` or `coc`.
    pub(crate) fn push_into(&self, form: &mut FormParams, coc_field: &str) {
        form.push_opt("customerNumber", self.customer_number.as_deref())
            .push_opt("email", self.email.as_deref())
            .push_opt("firstname", self.firstname.as_deref())
            .push_opt("lastname", self.lastname.as_deref())
            .push_opt("mobile", self.mobile.as_deref())
            .push_opt("address", self.street.as_deref())
            .push_opt("city", self.city.as_deref())
            .push_opt("zip", self.zip.as_deref())
            .push_opt("country", self.country.as_deref())
            .push_opt("companyName", self.company_name.as_deref());
        if self.company_name.is_some() {
            form.push_opt(coc_field, self.coc.as_deref());
        }
    }
}

/// A bank account.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct Account {
    pub iban: String,
    #[serde(default)]
    pub bic: String,
}

impl Account {
    pub fn new(iban: impl Into<String>, bic: impl Into<String>) -> Self {
        Self {
            iban: iban.into(),
            bic: bic.into(),
        }
    }

    pub(crate) fn push_into(&self, form: &mut FormParams) {
        form.push("iban", &self.iban).push("bic", &self.bic);
    }
}

/// A PDF (or other binary document) downloaded from Twikey.
#[derive(Clone, Eq, PartialEq)]
pub struct PdfDocument {
    pub content: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl PdfDocument {
    pub(crate) async fn from_response(
        res: Response,
        default_filename: &str,
    ) -> Result<Self, Error> {
        let filename = res
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_content_disposition)
            .unwrap_or_else(|| default_filename.to_string());
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(crate::common::PDF_CONTENT_TYPE)
            .to_string();

        Ok(Self {
            content: res.bytes().await?.to_vec(),
            filename,
            content_type,
        })
    }

    /// Writes the document to `dir`, using the file name returned by Twikey.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> std::io::Result<std::path::PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

impl fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfDocument")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.content.len())
            .finish()
    }
}

/// Response of endpoints returning their results under an `Entries` array.
#[derive(Deserialize, Debug)]
pub(crate) struct Entries<T> {
    #[serde(rename = "Entries")]
    pub(crate) entries: Vec<T>,
}

impl<T> Entries<T> {
    /// Returns the first entry, failing if the server returned none.
    pub(crate) fn into_first(self) -> Result<T, Error> {
        self.entries
            .into_iter()
            .next()
            .ok_or_else(|| Error::Other(anyhow::anyhow!("Twikey returned no entries")))
    }
}

impl<T: DeserializeOwned> FeedPage for Entries<T> {
    type Entry = T;

    fn into_entries(self) -> Vec<T> {
        self.entries
    }
}
