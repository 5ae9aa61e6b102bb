// Default URLs
pub static DEFAULT_PRODUCTION_URL: &str = "https://api.twikey.com/creditor";
pub static DEFAULT_TEST_URL: &str = "https://api.beta.twikey.com/creditor";

// Header names
pub static API_ERROR_HEADER: &str = "ApiError";
pub static RESET_HEADER: &str = "X-RESET";
pub static STATE_HEADER: &str = "X-STATE";
pub static MANUAL_HEADER: &str = "X-MANUAL";
pub static INVOICE_ID_HEADER: &str = "X-INVOICE-ID";

// Content types
pub static FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub static PDF_CONTENT_TYPE: &str = "application/pdf";
pub static XML_CONTENT_TYPE: &str = "application/xml";

/// Extracts the file name from a `Content-Disposition` header value.
///
/// The extended `filename*=` form is percent-decoded after its `charset''` prefix.
pub(crate) fn filename_from_content_disposition(disposition: &str) -> Option<String> {
    for part in disposition.split(';').map(str::trim) {
        if let Some(value) = part.strip_prefix("filename*=") {
            let encoded = match value.find("''") {
                Some(idx) if idx > 0 => &value[idx + 2..],
                _ => return Some(value.to_string()),
            };
            return Some(
                urlencoding::decode(encoded)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| encoded.to_string()),
            );
        }

        if let Some(value) = part.strip_prefix("filename=") {
            let value = value.strip_prefix('"').unwrap_or(value);
            let value = value.strip_suffix('"').unwrap_or(value);
            return Some(value.to_string());
        }
    }

    None
}
