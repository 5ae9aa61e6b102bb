//! Verification of signatures produced by Twikey and decryption of account information.
//!
//! Twikey signs the query string of every webhook call with the API key of the creditor
//! (the signature is sent in the `X-SIGNATURE` header), and signs the parameters appended to
//! exit URLs with the website key configured in the Twikey dashboard.

use crate::{apis::Account, error::Error};
use aes::Aes128;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Verifies the signature of an incoming webhook.
///
/// `signature` is the hex encoded HMAC-SHA256 of the raw `query_string`, keyed by the API key.
/// Returns `false` for any mismatch, including malformed hex.
///
/// ```rust
/// # use twikey_rust::signature::verify_webhook_signature;
/// assert!(!verify_webhook_signature("k", "deadbeef", "a=1"));
/// ```
pub fn verify_webhook_signature(api_key: &str, signature: &str, query_string: &str) -> bool {
    verify_hmac(api_key.as_bytes(), query_string.as_bytes(), signature)
}

/// Verifies the signature appended by Twikey to an exit URL.
///
/// The signed payload is `document/status`, followed by `/token` when a token is present.
pub fn verify_exit_url_signature(
    website_key: &str,
    document: &str,
    status: &str,
    token: Option<&str>,
    signature: &str,
) -> bool {
    let payload = match token {
        Some(token) => format!("{}/{}/{}", document, status, token),
        None => format!("{}/{}", document, status),
    };

    verify_hmac(website_key.as_bytes(), payload.as_bytes(), signature)
}

/// Decrypts the account information appended to an exit URL.
///
/// The AES-128-CBC key and IV are both the MD5 digest of `document` followed by `website_key`.
pub fn decrypt_account_information(
    website_key: &str,
    document: &str,
    encrypted_account: &str,
) -> Result<Account, Error> {
    let key = account_key(website_key, document);

    let mut buffer = hex::decode(encrypted_account)
        .map_err(|e| Error::DecryptionError(format!("invalid hex ciphertext: {}", e)))?;
    let plaintext = Aes128CbcDec::new(&key.into(), &key.into())
        .decrypt_padded_mut::<Pkcs7>(&mut buffer)
        .map_err(|_| Error::DecryptionError("invalid padding".to_string()))?;
    let plaintext = std::str::from_utf8(plaintext)
        .map_err(|e| Error::DecryptionError(format!("plaintext is not UTF-8: {}", e)))?;

    match plaintext.split_once('/') {
        Some((iban, bic)) => Ok(Account {
            iban: iban.to_string(),
            bic: bic.to_string(),
        }),
        None => Err(Error::DecryptionError(
            "plaintext is not in the form iban/bic".to_string(),
        )),
    }
}

fn account_key(website_key: &str, document: &str) -> [u8; 16] {
    md5::compute(format!("{}{}", document, website_key)).0
}

fn verify_hmac(key: &[u8], payload: &[u8], signature: &str) -> bool {
    let expected = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);

    // Constant time comparison
    mac.verify_slice(&expected).is_ok()
}
