use url::form_urlencoded;

/// Ordered list of `key=value` pairs sent as a form body or as a query string.
///
/// Blank values are never recorded, so optional fields that were not set never reach the wire.
///
/// ```rust
/// # use twikey_rust::apis::FormParams;
/// let mut form = FormParams::new();
/// form.push("ct", 1420);
/// form.push_opt("email", None::<String>);
/// form.push("l", " ");
///
/// assert_eq!(form.encode(), "ct=1420");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair, unless the value renders to a blank string.
    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.0.push((key.to_string(), value));
        }
        self
    }

    /// Appends a pair only if a value is present and not blank.
    pub fn push_opt<T: ToString>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Appends every pair of another set, preserving order.
    pub fn extend(&mut self, other: FormParams) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    /// Returns the recorded pairs in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Returns the value recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes the pairs as `application/x-www-form-urlencoded` (spaces become `+`).
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}
