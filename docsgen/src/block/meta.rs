use std::fmt;

/// Options from a header's parenthetical, e.g. `(Table;Headers=A|B)`.
///
/// Tokens are separated by `;`. A token is either a bare flag or a
/// `key=value` pair split at the first `=`. Empty tokens are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    raw: String,
    options: Vec<(String, Option<String>)>,
}

impl Meta {
    pub fn parse(raw: &str) -> Self {
        let options = raw
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (key.trim().to_string(), Some(value.to_string())),
                None => (part.to_string(), None),
            })
            .collect();
        Meta {
            raw: raw.to_string(),
            options,
        }
    }

    /// The parenthetical text as written, without the parentheses.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// True when `key` is present, as a flag or with a value.
    pub fn has(&self, key: &str) -> bool {
        self.options.iter().any(|(k, _)| k == key)
    }

    /// Value of the first `key=value` option named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
