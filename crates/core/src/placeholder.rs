//! Placeholder tokens standing in for asset paths until relocation.
//!
//! A token is `sitcom-asset-` followed by the first 16 hex digits of the
//! SHA-1 digest of the origin string. Tokens are plain `[a-z0-9-]` text so
//! they pass unchanged through attribute escaping and template rendering.
//! Distinct origins sharing a token are not detected; they would share one
//! registry slot.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

const PREFIX: &str = "sitcom-asset-";
const DIGITS: usize = 16;

/// A synthetic token embedded in HTML in place of an unresolved path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placeholder(String);

impl Placeholder {
    /// Computes the token for `origin`.
    pub fn for_origin(origin: &str) -> Self {
        let digest = sha1_smol::Sha1::from(origin).digest().to_string();
        Self(format!("{PREFIX}{}", &digest[..DIGITS]))
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replaces every occurrence of this token in `text`.
    pub fn substitute(&self, text: &str, with: &str) -> String {
        text.replace(&self.0, with)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Placeholder {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Memoized origin to token table, scoped to one compilation.
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    memo: Rc<RefCell<HashMap<String, Placeholder>>>,
}

impl Placeholders {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token for `origin`, computing it on first use.
    pub fn token(&self, origin: &str) -> Placeholder {
        if let Some(hit) = self.memo.borrow().get(origin) {
            return hit.clone();
        }
        let token = Placeholder::for_origin(origin);
        self.memo
            .borrow_mut()
            .insert(origin.to_string(), token.clone());
        token
    }

    /// Number of memoized origins.
    pub fn len(&self) -> usize {
        self.memo.borrow().len()
    }

    /// True when nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.memo.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_and_distinct() {
        let a = Placeholder::for_origin("/site/img.png");
        assert_eq!(a, Placeholder::for_origin("/site/img.png"));
        assert_ne!(a, Placeholder::for_origin("/site/img2.png"));
        assert!(a.as_str().starts_with("sitcom-asset-"));
        assert_eq!(a.as_str().len(), "sitcom-asset-".len() + 16);
        assert!(
            a.as_str()
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        );
    }

    #[test]
    fn table_memoizes_per_scope() {
        let table = Placeholders::new();
        let shared = table.clone();
        let first = table.token("a.png");
        assert_eq!(shared.token("a.png"), first);
        assert_eq!(table.len(), 1);
        assert!(Placeholders::new().is_empty());
    }

    #[test]
    fn substitute_replaces_all() {
        let token = Placeholder::for_origin("x");
        let html = format!("<img src=\"{token}\"><a href=\"{token}\">");
        assert_eq!(token.substitute(&html, "x.png"), "<img src=\"x.png\"><a href=\"x.png\">");
    }
}
