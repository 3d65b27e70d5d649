//! Intro and outro text placed around every document of a bundle.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use sitcom_render::Heading;
use std::fmt;
use std::rc::Rc;

/// Callback producing wrap text from a document's state.
pub type WrapFn = Rc<dyn Fn(&mut WrapData) -> WrapValue>;

/// Intro or outro: literal text or a callback.
#[derive(Clone)]
pub enum Wrap {
    /// Inserted as is.
    Text(String),
    /// Called once per document.
    Func(WrapFn),
}

impl Wrap {
    /// Wraps a callback.
    pub fn func(f: impl Fn(&mut WrapData) -> WrapValue + 'static) -> Self {
        Wrap::Func(Rc::new(f))
    }
}

impl fmt::Debug for Wrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wrap::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Wrap::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for Wrap {
    fn from(text: &str) -> Self {
        Wrap::Text(text.to_string())
    }
}

impl<'de> Deserialize<'de> for Wrap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Wrap::Text)
    }
}

/// What a wrap callback returns.
pub enum WrapValue {
    /// Nothing is inserted.
    Empty,
    /// Inserted as is.
    Text(String),
    /// Called again with the same data.
    Func(WrapFn),
}

/// State handed to wrap callbacks.
///
/// Callbacks may rewrite `headings` and `data`; both are read back afterwards.
#[derive(Debug, Clone)]
pub struct WrapData {
    /// The document's headings.
    pub headings: Vec<Heading>,
    /// The document's rendered HTML.
    pub result: String,
    /// 1-based position of the document in its bundle.
    pub times: usize,
    /// Number of documents in the bundle.
    pub max_times: usize,
    /// Template data shared by the bundle.
    pub data: Map<String, Value>,
}

fn resolve(wrap: Option<&Wrap>, data: &mut WrapData) -> String {
    let mut value = match wrap {
        None => return String::new(),
        Some(Wrap::Text(text)) => return text.clone(),
        Some(Wrap::Func(f)) => f(data),
    };
    loop {
        value = match value {
            WrapValue::Empty => return String::new(),
            WrapValue::Text(text) => return text,
            WrapValue::Func(f) => f(data),
        };
    }
}

/// A heading is kept when its level is 1 to 6 and its title is not blank.
pub fn is_heading(heading: &Heading) -> bool {
    (1..=6).contains(&heading.level) && !heading.title.trim().is_empty()
}

/// Result of wrapping one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Wrapped {
    /// `intro + result + outro`.
    pub result: String,
    /// Headings left after the callbacks, filtered.
    pub headings: Vec<Heading>,
}

/// Wraps a document's HTML with `intro` and `outro`.
///
/// Keys the callbacks wrote into the data are merged into `shared`.
pub fn wrap_result(
    result: &str,
    headings: &[Heading],
    intro: Option<&Wrap>,
    outro: Option<&Wrap>,
    shared: &mut Map<String, Value>,
    times: usize,
    max_times: usize,
) -> Wrapped {
    let mut data = WrapData {
        headings: headings.to_vec(),
        result: result.to_string(),
        times,
        max_times,
        data: shared.clone(),
    };

    let intro = resolve(intro, &mut data);
    let outro = resolve(outro, &mut data);

    shared.extend(data.data);

    Wrapped {
        result: format!("{intro}{result}{outro}"),
        headings: data.headings.into_iter().filter(is_heading).collect(),
    }
}
