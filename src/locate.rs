//! Find the feed entry for one rate series and pull its date and value out of it.

use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::xml::Element;

/// How the value of a rate is scoped within the feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Lookup {
    /// Match an `<item>` containing the rate name anywhere; read the value from its first
    /// `<observation>`
    Item,
    /// Match the `<observation>` carrying the rate name and read the value from it
    #[default]
    Observation,
}

/// A matched entry. `observation` is where the value is read from.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub item: &'a Element,
    pub observation: &'a Element,
}

/// Raw text of the fields of a matched entry, trimmed but not yet normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields<'a> {
    pub date: &'a str,
    pub value: &'a str,
}

fn has_rate_name(el: &Element, rate_name: &str) -> bool {
    el.named("rateName")
        .any(|rn| rn.text.trim() == rate_name)
}

/// First `<item>` with a `<rateName>` equal to `rate_name` anywhere inside it.
pub fn find_item<'a>(root: &'a Element, rate_name: &str) -> Result<&'a Element> {
    root.named("item")
        .find(|item| has_rate_name(item, rate_name))
        .ok_or_else(|| Error::NotFound {
            what: "item",
            rate_name: rate_name.to_string(),
        })
}

/// First `<observation>` inside an `<item>` whose `<rateName>` equals `rate_name`, along with
/// the item that owns it.
pub fn find_observation<'a>(root: &'a Element, rate_name: &str) -> Result<Match<'a>> {
    root.named("item")
        .flat_map(|item| {
            item.named("observation")
                .map(move |observation| Match { item, observation })
        })
        .find(|m| has_rate_name(m.observation, rate_name))
        .ok_or_else(|| Error::NotFound {
            what: "observation",
            rate_name: rate_name.to_string(),
        })
}

pub fn locate<'a>(root: &'a Element, rate_name: &str, lookup: Lookup) -> Result<Match<'a>> {
    match lookup {
        Lookup::Observation => find_observation(root, rate_name),
        Lookup::Item => {
            let item = find_item(root, rate_name)?;
            let observation = item
                .named("observation")
                .next()
                .ok_or(Error::MissingField("observation/value"))?;
            Ok(Match { item, observation })
        }
    }
}

/// First non-blank `<date>` within the item.
pub fn extract_date<'a>(item: &'a Element) -> Result<&'a str> {
    item.find_text("date").ok_or(Error::MissingField("date"))
}

/// Text of the first `<value>` within the observation, which must not be blank.
pub fn extract_value<'a>(observation: &'a Element) -> Result<&'a str> {
    observation
        .named("value")
        .next()
        .map(|v| v.text.trim())
        .filter(|text| !text.is_empty())
        .ok_or(Error::MissingField("observation/value"))
}

impl<'a> Match<'a> {
    pub fn fields(&self) -> Result<Fields<'a>> {
        Ok(Fields {
            date: extract_date(self.item)?,
            value: extract_value(self.observation)?,
        })
    }
}
