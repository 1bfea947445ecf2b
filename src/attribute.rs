//! Canonical attribute schema and projection
//!
//! [`ATTRIBUTES`] is the one table that maps an external attribute name
//! (`id`, `siblings-spouses`, ...) to the `Passenger` field it reads.
//! Attribute filter validation, projection and the JSON shape of a full
//! record are all driven by it.

use crate::passenger::Passenger;
use crate::{Error, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Upper bound on the number of comma separated tokens in a filter.
pub const MAX_ATTRIBUTES: usize = 256;

/// A field value read off a record, keeping its native type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl Serialize for AttributeValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            AttributeValue::Int(v) => serializer.serialize_i64(*v),
            AttributeValue::Float(v) => serializer.serialize_f64(*v),
            AttributeValue::Text(v) => serializer.serialize_str(v),
        }
    }
}

impl std::fmt::Display for AttributeValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => write!(f, "{}", v),
        }
    }
}

type Accessor = for<'a> fn(&'a Passenger) -> AttributeValue<'a>;

/// One entry of the canonical schema.
pub struct Attribute {
    pub name: &'static str,
    accessor: Accessor,
}

impl Attribute {
    /// Read this attribute off a record
    pub fn read<'a>(&self, passenger: &'a Passenger) -> AttributeValue<'a> {
        (self.accessor)(passenger)
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Attribute").field(&self.name).finish()
    }
}

/// External attribute names in response order.
pub static ATTRIBUTES: [Attribute; 12] = [
    Attribute { name: "id", accessor: |p| AttributeValue::Int(p.passenger_id) },
    Attribute { name: "survived", accessor: |p| AttributeValue::Int(p.survived) },
    Attribute { name: "class", accessor: |p| AttributeValue::Int(p.pclass) },
    Attribute { name: "name", accessor: |p| AttributeValue::Text(p.name.as_str()) },
    Attribute { name: "sex", accessor: |p| AttributeValue::Text(p.sex.as_str()) },
    Attribute { name: "age", accessor: |p| AttributeValue::Text(p.age.as_str()) },
    Attribute { name: "siblings-spouses", accessor: |p| AttributeValue::Int(p.sib_sp) },
    Attribute { name: "parents-children", accessor: |p| AttributeValue::Int(p.parch) },
    Attribute { name: "ticket", accessor: |p| AttributeValue::Text(p.ticket.as_str()) },
    Attribute { name: "fare", accessor: |p| AttributeValue::Float(p.fare) },
    Attribute { name: "cabin", accessor: |p| AttributeValue::Text(p.cabin.as_str()) },
    Attribute { name: "embarked", accessor: |p| AttributeValue::Text(p.embarked.as_str()) },
];

/// Look up a schema entry by its external name
pub fn lookup(name: &str) -> Option<&'static Attribute> {
    ATTRIBUTES.iter().find(|a| a.name == name)
}

impl Serialize for Passenger {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ATTRIBUTES.len()))?;
        for attribute in ATTRIBUTES.iter() {
            map.serialize_entry(attribute.name, &attribute.read(self))?;
        }
        map.end()
    }
}

/// A validated list of requested attributes.
///
/// An empty filter means "no filtering": [`AttributeFilter::apply`] then
/// yields the full record.
#[derive(Debug, Clone, Default)]
pub struct AttributeFilter {
    attributes: Vec<&'static Attribute>,
}

impl AttributeFilter {
    /// Validate a raw comma separated list such as `"id,name, age"`.
    ///
    /// The token count is checked before any name. Tokens are trimmed and
    /// scanned left to right; the first unknown or repeated name fails.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
        if tokens.len() > MAX_ATTRIBUTES {
            return Err(Error::TooManyAttributes { max: MAX_ATTRIBUTES });
        }

        let mut seen = HashSet::new();
        let mut attributes = Vec::with_capacity(tokens.len());
        for token in tokens {
            let attribute = lookup(token).ok_or_else(|| Error::InvalidAttribute(token.to_string()))?;
            if !seen.insert(attribute.name) {
                return Err(Error::DuplicateAttribute(token.to_string()));
            }
            attributes.push(attribute);
        }

        Ok(Self { attributes })
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Requested names in request order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().map(|a| a.name)
    }

    /// Narrow a record to the requested attributes.
    pub fn apply<'a>(&self, passenger: &'a Passenger) -> Projection<'a> {
        if self.is_empty() {
            return Projection::Full(passenger);
        }

        let fields = self
            .attributes
            .iter()
            .map(|a| (a.name, a.read(passenger)))
            .collect();
        Projection::Fields(fields)
    }
}

/// Either the whole record or a name to value map of selected fields.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Projection<'a> {
    Full(&'a Passenger),
    Fields(BTreeMap<&'static str, AttributeValue<'a>>),
}

impl<'a> Projection<'a> {
    /// `(name, value)` pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, AttributeValue<'a>)> {
        match self {
            Projection::Full(p) => ATTRIBUTES.iter().map(|a| (a.name, a.read(p))).collect(),
            Projection::Fields(fields) => fields.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }
}

/// Check a raw attribute list without touching any record.
pub fn validate(raw: &str) -> Result<()> {
    AttributeFilter::parse(raw).map(|_| ())
}

/// Validate `raw` and project `passenger` onto it.
pub fn project<'a>(passenger: &'a Passenger, raw: &str) -> Result<Projection<'a>> {
    Ok(AttributeFilter::parse(raw)?.apply(passenger))
}
