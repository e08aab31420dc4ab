//! Query parameters for upstream requests.
//!
//! The upstream API reads structured filters out of bracketed query keys, e.g.
//! `filter[matches.status][in]=current` or `page[limit]=100`. A
//! [`ParameterMapping`] holds those pairs in insertion order, never holds the same
//! key twice, and applies a single coercion rule to every value when encoded.

use std::fmt;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap as _, Serializer};

use crate::Result;

/// Date format the upstream expects for date-only filters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A scalar query parameter value.
///
/// Every variant is rendered to its wire form at encode time: booleans as
/// `true`/`false`, integers in base 10, dates as `YYYY-MM-DD`, and lists as
/// comma-joined elements.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Bool(bool),
    Date(NaiveDate),
    List(Vec<ParamValue>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::UInt(u64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Filter operators understood by the upstream API.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    In,
    Lt,
    Gt,
    Overlap,
    Or,
}

impl Operator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::In => "in",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Overlap => "overlap",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, duplicate-free set of query parameters.
///
/// # Example
///
/// ```
/// use cs2api::params::{Operator, ParameterMapping};
///
/// let params = ParameterMapping::new()
///     .page(0, 100)
///     .filter("matches.status", Operator::In, "current")
///     .filter("matches.discipline_id", Operator::Eq, 1_u32);
///
/// assert_eq!(
///     params.get("filter[matches.discipline_id][eq]").map(ToString::to_string),
///     Some("1".to_owned())
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMapping {
    pairs: Vec<(String, ParamValue)>,
}

impl ParameterMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing (in place) any value already held for `key`.
    ///
    /// Returns the replaced value.
    pub fn set<K: Into<String>, V: Into<ParamValue>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();

        if let Some((_, existing)) = self.pairs.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }

        self.pairs.push((key, value));
        None
    }

    /// Chaining form of [`Self::set`].
    #[must_use]
    pub fn param<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    /// `page[offset]` and `page[limit]`.
    #[must_use]
    pub fn page(self, offset: u32, limit: u32) -> Self {
        self.param("page[offset]", offset)
            .param("page[limit]", limit)
    }

    /// Comma-separated sort fields, `-` prefix for descending.
    #[must_use]
    pub fn sort(self, fields: &str) -> Self {
        self.param("sort", fields)
    }

    #[must_use]
    pub fn scope(self, scope: &str) -> Self {
        self.param("scope", scope)
    }

    /// Related resources to embed, sent as `with`.
    #[must_use]
    pub fn embed(self, relations: &str) -> Self {
        self.param("with", relations)
    }

    /// `filter[<field>][<op>]`.
    #[must_use]
    pub fn filter<V: Into<ParamValue>>(self, field: &str, op: Operator, value: V) -> Self {
        self.param(format!("filter[{field}][{op}]"), value)
    }

    /// `filter[<name>]`, for filters the upstream takes without an operator.
    #[must_use]
    pub fn filter_key<V: Into<ParamValue>>(self, name: &str, value: V) -> Self {
        self.param(format!("filter[{name}]"), value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encodes the mapping as `application/x-www-form-urlencoded`, without a leading `?`.
    ///
    /// The same mapping always encodes to the same bytes.
    pub fn encode(&self) -> Result<String> {
        serde_html_form::to_string(self).map_err(|e| {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, "unable to encode query parameters");
            e.into()
        })
    }

    /// Like [`Self::encode`] but prefixed with `?`, or empty when there is nothing to send.
    pub fn query_string(&self) -> Result<String> {
        let encoded = self.encode()?;
        if encoded.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("?{encoded}"))
        }
    }
}

impl Serialize for ParameterMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (key, value) in &self.pairs {
            map.serialize_entry(key, &value.to_string())?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (key, value) in iter {
            mapping.set(key, value);
        }
        mapping
    }
}
