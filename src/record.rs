//! DNS records as the Porkbun API models them.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// The minimum TTL the API allows, and the one it applies when none is given.
pub const DEFAULT_TTL: i64 = 300;

/// Record types the API accepts.
///
/// [`Record`] keeps its type as a plain string, so this is only a convenience
/// for building and inspecting records. Types outside this list are passed
/// through to the API untouched.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Mx,
    Cname,
    Alias,
    Txt,
    Ns,
    Aaaa,
    Srv,
    Tlsa,
    Caa,
    Https,
    Svcb,
}

impl RecordType {
    /// Gets the string representation of the type.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// A DNS record.
///
/// Used both as the payload for creating and editing records, and as the
/// decoded form of records returned by the API.
///
/// # Examples
///
/// ```
/// use porkbun::record::{Record, RecordType};
///
/// let record = Record::new(RecordType::Txt, "hello")
///     .with_name("_acme-challenge")
///     .with_ttl(600);
///
/// assert_eq!(record.type_, "TXT");
/// assert_eq!(record.record_type(), Ok(RecordType::Txt));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by the API, absent on records that haven't been created yet.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_to_option_i64"
    )]
    pub id: Option<i64>,
    /// The subdomain, not including the domain itself.
    ///
    /// Leave empty to target the root domain, use `*` for a wildcard record.
    /// The API reports the full name when retrieving records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub content: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_to_option_i64"
    )]
    pub ttl: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_to_option_i64"
    )]
    pub prio: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record {
    /// Creates a record of the given type with the given content.
    pub fn new(type_: RecordType, content: impl Into<String>) -> Self {
        Self {
            type_: type_.as_str().to_string(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_prio(mut self, prio: i64) -> Self {
        self.prio = Some(prio);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Parses the type string into a [`RecordType`].
    pub fn record_type(&self) -> Result<RecordType, strum::ParseError> {
        self.type_.parse()
    }
}

/// An `A` or `AAAA` record pointing at the address.
impl From<IpAddr> for Record {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(addr) => Record::new(RecordType::A, addr.to_string()),
            IpAddr::V6(addr) => Record::new(RecordType::Aaaa, addr.to_string()),
        }
    }
}

/// New content for every record matching a domain, type and subdomain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameTypeUpdate {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prio: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NameTypeUpdate {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Helper type for deserializing a string or an i64 to an i64.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrI64 {
    I64(i64),
    String(String),
}

pub(crate) fn deserialize_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let string_or_i64 = StringOrI64::deserialize(deserializer)?;
    Ok(match string_or_i64 {
        StringOrI64::I64(i) => i,
        StringOrI64::String(s) => s.parse().map_err(D::Error::custom)?,
    })
}

/// Like [`deserialize_to_i64`], but `null` and `""` both become `None`.
pub(crate) fn deserialize_to_option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let string_or_i64 = Option::<StringOrI64>::deserialize(deserializer)?;
    Ok(match string_or_i64 {
        Some(StringOrI64::I64(i)) => Some(i),
        Some(StringOrI64::String(s)) if s.is_empty() => None,
        Some(StringOrI64::String(s)) => Some(s.parse().map_err(D::Error::custom)?),
        None => None,
    })
}
