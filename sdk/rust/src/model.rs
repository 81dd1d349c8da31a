//! Wire types shared by the proxy's development backend and the client.

use serde::{Deserialize, Deserializer, Serialize};

/// Message used when a submission lacks a name or an item.
pub const MISSING_FIELDS: &str = "Name and item are required";

/// `{success, data|error}` wrapper used by the upstream script and the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An RSVP as stored by the upstream sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    #[serde(deserialize_with = "cell_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "optional_cell_string", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    pub submitted_at: String,
}

/// A spreadsheet cell: sheets hand back numbers for digit-only values.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Text(String),
    Number(serde_json::Number),
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Text(text) => text,
            Cell::Number(number) => number.to_string(),
        }
    }
}

fn cell_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Cell::deserialize(deserializer).map(String::from)
}

fn optional_cell_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Cell>::deserialize(deserializer)?.map(String::from))
}

/// A submission before the store assigns an id and timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRsvp {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
}

impl NewRsvp {
    pub fn new(name: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item: item.into(),
            ..Self::default()
        }
    }

    /// Reject submissions whose name or item is blank.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() || self.item.trim().is_empty() {
            return Err(MISSING_FIELDS);
        }
        Ok(())
    }

    /// Trim every field; absent optionals become empty strings.
    pub fn normalized(&self) -> Self {
        let trim = |v: &Option<String>| Some(v.as_deref().unwrap_or_default().trim().to_string());
        Self {
            name: self.name.trim().to_string(),
            email: trim(&self.email),
            phone: trim(&self.phone),
            item: self.item.trim().to_string(),
            dietary_restrictions: trim(&self.dietary_restrictions),
        }
    }
}
