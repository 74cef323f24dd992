//! Argument types for the operations that take item identifiers.

use crate::domain::enums::Locale;
use crate::utils::error::{Result, RsWikiError};
use chrono::NaiveDate;

/// One token of a mixed id/name batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemQuery {
    Id(u64),
    Name(String),
}

impl From<u64> for ItemQuery {
    fn from(id: u64) -> Self {
        ItemQuery::Id(id)
    }
}

impl From<&str> for ItemQuery {
    fn from(name: &str) -> Self {
        ItemQuery::Name(name.to_string())
    }
}

impl From<String> for ItemQuery {
    fn from(name: String) -> Self {
        ItemQuery::Name(name)
    }
}

impl std::str::FromStr for ItemQuery {
    type Err = RsWikiError;

    /// All-digit tokens are ids, anything else is a name.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RsWikiError::missing("ids_or_names"));
        }
        Ok(match trimmed.parse::<u64>() {
            Ok(id) => ItemQuery::Id(id),
            Err(_) => ItemQuery::Name(trimmed.to_string()),
        })
    }
}

/// Splits a batch into `(ids, names)`, each pipe-joined, `None` when empty.
///
/// The upstream API prefers ids when both are sent and drops the names.
pub fn partition_queries(queries: &[ItemQuery]) -> (Option<String>, Option<String>) {
    let mut ids = Vec::new();
    let mut names = Vec::new();
    for query in queries {
        match query {
            ItemQuery::Id(id) => ids.push(id.to_string()),
            ItemQuery::Name(name) => names.push(name.clone()),
        }
    }

    let join = |parts: Vec<String>| (!parts.is_empty()).then(|| parts.join("|"));
    (join(ids), join(names))
}

/// Single-item lookup by id or name for the historical price endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemLookup {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub locale: Option<Locale>,
}

impl ItemLookup {
    pub fn by_id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() && self.name.is_none() {
            return Err(RsWikiError::missing("id or name"));
        }
        Ok(())
    }
}

/// Optional window for Travelling Merchant searches. `end_at` and `count`
/// are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TmsSearchOptions {
    pub locale: Option<Locale>,
    pub start_at: Option<NaiveDate>,
    pub end_at: Option<NaiveDate>,
    pub count: Option<u32>,
}

impl TmsSearchOptions {
    pub fn validate(&self) -> Result<()> {
        if self.end_at.is_some() && self.count.is_some() {
            return Err(RsWikiError::conflicting(["end_at", "count"]));
        }
        Ok(())
    }
}
