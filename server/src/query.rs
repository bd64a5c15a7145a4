//! List parameters to store query.
//!
//! # Design
//! Translation happens in two steps. `ListQuery::parse` turns the raw,
//! string-valued query parameters into a typed `ListQuery`, rejecting
//! anything malformed with a `QueryError`. `ListQuery::to_store_query` then
//! builds the `UserQuery`: the name filter, the sort key and the page
//! window, applied in that order.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use thiserror::Error;

use crate::model::UserField;
use crate::store::{Direction, Predicate, UserQuery};

pub const DEFAULT_PAGE: NonZeroU32 = NonZeroU32::MIN;
pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(5) {
    Some(limit) => limit,
    None => NonZeroU32::MIN,
};

/// Raw query parameters as they arrive on the collection endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub name: Option<String>,
    pub sort: Option<String>,
}

/// Collects decoded query-string pairs. A repeated parameter keeps its last
/// value; unknown parameters are ignored.
impl FromIterator<(String, String)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "name" => &mut params.name,
                "sort" => &mut params.sort,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("'{param}' must be a positive integer, got {value:?}")]
    NotPositiveInteger { param: &'static str, value: String },

    #[error("cannot sort by unknown field {0:?}")]
    UnknownSortField(String),

    #[error("page {page} with limit {limit} is out of range")]
    WindowOverflow { page: u32, limit: u32 },

    #[error("malformed query string: {0}")]
    Malformed(String),
}

/// A sort key: a field name, `-` prefixed for descending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: UserField,
    pub direction: Direction,
}

impl FromStr for SortSpec {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, name) = match s.strip_prefix('-') {
            Some(rest) => (Direction::Descending, rest),
            None => (Direction::Ascending, s),
        };
        let field = name
            .parse::<UserField>()
            .map_err(|_| QueryError::UnknownSortField(s.to_string()))?;
        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction == Direction::Descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_str())
    }
}

/// Validated list parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page: NonZeroU32,
    pub limit: NonZeroU32,
    pub name: Option<String>,
    pub sort: Option<SortSpec>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            name: None,
            sort: None,
        }
    }
}

impl ListQuery {
    /// Absent parameters take their defaults. Empty `name` and `sort` mean
    /// "no filter" and "store order"; an empty `page` or `limit` is
    /// malformed.
    pub fn parse(params: &ListParams) -> Result<Self, QueryError> {
        let page = positive("page", params.page.as_deref(), DEFAULT_PAGE)?;
        let limit = positive("limit", params.limit.as_deref(), DEFAULT_LIMIT)?;
        let name = params
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let sort = params
            .sort
            .as_deref()
            .filter(|sort| !sort.is_empty())
            .map(str::parse::<SortSpec>)
            .transpose()?;
        Ok(Self {
            page,
            limit,
            name,
            sort,
        })
    }

    /// Number of matching rows skipped before the window starts. SQLite
    /// takes a signed 64-bit offset.
    pub fn offset(&self) -> Result<u64, QueryError> {
        let skipped = u64::from(self.page.get() - 1) * u64::from(self.limit.get());
        if i64::try_from(skipped).is_err() {
            return Err(QueryError::WindowOverflow {
                page: self.page.get(),
                limit: self.limit.get(),
            });
        }
        Ok(skipped)
    }

    pub fn to_store_query(&self) -> Result<UserQuery, QueryError> {
        let mut query = UserQuery::new();
        if let Some(name) = &self.name {
            query = query.filter(
                Predicate::icontains(UserField::FirstName, name)
                    .or(Predicate::icontains(UserField::LastName, name)),
            );
            tracing::debug!(%name, "filtering by name");
        }
        if let Some(sort) = self.sort {
            query = query.order_by(sort.field, sort.direction);
            tracing::debug!(%sort, "sorting");
        }
        Ok(query.slice(self.offset()?, u64::from(self.limit.get())))
    }
}

fn positive(
    param: &'static str,
    raw: Option<&str>,
    default: NonZeroU32,
) -> Result<NonZeroU32, QueryError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<NonZeroU32>()
        .map_err(|_| QueryError::NotPositiveInteger {
            param,
            value: raw.to_string(),
        })
}
