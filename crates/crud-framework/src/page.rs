//! # Paging
//!
//! [`PageRequest`] and [`PageResult`] plus their wire codec.
//!
//! A request travels as query parameters:
//!
//! ```text
//! ?page=0&pageSize=20&sort=name,asc&sort=email,desc
//! ```
//!
//! Sort entries keep their order; the first one is the most significant.
//! A result travels as JSON:
//!
//! ```json
//! { "content": [...], "page": 0, "pageSize": 20, "totalElements": 42, "totalPages": 3 }
//! ```

use crate::error::CrudError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "pageSize";
pub const SORT_PARAM: &str = "sort";

/// Sort direction. Parsed case-insensitively, written lower-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, Direction::Desc)
    }
}

impl FromStr for Direction {
    type Err = CrudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(CrudError::BadRequest(format!("unknown sort direction `{s}`")))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

/// Per-deployment paging defaults, handed to every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PagingConfig {
    /// Used when a request carries no `pageSize`.
    pub default_page_size: u32,
    /// Larger requested sizes are clamped to this value.
    pub max_page_size: u32,
}

impl PagingConfig {
    pub fn new(default_page_size: u32, max_page_size: u32) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }
}

/// Page index (0-based), page size and ordered sort criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
    sort: Vec<Sort>,
}

impl PageRequest {
    /// `page_size` must be positive.
    pub fn of(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            sort: Vec::new(),
        }
    }

    /// Append a sort criterion with lower precedence than the existing ones.
    pub fn sorted_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn with_sort(mut self, sort: Vec<Sort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> &[Sort] {
        &self.sort
    }

    /// Index of the first element of this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Encode as `page`, `pageSize` and one `sort=<field>,<dir>` pair per criterion.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2 + self.sort.len());
        pairs.push((PAGE_PARAM.to_string(), self.page.to_string()));
        pairs.push((PAGE_SIZE_PARAM.to_string(), self.page_size.to_string()));
        for sort in &self.sort {
            pairs.push((
                SORT_PARAM.to_string(),
                format!("{},{}", sort.field, sort.direction),
            ));
        }
        pairs
    }

    /// URL-encoded form of [`to_query_pairs`](Self::to_query_pairs), without a leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Parse a raw query string. Missing `page` means 0, missing `pageSize` means
    /// `config.default_page_size`; unknown parameters are ignored.
    pub fn from_query(query: Option<&str>, config: &PagingConfig) -> Result<Self, CrudError> {
        let mut page = 0;
        let mut page_size = config.default_page_size;
        let mut sort = Vec::new();

        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                PAGE_PARAM => page = parse_number(PAGE_PARAM, &value)?,
                PAGE_SIZE_PARAM => {
                    page_size = parse_number(PAGE_SIZE_PARAM, &value)?;
                    if page_size == 0 {
                        return Err(CrudError::BadRequest(
                            "pageSize must be a positive integer".to_string(),
                        ));
                    }
                }
                SORT_PARAM => sort.extend(parse_sort(&value)?),
                _ => {}
            }
        }

        Ok(Self {
            page,
            page_size: page_size.min(config.max_page_size),
            sort,
        })
    }
}

fn parse_number(name: &str, value: &str) -> Result<u32, CrudError> {
    value.trim().parse::<u32>().map_err(|_| {
        CrudError::BadRequest(format!("{name} must be a non-negative integer, got `{value}`"))
    })
}

/// `field`, `field,dir` or `field1,field2,dir`; the direction applies to every field.
fn parse_sort(value: &str) -> Result<Vec<Sort>, CrudError> {
    let mut parts: Vec<&str> = value.split(',').map(str::trim).collect();

    let direction = match parts.last() {
        Some(last) if parts.len() > 1 => last.parse::<Direction>().ok(),
        _ => None,
    };
    if direction.is_some() {
        parts.pop();
    }
    let direction = direction.unwrap_or(Direction::Asc);

    parts
        .into_iter()
        .map(|field| {
            if field.is_empty() {
                Err(CrudError::BadRequest(format!("empty sort field in `{value}`")))
            } else {
                Ok(Sort {
                    field: field.to_string(),
                    direction,
                })
            }
        })
        .collect()
}

/// One page of a sorted collection plus the collection totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    content: Vec<T>,
    page: u32,
    page_size: u32,
    total_elements: u64,
    total_pages: u32,
}

impl<T> PageResult<T> {
    /// Build the page answering `request`; `total_pages` is derived from the totals.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let page_size = request.page_size();
        let total_pages = if page_size == 0 {
            0
        } else {
            let size = u64::from(page_size);
            u32::try_from(total_elements.div_ceil(size)).unwrap_or(u32::MAX)
        };
        Self {
            content,
            page: request.page(),
            page_size,
            total_elements,
            total_pages,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether a page after this one holds elements.
    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    /// Convert the content, keeping order and totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    /// Decode a paged JSON body, mapping every `content` element through `element_decoder`.
    ///
    /// An absent or `null` `content` decodes as an empty page. Any other non-array
    /// `content`, or a missing or non-numeric scalar, is a [`CrudError::Decode`].
    pub fn decode<F>(body: &str, mut element_decoder: F) -> Result<Self, CrudError>
    where
        F: FnMut(Value) -> Result<T, CrudError>,
    {
        let Value::Object(mut object) = serde_json::from_str::<Value>(body)? else {
            return Err(CrudError::Decode("page body is not a JSON object".to_string()));
        };

        let content = match object.remove("content") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(&mut element_decoder)
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(CrudError::Decode(format!(
                    "`content` must be an array, got {other}"
                )))
            }
        };

        Ok(Self {
            content,
            page: read_u32(&object, "page")?,
            page_size: read_u32(&object, "pageSize")?,
            total_elements: read_u64(&object, "totalElements")?,
            total_pages: read_u32(&object, "totalPages")?,
        })
    }
}

impl<T> IntoIterator for PageResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

fn read_u64(object: &Map<String, Value>, key: &str) -> Result<u64, CrudError> {
    object
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| CrudError::Decode(format!("`{key}` must be a non-negative integer")))
}

fn read_u32(object: &Map<String, Value>, key: &str) -> Result<u32, CrudError> {
    let value = read_u64(object, key)?;
    u32::try_from(value).map_err(|_| CrudError::Decode(format!("`{key}` out of range: {value}")))
}
