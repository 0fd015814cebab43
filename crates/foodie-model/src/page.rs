use serde::Deserialize;
use thiserror::Error;

/// Offset based pagination, pages start at `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u64,
    limit: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidPage {
    #[error("Page number must start from 1 and stay within range")]
    Number,
    #[error("Page limit must be between 1 and {}", Page::MAX_LIMIT)]
    Limit,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 50;

    pub fn new(number: u64, limit: u64) -> Result<Self, InvalidPage> {
        if number == 0 {
            return Err(InvalidPage::Number);
        }
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(InvalidPage::Limit);
        }

        // SQLite binds the offset as a signed 64-bit integer.
        let offset = (number - 1).checked_mul(limit);
        if !offset.is_some_and(|offset| i64::try_from(offset).is_ok()) {
            return Err(InvalidPage::Number);
        }

        Ok(Self { number, limit })
    }

    /// First page with a fixed amount of items, used for shortcut listings.
    #[must_use]
    pub const fn first(limit: u64) -> Self {
        Self { number: 1, limit }
    }

    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.number - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(Self::DEFAULT_LIMIT)
    }
}

/// Raw `page` and `limit` query parameters.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl TryFrom<PageParams> for Page {
    type Error = InvalidPage;

    fn try_from(value: PageParams) -> Result<Self, Self::Error> {
        Page::new(
            value.page.unwrap_or(1),
            value.limit.unwrap_or(Self::DEFAULT_LIMIT),
        )
    }
}
