use serde::Deserialize;

use crate::error::ApiError;

const MAX_LIMIT: i64 = 200;
const MAX_OFFSET: i64 = 10_000;

/// `?limit=&offset=` as sent by clients, before range checks.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `limit: None` means every remaining item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Page {
    pub fn slice<T>(&self, items: impl Iterator<Item = T>) -> impl Iterator<Item = T> {
        items
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
    }
}

impl PageParams {
    pub fn validate(self) -> Result<Page, ApiError> {
        let limit = self.limit.map(validate_limit).transpose()?;
        let offset = validate_offset(self.offset.unwrap_or(0))?;
        Ok(Page {
            limit: limit.map(|limit| limit as usize),
            offset: offset as usize,
        })
    }
}

pub fn validate_limit(limit: i64) -> Result<i64, ApiError> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

pub fn validate_offset(offset: i64) -> Result<i64, ApiError> {
    if !(0..=MAX_OFFSET).contains(&offset) {
        return Err(ApiError::BadRequest(format!(
            "offset must be between 0 and {MAX_OFFSET}"
        )));
    }
    Ok(offset)
}
