use serde::Deserialize;

use crate::core::models::common::Pagination as Page;
use crate::error::Error;

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

impl TryFrom<Pagination> for Page {
    type Error = Error;

    fn try_from(p: Pagination) -> Result<Self, Self::Error> {
        if p.page < 1 {
            return Err(Error::BusinessError("page starts from 1".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&p.size) {
            return Err(Error::BusinessError(format!("size must be between 1 and {}", MAX_PAGE_SIZE)));
        }
        Ok(Page::new(p.size, Some((p.page - 1) * p.size)))
    }
}

#[derive(Debug, Deserialize)]
pub struct NameFilter {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MentionSearch {
    #[serde(default)]
    pub q: String,
}
