//! Page-number pagination over any countable, fetchable record source.
//!
//! Rules:
//! - `per_page` must be > 0, checked before the source is touched.
//! - An empty source still has one (empty) page.
//! - `page <= 0` means "the last page".
//! - A page past the end is empty, not an error.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;
use crate::repos::error::RepoError;

/// Something that can be counted and sliced, e.g. a filtered SQL query.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    async fn count(&self) -> Result<i64, RepoError>;

    async fn fetch(&self, offset: i64, limit: i64) -> Result<Vec<Self::Item>, RepoError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub total_pages: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub objects: Vec<T>,
}

impl<T> Page<T> {
    /// Convert every object while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_pages: self.total_pages,
            page: self.page,
            per_page: self.per_page,
            total_count: self.total_count,
            objects: self.objects.into_iter().map(f).collect(),
        }
    }
}

fn check_per_page(per_page: i64) -> Result<(), AppError> {
    if per_page <= 0 {
        return Err(AppError::invalid_field(
            "per_page",
            "per_page must greater than 0",
        ));
    }
    Ok(())
}

/// Resolve the effective page index and the number of pages.
///
/// Returns `(page, total_pages)`.
pub fn calc_page(per_page: i64, page: i64, count: i64) -> Result<(i64, i64), AppError> {
    check_per_page(per_page)?;

    // 0 件でも 1 ページとして扱う
    let record_count = count.max(1);
    let total_pages = (record_count - 1) / per_page + 1;

    let page = if page <= 0 { total_pages } else { page };
    Ok((page, total_pages))
}

pub async fn paginate<S>(per_page: i64, page: i64, source: &S) -> Result<Page<S::Item>, AppError>
where
    S: PageSource + ?Sized,
{
    check_per_page(per_page)?;

    let total_count = source.count().await?;
    let (page, total_pages) = calc_page(per_page, page, total_count)?;

    let offset = (page - 1).saturating_mul(per_page);
    let objects = source.fetch(offset, per_page).await?;

    Ok(Page {
        total_pages,
        page,
        per_page,
        total_count,
        objects,
    })
}
