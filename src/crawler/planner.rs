//! Pagination planner
//!
//! Both paginated scopes (catalog pages and a product's review pages) are
//! planned the same way from a total count and a fixed page size.

use crate::url::UrlTemplate;
use crate::{ExtractError, Result};
use std::ops::RangeInclusive;
use url::Url;

/// Most pages a single scope may expand into
///
/// Totals are read from page text, so a garbled count must not turn into
/// millions of requests.
pub const MAX_PAGES: u64 = 10_000;

/// Number of pages needed to cover `total` items
pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

/// Returns the page numbers needed to cover `total` items
///
/// Pages are 1-based and ascending. A total of zero, or a zero page size,
/// yields no pages.
///
/// # Example
///
/// ```
/// use catalog_harvest::crawler::plan;
///
/// assert_eq!(plan(14, 6).collect::<Vec<_>>(), vec![1, 2, 3]);
/// assert_eq!(plan(240, 120).collect::<Vec<_>>(), vec![1, 2]);
/// assert!(plan(0, 120).is_empty());
/// ```
pub fn plan(total: u64, page_size: u32) -> RangeInclusive<u64> {
    1..=page_count(total, page_size)
}

/// A paginated scope: a URL template plus the number of items per page
#[derive(Debug, Clone)]
pub struct PageScope {
    total_field: &'static str,
    template: UrlTemplate,
    page_size: u32,
}

impl PageScope {
    /// `total_field` names the count this scope is planned from in errors
    pub fn new(total_field: &'static str, template: UrlTemplate, page_size: u32) -> Self {
        Self {
            total_field,
            template,
            page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// URLs of every planned page, in page order
    ///
    /// `product_id` fills the `{product_id}` placeholder for per-product
    /// scopes. A total that needs more than [`MAX_PAGES`] pages is an
    /// extraction miss.
    pub fn page_urls(&self, total: u64, product_id: Option<&str>) -> Result<Vec<Url>> {
        let pages = page_count(total, self.page_size);
        if pages > MAX_PAGES {
            return Err(ExtractError::TooManyPages {
                field: self.total_field,
                pages,
                limit: MAX_PAGES,
            }
            .into());
        }

        let urls = plan(total, self.page_size)
            .map(|page| self.template.render(Some(page), product_id))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CrawlError;

    fn catalog_scope() -> PageScope {
        PageScope::new(
            "total_products",
            UrlTemplate::new("https://shop.example.com/hoodies-c-181-page-{page}.html").unwrap(),
            120,
        )
    }

    #[test]
    fn test_plan_counts() {
        for (total, size) in [(0u64, 6u32), (1, 6), (6, 6), (7, 6), (14, 6), (250, 120), (1000, 7)] {
            let pages: Vec<u64> = plan(total, size).collect();
            let expected = (total + u64::from(size) - 1) / u64::from(size);
            assert_eq!(pages.len() as u64, expected, "total={} size={}", total, size);
            assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
            if let Some(first) = pages.first() {
                assert_eq!(*first, 1);
            }
        }
    }

    #[test]
    fn test_plan_review_example() {
        assert_eq!(plan(14, 6).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_plan_empty() {
        assert!(plan(0, 120).is_empty());
        assert!(plan(10, 0).is_empty());
    }

    #[test]
    fn test_plan_max_total() {
        let pages = plan(u64::MAX, 6);
        assert_eq!(*pages.start(), 1);
        assert_eq!(*pages.end(), u64::MAX / 6 + 1);
        assert_eq!(page_count(u64::MAX, 1), u64::MAX);
    }

    #[test]
    fn test_catalog_scope_urls() {
        let urls = catalog_scope().page_urls(250, None).unwrap();
        let urls: Vec<&str> = urls.iter().map(Url::as_str).collect();
        assert_eq!(
            urls,
            vec![
                "https://shop.example.com/hoodies-c-181-page-1.html",
                "https://shop.example.com/hoodies-c-181-page-2.html",
                "https://shop.example.com/hoodies-c-181-page-3.html",
            ]
        );
    }

    #[test]
    fn test_scope_rejects_oversized_total() {
        let scope = catalog_scope();

        let limit_total = MAX_PAGES * 120;
        assert_eq!(scope.page_urls(limit_total, None).unwrap().len() as u64, MAX_PAGES);

        let result = scope.page_urls(limit_total + 1, None);
        assert!(matches!(
            result,
            Err(CrawlError::Extract(ExtractError::TooManyPages {
                field: "total_products",
                pages,
                limit: MAX_PAGES,
            })) if pages == MAX_PAGES + 1
        ));

        assert!(scope.page_urls(u64::MAX, None).is_err());
    }

    #[test]
    fn test_review_scope_urls() {
        let scope = PageScope::new(
            "total_reviews",
            UrlTemplate::new("https://shop.example.com/review-{product_id}-page-{page}.html")
                .unwrap(),
            6,
        );

        let urls = scope.page_urls(7, Some("5475390")).unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(
            urls[1].as_str(),
            "https://shop.example.com/review-5475390-page-2.html"
        );
    }
}
