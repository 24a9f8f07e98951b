use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Highest page number served; larger requests are clamped to it.
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

// Pagination fields are inlined rather than flattened: serde_urlencoded cannot
// deserialize numbers through `#[serde(flatten)]`.
#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Case-insensitive substring of the product name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ProductSortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Query string for another page of the same listing, filters kept.
    pub fn to_page_query(&self, page: i64) -> String {
        let query = ProductQuery {
            page: Some(page),
            q: self.search().map(str::to_string),
            ..self.clone()
        };
        serde_urlencoded::to_string(&query).unwrap_or_else(|_| format!("page={page}"))
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        let p = Pagination {
            page: Some(3),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (3, 100, 200));
        let p = Pagination {
            page: Some(-4),
            per_page: Some(0),
        };
        assert_eq!(p.normalize(), (1, 1, 0));
    }

    #[test]
    fn huge_page_is_clamped_instead_of_overflowing() {
        let p = Pagination {
            page: Some(i64::MAX),
            per_page: None,
        };
        assert_eq!(p.normalize(), (MAX_PAGE, 20, (MAX_PAGE - 1) * 20));

        let p = Pagination {
            page: Some(i64::MAX),
            per_page: Some(i64::MAX),
        };
        assert_eq!(p.normalize(), (MAX_PAGE, 100, (MAX_PAGE - 1) * 100));
    }

    #[test]
    fn page_query_keeps_filters_and_sorting() {
        let query = ProductQuery {
            page: Some(1),
            per_page: Some(5),
            q: Some(" brake pads&co ".into()),
            min_price: Some(1000),
            max_price: None,
            sort_by: Some(ProductSortBy::Price),
            sort_order: Some(SortOrder::Desc),
        };
        assert_eq!(
            query.to_page_query(2),
            "page=2&per_page=5&q=brake+pads%26co&min_price=1000&sort_by=price&sort_order=desc"
        );
        assert_eq!(ProductQuery::default().to_page_query(3), "page=3");
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = ProductQuery {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.search(), None);
        let query = ProductQuery {
            q: Some(" oil ".into()),
            ..Default::default()
        };
        assert_eq!(query.search(), Some("oil"));
    }
}
