use crate::error::FieldError;
use database::services::filter::Page;
use models::paging::PageRequest;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Paging block of list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PagingMeta {
    pub size: u64,
    pub page: u64,
    #[serde(rename = "totalPage")]
    pub total_page: u64,
    /// Rows of the entity regardless of the filter
    pub total: u64,
}

impl PagingMeta {
    pub fn new(request: PageRequest, filtered: u64, total: u64) -> Self {
        Self {
            size: request.size,
            page: request.page,
            total_page: request.total_pages(filtered),
            total,
        }
    }
}

/// Uniform JSON wrapper of every response
#[derive(Debug, Serialize, ToSchema)]
pub struct Envelope<T> {
    pub status: ResponseStatus,
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<PagingMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<T> Envelope<T> {
    fn new(status: ResponseStatus, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status,
            error: status == ResponseStatus::Error,
            message: message.into(),
            data,
            paging: None,
            errors: None,
            details: None,
        }
    }

    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self::new(ResponseStatus::Success, message, Some(data))
    }
}

impl<T> Envelope<Vec<T>> {
    /// A page of rows converted with `convert`
    pub fn page<M, F>(
        message: impl Into<String>,
        page: Page<M>,
        request: PageRequest,
        convert: F,
    ) -> Self
    where
        F: FnMut(M) -> T,
    {
        let paging = PagingMeta::new(request, page.filtered, page.total);
        let rows = page.rows.into_iter().map(convert).collect();

        Self {
            paging: Some(paging),
            ..Self::success(message, rows)
        }
    }
}

impl Envelope<()> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Success, message, None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Error, message, None)
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}
