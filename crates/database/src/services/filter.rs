use log::debug;
use models::{dates::DateRange, paging::PageRequest};
use sea_orm::{
    Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select, Value,
    prelude::Expr,
    sea_query::{Func, IntoColumnRef, SimpleExpr},
};

/// How the `created_at` bounds of a list request are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGranularity {
    /// `DATE(created_at) BETWEEN start AND end`
    Day,
    /// `created_at BETWEEN start 00:00:00 AND end 23:59:59.999999`
    Timestamp,
}

/// Query values shared by every list endpoint
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: PageRequest,
    pub search: Option<String>,
    pub created: Option<DateRange>,
}

/// Builds the predicate set of a list query.
///
/// Groups are AND-combined, the search columns are OR-combined among
/// themselves. Every builder method is a no-op when its input is absent.
#[derive(Debug, Clone)]
pub struct ListFilter {
    condition: Condition,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListFilter {
    pub fn new() -> Self {
        Self {
            condition: Condition::all(),
        }
    }

    /// Case-insensitive substring match of `term` against any of `columns`
    pub fn search<C, I>(mut self, term: Option<&str>, columns: I) -> Self
    where
        C: IntoColumnRef,
        I: IntoIterator<Item = C>,
    {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return self;
        };

        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let any = columns.into_iter().fold(Condition::any(), |any, column| {
            any.add(Expr::expr(Func::lower(Expr::col(column))).like(pattern.as_str()))
        });

        self.condition = self.condition.add(any);
        self
    }

    /// `column = value` when a value is given
    pub fn eq<C, V>(mut self, column: C, value: Option<V>) -> Self
    where
        C: IntoColumnRef,
        V: Into<Value>,
    {
        if let Some(value) = value {
            let value: Value = value.into();
            self.condition = self.condition.add(Expr::col(column).eq(value));
        }
        self
    }

    /// Restricts `column` to the inclusive day range
    pub fn created_within<C>(
        mut self,
        column: C,
        range: Option<DateRange>,
        granularity: DateGranularity,
    ) -> Self
    where
        C: IntoColumnRef,
    {
        let Some(range) = range else {
            return self;
        };

        let predicate: SimpleExpr = match granularity {
            DateGranularity::Day => {
                Expr::expr(Expr::cust_with_expr("DATE($1)", Expr::col(column)))
                    .between(range.start, range.end)
            }
            DateGranularity::Timestamp => {
                Expr::col(column).between(range.start_of_day(), range.end_of_day())
            }
        };

        self.condition = self.condition.add(predicate);
        self
    }

    pub fn into_condition(self) -> Condition {
        self.condition
    }
}

/// Escapes the `LIKE` wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One page of a list query
#[derive(Debug, Clone, PartialEq)]
pub struct Page<M> {
    pub rows: Vec<M>,
    /// Rows matching the filter, drives the page count
    pub filtered: u64,
    /// Rows of the entity regardless of the filter
    pub total: u64,
}

/// Runs a list query: counts, filters, orders newest first and slices the
/// requested page out of `query`.
pub async fn fetch_page<E, M>(
    db: &DatabaseConnection,
    query: Select<E>,
    filter: ListFilter,
    created_at: E::Column,
    page: PageRequest,
) -> Result<Page<M>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
    M: FromQueryResult + Send + Sync + 'static,
{
    let total = E::find().count(db).await?;

    let query = query.filter(filter.into_condition());
    let filtered = query.clone().count(db).await?;

    let query = query
        .order_by_desc(created_at)
        .offset(page.offset())
        .limit(page.limit());

    debug!("Generated SQL: {}", query.build(db.get_database_backend()));

    let rows = query.into_model::<M>().all(db).await?;

    Ok(Page {
        rows,
        filtered,
        total,
    })
}
