//! Filtered, paginated listings shared by every dashboard table
//!
//! Each listing builds a `Condition::all()` from whichever filters are
//! present, then runs a count query and a window query over the same
//! predicates. The two reads are not atomic: a row inserted between them can
//! make `total` and `items` disagree by one, which the dashboard tolerates.

use models::{
    filter::FilterValue,
    pagination::{Page, Window},
};
use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect, Select,
    sea_query::{Expr, Func, IntoColumnRef, SimpleExpr},
};

/// Case-insensitive substring match, portable across Postgres and SQLite
pub fn ilike<C: IntoColumnRef>(column: C, needle: &FilterValue) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(needle.contains_pattern())
}

/// Counts every row matching `query`, then fetches the requested window of it
pub async fn fetch_window<'db, C, E>(
    db: &'db C,
    query: Select<E>,
    window: Window,
) -> Result<Page<E::Model>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'db,
{
    let total = query.clone().count(db).await?;
    let items = query
        .limit(window.limit)
        .offset(window.offset)
        .all(db)
        .await?;

    Ok(Page { items, total })
}
