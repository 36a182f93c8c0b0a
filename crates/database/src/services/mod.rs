pub mod course;
pub mod dashboard;
pub mod filter;
pub mod grade;
pub mod major;
pub mod schedule;
pub mod student;
pub mod student_record;

use sea_orm::{ActiveValue, DbErr, Value};

/// `Set` when a new value is given, `NotSet` otherwise
pub(crate) fn changed<V: Into<Value>>(value: Option<V>) -> ActiveValue<V> {
    value.map_or(ActiveValue::NotSet, ActiveValue::Set)
}

/// Maps an update that matched no row to `None`
pub(crate) fn updated_or_none<M>(result: Result<M, DbErr>) -> Result<Option<M>, DbErr> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use sea_orm::{MockExecResult, Value, prelude::DateTime};
    use std::collections::BTreeMap;

    /// Row answering a `COUNT(*) AS num_items` query
    pub(crate) fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
    }

    pub(crate) fn timestamp(year: i32, month: u32, day: u32) -> DateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    pub(crate) fn rows_affected(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed() {
        assert!(matches!(changed(Some(3)), ActiveValue::Set(3)));
        assert!(matches!(changed::<i32>(None), ActiveValue::NotSet));
        assert!(matches!(
            changed::<Option<i32>>(Some(None)),
            ActiveValue::Set(None)
        ));
    }

    #[test]
    fn test_updated_or_none() {
        assert_eq!(updated_or_none(Ok(1)).unwrap(), Some(1));
        assert_eq!(updated_or_none::<i32>(Err(DbErr::RecordNotUpdated)).unwrap(), None);
        assert!(updated_or_none::<i32>(Err(DbErr::Custom("boom".to_owned()))).is_err());
    }
}
