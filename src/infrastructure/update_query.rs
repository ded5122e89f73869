use sqlx::{QueryBuilder, Sqlite};

use crate::domain::{todo::TodoId, update::Assignment};

/// Renders `UPDATE todos SET <col> = ?, ... WHERE id = ?` with every value
/// bound. Column names come from `Assignment::column`, never from input.
/// Returns `None` when there is nothing to assign.
pub fn update_statement(id: TodoId, assignments: &[Assignment]) -> Option<QueryBuilder<'static, Sqlite>> {
    if assignments.is_empty() {
        return None;
    }
    let mut builder = QueryBuilder::new("UPDATE todos SET ");
    let mut set = builder.separated(", ");
    for assignment in assignments {
        set.push(format_args!("{} = ", assignment.column()));
        match assignment {
            Assignment::Body(body) => set.push_bind_unseparated(body.clone()),
            Assignment::Completed(completed) => set.push_bind_unseparated(*completed),
        };
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id.0);
    Some(builder)
}
