/// Data model
///
/// - `user`: user records, the public projection, email normalization
/// - `task`: task records and the task store (list/create/update/delete)

pub mod task;
pub mod user;
