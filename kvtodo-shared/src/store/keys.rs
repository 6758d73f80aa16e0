/// Persisted key layout
///
/// These names are part of the storage format. Changing any of them makes
/// existing data unreachable.

/// Counter used to allocate user ids
pub const USER_ID_COUNTER: &str = "user:id";

/// Counter used to allocate task ids
pub const TODO_ID_COUNTER: &str = "todo:id";

/// Membership set of all live task ids
pub const TODOS_SET: &str = "todos";

/// Key of a user record
pub fn user_key(id: i64) -> String {
    format!("user:{}", id)
}

/// Key of the email index entry for a normalized email
pub fn user_email_key(email: &str) -> String {
    format!("user:email:{}", email)
}

/// Key of a session
pub fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Key of a task record
pub fn todo_key(id: i64) -> String {
    format!("todo:{}", id)
}
