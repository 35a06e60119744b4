use serde::Serialize;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
