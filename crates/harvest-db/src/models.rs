/// Row types for the users table. Kept separate from the harvest-types API
/// models, which never carry the password hash.

pub struct UserRow {
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}
