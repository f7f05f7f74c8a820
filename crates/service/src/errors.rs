use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("activity '{0}' not found")]
    UnknownActivity(String),
    #[error("{email} is already signed up for {activity}")]
    AlreadyRegistered { activity: String, email: String },
    #[error("{email} is not registered for {activity}")]
    NotRegistered { activity: String, email: String },
}

impl RosterError {
    pub fn unknown_activity(name: &str) -> Self {
        Self::UnknownActivity(name.to_string())
    }
}
