/// A commit as seen by the tagging engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full object id
    pub id: String,
    /// Abbreviated id, unique within the repository
    pub short_id: String,
    /// Full commit message; the first line is the subject
    pub message: String,
}

impl Commit {
    pub fn new(
        id: impl Into<String>,
        short_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Commit {
            id: id.into(),
            short_id: short_id.into(),
            message: message.into(),
        }
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        subject_line(&self.message)
    }
}

/// First line of a commit message, trimmed
pub fn subject_line(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim()
}
