use std::fmt;

/// Username value object
///
/// # Invariants
/// - Not empty or whitespace-only
/// - Stored exactly as supplied
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Creates a new Username value object
    ///
    /// # Example
    /// ```
    /// use cyberbank_api::domain::user::Username;
    ///
    /// let username = Username::new("alice").expect("valid username");
    /// assert_eq!(username.as_str(), "alice");
    /// assert!(Username::new("   ").is_err());
    /// ```
    pub fn new(username: impl Into<String>) -> Result<Self, String> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err("Username must not be empty".to_string());
        }

        Ok(Username(username))
    }

    /// Returns the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
