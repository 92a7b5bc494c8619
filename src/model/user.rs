use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// The signed-in user. The client never holds on to the password of a `User`; it only travels in
/// `Credentials` and `Registration` requests.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The upper-cased first letter of the name, used as an avatar.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().and_then(|c| c.to_uppercase().next())
    }
}

/// The body of a login request.
#[derive(Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The body of a register request.
#[derive(Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Debug for Registration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What the API answers to a successful login or registration.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub(crate) token: String,
    pub(crate) user: User,
}

impl AuthResponse {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial() {
        assert_eq!(User::new("1", "alice", "a@example.com").initial(), Some('A'));
        assert_eq!(User::new("1", "", "a@example.com").initial(), None);
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let creds = Credentials::new("a@example.com", "hunter2");
        let out = format!("{creds:?}");
        assert!(out.contains("a@example.com"));
        assert!(!out.contains("hunter2"));

        let reg = Registration::new("Alice", "a@example.com", "hunter2");
        assert!(!format!("{reg:?}").contains("hunter2"));
    }

    #[test]
    fn test_user_payload_ignores_password() {
        let json = r#"{"id":"u1","name":"Alice","email":"a@example.com","password":"x"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&user).unwrap();
        assert!(back.get("password").is_none());
    }
}
