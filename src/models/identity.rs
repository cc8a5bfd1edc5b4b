use serde::{Deserialize, Serialize};

/// An authenticated user, as decoded from a provider credential.
///
/// Fields are private so a value cannot be edited after construction; a new
/// sign-in always produces a new `Identity`. The serialized form is the one
/// kept in the session cache: `{"id", "name", "email", "picture"?}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-assigned subject, stable across sessions.
    id: String,
    name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    picture: Option<String>,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        picture: Option<String>,
    ) -> Self {
        Identity {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            picture,
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

    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }
}
