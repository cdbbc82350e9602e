use serde::{Deserialize, Serialize};
use std::fmt;

/// The signed-in user. Persisted cards are partitioned by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

/// Returned for an empty or whitespace-only identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user identity must not be blank")]
pub struct BlankIdentity;

impl Identity {
    /// # Errors
    ///
    /// Returns [`BlankIdentity`] when `raw` is blank after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, BlankIdentity> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BlankIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = BlankIdentity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlankIdentity, Identity};

    #[test]
    fn identity_is_trimmed() {
        assert_eq!(Identity::new("  ana ").unwrap().as_str(), "ana");
    }

    #[test]
    fn blank_identity_is_rejected() {
        assert_eq!(Identity::new(""), Err(BlankIdentity));
        assert_eq!(Identity::new(" \t"), Err(BlankIdentity));
        assert!(serde_json::from_str::<Identity>("\"  \"").is_err());
    }
}
