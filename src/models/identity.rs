use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Privilege label attached to an identity and snapshotted into tokens.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Every identity after the first.
    Regular,
    /// The first identity registered, and anyone promoted since.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Regular => "regular",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Role::Regular),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// The authoritative account record, as held by an `IdentityDirectory`.
///
/// Not `Serialize`: the credential hash must never leave the server.
/// Use [`Identity::into_public`] for anything that crosses the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    /// Email address. Matched exactly, case included.
    pub unique_key: String,
    pub credential_hash: String,
    pub role: Role,
}

impl Identity {
    pub fn into_public(self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            email: self.unique_key,
            role: self.role,
        }
    }
}

/// An identity ready to be stored: hashed credential and resolved role, no id yet.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub unique_key: String,
    pub credential_hash: String,
    pub role: Role,
}

/// The client-facing view of an identity.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PublicIdentity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}
