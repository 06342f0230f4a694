use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role set of the current user, supplied by the identity source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRoles {
    roles: BTreeSet<String>,
}

impl UserRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles
                .into_iter()
                .map(Into::into)
                .filter(|role: &String| !role.trim().is_empty())
                .collect(),
        }
    }

    /// Exact, case-sensitive membership check.
    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for UserRoles {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
