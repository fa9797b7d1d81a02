/// A session's (group, user) pair, unique within the registry.
///
/// The core assumes both parts are non-empty; the upgrade handler rejects
/// requests that do not supply them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SessionIdentity {
    pub group: String,
    pub user: String,
}

impl SessionIdentity {
    pub fn new(group: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            user: user.into(),
        }
    }
}

impl std::fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.group, self.user)
    }
}
