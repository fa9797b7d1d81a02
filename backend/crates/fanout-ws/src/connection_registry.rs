use crate::{ConnectionHandle, ConnectionId, RegistryStats, SessionIdentity};

use std::collections::HashMap;

use log::debug;

/// Registry of live connections, group id -> (user id -> handle).
///
/// Owned by the dispatch loop and never shared, so it needs no locking.
/// A group bucket exists only while it has at least one member.
pub struct ConnectionRegistry<H> {
    groups: HashMap<String, HashMap<String, H>>,
}

impl<H: ConnectionHandle> ConnectionRegistry<H> {
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Insert or overwrite the member entry, creating the group bucket if
    /// needed. Returns the superseded handle, if any; it is NOT closed here.
    pub fn put(&mut self, identity: SessionIdentity, handle: H) -> Option<H> {
        let SessionIdentity { group, user } = identity;
        self.groups.entry(group).or_default().insert(user, handle)
    }

    /// Close and release a member's handle, dropping the group bucket if it
    /// becomes empty. Returns false if the pair was not registered.
    pub fn remove(&mut self, group: &str, user: &str) -> bool {
        let Some(members) = self.groups.get_mut(group) else {
            return false;
        };
        let Some(handle) = members.remove(user) else {
            return false;
        };

        if members.is_empty() {
            self.groups.remove(group);
            debug!("Removed empty group {}", group);
        }

        handle.close();
        true
    }

    /// Like `remove`, but only if the entry still belongs to `connection_id`.
    pub fn remove_connection(
        &mut self,
        identity: &SessionIdentity,
        connection_id: ConnectionId,
    ) -> bool {
        let owned = self
            .get(identity)
            .is_some_and(|handle| handle.connection_id() == connection_id);

        owned && self.remove(&identity.group, &identity.user)
    }

    /// Current members of a group, for fan-out
    pub fn members_of<'a>(&'a self, group: &str) -> impl Iterator<Item = (&'a str, &'a H)> + 'a {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|members| members.iter().map(|(user, handle)| (user.as_str(), handle)))
    }

    pub fn get(&self, identity: &SessionIdentity) -> Option<&H> {
        self.groups
            .get(&identity.group)
            .and_then(|members| members.get(&identity.user))
    }

    pub fn contains(&self, group: &str, user: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains_key(user))
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Number of members in a group (0 if the group does not exist)
    pub fn group_size(&self, group: &str) -> usize {
        self.groups.get(group).map(HashMap::len).unwrap_or(0)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn member_count(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            groups: self.group_count(),
            members: self.member_count(),
        }
    }

    /// Close every handle and empty the registry. Returns how many were closed.
    pub fn close_all(&mut self) -> usize {
        let mut closed = 0;
        for (_, members) in self.groups.drain() {
            for (_, handle) in members {
                handle.close();
                closed += 1;
            }
        }
        closed
    }
}

impl<H: ConnectionHandle> Default for ConnectionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
