use std::collections::HashMap;

use sysinfo::Users;

/// Resolves numeric uids to login names, caching every hit.
///
/// An unknown uid triggers at most one refresh of the user list per scan.
/// When the lookup still fails the uid is rendered as text.
pub struct UserDirectory {
    names: HashMap<u32, String>,
    users: Option<Users>,
    refreshed_this_scan: bool,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    pub fn new() -> Self {
        let users = Users::new_with_refreshed_list();
        let names = index(&users);
        Self {
            names,
            users: Some(users),
            refreshed_this_scan: true,
        }
    }

    /// A directory with a fixed set of names that never consults the OS.
    pub fn fixed<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(uid, name)| (uid, name.into()))
                .collect(),
            users: None,
            refreshed_this_scan: true,
        }
    }

    pub fn begin_scan(&mut self) {
        self.refreshed_this_scan = false;
    }

    pub fn name_for(&mut self, uid: u32) -> String {
        if let Some(name) = self.names.get(&uid) {
            return name.clone();
        }
        if !self.refreshed_this_scan
            && let Some(users) = self.users.as_mut()
        {
            self.refreshed_this_scan = true;
            users.refresh();
            self.names = index(users);
            if let Some(name) = self.names.get(&uid) {
                return name.clone();
            }
        }
        uid.to_string()
    }
}

fn index(users: &Users) -> HashMap<u32, String> {
    users
        .list()
        .iter()
        .map(|user| (**user.id(), user.name().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_directory_resolves_known_uid() {
        let mut users = UserDirectory::fixed([(1000, "alice")]);
        assert_eq!(users.name_for(1000), "alice");
    }

    #[test]
    fn unknown_uid_falls_back_to_number() {
        let mut users = UserDirectory::fixed([(1000, "alice")]);
        users.begin_scan();
        assert_eq!(users.name_for(4_000_000_000), "4000000000");
    }

    #[test]
    fn system_lookup_never_fails() {
        let mut users = UserDirectory::new();
        users.begin_scan();
        assert!(!users.name_for(0).is_empty());
    }
}
