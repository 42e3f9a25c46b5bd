//! In-memory credential store.
//!
//! `CredentialStore` maps service -> username -> `CredentialRecord` and
//! is the only way the rest of the crate touches credentials, so its
//! invariants hold after every mutation:
//!
//! - a service that is present has at least one username;
//! - a (service, username) pair identifies at most one record.
//!
//! The store does no I/O.  Serialized, it is exactly the JSON document
//! kept inside the encrypted vault.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::CredentialRecord;

type Usernames = BTreeMap<String, CredentialRecord>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialStore {
    services: BTreeMap<String, Usernames>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record at (service, username).
    ///
    /// The new record is always stamped with the current time, including
    /// when it replaces an older one.  Returns `true` if a record was
    /// replaced.
    pub fn add_or_replace(
        &mut self,
        service: &str,
        username: &str,
        secret: &str,
        annotation: serde_json::Value,
    ) -> bool {
        self.insert_record(service, username, CredentialRecord::new(secret, annotation))
    }

    /// Insert a fully built record, replacing any existing one.
    pub fn insert_record(
        &mut self,
        service: &str,
        username: &str,
        record: CredentialRecord,
    ) -> bool {
        self.services
            .entry(service.to_string())
            .or_default()
            .insert(username.to_string(), record)
            .is_some()
    }

    pub fn get(&self, service: &str, username: &str) -> Option<&CredentialRecord> {
        self.services.get(service)?.get(username)
    }

    /// All service names, in a stable (sorted) order.
    pub fn list_services(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Usernames stored under `service`; empty if the service is unknown.
    pub fn list_usernames(&self, service: &str) -> Vec<&str> {
        self.services
            .get(service)
            .map(|users| users.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Remove the record at (service, username).
    ///
    /// Drops the service too once its last username is gone.  Returns
    /// whether a record was actually removed.
    pub fn delete(&mut self, service: &str, username: &str) -> bool {
        let Some(users) = self.services.get_mut(service) else {
            return false;
        };
        let removed = users.remove(username).is_some();
        if users.is_empty() {
            self.services.remove(service);
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn credential_count(&self) -> usize {
        self.services.values().map(BTreeMap::len).sum()
    }

    /// Iterate over every (service, username, record) triple.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &CredentialRecord)> {
        self.services.iter().flat_map(|(service, users)| {
            users
                .iter()
                .map(move |(username, record)| (service.as_str(), username.as_str(), record))
        })
    }

    /// Remove services that ended up with no usernames.
    ///
    /// Only a deserialized document can contain them; every mutating
    /// method already keeps the store clean.  Returns how many were
    /// dropped.
    pub(crate) fn prune_empty_services(&mut self) -> usize {
        let before = self.services.len();
        self.services.retain(|_, users| !users.is_empty());
        before - self.services.len()
    }

    #[cfg(test)]
    fn has_empty_service(&self) -> bool {
        self.services.values().any(BTreeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn add_then_get_returns_secret() {
        let mut store = CredentialStore::new();
        store.add_or_replace("github", "alice", "Tr0ub4dor&3", json!({"score": 5}));

        let record = store.get("github", "alice").unwrap();
        assert_eq!(record.secret(), "Tr0ub4dor&3");
        assert_eq!(record.annotation(), &json!({"score": 5}));
    }

    #[test]
    fn get_missing_returns_none() {
        let mut store = CredentialStore::new();
        assert!(store.get("github", "alice").is_none());

        store.add_or_replace("github", "alice", "pw", Value::Null);
        assert!(store.get("github", "bob").is_none());
        assert!(store.get("gitlab", "alice").is_none());
    }

    #[test]
    fn replace_overwrites_and_reports_it() {
        let mut store = CredentialStore::new();
        assert!(!store.add_or_replace("x", "y", "p1", Value::Null));
        assert!(store.add_or_replace("x", "y", "p2", Value::Null));

        assert_eq!(store.get("x", "y").unwrap().secret(), "p2");
        assert_eq!(store.credential_count(), 1);
    }

    #[test]
    fn replace_resets_created_at() {
        let mut store = CredentialStore::new();
        let old = chrono::DateTime::from_timestamp(1_000, 0).unwrap();
        store.insert_record("x", "y", CredentialRecord::with_created_at("p1", Value::Null, old));

        store.add_or_replace("x", "y", "p2", Value::Null);
        assert!(store.get("x", "y").unwrap().created_at() > old);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = CredentialStore::new();
        assert!(store.list_services().is_empty());
        assert!(store.list_usernames("anything").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn list_services_and_usernames() {
        let mut store = CredentialStore::new();
        store.add_or_replace("gitlab", "carol", "a", Value::Null);
        store.add_or_replace("github", "bob", "b", Value::Null);
        store.add_or_replace("github", "alice", "c", Value::Null);

        assert_eq!(store.list_services(), vec!["github", "gitlab"]);
        assert_eq!(store.list_usernames("github"), vec!["alice", "bob"]);
        assert_eq!(store.service_count(), 2);
        assert_eq!(store.credential_count(), 3);
    }

    #[test]
    fn deleting_last_username_removes_service() {
        let mut store = CredentialStore::new();
        store.add_or_replace("x", "y", "p1", Value::Null);

        assert!(store.delete("x", "y"));
        assert!(store.list_services().is_empty());
        assert!(!store.has_empty_service());
    }

    #[test]
    fn deleting_one_of_many_keeps_service() {
        let mut store = CredentialStore::new();
        store.add_or_replace("x", "a", "p1", Value::Null);
        store.add_or_replace("x", "b", "p2", Value::Null);

        assert!(store.delete("x", "a"));
        assert_eq!(store.list_usernames("x"), vec!["b"]);
    }

    #[test]
    fn delete_missing_is_false_and_changes_nothing() {
        let mut store = CredentialStore::new();
        store.add_or_replace("x", "y", "p1", Value::Null);
        let snapshot = store.clone();

        assert!(!store.delete("x", "nobody"));
        assert!(!store.delete("nowhere", "y"));
        assert_eq!(store, snapshot);
    }

    #[test]
    fn no_empty_service_after_mixed_operations() {
        let mut store = CredentialStore::new();
        let ops: &[(&str, &str, bool)] = &[
            ("a", "1", true),
            ("a", "2", true),
            ("b", "1", true),
            ("a", "1", false),
            ("b", "1", false),
            ("b", "1", false),
            ("c", "9", true),
            ("a", "2", false),
            ("c", "9", false),
        ];
        for &(service, user, add) in ops {
            if add {
                store.add_or_replace(service, user, "pw", Value::Null);
            } else {
                store.delete(service, user);
            }
            assert!(!store.has_empty_service());
        }
        assert!(store.is_empty());
    }

    #[test]
    fn serializes_as_nested_document() {
        let mut store = CredentialStore::new();
        let ts = chrono::DateTime::from_timestamp(42, 0).unwrap();
        store.insert_record(
            "github",
            "alice",
            CredentialRecord::with_created_at("pw", json!({}), ts),
        );

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(
            value,
            json!({"github": {"alice": {"secret": "pw", "created_at": 42, "annotation": {}}}})
        );
    }

    #[test]
    fn prune_drops_empty_services_from_documents() {
        let mut store: CredentialStore =
            serde_json::from_value(json!({"ghost": {}, "x": {"y": {"secret": "s", "created_at": 1}}}))
                .unwrap();
        assert_eq!(store.prune_empty_services(), 1);
        assert_eq!(store.list_services(), vec!["x"]);
    }

    #[test]
    fn iter_visits_every_record() {
        let mut store = CredentialStore::new();
        store.add_or_replace("a", "1", "p", Value::Null);
        store.add_or_replace("b", "2", "q", Value::Null);

        let seen: Vec<(&str, &str)> = store.iter().map(|(s, u, _)| (s, u)).collect();
        assert_eq!(seen, vec![("a", "1"), ("b", "2")]);
    }
}
