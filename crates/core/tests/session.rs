//! Session restore and store tests.

use mcore::{
    MemoryStorage, Session, SessionStore, Storage, UserRole,
    session::{self, DEFAULT_NAME},
    storage::SESSION_KEY,
};
use std::sync::Arc;

#[test]
fn restore_requires_name_and_role() {
    assert_eq!(session::restore(Some(r#"{"name":"a"}"#)), None);
    assert_eq!(session::restore(Some(r#"{"role":"client"}"#)), None);
    assert_eq!(session::restore(Some(r#"{"name":"","role":"client"}"#)), None);
}

#[test]
fn restore_returns_blob_exactly() {
    let restored = session::restore(Some(r#"{"name":"a","role":"client"}"#)).unwrap();
    assert_eq!(
        restored,
        Session {
            name: Some("a".into()),
            role: Some(UserRole::Client),
            ..Session::default()
        }
    );
    assert_eq!(
        serde_json::to_string(&restored).unwrap(),
        r#"{"name":"a","role":"client"}"#
    );
}

#[test]
fn restore_ignores_garbage() {
    assert_eq!(session::restore(None), None);
    assert_eq!(session::restore(Some("not json")), None);
    assert_eq!(session::restore(Some(r#"{"name":"a","role":"employee"}"#)), None);
}

#[test]
fn client_type_uses_camel_case() {
    let restored =
        session::restore(Some(r#"{"name":"a","role":"client","clientType":"discovery"}"#))
            .unwrap();
    assert_eq!(restored.client_type.as_deref(), Some("discovery"));
}

#[test]
fn set_role_without_session_uses_default_name() {
    let session = session::set_role(None, UserRole::Client);
    assert_eq!(session.name.as_deref(), Some(DEFAULT_NAME));
    assert!(session.is_authenticated());
}

#[test]
fn set_role_keeps_other_fields() {
    let prior = Session {
        name: Some("Awa".into()),
        department: Some("Crédit".into()),
        ..Session::default()
    };
    let session = session::set_role(Some(prior), UserRole::Client);
    assert_eq!(session.name.as_deref(), Some("Awa"));
    assert_eq!(session.department.as_deref(), Some("Crédit"));
    assert_eq!(session.role, Some(UserRole::Client));
}

#[test]
fn set_department_without_session_is_bare() {
    let session = session::set_department(None, "Support");
    assert_eq!(
        session,
        Session {
            department: Some("Support".into()),
            ..Session::default()
        }
    );
    assert!(!session.is_authenticated());
}

#[test]
fn store_restores_from_storage() {
    let storage = MemoryStorage::with_entries([(SESSION_KEY, r#"{"name":"a","role":"client"}"#)]);
    let store = SessionStore::open(storage, None).unwrap();
    assert_eq!(store.user().unwrap().name.as_deref(), Some("a"));
}

#[test]
fn store_skips_incomplete_blob() {
    let storage = MemoryStorage::with_entries([(SESSION_KEY, r#"{"name":"a"}"#)]);
    let store = SessionStore::open(storage, None).unwrap();
    assert!(store.user().is_none());
}

#[test]
fn auth_reset_clears_persisted_session() {
    let storage = Arc::new(MemoryStorage::with_entries([(
        SESSION_KEY,
        r#"{"name":"a","role":"client"}"#,
    )]));
    let store = SessionStore::open(Arc::clone(&storage), Some("0")).unwrap();
    assert!(store.user().is_none());
    assert!(storage.get(SESSION_KEY).is_none());
}

#[test]
fn other_auth_values_restore() {
    let storage = MemoryStorage::with_entries([(SESSION_KEY, r#"{"name":"a","role":"client"}"#)]);
    let store = SessionStore::open(storage, Some("1")).unwrap();
    assert!(store.user().is_some());
}

#[test]
fn setters_persist_immediately() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = SessionStore::open(Arc::clone(&storage), None).unwrap();

    store.set_client_type("discovery").unwrap();
    store.set_role(UserRole::Client).unwrap();
    store.set_department("Particuliers").unwrap();

    let blob = storage.get(SESSION_KEY).unwrap();
    let persisted: Session = serde_json::from_str(&blob).unwrap();
    assert_eq!(&persisted, store.user().unwrap());
    assert_eq!(persisted.client_type.as_deref(), Some("discovery"));
    assert_eq!(persisted.role, Some(UserRole::Client));
    assert_eq!(persisted.department.as_deref(), Some("Particuliers"));
}

#[test]
fn logout_clears_memory_and_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = SessionStore::open(Arc::clone(&storage), None).unwrap();
    store.set_role(UserRole::Client).unwrap();
    assert!(storage.get(SESSION_KEY).is_some());

    store.logout().unwrap();
    assert!(store.user().is_none());
    assert!(storage.get(SESSION_KEY).is_none());
}

#[test]
fn set_user_none_signs_out() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = SessionStore::open(Arc::clone(&storage), None).unwrap();
    store
        .set_user(Some(Session {
            name: Some("a".into()),
            role: Some(UserRole::Client),
            ..Session::default()
        }))
        .unwrap();

    let reopened = SessionStore::open(Arc::clone(&storage), None).unwrap();
    assert!(reopened.user().is_some());

    store.set_user(None).unwrap();
    assert!(storage.get(SESSION_KEY).is_none());
}
