use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::session::{Session, SessionInfo, SessionLookup};
use crate::errors::StorageError;
use crate::repositories::session::{MockSessionStore, SessionStore};

fn session_expiring_in(user_id: Uuid, token: &str, ttl: Duration) -> Session {
    Session::new(user_id, token.to_string(), Utc::now() + ttl)
}

#[tokio::test]
async fn test_insert_and_find_by_refresh_token() {
    let store = MockSessionStore::new();
    let session = session_expiring_in(Uuid::new_v4(), "token-1", Duration::days(7));

    store.insert(&session).await.unwrap();

    let lookup = store.find_by_refresh_token("token-1", Utc::now()).await.unwrap();
    assert_eq!(lookup, SessionLookup::Found(session));

    let missing = store.find_by_refresh_token("token-2", Utc::now()).await.unwrap();
    assert_eq!(missing, SessionLookup::NotFound);
}

#[tokio::test]
async fn test_expired_rows_are_not_found() {
    let store = MockSessionStore::new();
    let now = Utc::now();
    let session = Session::new(Uuid::new_v4(), "token".to_string(), now + Duration::minutes(5));
    store.insert(&session).await.unwrap();

    assert!(store
        .find_by_refresh_token("token", now)
        .await
        .unwrap()
        .is_found());
    assert!(!store
        .find_by_refresh_token("token", session.expires_at)
        .await
        .unwrap()
        .is_found());
    assert_eq!(
        store.find_by_id(session.id, now + Duration::hours(1)).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_find_by_id_returns_metadata_only() {
    let store = MockSessionStore::new();
    let now = Utc::now();
    let session = Session::new(Uuid::new_v4(), "token".to_string(), now + Duration::hours(1));
    store.insert(&session).await.unwrap();

    let info = store.find_by_id(session.id, now).await.unwrap().unwrap();
    assert_eq!(info, SessionInfo::from(&session));
    assert_eq!(store.find_by_id(Uuid::new_v4(), now).await.unwrap(), None);
}

#[tokio::test]
async fn test_duplicate_insert_is_a_conflict() {
    let store = MockSessionStore::new();
    let user_id = Uuid::new_v4();
    let session = session_expiring_in(user_id, "token", Duration::days(1));
    store.insert(&session).await.unwrap();

    let same_id = store.insert(&session).await;
    assert!(matches!(same_id, Err(StorageError::Conflict { .. })));

    let same_token = store
        .insert(&session_expiring_in(user_id, "token", Duration::days(1)))
        .await;
    assert!(matches!(same_token, Err(StorageError::Conflict { .. })));
}

#[tokio::test]
async fn test_delete_by_id_is_idempotent() {
    let store = MockSessionStore::new();
    let session = session_expiring_in(Uuid::new_v4(), "token", Duration::days(1));
    store.insert(&session).await.unwrap();

    assert!(store.delete_by_id(session.id).await.unwrap());
    assert!(!store.delete_by_id(session.id).await.unwrap());
    assert!(!store.delete_by_id(Uuid::new_v4()).await.unwrap());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_delete_expired_removes_exactly_expired_rows() {
    let store = MockSessionStore::new();
    let now = Utc::now();
    let user_id = Uuid::new_v4();

    let past = Session::new(user_id, "past".to_string(), now - Duration::seconds(1));
    let boundary = Session::new(user_id, "boundary".to_string(), now);
    let future = Session::new(user_id, "future".to_string(), now + Duration::seconds(1));
    for session in [&past, &boundary, &future] {
        store.insert(session).await.unwrap();
    }

    assert_eq!(store.delete_expired(now).await.unwrap(), 2);
    assert_eq!(store.delete_expired(now).await.unwrap(), 0);

    assert_eq!(store.len().await, 1);
    assert_eq!(store.get(future.id).await, Some(future));
}

#[tokio::test]
async fn test_delete_by_user_and_count_active() {
    let store = MockSessionStore::new();
    let now = Utc::now();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    store
        .insert(&Session::new(alice, "a1".to_string(), now + Duration::days(1)))
        .await
        .unwrap();
    store
        .insert(&Session::new(alice, "a2".to_string(), now + Duration::days(1)))
        .await
        .unwrap();
    store
        .insert(&Session::new(alice, "a3".to_string(), now - Duration::days(1)))
        .await
        .unwrap();
    store
        .insert(&Session::new(bob, "b1".to_string(), now + Duration::days(1)))
        .await
        .unwrap();

    assert_eq!(store.count_active_for_user(alice, now).await.unwrap(), 2);
    assert_eq!(store.delete_by_user(alice).await.unwrap(), 3);
    assert_eq!(store.count_active_for_user(alice, now).await.unwrap(), 0);
    assert_eq!(store.count_active_for_user(bob, now).await.unwrap(), 1);
}

#[tokio::test]
async fn test_replace_refresh_token_is_compare_and_swap() {
    let store = MockSessionStore::new();
    let now = Utc::now();
    let session = Session::new(Uuid::new_v4(), "old".to_string(), now + Duration::days(1));
    store.insert(&session).await.unwrap();

    let next_expiry = now + Duration::days(2);
    assert!(store
        .replace_refresh_token(session.id, "old", "new", next_expiry, now)
        .await
        .unwrap());
    assert!(!store
        .replace_refresh_token(session.id, "old", "newer", next_expiry, now)
        .await
        .unwrap());

    assert!(!store.find_by_refresh_token("old", now).await.unwrap().is_found());
    let stored = store
        .find_by_refresh_token("new", now)
        .await
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(stored.id, session.id);
    assert_eq!(stored.expires_at, next_expiry);
}

#[tokio::test]
async fn test_replace_refresh_token_never_revives_expired_row() {
    let store = MockSessionStore::new();
    let now = Utc::now();
    let lapsed = Session::new(Uuid::new_v4(), "old".to_string(), now - Duration::seconds(1));
    store.insert(&lapsed).await.unwrap();

    assert!(!store
        .replace_refresh_token(lapsed.id, "old", "new", now + Duration::days(7), now)
        .await
        .unwrap());

    assert!(!store.find_by_refresh_token("new", now).await.unwrap().is_found());
    assert_eq!(store.find_by_id(lapsed.id, now).await.unwrap(), None);
    assert_eq!(store.get(lapsed.id).await, Some(lapsed));
}

#[tokio::test]
async fn test_replace_refresh_token_at_expiry_boundary() {
    let store = MockSessionStore::new();
    let now = Utc::now();
    let session = Session::new(Uuid::new_v4(), "old".to_string(), now);
    store.insert(&session).await.unwrap();

    assert!(!store
        .replace_refresh_token(session.id, "old", "new", now + Duration::days(7), now)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_call_counters() {
    let store = MockSessionStore::new();
    let session = session_expiring_in(Uuid::new_v4(), "token", Duration::days(1));

    store.insert(&session).await.unwrap();
    store.find_by_refresh_token("token", Utc::now()).await.unwrap();
    store.find_by_refresh_token("other", Utc::now()).await.unwrap();
    store.delete_expired(Utc::now()).await.unwrap();

    let calls = store.calls();
    assert_eq!(calls.insert, 1);
    assert_eq!(calls.find_by_refresh_token, 2);
    assert_eq!(calls.delete_expired, 1);
    assert_eq!(calls.delete_by_id, 0);
    assert_eq!(calls.total(), 4);

    let clone = store.clone();
    clone.delete_by_id(session.id).await.unwrap();
    assert_eq!(store.calls().delete_by_id, 1);
}
