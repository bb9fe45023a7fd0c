use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::users::{
    dto::RegisterRequest,
    error::UserError,
    repo::UserStore,
    repo_types::{NewUser, User},
};

pub const USERNAME_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const PASSWORD_MIN_CHARS: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Field checks that run before the store is touched. Reports the first
/// offending field.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), UserError> {
    if req.username.is_empty() {
        return Err(UserError::validation("username", "must not be empty"));
    }
    if req.username.chars().count() > USERNAME_MAX_CHARS {
        return Err(UserError::validation(
            "username",
            format!("must be at most {USERNAME_MAX_CHARS} characters"),
        ));
    }
    if req.email.chars().count() > EMAIL_MAX_CHARS {
        return Err(UserError::validation(
            "email",
            format!("must be at most {EMAIL_MAX_CHARS} characters"),
        ));
    }
    if !is_valid_email(&req.email) {
        return Err(UserError::validation("email", "is not a valid email address"));
    }
    if req.password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(UserError::validation(
            "password",
            format!("must be at least {PASSWORD_MIN_CHARS} characters"),
        ));
    }
    Ok(())
}

/// Registers a user.
///
/// The username lookup is advisory and only gives an early, friendly error.
/// Uniqueness of both username and email is guaranteed by the store's insert,
/// which also covers a concurrent registration that slips in between.
pub async fn register(store: &dyn UserStore, req: RegisterRequest) -> Result<User, UserError> {
    validate_registration(&req)?;

    if store.find_by_username(&req.username).await?.is_some() {
        warn!(username = %req.username, "username already registered");
        return Err(UserError::DuplicateUsername);
    }

    let RegisterRequest {
        username,
        email,
        password,
    } = req;

    // Argon2 is CPU-bound; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| UserError::Internal(e.into()))??;

    let user = store
        .insert(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| {
            let e = UserError::from(e);
            if matches!(e, UserError::DuplicateUsername | UserError::DuplicateEmail) {
                warn!(error = %e, "insert rejected by unique constraint");
            }
            e
        })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn list_users(store: &dyn UserStore) -> Result<Vec<User>, UserError> {
    let users = store.list().await?;
    debug!(count = users.len(), "listed users");
    Ok(users)
}

pub async fn get_user(store: &dyn UserStore, id: Uuid) -> Result<User, UserError> {
    store.find_by_id(id).await?.ok_or(UserError::NotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::users::memory::InMemoryUserStore;
    use crate::users::repo::{StoreError, UniqueField};
    use async_trait::async_trait;

    fn req(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Store that is never reachable.
    struct DownStore;

    #[async_trait]
    impl UserStore for DownStore {
        async fn insert(&self, _user: NewUser) -> Result<User, StoreError> {
            Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
        }
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
            Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
        }
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
            Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
        }
        async fn list(&self) -> Result<Vec<User>, StoreError> {
            Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
        }
    }

    /// Store whose advisory lookup misses a row that the insert then hits,
    /// as when another registration commits between the two calls.
    struct RacingStore(UniqueField);

    #[async_trait]
    impl UserStore for RacingStore {
        async fn insert(&self, _user: NewUser) -> Result<User, StoreError> {
            Err(StoreError::UniqueViolation(self.0))
        }
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
            Ok(None)
        }
        async fn list(&self) -> Result<Vec<User>, StoreError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn register_then_list() {
        let store = InMemoryUserStore::new();
        let user = register(&store, req("alice", "alice@example.com", "secret123"))
            .await
            .expect("registration succeeds");

        assert!(!user.id.is_nil());
        assert_ne!(user.password_hash, "secret123");
        assert!(!user.password_hash.is_empty());
        assert!(verify_password("secret123", &user.password_hash));

        let users = list_users(&store).await.unwrap();
        assert_eq!(users.iter().filter(|u| u.username == "alice").count(), 1);
        assert_eq!(get_user(&store, user.id).await.unwrap().created_at, user.created_at);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_without_a_second_row() {
        let store = InMemoryUserStore::new();
        register(&store, req("u_test1", "u1@example.com", "abc12345"))
            .await
            .unwrap();
        let err = register(&store, req("u_test1", "u2@example.com", "abc12345"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateUsername));
        assert_eq!(list_users(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_caught_by_the_store() {
        let store = InMemoryUserStore::new();
        register(&store, req("alice", "shared@example.com", "abc12345"))
            .await
            .unwrap();
        let err = register(&store, req("bob", "shared@example.com", "abc12345"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail));
        assert_eq!(list_users(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn race_past_the_precheck_still_surfaces_as_duplicate() {
        let err = register(
            &RacingStore(UniqueField::Username),
            req("carol", "carol@example.com", "abc12345"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, UserError::DuplicateUsername));

        let err = register(
            &RacingStore(UniqueField::Email),
            req("carol", "carol@example.com", "abc12345"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail));
    }

    #[tokio::test]
    async fn invalid_email_fails_before_the_store() {
        // DownStore would fail any call, so reaching it would change the error.
        let err = register(&DownStore, req("bob", "not-an-email", "secret12"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Validation { field: "email", .. }));
    }

    #[tokio::test]
    async fn short_password_is_a_validation_error() {
        let err = register(&DownStore, req("bob", "bob@example.com", "123"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Validation { field: "password", .. }));
    }

    #[test]
    fn username_bounds() {
        assert!(matches!(
            validate_registration(&req("", "a@example.com", "secret12")),
            Err(UserError::Validation { field: "username", .. })
        ));
        let longest = "u".repeat(USERNAME_MAX_CHARS);
        assert!(validate_registration(&req(&longest, "a@example.com", "secret12")).is_ok());
        assert!(matches!(
            validate_registration(&req(&format!("{longest}u"), "a@example.com", "secret12")),
            Err(UserError::Validation { field: "username", .. })
        ));
    }

    #[test]
    fn whitespace_username_is_stored_as_given() {
        // Usernames are never trimmed, so blanks count as characters.
        assert!(validate_registration(&req("   ", "a@example.com", "secret12")).is_ok());
        assert!(validate_registration(&req(" alice ", "a@example.com", "secret12")).is_ok());
    }

    #[tokio::test]
    async fn padded_username_keeps_its_spaces() {
        let store = InMemoryUserStore::new();
        let user = register(&store, req(" alice ", "alice@example.com", "secret12"))
            .await
            .unwrap();
        assert_eq!(user.username, " alice ");
    }

    #[test]
    fn limit_messages_follow_the_constants() {
        let message = |r: RegisterRequest| match validate_registration(&r) {
            Err(UserError::Validation { message, .. }) => message,
            other => panic!("expected a validation error, got {other:?}"),
        };

        let username = "u".repeat(USERNAME_MAX_CHARS + 1);
        assert_eq!(
            message(req(&username, "a@example.com", "secret12")),
            format!("must be at most {USERNAME_MAX_CHARS} characters")
        );

        let email = format!("{}@example.com", "e".repeat(EMAIL_MAX_CHARS));
        assert_eq!(
            message(req("alice", &email, "secret12")),
            format!("must be at most {EMAIL_MAX_CHARS} characters")
        );

        let password = "p".repeat(PASSWORD_MIN_CHARS - 1);
        assert_eq!(
            message(req("alice", "a@example.com", &password)),
            format!("must be at least {PASSWORD_MIN_CHARS} characters")
        );
    }

    #[test]
    fn email_length_limit() {
        let local = "e".repeat(88);
        let ok = format!("{local}@example.com");
        assert_eq!(ok.chars().count(), 100);
        assert!(validate_registration(&req("alice", &ok, "secret12")).is_ok());

        let too_long = format!("{local}x@example.com");
        assert!(matches!(
            validate_registration(&req("alice", &too_long, "secret12")),
            Err(UserError::Validation { field: "email", .. })
        ));
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("alice@example"));
    }

    #[tokio::test]
    async fn unavailable_store_is_reported_as_such() {
        let err = register(&DownStore, req("dave", "dave@example.com", "secret12"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::PersistenceUnavailable(_)));
        assert!(matches!(
            list_users(&DownStore).await.unwrap_err(),
            UserError::PersistenceUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = InMemoryUserStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            get_user(&store, id).await.unwrap_err(),
            UserError::NotFound(missing) if missing == id
        ));
    }
}
