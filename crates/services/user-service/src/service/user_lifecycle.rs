//! User lifecycle - registration, login, password changes and listings.
//!
//! Every external call is made once and its failure returned as classified
//! by the collaborator. There is no compensation: a credential inserted
//! before a failed role binding stays in the directory.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{info, warn};

use common::{AppError, AppResult};
use domain::{
    CredentialHasher, Page, PasswordPolicy, RequestFilters, ResponseUser, RestoreRequest, Session,
    UserFilter, UserPage, ROLE_CUSTOMER,
};

use crate::client::IdentityAuthority;
use crate::notifier::{NotificationDispatcher, PasswordNotice};
use crate::repository::UserDirectory;
use crate::service::AccessControl;

/// Credential lifecycle operations.
#[async_trait]
pub trait UserLifecycle: Send + Sync {
    /// Check email and password, then obtain tokens for the account
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Self-registration. An empty password is generated.
    async fn create_customer(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Staff registration with a role from the authority's catalogue
    async fn create_staff(&self, email: &str, role: &str, password: &str) -> AppResult<i32>;

    /// Change password after verifying the old one
    async fn update_user(&self, email: &str, old_password: &str, new_password: &str)
        -> AppResult<()>;

    /// Soft delete
    async fn delete_user(&self, id: i32) -> AppResult<i32>;

    /// Replace the password with a generated one and mail it out
    async fn restore_password(&self, email: &str) -> AppResult<()>;

    async fn get_user(&self, id: i32) -> AppResult<ResponseUser>;

    /// Filtered page of users; role filter beats date filter beats none
    async fn get_users(&self, page: Page, filters: &RequestFilters) -> AppResult<UserPage>;
}

/// Concrete implementation of UserLifecycle.
pub struct UserManager {
    directory: Arc<dyn UserDirectory>,
    authority: Arc<dyn IdentityAuthority>,
    access: Arc<AccessControl>,
    hasher: CredentialHasher,
    notifications: NotificationDispatcher,
    /// Verified against when the email is unknown so both paths cost a hash.
    /// `None` when it could not be built; the failure is logged once.
    dummy_hash: OnceLock<Option<String>>,
}

impl UserManager {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        authority: Arc<dyn IdentityAuthority>,
        access: Arc<AccessControl>,
        hasher: CredentialHasher,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            directory,
            authority,
            access,
            hasher,
            notifications,
            dummy_hash: OnceLock::new(),
        }
    }

    fn burn_verification(&self, password: &str) {
        let dummy = self.dummy_hash.get_or_init(|| {
            match self.hasher.hash("dummy-password") {
                Ok(hash) => Some(hash.into_string()),
                Err(e) => {
                    warn!(error = %e, "Dummy hash unavailable; unknown emails skip verification");
                    None
                }
            }
        });
        if let Some(dummy) = dummy {
            let _ = self.hasher.verify(password, dummy);
        }
    }

    /// Validate a supplied password, or generate one when it is empty.
    fn password_or_generated(password: &str) -> AppResult<String> {
        if password.is_empty() {
            return Ok(PasswordPolicy::generate());
        }
        PasswordPolicy::validate(password)?;
        Ok(password.to_string())
    }

    /// Hash, insert and notify. Returns the new id.
    async fn register(&self, email: &str, role: &str, password: &str) -> AppResult<i32> {
        let plain = Self::password_or_generated(password)?;
        let hash = self.hasher.hash(&plain)?;

        let user_id = self.directory.insert(email, hash.as_str(), role).await?;
        info!(user_id, email = %email, role = %role, "User registered");

        self.notifications.dispatch(PasswordNotice::new(email, plain));
        Ok(user_id)
    }
}

#[async_trait]
impl UserLifecycle for UserManager {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Session> {
        let credential = match self.directory.find_by_email(email).await? {
            Some(credential) => credential,
            None => {
                self.burn_verification(password);
                return Err(AppError::InvalidCredentials);
            }
        };

        if credential.deleted {
            warn!(user_id = credential.id, "Login attempt on deactivated account");
            return Err(AppError::AccountDeactivated(credential.id));
        }

        if !self.hasher.verify(password, &credential.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        let tokens = self
            .authority
            .issue_tokens(credential.id, &credential.role)
            .await?;
        info!(user_id = credential.id, "User authenticated");

        Ok(Session {
            user_id: credential.id,
            tokens,
        })
    }

    async fn create_customer(&self, email: &str, password: &str) -> AppResult<Session> {
        let user_id = self.register(email, ROLE_CUSTOMER, password).await?;

        self.authority.bind_role(user_id, ROLE_CUSTOMER).await?;
        let tokens = self.authority.issue_tokens(user_id, ROLE_CUSTOMER).await?;

        Ok(Session { user_id, tokens })
    }

    async fn create_staff(&self, email: &str, role: &str, password: &str) -> AppResult<i32> {
        self.access.check_input_role(role).await?;

        let user_id = self.register(email, role, password).await?;
        self.authority.bind_role(user_id, role).await?;

        Ok(user_id)
    }

    async fn update_user(
        &self,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let credential = match self.directory.find_by_email(email).await? {
            Some(credential) if credential.is_active() => credential,
            _ => {
                self.burn_verification(old_password);
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(old_password, &credential.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        if new_password.is_empty() {
            return Err(AppError::validation("new password must not be empty"));
        }
        PasswordPolicy::validate(new_password)?;

        let hash = self.hasher.hash(new_password)?;
        self.directory.update_password(email, hash.as_str()).await?;
        info!(user_id = credential.id, "Password updated");

        Ok(())
    }

    async fn delete_user(&self, id: i32) -> AppResult<i32> {
        let deleted = self.directory.soft_delete(id).await?;
        info!(user_id = deleted, "User deactivated");
        Ok(deleted)
    }

    async fn restore_password(&self, email: &str) -> AppResult<()> {
        if !self.directory.email_exists(email).await? {
            return Err(AppError::EmailNotFound);
        }

        let request = RestoreRequest {
            email: email.to_string(),
            generated_password: PasswordPolicy::generate(),
        };

        let hash = self.hasher.hash(&request.generated_password)?;
        self.directory
            .update_password(&request.email, hash.as_str())
            .await?;
        info!(email = %request.email, "Password restored");

        self.notifications.dispatch(PasswordNotice::new(
            request.email,
            request.generated_password,
        ));
        Ok(())
    }

    async fn get_user(&self, id: i32) -> AppResult<ResponseUser> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_users(&self, page: Page, filters: &RequestFilters) -> AppResult<UserPage> {
        match filters.selection()? {
            UserFilter::Role(role) => {
                self.directory
                    .list_by_role(page, &role, filters.show_deleted)
                    .await
            }
            UserFilter::CreatedBetween { start, end } => {
                self.directory
                    .list_by_date_range(page, start, end, filters.show_deleted)
                    .await
            }
            UserFilter::Unfiltered => self.directory.list_all(page, filters.show_deleted).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tokio::sync::mpsc;

    use super::*;
    use crate::client::MockIdentityAuthority;
    use crate::notifier::Notifier;
    use crate::repository::MockUserDirectory;
    use domain::{Credential, TokenPair};

    const EMAIL: &str = "test@yandex.ru";
    const PASSWORD: &str = "HGYKnu!98Tg";

    struct ChannelNotifier(mpsc::UnboundedSender<PasswordNotice>);

    #[async_trait]
    impl Notifier for ChannelNotifier {
        async fn send(&self, notice: PasswordNotice) -> AppResult<()> {
            let _ = self.0.send(notice);
            Ok(())
        }
    }

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(1)
    }

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    fn credential(id: i32, password: &str, deleted: bool) -> Credential {
        Credential {
            id,
            email: EMAIL.to_string(),
            password_hash: hasher().hash(password).unwrap().into_string(),
            role: "Courier".to_string(),
            created_at: NaiveDate::from_ymd_opt(2022, 3, 11).unwrap(),
            deleted,
        }
    }

    fn response_user(id: i32, role: &str) -> ResponseUser {
        ResponseUser {
            id,
            email: format!("user{}@yandex.ru", id),
            created_at: NaiveDate::from_ymd_opt(2022, 3, 11).unwrap(),
            role: role.to_string(),
        }
    }

    fn build(
        directory: MockUserDirectory,
        authority: MockIdentityAuthority,
    ) -> (UserManager, mpsc::UnboundedReceiver<PasswordNotice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let authority: Arc<dyn IdentityAuthority> = Arc::new(authority);
        let manager = UserManager::new(
            Arc::new(directory),
            Arc::clone(&authority),
            Arc::new(AccessControl::new(authority)),
            hasher(),
            NotificationDispatcher::new(Arc::new(ChannelNotifier(tx))),
        );
        (manager, rx)
    }

    // =========================================================================
    // authenticate
    // =========================================================================

    #[tokio::test]
    async fn test_authenticate_success() {
        let stored = credential(5, PASSWORD, false);
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .withf(|email| email == EMAIL)
            .returning(move |_| Ok(Some(stored.clone())));

        let mut authority = MockIdentityAuthority::new();
        authority
            .expect_issue_tokens()
            .withf(|id, role| *id == 5 && role == "Courier")
            .times(1)
            .returning(|_, _| Ok(tokens()));

        let (manager, _rx) = build(directory, authority);
        let session = manager.authenticate(EMAIL, PASSWORD).await.unwrap();

        assert_eq!(session.user_id, 5);
        assert_eq!(session.tokens, tokens());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let stored = credential(5, PASSWORD, false);
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut authority = MockIdentityAuthority::new();
        authority.expect_issue_tokens().times(0);

        let (manager, _rx) = build(directory, authority);
        let err = manager.authenticate(EMAIL, "HGYKnu!98Th").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_matches_wrong_password() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_email().returning(|_| Ok(None));

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        let err = manager.authenticate(EMAIL, PASSWORD).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(err.to_string(), "Wrong email or password entered");
    }

    #[tokio::test]
    async fn test_unknown_email_verifies_against_real_dummy_hash() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_email().returning(|_| Ok(None));

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        let _ = manager.authenticate(EMAIL, PASSWORD).await;

        let dummy = manager.dummy_hash.get().cloned().flatten().unwrap();
        assert!(hasher().verify("dummy-password", &dummy));
    }

    #[tokio::test]
    async fn test_unusable_hasher_leaves_no_dummy_hash() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_email().returning(|_| Ok(None));

        let (tx, _rx) = mpsc::unbounded_channel();
        let authority: Arc<dyn IdentityAuthority> = Arc::new(MockIdentityAuthority::new());
        let manager = UserManager::new(
            Arc::new(directory),
            Arc::clone(&authority),
            Arc::new(AccessControl::new(authority)),
            CredentialHasher::new(0),
            NotificationDispatcher::new(Arc::new(ChannelNotifier(tx))),
        );

        let err = manager.authenticate(EMAIL, PASSWORD).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(manager.dummy_hash.get(), Some(&None));
    }

    #[tokio::test]
    async fn test_authenticate_deactivated_account() {
        let stored = credential(5, PASSWORD, true);
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        let err = manager.authenticate(EMAIL, PASSWORD).await.unwrap_err();

        assert!(matches!(err, AppError::AccountDeactivated(5)));
    }

    #[tokio::test]
    async fn test_authenticate_authority_failure() {
        let stored = credential(5, PASSWORD, false);
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut authority = MockIdentityAuthority::new();
        authority
            .expect_issue_tokens()
            .returning(|_, _| Err(AppError::upstream("unavailable")));

        let (manager, _rx) = build(directory, authority);
        let err = manager.authenticate(EMAIL, PASSWORD).await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }

    // =========================================================================
    // create_customer / create_staff
    // =========================================================================

    #[tokio::test]
    async fn test_create_customer_generates_password() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_insert()
            .withf(|email, hash, role| {
                email == EMAIL && hash.starts_with("$argon2id$") && role == ROLE_CUSTOMER
            })
            .times(1)
            .returning(|_, _, _| Ok(12));

        let mut authority = MockIdentityAuthority::new();
        authority
            .expect_bind_role()
            .withf(|id, role| *id == 12 && role == ROLE_CUSTOMER)
            .times(1)
            .returning(|_, _| Ok(()));
        authority
            .expect_issue_tokens()
            .withf(|id, role| *id == 12 && role == ROLE_CUSTOMER)
            .times(1)
            .returning(|_, _| Ok(tokens()));

        let (manager, mut rx) = build(directory, authority);
        let session = manager.create_customer(EMAIL, "").await.unwrap();
        assert_eq!(session.user_id, 12);
        assert_eq!(session.tokens, tokens());

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.email, EMAIL);
        assert!(PasswordPolicy::validate(&notice.password).is_ok());
        assert!((8..=14).contains(&notice.password.chars().count()));
    }

    #[tokio::test]
    async fn test_create_customer_keeps_supplied_password() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_insert()
            .withf(|_, hash, _| hasher().verify(PASSWORD, hash))
            .returning(|_, _, _| Ok(3));

        let mut authority = MockIdentityAuthority::new();
        authority.expect_bind_role().returning(|_, _| Ok(()));
        authority.expect_issue_tokens().returning(|_, _| Ok(tokens()));

        let (manager, mut rx) = build(directory, authority);
        manager.create_customer(EMAIL, PASSWORD).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().password, PASSWORD);
    }

    #[tokio::test]
    async fn test_create_customer_rejects_weak_password() {
        let mut directory = MockUserDirectory::new();
        directory.expect_insert().times(0);

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        let err = manager.create_customer(EMAIL, "short").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_customer_duplicate_email() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_insert()
            .returning(|_, _, _| Err(AppError::DuplicateEmail));

        let mut authority = MockIdentityAuthority::new();
        authority.expect_bind_role().times(0);
        authority.expect_issue_tokens().times(0);

        let (manager, mut rx) = build(directory, authority);
        let err = manager.create_customer(EMAIL, "").await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_customer_bind_failure_keeps_record() {
        let mut directory = MockUserDirectory::new();
        directory.expect_insert().times(1).returning(|_, _, _| Ok(9));
        directory.expect_soft_delete().times(0);

        let mut authority = MockIdentityAuthority::new();
        authority
            .expect_bind_role()
            .returning(|_, _| Err(AppError::upstream("unavailable")));
        authority.expect_issue_tokens().times(0);

        let (manager, _rx) = build(directory, authority);
        let err = manager.create_customer(EMAIL, "").await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_create_staff_binds_requested_role() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_insert()
            .withf(|_, _, role| role == "Courier")
            .returning(|_, _, _| Ok(21));

        let mut authority = MockIdentityAuthority::new();
        authority
            .expect_list_roles()
            .returning(|| Ok(vec!["Courier".to_string(), "Superadmin".to_string()]));
        authority
            .expect_bind_role()
            .withf(|id, role| *id == 21 && role == "Courier")
            .times(1)
            .returning(|_, _| Ok(()));
        authority.expect_issue_tokens().times(0);

        let (manager, mut rx) = build(directory, authority);
        let id = manager.create_staff(EMAIL, "Courier", "").await.unwrap();

        assert_eq!(id, 21);
        assert_eq!(rx.recv().await.unwrap().email, EMAIL);
    }

    #[tokio::test]
    async fn test_create_staff_unknown_role_skips_persistence() {
        let mut directory = MockUserDirectory::new();
        directory.expect_insert().times(0);

        let mut authority = MockIdentityAuthority::new();
        authority
            .expect_list_roles()
            .returning(|| Ok(vec!["Courier".to_string()]));

        let (manager, _rx) = build(directory, authority);
        let err = manager.create_staff(EMAIL, "Chef", "").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidRole(_)));
    }

    // =========================================================================
    // update_user / delete_user / restore_password
    // =========================================================================

    #[tokio::test]
    async fn test_update_user_changes_password() {
        let stored = credential(5, PASSWORD, false);
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        directory
            .expect_update_password()
            .withf(|email, hash| email == EMAIL && hasher().verify("NewPass!123", hash))
            .times(1)
            .returning(|_, _| Ok(()));

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        manager
            .update_user(EMAIL, PASSWORD, "NewPass!123")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_user_wrong_old_password() {
        let stored = credential(5, PASSWORD, false);
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        directory.expect_update_password().times(0);

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        let err = manager
            .update_user(EMAIL, "Wrong!123a", "NewPass!123")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_update_user_unknown_or_deleted_email() {
        let deleted = credential(5, PASSWORD, true);
        let mut directory = MockUserDirectory::new();
        let mut calls = 0;
        directory.expect_find_by_email().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(None)
            } else {
                Ok(Some(deleted.clone()))
            }
        });
        directory.expect_update_password().times(0);

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        for _ in 0..2 {
            let err = manager
                .update_user(EMAIL, PASSWORD, "NewPass!123")
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_delete_user() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_soft_delete()
            .withf(|id| *id == 4)
            .returning(|id| Ok(id));

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        assert_eq!(manager.delete_user(4).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_delete_already_deleted_user_is_not_found() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_soft_delete()
            .returning(|_| Err(AppError::NotFound));

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        assert!(matches!(
            manager.delete_user(4).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_restore_password_unknown_email() {
        let mut directory = MockUserDirectory::new();
        directory.expect_email_exists().returning(|_| Ok(false));
        directory.expect_update_password().times(0);

        let (manager, mut rx) = build(directory, MockIdentityAuthority::new());
        let err = manager.restore_password(EMAIL).await.unwrap_err();

        assert!(matches!(err, AppError::EmailNotFound));
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_restore_password_mails_new_password() {
        let (hash_tx, mut hash_rx) = mpsc::unbounded_channel::<String>();
        let mut directory = MockUserDirectory::new();
        directory
            .expect_email_exists()
            .withf(|email| email == EMAIL)
            .returning(|_| Ok(true));
        directory
            .expect_update_password()
            .times(1)
            .returning(move |_, hash| {
                let _ = hash_tx.send(hash.to_string());
                Ok(())
            });

        let (manager, mut rx) = build(directory, MockIdentityAuthority::new());
        manager.restore_password(EMAIL).await.unwrap();

        let stored_hash = hash_rx.recv().await.unwrap();
        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.email, EMAIL);
        assert!(hasher().verify(&notice.password, &stored_hash));
    }

    // =========================================================================
    // get_user / get_users
    // =========================================================================

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_id().returning(|_| Ok(None));

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        assert!(matches!(manager.get_user(1).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_users_role_filter_wins() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_list_by_role()
            .withf(|page, role, show_deleted| {
                *page == Page::new(1, 10) && role == "Courier" && !show_deleted
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(UserPage {
                    users: vec![response_user(1, "Courier"), response_user(2, "Courier")],
                    pages: 3,
                })
            });
        directory.expect_list_by_date_range().times(0);
        directory.expect_list_all().times(0);

        let filters = RequestFilters {
            role: "Courier".to_string(),
            filter_data: true,
            start_time: NaiveDate::from_ymd_opt(2022, 3, 1),
            end_time: NaiveDate::from_ymd_opt(2022, 3, 31),
            ..Default::default()
        };

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        let page = manager
            .get_users(Page::new(1, 10), &filters)
            .await
            .unwrap();

        assert_eq!(page.pages, 3);
        assert!(page.users.iter().all(|u| u.role == "Courier"));
    }

    #[tokio::test]
    async fn test_get_users_date_filter_corrects_inverted_range() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 11).unwrap();
        let mut directory = MockUserDirectory::new();
        directory
            .expect_list_by_date_range()
            .withf(move |_, s, e, show_deleted| *s == start && *e == start && *show_deleted)
            .times(1)
            .returning(|_, _, _, _| {
                Ok(UserPage {
                    users: vec![],
                    pages: 1,
                })
            });

        let filters = RequestFilters {
            show_deleted: true,
            filter_data: true,
            start_time: Some(start),
            end_time: NaiveDate::from_ymd_opt(2022, 3, 1),
            ..Default::default()
        };

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        manager.get_users(Page::all(), &filters).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_users_unfiltered() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_list_all()
            .withf(|page, show_deleted| page.is_unbounded() && !show_deleted)
            .times(1)
            .returning(|_, _| {
                Ok(UserPage {
                    users: vec![response_user(1, "Superadmin")],
                    pages: 1,
                })
            });

        let (manager, _rx) = build(directory, MockIdentityAuthority::new());
        let page = manager
            .get_users(Page::all(), &RequestFilters::default())
            .await
            .unwrap();
        assert_eq!(page.pages, 1);
    }
}
