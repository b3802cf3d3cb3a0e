//! User service unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use mockall::predicate::eq;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use parcel_tracker::domain::{
    BookingStatus, BookingVolume, DeliveryManLedgerEntry, NewParcel, NewUser, Parcel,
    ParcelChanges, ParcelFilter, ParcelWithUser, User, UserCandidate, UserChanges, UserFilter,
    UserLedgerEntry, UserStatus,
};
use parcel_tracker::errors::{AppError, AppResult};
use parcel_tracker::infra::{
    AnalyticsRepository, ParcelRepository, TransactionContext, UnitOfWork, UserRepository,
};
use parcel_tracker::services::{UserManager, UserService};

mock! {
    pub UserRepository {}

    #[async_trait]
    impl UserRepository for UserRepository {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
        async fn list(&self, filter: UserFilter) -> AppResult<Vec<User>>;
        async fn create(&self, user: NewUser) -> AppResult<User>;
        async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;
    }
}

mock! {
    pub ParcelRepository {}

    #[async_trait]
    impl ParcelRepository for ParcelRepository {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ParcelWithUser>>;
        async fn list(&self, filter: ParcelFilter) -> AppResult<Vec<ParcelWithUser>>;
        async fn create(&self, parcel: NewParcel) -> AppResult<Parcel>;
        async fn update(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel>;
    }
}

mock! {
    pub AnalyticsRepository {}

    #[async_trait]
    impl AnalyticsRepository for AnalyticsRepository {
        async fn count_parcels(&self, status: Option<BookingStatus>) -> AppResult<u64>;
        async fn count_users(&self, status: Option<UserStatus>) -> AppResult<u64>;
        async fn user_ledger(&self, offset: u64, limit: u64) -> AppResult<Vec<UserLedgerEntry>>;
        async fn delivery_man_ledger(&self) -> AppResult<Vec<DeliveryManLedgerEntry>>;
        async fn top_performers(&self, limit: u64) -> AppResult<Vec<DeliveryManLedgerEntry>>;
        async fn booking_time_series(&self) -> AppResult<Vec<BookingVolume>>;
    }
}

fn create_test_user(id: Uuid) -> User {
    User {
        id,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        status: UserStatus::User,
        phone: String::new(),
        photo: String::new(),
        created_at: Utc::now(),
    }
}

fn stored(user: NewUser) -> User {
    User {
        id: Uuid::new_v4(),
        name: user.name,
        email: user.email,
        status: user.status,
        phone: user.phone,
        photo: user.photo,
        created_at: Utc::now(),
    }
}

/// Test mock for UnitOfWork that wraps a MockUserRepository
struct TestUnitOfWork {
    user_repo: Arc<MockUserRepository>,
}

impl TestUnitOfWork {
    fn new(user_repo: MockUserRepository) -> Self {
        Self {
            user_repo: Arc::new(user_repo),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn parcels(&self) -> Arc<dyn ParcelRepository> {
        Arc::new(MockParcelRepository::new())
    }

    fn analytics(&self) -> Arc<dyn AnalyticsRepository> {
        Arc::new(MockAnalyticsRepository::new())
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn service(repo: MockUserRepository) -> UserManager<TestUnitOfWork> {
    UserManager::new(Arc::new(TestUnitOfWork::new(repo)))
}

#[tokio::test]
async fn test_get_user_success() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(user_id))
        .returning(|id| Ok(Some(create_test_user(id))));

    let user = assert_ok!(service(repo).get_user(user_id).await);

    assert_eq!(user.id, user_id);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let err = assert_err!(service(repo).get_user(Uuid::new_v4()).await);

    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_list_users_passes_filter_through() {
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .withf(|filter| filter.status == Some(UserStatus::DeliveryMan))
        .returning(|_| {
            Ok(vec![
                create_test_user(Uuid::new_v4()),
                create_test_user(Uuid::new_v4()),
            ])
        });

    let filter = UserFilter {
        status: Some(UserStatus::DeliveryMan),
        ..UserFilter::default()
    };
    let result = service(repo).list_users(filter).await;

    assert_eq!(result.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_user_defaults_status_and_normalizes_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .withf(|email| email.to_string() == "jane@example.com")
        .returning(|_| Ok(None));
    repo.expect_create()
        .withf(|user| user.status == UserStatus::User && user.phone.is_empty())
        .returning(|user| Ok(stored(user)));

    let user = service(repo)
        .create_user(UserCandidate {
            name: Some("Jane".into()),
            email: Some("Jane@Example.com".into()),
            ..UserCandidate::default()
        })
        .await
        .unwrap();

    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.status, UserStatus::User);
}

#[tokio::test]
async fn test_create_user_with_taken_email_conflicts() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .returning(|_| Ok(Some(create_test_user(Uuid::new_v4()))));
    repo.expect_create().never();

    let result = service(repo)
        .create_user(UserCandidate {
            name: Some("Test".into()),
            email: Some("test@example.com".into()),
            ..UserCandidate::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(ref field)) if field == "email"));
}

#[tokio::test]
async fn test_create_user_rejects_invalid_email_before_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().never();
    repo.expect_create().never();

    let result = service(repo)
        .create_user(UserCandidate {
            name: Some("Test".into()),
            email: Some("not-an-email".into()),
            ..UserCandidate::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg.starts_with("email:")));
}

#[tokio::test]
async fn test_update_user_applies_allow_listed_fields() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_update()
        .withf(move |id, changes| *id == user_id && changes.phone.as_deref() == Some("555-1111"))
        .returning(|id, changes| {
            let mut user = create_test_user(id);
            user.phone = changes.phone.unwrap_or_default();
            Ok(user)
        });

    let updated = service(repo)
        .update_user(user_id, UserChanges::phone("555-1111"))
        .await
        .unwrap();

    assert_eq!(updated.phone, "555-1111");
}

#[tokio::test]
async fn test_update_user_rejects_empty_name() {
    let mut repo = MockUserRepository::new();
    repo.expect_update().never();

    let changes = UserChanges {
        name: Some(String::new()),
        ..UserChanges::default()
    };
    let result = service(repo).update_user(Uuid::new_v4(), changes).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}
