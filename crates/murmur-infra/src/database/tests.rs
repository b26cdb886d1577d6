use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
use uuid::Uuid;

use murmur_core::domain::{Post, User};
use murmur_core::error::RepoError;
use murmur_core::ports::{PostRepository, UserRepository};

use super::entity::{follow, post, user};
use super::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn user_model(username: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$stub".to_owned(),
        about_me: String::new(),
        last_seen: now.into(),
        created_at: now.into(),
    }
}

#[tokio::test]
async fn find_by_username_maps_to_domain_user() {
    let model = user_model("alice");
    let expected_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let found: Option<User> = repo.find_by_username("alice").await.unwrap();
    let found = found.unwrap();
    assert_eq!(found.id, expected_id);
    assert_eq!(found.username, "alice");
}

#[tokio::test]
async fn unique_violation_surfaces_as_constraint() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"users_username_key\"".to_owned(),
        ))])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = User::new(
        "alice".to_owned(),
        "alice@example.com".to_owned(),
        "$argon2id$stub".to_owned(),
    );

    let err = repo.insert(user).await.unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));
}

#[tokio::test]
async fn add_follow_reports_whether_an_edge_was_created() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let follower = Uuid::new_v4();
    let followed = Uuid::new_v4();

    assert!(repo.add_follow(follower, followed).await.unwrap());
    // Conflict: the edge already existed, nothing inserted.
    assert!(!repo.add_follow(follower, followed).await.unwrap());
}

#[tokio::test]
async fn remove_follow_reports_a_missing_edge() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    assert!(
        !repo
            .remove_follow(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn following_ids_collects_followed_side_of_edges() {
    let follower = Uuid::new_v4();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            follow::Model {
                follower_id: follower,
                followed_id: a,
                created_at: now.into(),
            },
            follow::Model {
                follower_id: follower,
                followed_id: b,
                created_at: now.into(),
            },
        ]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    assert_eq!(repo.following_ids(follower).await.unwrap(), vec![a, b]);
}

#[tokio::test]
async fn page_by_authors_maps_rows_in_order() {
    let author = Uuid::new_v4();
    let now = Utc::now();
    let newer = post::Model {
        id: Uuid::new_v4(),
        author_id: author,
        body: "world".to_owned(),
        created_at: now.into(),
    };
    let older = post::Model {
        id: Uuid::new_v4(),
        author_id: author,
        body: "hello".to_owned(),
        created_at: (now - chrono::Duration::minutes(1)).into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![newer.clone(), older.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let rows: Vec<Post> = repo.page_by_authors(&[author], 0, 3).await.unwrap();
    let bodies: Vec<&str> = rows.iter().map(|p| p.body.as_str()).collect();
    assert_eq!(bodies, ["world", "hello"]);
}

#[tokio::test]
async fn empty_author_list_short_circuits() {
    // No query expectations: reaching the database would fail the mock.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    assert!(repo.page_by_authors(&[], 0, 10).await.unwrap().is_empty());
}
