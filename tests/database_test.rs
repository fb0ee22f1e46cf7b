//! # 数据库与迁移测试

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use entity::{SocialAccounts, Users, social_accounts, users};
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use common::{TEST_JWT_SECRET, test_db};
use social_login::accounts::AccountResolver;
use social_login::auth::JwtManager;
use social_login::config::{AuthConfig, DatabaseConfig};
use social_login::database::{check_database_status, init_database, run_migrations};
use social_login::oauth::{ExternalIdentity, Provider};

fn new_user(email: &str) -> users::ActiveModel {
    let now = Utc::now().naive_utc();
    users::ActiveModel {
        name: Set("Someone".to_string()),
        email: Set(email.to_string()),
        avatar: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_email_is_unique() {
    let db = test_db().await;

    new_user("dup@example.com").insert(db.as_ref()).await.unwrap();
    let second = new_user("dup@example.com").insert(db.as_ref()).await;

    assert!(second.is_err());
    let rows = Users::find()
        .filter(users::Column::Email.eq("dup@example.com"))
        .all(db.as_ref())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_social_account_pair_is_unique() {
    let db = test_db().await;
    let user = new_user("pair@example.com").insert(db.as_ref()).await.unwrap();

    let link = || social_accounts::ActiveModel {
        user_id: Set(user.id),
        provider: Set("google".to_string()),
        provider_user_id: Set("g-1".to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    link().insert(db.as_ref()).await.unwrap();
    assert!(link().insert(db.as_ref()).await.is_err());
    assert_eq!(SocialAccounts::find().all(db.as_ref()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_database_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("login.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        ..DatabaseConfig::default()
    };

    let db = init_database(&config).await.unwrap();
    assert_eq!(check_database_status(&db).await.unwrap(), 2);

    run_migrations(&db).await.unwrap();
    assert_eq!(check_database_status(&db).await.unwrap(), 0);
    assert!(path.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_first_logins_share_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("race.db").display()),
        max_connections: 10,
        ..DatabaseConfig::default()
    };
    let db = init_database(&config).await.unwrap();
    run_migrations(&db).await.unwrap();
    let db = Arc::new(db);

    let jwt = JwtManager::new(Arc::new(AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expires_in: 3600,
    }))
    .unwrap();
    let resolver = AccountResolver::new(Arc::clone(&db), Arc::new(jwt));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let resolver = resolver.clone();
            let provider = if i % 2 == 0 { Provider::Google } else { Provider::Facebook };
            let identity = ExternalIdentity {
                provider,
                external_id: format!("{provider}-{i}"),
                name: format!("Racer {i}"),
                email: "racer@example.com".to_string(),
                avatar_url: None,
            };
            tokio::spawn(async move { resolver.resolve(&identity).await })
        })
        .collect();

    let mut ids = HashSet::new();
    let mut created = 0;
    for handle in handles {
        let resolved = handle.await.unwrap().unwrap();
        ids.insert(resolved.user.id);
        if resolved.created {
            created += 1;
        }
    }

    assert_eq!(ids.len(), 1);
    assert_eq!(created, 1);
    assert_eq!(Users::find().count(db.as_ref()).await.unwrap(), 1);
    assert_eq!(SocialAccounts::find().count(db.as_ref()).await.unwrap(), 32);
}
