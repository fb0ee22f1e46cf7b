//! # 账号解析器
//!
//! 同一邮箱无论来自哪个提供商都只对应一个本地用户。查找与创建之间的竞争由
//! `users.email` 唯一约束加 `ON CONFLICT DO NOTHING` 消解，冲突时重新读取。

use std::sync::Arc;

use chrono::Utc;
use entity::{SocialAccounts, Users, social_accounts, users};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use tracing::{debug, info};

use crate::auth::{Credential, CredentialIssuer};
use crate::error::{AppError, Context, Result};
use crate::oauth::ExternalIdentity;

/// 解析结果
#[derive(Debug, Clone)]
pub struct ResolvedAccount {
    pub user: users::Model,
    pub credential: Credential,
    /// 本次调用是否新建了用户
    pub created: bool,
}

/// 账号解析器
#[derive(Clone)]
pub struct AccountResolver {
    db: Arc<DatabaseConnection>,
    issuer: Arc<dyn CredentialIssuer>,
}

impl AccountResolver {
    pub fn new(db: Arc<DatabaseConnection>, issuer: Arc<dyn CredentialIssuer>) -> Self {
        Self { db, issuer }
    }

    /// 查找或创建本地用户，记录提供商关联，并签发凭证
    ///
    /// 已存在的用户原样复用，不会用新的名字或头像覆盖。
    pub async fn resolve(&self, identity: &ExternalIdentity) -> Result<ResolvedAccount> {
        let (user, created) = match self.find_by_email(&identity.email).await? {
            Some(user) => (user, false),
            None => self.create_or_fetch(identity).await?,
        };

        self.link_social_account(&user, identity).await?;

        let credential = self.issuer.issue(&user)?;

        if created {
            info!(
                user_id = user.id,
                provider = %identity.provider,
                "创建新用户"
            );
        } else {
            debug!(
                user_id = user.id,
                provider = %identity.provider,
                "复用已有用户"
            );
        }

        Ok(ResolvedAccount {
            user,
            credential,
            created,
        })
    }

    /// 按邮箱精确查找
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .context("按邮箱查询用户失败")
    }

    /// 按ID查找
    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<users::Model>> {
        Users::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .context("按ID查询用户失败")
    }

    /// 插入用户；邮箱已被并发请求占用时读取已有行
    ///
    /// 返回的布尔值表示是否由本次调用插入。
    pub(crate) async fn create_or_fetch(
        &self,
        identity: &ExternalIdentity,
    ) -> Result<(users::Model, bool)> {
        let now = Utc::now().naive_utc();
        let user = users::ActiveModel {
            name: Set(identity.name.clone()),
            email: Set(identity.email.clone()),
            avatar: Set(identity.avatar_url.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = match Users::insert(user)
            .on_conflict(
                OnConflict::column(users::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
        {
            Ok(rows) => rows > 0,
            Err(DbErr::RecordNotInserted) => false,
            Err(e) => return Err(AppError::database_with_source("创建用户失败", e)),
        };

        if !created {
            debug!("邮箱已被并发请求注册，读取已有用户");
        }

        let user = self
            .find_by_email(&identity.email)
            .await?
            .ok_or_else(|| AppError::database("写入用户后按邮箱读取失败"))?;
        Ok((user, created))
    }

    /// 记录提供商账号首次解析到的用户，已存在则忽略
    async fn link_social_account(
        &self,
        user: &users::Model,
        identity: &ExternalIdentity,
    ) -> Result<()> {
        let link = social_accounts::ActiveModel {
            user_id: Set(user.id),
            provider: Set(identity.provider.as_str().to_string()),
            provider_user_id: Set(identity.external_id.clone()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let inserted = SocialAccounts::insert(link)
            .on_conflict(
                OnConflict::columns([
                    social_accounts::Column::Provider,
                    social_accounts::Column::ProviderUserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await;

        match inserted {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(AppError::database_with_source("记录社交账号关联失败", e)),
        }
    }

    /// 用户的提供商关联
    pub async fn social_accounts_of(&self, user_id: i32) -> Result<Vec<social_accounts::Model>> {
        SocialAccounts::find()
            .filter(social_accounts::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .context("查询社交账号关联失败")
    }
}

impl std::fmt::Debug for AccountResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtManager;
    use crate::config::AuthConfig;
    use crate::oauth::Provider;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, PaginatorTrait};

    async fn resolver() -> AccountResolver {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let jwt = JwtManager::new(Arc::new(AuthConfig {
            jwt_secret: "resolver-test-secret".into(),
            jwt_expires_in: 3600,
        }))
        .unwrap();
        AccountResolver::new(Arc::new(db), Arc::new(jwt))
    }

    fn identity(provider: Provider, external_id: &str, email: &str) -> ExternalIdentity {
        ExternalIdentity {
            provider,
            external_id: external_id.into(),
            name: format!("{provider} user"),
            email: email.into(),
            avatar_url: Some(format!("https://img.example.com/{external_id}.png")),
        }
    }

    async fn user_count(resolver: &AccountResolver) -> u64 {
        Users::find().count(resolver.db.as_ref()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_login_creates_user() {
        let resolver = resolver().await;
        let resolved = resolver
            .resolve(&identity(Provider::Google, "g-1", "new@example.com"))
            .await
            .unwrap();

        assert!(resolved.created);
        assert_eq!(resolved.user.email, "new@example.com");
        assert_eq!(resolved.user.name, "google user");
        assert!(!resolved.credential.as_str().is_empty());
        assert_eq!(user_count(&resolver).await, 1);
    }

    #[tokio::test]
    async fn test_same_email_across_providers_reuses_user() {
        let resolver = resolver().await;
        let first = resolver
            .resolve(&identity(Provider::Google, "g-1", "same@example.com"))
            .await
            .unwrap();
        let second = resolver
            .resolve(&identity(Provider::Facebook, "fb-1", "same@example.com"))
            .await
            .unwrap();

        assert!(!second.created);
        assert_eq!(first.user.id, second.user.id);
        assert_eq!(second.user.name, "google user");
        assert_eq!(user_count(&resolver).await, 1);

        let links = resolver.social_accounts_of(first.user.id).await.unwrap();
        assert_eq!(links.len(), 2);
    }

    #[tokio::test]
    async fn test_repeat_login_records_single_link() {
        let resolver = resolver().await;
        let who = identity(Provider::Facebook, "fb-9", "repeat@example.com");
        let first = resolver.resolve(&who).await.unwrap();
        resolver.resolve(&who).await.unwrap();

        let links = resolver.social_accounts_of(first.user.id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].provider, "facebook");
        assert_eq!(links[0].provider_user_id, "fb-9");
    }

    #[tokio::test]
    async fn test_conflicting_insert_returns_existing_row() {
        let resolver = resolver().await;
        let who = identity(Provider::Google, "g-2", "race@example.com");

        let (first, first_created) = resolver.create_or_fetch(&who).await.unwrap();
        let (second, second_created) = resolver.create_or_fetch(&who).await.unwrap();

        assert!(first_created);
        assert!(!second_created);
        assert_eq!(first.id, second.id);
        assert_eq!(user_count(&resolver).await, 1);
    }

    #[tokio::test]
    async fn test_email_match_is_exact() {
        let resolver = resolver().await;
        resolver
            .resolve(&identity(Provider::Google, "g-3", "Case@example.com"))
            .await
            .unwrap();

        assert!(
            resolver
                .find_by_email("case@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }
}
