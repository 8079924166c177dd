use crate::{
    entities::user,
    error::{Result, ServiceError},
    services::query::{fetch_window, ilike},
};
use chrono::Utc;
use log::{info, warn};
use models::{
    filter::FilterValue,
    pagination::{Page, Window},
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};

pub const ROLE_ADMIN: &str = "admin";

/// Role assumed for accounts that have none recorded
pub const ROLE_USER: &str = "user";

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub window: Window,
    pub search: Option<FilterValue>,
    pub role: Option<FilterValue>,
}

pub struct UserService;

impl UserService {
    pub async fn list(db: &DatabaseConnection, query: UserQuery) -> Result<Page<user::Model>, DbErr> {
        let mut condition = Condition::all();
        if let Some(search) = &query.search {
            condition = condition.add(ilike(user::Column::Name, search));
        }
        if let Some(role) = &query.role {
            let mut by_role = Condition::any().add(user::Column::Role.eq(role.as_str()));
            if role.as_str() == ROLE_USER {
                by_role = by_role.add(user::Column::Role.is_null());
            }
            condition = condition.add(by_role);
        }

        let select = user::Entity::find()
            .filter(condition)
            .order_by_desc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id);

        fetch_window(db, select, query.window).await
    }

    pub async fn set_role(db: &DatabaseConnection, id: &str, role: &str) -> Result<()> {
        let role = role.trim();
        if role != ROLE_ADMIN && role != ROLE_USER {
            return Err(ServiceError::Validation(format!("Role tidak valid: {role}")));
        }

        let result = user::Entity::update_many()
            .col_expr(user::Column::Role, Expr::value(role))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(user::Column::Id.eq(id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("Pengguna tidak ditemukan".to_owned()));
        }

        info!("Set role of user {id} to {role}");
        Ok(())
    }

    pub async fn remove(db: &DatabaseConnection, id: &str) -> Result<()> {
        let result = user::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("Pengguna tidak ditemukan".to_owned()));
        }

        info!("Removed user {id}");
        Ok(())
    }

    /// Makes the earliest registered account an admin, for bootstrapping a
    /// fresh deployment. Returns that account's email, or `None` when there
    /// are no accounts yet.
    pub async fn elevate_first_user(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
        let Some(first) = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .one(db)
            .await?
        else {
            warn!("No users found");
            return Ok(None);
        };

        user::Entity::update_many()
            .col_expr(user::Column::Role, Expr::value(ROLE_ADMIN))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(user::Column::Id.eq(first.id.as_str()))
            .exec(db)
            .await?;

        info!("Elevated {} to admin", first.email);
        Ok(Some(first.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use chrono::{Duration, NaiveDateTime};
    use sea_orm::{ActiveValue::Set, ActiveModelTrait};

    async fn add_user(db: &DatabaseConnection, id: &str, name: &str, role: Option<&str>, at: NaiveDateTime) {
        user::ActiveModel {
            id: Set(id.to_owned()),
            name: Set(name.to_owned()),
            email: Set(format!("{id}@sekolah.sch.id")),
            role: Set(role.map(str::to_owned)),
            banned: Set(None),
            created_at: Set(at),
            updated_at: Set(at),
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_elevate_first_user() {
        let db = setup_test_db().await;
        assert_eq!(UserService::elevate_first_user(&db).await.unwrap(), None);

        let now = Utc::now().naive_utc();
        add_user(&db, "later", "Later", None, now).await;
        add_user(&db, "first", "First", None, now - Duration::days(1)).await;

        let email = UserService::elevate_first_user(&db).await.unwrap();
        assert_eq!(email.as_deref(), Some("first@sekolah.sch.id"));

        let admins = UserService::list(
            &db,
            UserQuery {
                role: FilterValue::parse(Some("admin")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(admins.total, 1);
        assert_eq!(admins.items[0].id, "first");
    }

    #[tokio::test]
    async fn test_list_treats_missing_role_as_user() {
        let db = setup_test_db().await;
        let now = Utc::now().naive_utc();
        add_user(&db, "a", "Ayu", None, now).await;
        add_user(&db, "b", "Bima", Some("user"), now - Duration::hours(1)).await;
        add_user(&db, "c", "Cahya", Some("admin"), now - Duration::hours(2)).await;

        let users = UserService::list(
            &db,
            UserQuery {
                role: FilterValue::parse(Some("user")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(users.total, 2);
        assert_eq!(users.items[0].id, "a");

        let everyone = UserService::list(
            &db,
            UserQuery {
                role: FilterValue::parse(Some("all")),
                search: FilterValue::search(Some("bi")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(everyone.total, 1);
    }

    #[tokio::test]
    async fn test_set_role_validates() {
        let db = setup_test_db().await;
        add_user(&db, "a", "Ayu", None, Utc::now().naive_utc()).await;

        UserService::set_role(&db, "a", "admin").await.unwrap();
        assert!(matches!(
            UserService::set_role(&db, "a", "superuser").await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            UserService::set_role(&db, "missing", "user").await,
            Err(ServiceError::NotFound(_))
        ));

        UserService::remove(&db, "a").await.unwrap();
        assert!(matches!(
            UserService::remove(&db, "a").await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
