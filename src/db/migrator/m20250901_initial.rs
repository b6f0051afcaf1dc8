use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Number of desks seeded on a fresh database.
const SEED_DESK_COUNT: i32 = 40;

/// Bootstrap password for the `admin` account when
/// `DESKBOARD_ADMIN_PASSWORD` is not set. Change it after first login.
const DEFAULT_ADMIN_PASSWORD: &str = "ucd2025";

/// Hash the bootstrap password using Argon2id
fn hash_bootstrap_password() -> Result<String, DbErr> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = std::env::var("DESKBOARD_ADMIN_PASSWORD")
        .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbErr::Custom(format!("Failed to hash bootstrap password: {e}")))?;

    Ok(hash.to_string())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Desks)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed the initial desk pool, all vacant
        let mut insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Desks)
            .columns([
                crate::entities::desks::Column::DeskId,
                crate::entities::desks::Column::Location,
            ])
            .to_owned();
        for desk_id in 1..=SEED_DESK_COUNT {
            insert.values_panic([desk_id.into(), "Unassigned".into()]);
        }
        manager.exec_stmt(insert).await?;

        // Seed the single admin user with a hashed password
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_bootstrap_password()?;

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Users)
            .columns([
                crate::entities::users::Column::Username,
                crate::entities::users::Column::PasswordHash,
                crate::entities::users::Column::CreatedAt,
                crate::entities::users::Column::UpdatedAt,
            ])
            .values_panic(["admin".into(), password_hash.into(), now.clone().into(), now.into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Desks).to_owned())
            .await?;

        Ok(())
    }
}
