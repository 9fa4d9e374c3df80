//! Create `services` table.
//!
//! `customer_id` is deliberately not a foreign key: deleting a customer
//! leaves its service history in place with a dangling reference, matching
//! the documented behavior of the system.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(uuid(Service::CustomerId).not_null())
                    .col(string_len(Service::ServiceType, 32).not_null())
                    .col(double(Service::Price).not_null())
                    .col(timestamp_with_time_zone(Service::ServiceDate).not_null())
                    .col(string_len(Service::Status, 32).not_null())
                    .col(ColumnDef::new(Service::Notes).string_len(500).null())
                    .col(uuid(Service::CreatedBy).not_null())
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Service::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service { #[sea_orm(iden = "services")] Table, Id, CustomerId, ServiceType, Price, ServiceDate, Status, Notes, CreatedBy, CreatedAt, UpdatedAt }
