//! Create `customers` table.
//!
//! Phone and vehicle plate carry unique indexes (added in the index
//! migration); a unique violation on insert is the conflict signal.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(string_len(Customer::Name, 100).not_null())
                    .col(string_len(Customer::Phone, 32).not_null())
                    .col(string_len(Customer::Address, 200).not_null())
                    .col(string_len(Customer::VehicleNumber, 32).not_null())
                    .col(string_len(Customer::VehiclePlate, 32).not_null())
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customer::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer { #[sea_orm(iden = "customers")] Table, Id, Name, Phone, Address, VehicleNumber, VehiclePlate, CreatedAt, UpdatedAt }
