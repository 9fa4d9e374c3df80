use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Customers: phone and plate identify a customer; enforce at the store.
        manager
            .create_index(
                Index::create()
                    .name("uniq_customer_phone")
                    .table(Customer::Table)
                    .col(Customer::Phone)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_customer_vehicle_plate")
                    .table(Customer::Table)
                    .col(Customer::VehiclePlate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Services: list and analytics filter on date and status.
        manager
            .create_index(
                Index::create()
                    .name("idx_service_date")
                    .table(Service::Table)
                    .col(Service::ServiceDate)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_status")
                    .table(Service::Table)
                    .col(Service::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_customer")
                    .table(Service::Table)
                    .col(Service::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_created_at")
                    .table(Service::Table)
                    .col(Service::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_customer_phone").table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_customer_vehicle_plate").table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_date").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_status").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_customer").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_created_at").table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customer { #[sea_orm(iden = "customers")] Table, Phone, VehiclePlate }

#[derive(DeriveIden)]
enum Service { #[sea_orm(iden = "services")] Table, CustomerId, ServiceDate, Status, CreatedAt }
