//! Orders placed through the checkout flow

use sea_orm_migration::prelude::*;

use crate::money;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::CustomerName).string().not_null())
                    .col(ColumnDef::new(Orders::CustomerEmail).string().not_null())
                    .col(ColumnDef::new(Orders::CustomerPhone).string().not_null())
                    .col(ColumnDef::new(Orders::DeliveryAddress).text().not_null())
                    // JSON-encoded line items, kept in submission order
                    .col(ColumnDef::new(Orders::Items).text().not_null())
                    .col(money(manager, Orders::Subtotal).not_null())
                    .col(money(manager, Orders::Tax).not_null())
                    .col(money(manager, Orders::Total).not_null())
                    .col(
                        ColumnDef::new(Orders::PaymentMethod)
                            .string_len(20)
                            .not_null()
                            .default("cash"),
                    )
                    .col(ColumnDef::new(Orders::BkashNumber).string_len(20).null())
                    .col(ColumnDef::new(Orders::BkashTransactionId).string().null())
                    .col(money(manager, Orders::BkashAmount).null())
                    .col(ColumnDef::new(Orders::Notes).text().null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Admin listing and bulk-clear both filter or sort on these
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_status")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_created_at")
                    .table(Orders::Table)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    DeliveryAddress,
    Items,
    Subtotal,
    Tax,
    Total,
    PaymentMethod,
    BkashNumber,
    BkashTransactionId,
    BkashAmount,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}
