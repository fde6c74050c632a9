use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::Name).string().not_null())
                    .col(ColumnDef::new(Reservations::Email).string().not_null())
                    .col(ColumnDef::new(Reservations::Phone).string().not_null())
                    .col(ColumnDef::new(Reservations::Date).date().not_null())
                    // Free-text slot as picked in the form, e.g. "7:30 PM"
                    .col(ColumnDef::new(Reservations::Time).string_len(32).not_null())
                    .col(ColumnDef::new(Reservations::Guests).integer().not_null())
                    .col(ColumnDef::new(Reservations::Message).text().null())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup by email returns the most recent reservation
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_email_created_at")
                    .table(Reservations::Table)
                    .col(Reservations::Email)
                    .col(Reservations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reservations {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Date,
    Time,
    Guests,
    Message,
    Status,
    CreatedAt,
}
