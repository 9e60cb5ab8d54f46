//! Initial schema: banks, users, invoices, cheques and cheque history.
//!
//! Written with the schema builder so the same migration runs on
//! PostgreSQL and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Banks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Banks::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Banks::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Banks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Invoices::InvoiceNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Invoices::Amount).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(Invoices::Balance).decimal_len(14, 2).not_null())
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // created_by carries no foreign key: deleting a user keeps the label.
        manager
            .create_table(
                Table::create()
                    .table(Cheques::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cheques::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cheques::ChequeNumber).string_len(50).not_null())
                    .col(ColumnDef::new(Cheques::Beneficiary).string_len(255).not_null())
                    .col(ColumnDef::new(Cheques::Amount).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(Cheques::DueDate).date().not_null())
                    .col(ColumnDef::new(Cheques::Details).text().not_null())
                    .col(ColumnDef::new(Cheques::BankId).uuid().not_null())
                    .col(ColumnDef::new(Cheques::InvoiceId).uuid().null())
                    .col(ColumnDef::new(Cheques::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Cheques::DeductedInvoiceId).uuid().null())
                    .col(ColumnDef::new(Cheques::DeductedAmount).decimal_len(14, 2).null())
                    .col(ColumnDef::new(Cheques::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Cheques::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cheques::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cheques_bank")
                            .from(Cheques::Table, Cheques::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cheques_invoice")
                            .from(Cheques::Table, Cheques::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cheques_deducted_invoice")
                            .from(Cheques::Table, Cheques::DeductedInvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChequeHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChequeHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChequeHistory::ChequeId).uuid().not_null())
                    .col(ColumnDef::new(ChequeHistory::PreviousStatus).string_len(16).null())
                    .col(ColumnDef::new(ChequeHistory::NewStatus).string_len(16).not_null())
                    .col(ColumnDef::new(ChequeHistory::ChangedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(ChequeHistory::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cheque_history_cheque")
                            .from(ChequeHistory::Table, ChequeHistory::ChequeId)
                            .to(Cheques::Table, Cheques::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Statement and dashboard scans filter and sort by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_cheques_created_at")
                    .table(Cheques::Table)
                    .col(Cheques::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cheques_bank")
                    .table(Cheques::Table)
                    .col(Cheques::BankId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cheque_history_cheque")
                    .table(ChequeHistory::Table)
                    .col(ChequeHistory::ChequeId)
                    .col(ChequeHistory::ChangedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChequeHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cheques::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Banks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Banks {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    InvoiceNumber,
    Amount,
    Balance,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Cheques {
    Table,
    Id,
    ChequeNumber,
    Beneficiary,
    Amount,
    DueDate,
    Details,
    BankId,
    InvoiceId,
    Status,
    DeductedInvoiceId,
    DeductedAmount,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ChequeHistory {
    Table,
    Id,
    ChequeId,
    PreviousStatus,
    NewStatus,
    ChangedBy,
    ChangedAt,
}
