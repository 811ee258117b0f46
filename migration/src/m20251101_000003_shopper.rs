//! 购物车、收藏与邮件订阅表

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CartItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartItems::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CartItems::UserId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(CartItems::ProductId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CartItems::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(CartItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一用户同一商品只占一行
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cart_items_user_product")
                    .table(CartItems::Table)
                    .col(CartItems::UserId)
                    .col(CartItems::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SavedProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SavedProducts::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SavedProducts::UserId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SavedProducts::ProductId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SavedProducts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_saved_products_user_product")
                    .table(SavedProducts::Table)
                    .col(SavedProducts::UserId)
                    .col(SavedProducts::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NewsletterSubscribers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NewsletterSubscribers::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NewsletterSubscribers::Email)
                            .string_len(320)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(NewsletterSubscribers::FullName)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NewsletterSubscribers::Status)
                            .string_len(16)
                            .not_null()
                            .default("subscribed"),
                    )
                    .col(
                        ColumnDef::new(NewsletterSubscribers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NewsletterSubscribers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NewsletterSubscribers::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_saved_products_user_product")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SavedProducts::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_cart_items_user_product").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CartItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CartItems {
    #[sea_orm(iden = "cart_items")]
    Table,
    Id,
    UserId,
    ProductId,
    Quantity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SavedProducts {
    #[sea_orm(iden = "saved_products")]
    Table,
    Id,
    UserId,
    ProductId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum NewsletterSubscribers {
    #[sea_orm(iden = "newsletter_subscribers")]
    Table,
    Id,
    Email,
    FullName,
    Status,
    CreatedAt,
    UpdatedAt,
}
