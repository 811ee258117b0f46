//! 联盟点击表迁移
//!
//! 每次外链点击写入一行 affiliate_clicks，转化上报时更新 conversion / revenue。
//! product_id 是松散引用，不建外键。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AffiliateClicks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AffiliateClicks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AffiliateClicks::ProductId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateClicks::UserId)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateClicks::IpAddress)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateClicks::UserAgent)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateClicks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateClicks::Conversion)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AffiliateClicks::Revenue)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 按用户查询（联盟个人面板）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_affiliate_clicks_user_id")
                    .table(AffiliateClicks::Table)
                    .col(AffiliateClicks::UserId)
                    .to_owned(),
            )
            .await?;

        // 最近点击 / 时间排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_affiliate_clicks_created_at")
                    .table(AffiliateClicks::Table)
                    .col(AffiliateClicks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_affiliate_clicks_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_affiliate_clicks_user_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AffiliateClicks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AffiliateClicks {
    #[sea_orm(iden = "affiliate_clicks")]
    Table,
    Id,
    ProductId,
    UserId,
    IpAddress,
    UserAgent,
    CreatedAt,
    Conversion,
    Revenue,
}
