use sea_orm_migration::prelude::*;

use crate::m0000010_create_node::Node;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdentificationHelper::Table)
                    .col(
                        ColumnDef::new(IdentificationHelper::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IdentificationHelper::NodeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IdentificationHelper::Category)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IdentificationHelper::Metadata)
                            .text()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_identification_helper_node")
                            .from(IdentificationHelper::Table, IdentificationHelper::NodeId)
                            .to(Node::Table, Node::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_identification_helper_node")
                    .table(IdentificationHelper::Table)
                    .col(IdentificationHelper::NodeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdentificationHelper::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum IdentificationHelper {
    Table,
    Id,
    NodeId,
    Category,
    Metadata,
}
