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
                    .table(Relationship::Table)
                    .col(
                        ColumnDef::new(Relationship::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Relationship::Category).string().not_null())
                    .col(
                        ColumnDef::new(Relationship::SourceNodeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Relationship::TargetNodeId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationship_source")
                            .from(Relationship::Table, Relationship::SourceNodeId)
                            .to(Node::Table, Node::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationship_target")
                            .from(Relationship::Table, Relationship::TargetNodeId)
                            .to(Node::Table, Node::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_relationship_source_category")
                    .table(Relationship::Table)
                    .col(Relationship::SourceNodeId)
                    .col(Relationship::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Relationship::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Relationship {
    Table,
    Id,
    Category,
    SourceNodeId,
    TargetNodeId,
}
