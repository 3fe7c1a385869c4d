use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Node::Table)
                    .col(ColumnDef::new(Node::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Node::Category).string().not_null())
                    .col(ColumnDef::new(Node::Name).string().not_null())
                    .col(ColumnDef::new(Node::Description).string())
                    .col(ColumnDef::new(Node::ParentId).uuid())
                    .col(ColumnDef::new(Node::PredecessorId).uuid())
                    .col(
                        ColumnDef::new(Node::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_parent")
                            .from(Node::Table, Node::ParentId)
                            .to(Node::Table, Node::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_predecessor")
                            .from(Node::Table, Node::PredecessorId)
                            .to(Node::Table, Node::Id)
                            // deleting a version must not leave a dangling
                            // chain link behind
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_node_parent")
                    .table(Node::Table)
                    .col(Node::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_node_category")
                    .table(Node::Table)
                    .col(Node::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Node::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Node {
    Table,
    Id,
    Category,
    Name,
    Description,
    ParentId,
    PredecessorId,
    CreatedAt,
}
