pub use sea_orm_migration::prelude::*;

mod m0000010_create_node;
mod m0000020_create_relationship;
mod m0000030_create_identification_helper;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0000010_create_node::Migration),
            Box::new(m0000020_create_relationship::Migration),
            Box::new(m0000030_create_identification_helper::Migration),
        ]
    }
}
