pub use sea_orm_migration::prelude::*;

mod m20241104_100000_users;
mod m20241118_090000_username;
mod m20241202_090000_progress;
mod m20241216_120000_referrals;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241104_100000_users::Migration),
            Box::new(m20241118_090000_username::Migration),
            Box::new(m20241202_090000_progress::Migration),
            Box::new(m20241216_120000_referrals::Migration),
        ]
    }
}
