use crate::Config;
use crate::database::dao::CategoriesDao;
use crate::database::entities::categories;
use crate::database::{DatabaseError, DatabaseManager, DatabaseManagerImpl};
use crate::error::AppError;
use tracing::info;

pub async fn handle_init_command(
    skip_seed: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Initializing database...");

    let db_manager = DatabaseManagerImpl::new_from_config(&config.database).await?;

    db_manager.migrate().await?;
    info!("Database migrations completed");

    if skip_seed {
        info!("Skipping default category seeding");
    } else {
        let inserted = seed_default_categories(&db_manager).await?;
        if inserted > 0 {
            info!("Seeded {} default categories", inserted);
        } else {
            info!("Default categories already present");
        }
    }

    info!("Database initialization completed successfully");
    Ok(())
}

/// Insert every default category whose name is not taken yet.
///
/// Returns how many rows were inserted; running it twice inserts nothing the
/// second time. An invalid default aborts before anything is written.
pub async fn seed_default_categories(database: &dyn DatabaseManager) -> Result<usize, AppError> {
    let defaults = categories::default_categories()?;

    let txn = database.begin().await?;
    let dao = CategoriesDao::new(&txn);

    let mut inserted = 0;
    for category in &defaults {
        if dao.find_by_name(&category.name).await?.is_some() {
            continue;
        }
        dao.create(category).await?;
        inserted += 1;
    }

    txn.commit().await.map_err(DatabaseError::from)?;
    Ok(inserted)
}
