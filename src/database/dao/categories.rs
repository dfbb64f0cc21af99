use crate::database::DatabaseResult;
use crate::database::entities::{Category, categories};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

/// Categories DAO for database operations
pub struct CategoriesDao<'c, C> {
    db: &'c C,
}

impl<'c, C> CategoriesDao<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    /// Find category by ID
    pub async fn find_by_id(&self, category_id: i32) -> DatabaseResult<Option<Category>> {
        Ok(categories::Entity::find_by_id(category_id)
            .one(self.db)
            .await?)
    }

    /// Find category by its unique name
    pub async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Category>> {
        Ok(categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(self.db)
            .await?)
    }

    /// Load several categories at once
    pub async fn find_by_ids(&self, ids: &[i32]) -> DatabaseResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(categories::Entity::find()
            .filter(categories::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?)
    }

    /// All categories ordered by ID
    pub async fn list(&self) -> DatabaseResult<Vec<Category>> {
        Ok(categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn count(&self) -> DatabaseResult<u64> {
        Ok(categories::Entity::find().count(self.db).await?)
    }

    /// Insert a validated category; the ID of the argument is ignored
    pub async fn create(&self, category: &Category) -> DatabaseResult<Category> {
        let active_model = categories::ActiveModel {
            id: ActiveValue::NotSet,
            name: Set(category.name.clone()),
            reference_value: Set(category.reference_value),
            unit: Set(category.unit),
            category_type: Set(category.category_type),
        };

        Ok(active_model.insert(self.db).await?)
    }
}
