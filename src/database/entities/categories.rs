use crate::error::AppError;
use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unit a category's usage is measured in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageUnit {
    /// Minutes of consumption within the month
    #[sea_orm(string_value = "TIME_MINUTES")]
    TimeMinutes,
    /// Number of distinct days the service was used within the month
    #[sea_orm(string_value = "COUNT_DAYS")]
    CountDays,
}

impl UsageUnit {
    /// Largest usage value a single month can hold in this unit
    pub fn monthly_cap(&self, days_in_month: u32) -> i64 {
        match self {
            UsageUnit::CountDays => days_in_month as i64,
            UsageUnit::TimeMinutes => days_in_month as i64 * 24 * 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageUnit::TimeMinutes => "TIME_MINUTES",
            UsageUnit::CountDays => "COUNT_DAYS",
        }
    }
}

/// How over-usage of a category is interpreted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    /// Streaming, music, books: more usage keeps counting
    #[sea_orm(string_value = "CONTENT")]
    Content,
    /// Tools: usage beyond the reference adds no further value
    #[sea_orm(string_value = "PRODUCTIVITY")]
    Productivity,
}

impl CategoryType {
    /// The only unit a category of this type may be measured in
    pub fn expected_unit(&self) -> UsageUnit {
        match self {
            CategoryType::Content => UsageUnit::TimeMinutes,
            CategoryType::Productivity => UsageUnit::CountDays,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "categories")]
#[schema(as = Category)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Expected monthly usage, in `unit`
    pub reference_value: i32,
    pub unit: UsageUnit,
    pub category_type: CategoryType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subscriptions::Entity")]
    Subscriptions,
}

impl Related<super::subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Build a category definition, rejecting combinations that can never be evaluated
    /// consistently. The returned model has no database id yet.
    pub fn new(
        name: impl Into<String>,
        reference_value: i32,
        unit: UsageUnit,
        category_type: CategoryType,
    ) -> Result<Self, AppError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(AppError::ReferenceData(
                "Category name must not be empty".to_string(),
            ));
        }
        if reference_value <= 0 {
            return Err(AppError::ReferenceData(format!(
                "Category '{}' must have a positive reference value, got {}",
                name, reference_value
            )));
        }
        if category_type.expected_unit() != unit {
            return Err(AppError::ReferenceData(format!(
                "Category '{}' of type {:?} must be measured in {}, not {}",
                name,
                category_type,
                category_type.expected_unit().as_str(),
                unit.as_str()
            )));
        }

        Ok(Self {
            id: 0,
            name,
            reference_value,
            unit,
            category_type,
        })
    }

    /// Builder method to set ID (for tests)
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

/// Reference categories installed by `init`
pub fn default_categories() -> Result<Vec<Model>, AppError> {
    use CategoryType::{Content, Productivity};
    use UsageUnit::{CountDays, TimeMinutes};

    [
        ("OTT", 1800, TimeMinutes, Content),
        ("MUSIC", 1500, TimeMinutes, Content),
        ("EBOOK", 300, TimeMinutes, Content),
        ("AI_TOOL", 12, CountDays, Productivity),
        ("WORK_TOOL", 20, CountDays, Productivity),
        ("CLOUD", 25, CountDays, Productivity),
    ]
    .into_iter()
    .map(|(name, reference, unit, kind)| Model::new(name, reference, unit, kind))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_requires_minutes() {
        let err = Model::new("OTT", 1800, UsageUnit::CountDays, CategoryType::Content)
            .unwrap_err();
        assert!(matches!(err, AppError::ReferenceData(_)));
        assert!(err.to_string().contains("TIME_MINUTES"));
    }

    #[test]
    fn test_productivity_requires_days() {
        let err = Model::new(
            "AI_TOOL",
            12,
            UsageUnit::TimeMinutes,
            CategoryType::Productivity,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ReferenceData(_)));
    }

    #[test]
    fn test_reference_value_must_be_positive() {
        assert!(Model::new("OTT", 0, UsageUnit::TimeMinutes, CategoryType::Content).is_err());
        assert!(Model::new("OTT", -5, UsageUnit::TimeMinutes, CategoryType::Content).is_err());
    }

    #[test]
    fn test_default_categories_are_valid() {
        let categories = default_categories().unwrap();
        assert_eq!(categories.len(), 6);
        for category in &categories {
            assert_eq!(category.category_type.expected_unit(), category.unit);
        }
    }

    #[test]
    fn test_monthly_cap() {
        assert_eq!(UsageUnit::CountDays.monthly_cap(28), 28);
        assert_eq!(UsageUnit::CountDays.monthly_cap(31), 31);
        assert_eq!(UsageUnit::TimeMinutes.monthly_cap(30), 30 * 24 * 60);
    }
}
