pub mod categories;
pub mod subscription_evaluations;
pub mod subscriptions;
pub mod usage_records;

pub use categories::Entity as Categories;
pub use categories::{CategoryType, UsageUnit};
pub use subscription_evaluations::Entity as SubscriptionEvaluations;
pub use subscription_evaluations::EvaluationStatus;
pub use subscriptions::Entity as Subscriptions;
pub use subscriptions::{BillingCycle, SubscriptionStatus};
pub use usage_records::Entity as UsageRecords;

// Type aliases
pub type Category = categories::Model;
pub type Subscription = subscriptions::Model;
pub type UsageRecord = usage_records::Model;
pub type EvaluationRecord = subscription_evaluations::Model;
