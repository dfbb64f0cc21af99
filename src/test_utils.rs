use crate::{
    config::Config,
    database::{
        DatabaseManager,
        entities::{
            BillingCycle, Category, CategoryType, Subscription, SubscriptionStatus, categories,
            subscriptions,
        },
    },
    evaluation::StatusPolicy,
    server::Server,
};

/// Test server builder backed by in-memory SQLite
pub struct TestServerBuilder {
    config: Config,
    use_memory_db: bool,
    policy: Option<StatusPolicy>,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            use_memory_db: true,
            policy: None,
        }
    }

    /// Use the database URL of the supplied config instead of in-memory SQLite
    pub fn with_real_database(mut self) -> Self {
        self.use_memory_db = false;
        self
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replace the threshold based status policy
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Build the test server and run migrations
    pub async fn build(self) -> Server {
        let mut config = self.config;

        if self.use_memory_db {
            config.database.url = "sqlite::memory:".to_string();
        }
        config.metrics.enabled = false;
        config.logging.log_request = false;

        let server = match self.policy {
            Some(policy) => Server::new_with_policy(config, policy).await.unwrap(),
            None => Server::new(config).await.unwrap(),
        };

        server.database.migrate().await.unwrap();
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a category with the unit its type requires
pub async fn create_test_category(
    database: &dyn DatabaseManager,
    name: &str,
    category_type: CategoryType,
    reference_value: i32,
) -> Category {
    let category =
        categories::Model::new(name, reference_value, category_type.expected_unit(), category_type)
            .unwrap();
    database.categories().create(&category).await.unwrap()
}

/// Create a monthly subscription where the user pays `monthly_cost` each month
pub async fn create_test_subscription(
    database: &dyn DatabaseManager,
    category_id: i32,
    name: &str,
    monthly_cost: i64,
    status: SubscriptionStatus,
) -> Subscription {
    let subscription = subscriptions::Model::new(
        category_id,
        name,
        monthly_cost,
        monthly_cost,
        BillingCycle::Monthly,
        status,
    );
    database.subscriptions().create(&subscription).await.unwrap()
}
