//! DynamoDB adapter.
//!
//! Tables are expected to exist already; provisioning is out of scope. Each
//! table is named `<prefix>-<entity>`.

mod repositories;
mod table;

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use tracing::info;

pub use self::repositories::{
    DynamoChatRepository, DynamoCheckInRepository, DynamoMatchRepository, DynamoMessageRepository,
    DynamoRecruitmentRepository, DynamoReportRepository, DynamoRequestRepository,
    DynamoRestaurantRepository, DynamoReviewRepository, DynamoUserRepository, MATCH_ID_INDEX,
    RECRUITER_ID_INDEX, REQUESTER_ID_INDEX,
};
pub use self::table::DynamoTable;

use super::Repositories;

/// Connection settings for the DynamoDB adapter.
#[derive(Debug, Clone, Default)]
pub struct DynamoSettings {
    pub table_prefix: String,
    /// Override for local development (e.g. DynamoDB Local).
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
}

impl DynamoSettings {
    #[must_use]
    pub fn table_name(&self, entity: &str) -> String {
        format!("{}-{entity}", self.table_prefix)
    }
}

/// Build a client from the ambient AWS configuration.
pub async fn connect(settings: &DynamoSettings) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let config = loader.load().await;
    let client = if let Some(endpoint) = &settings.endpoint_url {
        let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config)
            .endpoint_url(endpoint)
            .build();
        Client::from_conf(dynamo_config)
    } else {
        Client::new(&config)
    };
    info!(
        prefix = %settings.table_prefix,
        endpoint = settings.endpoint_url.as_deref().unwrap_or("default"),
        "connected to DynamoDB"
    );
    client
}

/// Wire every repository port to its table.
#[must_use]
pub fn repositories(client: &Client, settings: &DynamoSettings) -> Repositories {
    let table = |entity: &str| DynamoTable::new(client.clone(), settings.table_name(entity));
    Repositories {
        users: Arc::new(DynamoUserRepository(table("users"))),
        matches: Arc::new(DynamoMatchRepository(table("matches"))),
        check_ins: Arc::new(DynamoCheckInRepository(table("checkins"))),
        reviews: Arc::new(DynamoReviewRepository(table("reviews"))),
        reports: Arc::new(DynamoReportRepository(table("reports"))),
        recruitments: Arc::new(DynamoRecruitmentRepository(table("recruitments"))),
        requests: Arc::new(DynamoRequestRepository(table("requests"))),
        chats: Arc::new(DynamoChatRepository(table("chats"))),
        messages: Arc::new(DynamoMessageRepository(table("messages"))),
        restaurants: Arc::new(DynamoRestaurantRepository(table("restaurants"))),
    }
}
