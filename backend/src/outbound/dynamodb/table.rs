//! Typed access to a single DynamoDB table.
//!
//! Items are mapped with `serde_dynamo`, so the stored attribute names are the
//! camelCase field names of the domain records.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};
use tracing::debug;

use crate::domain::ports::RepositoryError;

pub(crate) type Item = HashMap<String, AttributeValue>;

/// Build a key map from `(attribute, value)` string pairs.
pub(crate) fn key(parts: &[(&str, &str)]) -> Item {
    parts
        .iter()
        .map(|(name, value)| ((*name).to_owned(), AttributeValue::S((*value).to_owned())))
        .collect()
}

/// Classify an SDK failure. Transport failures mean the store is unreachable;
/// anything the service answered is a query error.
pub(crate) fn classify<E, R>(operation: &str, table: &str, error: SdkError<E, R>) -> RepositoryError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = format!("{operation} on {table}: {}", DisplayErrorContext(&error));
    debug!(operation, table, error = %message, "dynamodb operation failed");
    match error {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            RepositoryError::connection(message)
        }
        _ => RepositoryError::query(message),
    }
}

pub(crate) fn encode<T: Serialize>(table: &str, value: &T) -> Result<Item, RepositoryError> {
    to_item(value).map_err(|error| {
        RepositoryError::serialization(format!("encoding item for {table}: {error}"))
    })
}

pub(crate) fn decode<T: DeserializeOwned>(table: &str, item: Item) -> Result<T, RepositoryError> {
    from_item(item).map_err(|error| {
        RepositoryError::serialization(format!("decoding item from {table}: {error}"))
    })
}

fn decode_all<T: DeserializeOwned>(
    table: &str,
    items: Vec<Item>,
) -> Result<Vec<T>, RepositoryError> {
    from_items(items).map_err(|error| {
        RepositoryError::serialization(format!("decoding items from {table}: {error}"))
    })
}

/// A DynamoDB table holding one kind of record.
#[derive(Clone, Debug)]
pub struct DynamoTable {
    client: Client,
    name: String,
}

impl DynamoTable {
    pub fn new(client: Client, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn get<T: DeserializeOwned>(&self, key: Item) -> Result<Option<T>, RepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.name)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|error| classify("GetItem", &self.name, error))?;
        output.item.map(|item| decode(&self.name, item)).transpose()
    }

    /// Unconditional insert-or-replace.
    pub async fn put<T: Serialize>(&self, value: &T) -> Result<(), RepositoryError> {
        self.client
            .put_item()
            .table_name(&self.name)
            .set_item(Some(encode(&self.name, value)?))
            .send()
            .await
            .map_err(|error| classify("PutItem", &self.name, error))?;
        Ok(())
    }

    /// Insert only when no item with the same `partition_key` exists.
    pub async fn put_new<T: Serialize>(
        &self,
        value: &T,
        partition_key: &str,
        key_value: &str,
    ) -> Result<(), RepositoryError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.name)
            .set_item(Some(encode(&self.name, value)?))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", partition_key)
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|service| service.is_conditional_check_failed_exception()) =>
            {
                Err(RepositoryError::already_exists(key_value))
            }
            Err(error) => Err(classify("PutItem", &self.name, error)),
        }
    }

    /// Delete by key; returns whether an item was removed.
    pub async fn delete(&self, key: Item) -> Result<bool, RepositoryError> {
        let output = self
            .client
            .delete_item()
            .table_name(&self.name)
            .set_key(Some(key))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|error| classify("DeleteItem", &self.name, error))?;
        Ok(output.attributes.is_some_and(|old| !old.is_empty()))
    }

    /// Read the whole table, following pagination.
    pub async fn scan<T: DeserializeOwned>(&self) -> Result<Vec<T>, RepositoryError> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|error| classify("Scan", &self.name, error))?;
            items.extend(output.items.unwrap_or_default());
            match output.last_evaluated_key {
                Some(next) if !next.is_empty() => start_key = Some(next),
                _ => break,
            }
        }
        decode_all(&self.name, items)
    }

    /// All items whose `attribute` equals `value`, read from the base table
    /// (`index = None`) or a global secondary index.
    pub async fn query_eq<T: DeserializeOwned>(
        &self,
        index: Option<&str>,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<T>, RepositoryError> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;
        loop {
            let output = self
                .client
                .query()
                .table_name(&self.name)
                .set_index_name(index.map(str::to_owned))
                .key_condition_expression("#k = :v")
                .expression_attribute_names("#k", attribute)
                .expression_attribute_values(":v", AttributeValue::S(value.to_owned()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|error| classify("Query", &self.name, error))?;
            items.extend(output.items.unwrap_or_default());
            match output.last_evaluated_key {
                Some(next) if !next.is_empty() => start_key = Some(next),
                _ => break,
            }
        }
        decode_all(&self.name, items)
    }
}
