use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use chrono::Utc;

use probe_core::{FlowError, Provisioned, Record, ResourceFlow, ResourceKind, ResourceSpec};

const PARTITION_KEY: &str = "pkey";
const SORT_KEY: &str = "skey";
const ATTRIBUTE: &str = "attribute";

const PARTITION_VALUE: &str = "my-partition-key";
const SORT_PREFIX: &str = "my-sort-key";
const ATTRIBUTE_VALUE: &str = "my-attribute-value";

/// Provisions a table keyed on `pkey`/`skey` (describe first, create on
/// absence), inserts one timestamped item, and queries it back by
/// partition key and sort-key prefix.
pub struct TableRunner {
    client: Client,
    spec: ResourceSpec,
}

impl TableRunner {
    pub fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            spec: ResourceSpec::new(ResourceKind::Table, table_name),
        }
    }

    fn item_to_record(item: &std::collections::HashMap<String, AttributeValue>) -> Record {
        let string_of = |name: &str| {
            item.get(name)
                .and_then(|value| value.as_s().ok())
                .cloned()
                .unwrap_or_default()
        };
        Record::new(
            format!("{}/{}", string_of(PARTITION_KEY), string_of(SORT_KEY)),
            string_of(ATTRIBUTE),
        )
    }

    /// Full table scan, printed by the binary alongside the query results.
    pub async fn scan_all(&self) -> Result<Vec<Record>, FlowError> {
        let output = self
            .client
            .scan()
            .table_name(&self.spec.name)
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        Ok(output.items().iter().map(Self::item_to_record).collect())
    }
}

#[async_trait]
impl ResourceFlow for TableRunner {
    fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    async fn ensure(&self) -> Result<Provisioned, FlowError> {
        match self
            .client
            .describe_table()
            .table_name(&self.spec.name)
            .send()
            .await
        {
            Ok(_) => return Ok(Provisioned::AlreadyExists),
            Err(error) => {
                let service_error = error.into_service_error();
                if !service_error.is_resource_not_found_exception() {
                    return Err(FlowError::provision(
                        &self.spec,
                        DisplayErrorContext(&service_error),
                    ));
                }
            }
        }

        let attribute = |name: &str| {
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::S)
                .build()
        };
        let key = |name: &str, key_type: KeyType| {
            KeySchemaElement::builder()
                .attribute_name(name)
                .key_type(key_type)
                .build()
        };
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(5)
            .write_capacity_units(5)
            .build()
            .map_err(|error| FlowError::provision(&self.spec, error))?;

        match self
            .client
            .create_table()
            .table_name(&self.spec.name)
            .attribute_definitions(
                attribute(PARTITION_KEY)
                    .map_err(|error| FlowError::provision(&self.spec, error))?,
            )
            .attribute_definitions(
                attribute(SORT_KEY).map_err(|error| FlowError::provision(&self.spec, error))?,
            )
            .key_schema(
                key(PARTITION_KEY, KeyType::Hash)
                    .map_err(|error| FlowError::provision(&self.spec, error))?,
            )
            .key_schema(
                key(SORT_KEY, KeyType::Range)
                    .map_err(|error| FlowError::provision(&self.spec, error))?,
            )
            .provisioned_throughput(throughput)
            .send()
            .await
        {
            Ok(_) => Ok(Provisioned::Created),
            Err(error) => {
                let service_error = error.into_service_error();
                // A racing creator surfaces as ResourceInUse.
                if service_error.is_resource_in_use_exception() {
                    Ok(Provisioned::AlreadyExists)
                } else {
                    Err(FlowError::provision(
                        &self.spec,
                        DisplayErrorContext(&service_error),
                    ))
                }
            }
        }
    }

    async fn write(&self) -> Result<(), FlowError> {
        let sort_key = format!("{}-{}", SORT_PREFIX, Utc::now().to_rfc3339());
        self.client
            .put_item()
            .table_name(&self.spec.name)
            .item(PARTITION_KEY, AttributeValue::S(PARTITION_VALUE.to_string()))
            .item(SORT_KEY, AttributeValue::S(sort_key))
            .item(ATTRIBUTE, AttributeValue::S(ATTRIBUTE_VALUE.to_string()))
            .send()
            .await
            .map_err(|error| FlowError::write(&self.spec, DisplayErrorContext(&error)))?;
        Ok(())
    }

    async fn read(&self) -> Result<Vec<Record>, FlowError> {
        let output = self
            .client
            .query()
            .table_name(&self.spec.name)
            .key_condition_expression(format!(
                "{PARTITION_KEY} = :pkey AND begins_with({SORT_KEY}, :prefix)"
            ))
            .expression_attribute_values(
                ":pkey",
                AttributeValue::S(PARTITION_VALUE.to_string()),
            )
            .expression_attribute_values(":prefix", AttributeValue::S(SORT_PREFIX.to_string()))
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        Ok(output.items().iter().map(Self::item_to_record).collect())
    }
}
