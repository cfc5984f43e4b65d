use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use probe_core::{FlowError, Provisioned, Record, ResourceFlow, ResourceKind, ResourceSpec};

use crate::poll::{read_until_visible, PollPolicy};

/// Provisions a bucket (head first, create on NotFound), puts one object,
/// and lists the bucket's contents back.
pub struct BucketRunner {
    client: Client,
    spec: ResourceSpec,
    object_key: String,
    object_body: &'static [u8],
    poll: PollPolicy,
}

impl BucketRunner {
    pub fn new(
        client: Client,
        bucket_name: &str,
        object_key: &str,
        object_body: &'static [u8],
    ) -> Self {
        Self {
            client,
            spec: ResourceSpec::new(ResourceKind::Bucket, bucket_name),
            object_key: object_key.to_string(),
            object_body,
            poll: PollPolicy::default(),
        }
    }

    #[cfg(test)]
    fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<Record>, FlowError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        Ok(output
            .contents()
            .iter()
            .map(|object| {
                let record = Record::new(
                    object.key().unwrap_or("unknown"),
                    format!("{} bytes", object.size().unwrap_or(0)),
                );
                match object.last_modified().and_then(|m| m.to_millis().ok()) {
                    Some(millis) => record.with_timestamp_millis(millis),
                    None => record,
                }
            })
            .collect())
    }

    /// Enumerates every bucket with its objects. A listing failure in one
    /// bucket skips to the next instead of aborting the enumeration.
    pub async fn enumerate_buckets(&self) -> Result<Vec<(String, Vec<Record>)>, FlowError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        let mut buckets = Vec::new();
        for bucket in output.buckets() {
            let Some(name) = bucket.name() else {
                continue;
            };
            match self.list_objects(name).await {
                Ok(records) => buckets.push((name.to_string(), records)),
                Err(error) => {
                    tracing::warn!(bucket = name, %error, "skipping bucket");
                }
            }
        }
        Ok(buckets)
    }
}

#[async_trait]
impl ResourceFlow for BucketRunner {
    fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    async fn ensure(&self) -> Result<Provisioned, FlowError> {
        match self
            .client
            .head_bucket()
            .bucket(&self.spec.name)
            .send()
            .await
        {
            Ok(_) => return Ok(Provisioned::AlreadyExists),
            Err(error) => {
                let service_error = error.into_service_error();
                if !service_error.is_not_found() {
                    return Err(FlowError::provision(
                        &self.spec,
                        DisplayErrorContext(&service_error),
                    ));
                }
            }
        }

        match self
            .client
            .create_bucket()
            .bucket(&self.spec.name)
            .send()
            .await
        {
            Ok(_) => Ok(Provisioned::Created),
            Err(error) => {
                let service_error = error.into_service_error();
                // A racing creator still means the bucket is there.
                if service_error.is_bucket_already_owned_by_you()
                    || service_error.is_bucket_already_exists()
                {
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
        self.client
            .put_object()
            .bucket(&self.spec.name)
            .key(&self.object_key)
            .body(ByteStream::from_static(self.object_body))
            .send()
            .await
            .map_err(|error| FlowError::write(&self.spec, DisplayErrorContext(&error)))?;
        Ok(())
    }

    async fn read(&self) -> Result<Vec<Record>, FlowError> {
        read_until_visible(
            &self.poll,
            || self.list_objects(&self.spec.name),
            |records| !records.is_empty(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::create_bucket::CreateBucketOutput;
    use aws_sdk_s3::operation::head_bucket::{HeadBucketError, HeadBucketOutput};
    use aws_sdk_s3::operation::list_buckets::ListBucketsOutput;
    use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
    use aws_sdk_s3::operation::put_object::PutObjectOutput;
    use aws_sdk_s3::types::error::NotFound;
    use aws_sdk_s3::types::{Bucket, Object};
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use probe_core::run_flow;

    use super::*;

    fn runner(client: Client) -> BucketRunner {
        BucketRunner::new(client, "my-bucket", "my-key", b"Hello, World!")
            .with_poll(PollPolicy::immediate())
    }

    #[tokio::test]
    async fn head_success_classifies_as_already_exists() {
        let head_rule =
            mock!(Client::head_bucket).then_output(|| HeadBucketOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, [&head_rule]);

        let provisioned = runner(client).ensure().await.expect("ensure should succeed");

        assert!(provisioned.already_existed());
    }

    #[tokio::test]
    async fn not_found_head_triggers_create() {
        let head_rule = mock!(Client::head_bucket)
            .then_error(|| HeadBucketError::NotFound(NotFound::builder().build()));
        let create_rule =
            mock!(Client::create_bucket).then_output(|| CreateBucketOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&head_rule, &create_rule]);

        let provisioned = runner(client).ensure().await.expect("ensure should succeed");

        assert_eq!(provisioned, Provisioned::Created);
    }

    #[tokio::test]
    async fn full_pass_lists_the_written_object() {
        let head_rule = mock!(Client::head_bucket)
            .then_error(|| HeadBucketError::NotFound(NotFound::builder().build()));
        let create_rule =
            mock!(Client::create_bucket).then_output(|| CreateBucketOutput::builder().build());
        let put_rule = mock!(Client::put_object).then_output(|| PutObjectOutput::builder().build());
        let list_rule = mock!(Client::list_objects_v2).then_output(|| {
            ListObjectsV2Output::builder()
                .contents(Object::builder().key("my-key").size(13).build())
                .build()
        });
        let client = mock_client!(
            aws_sdk_s3,
            RuleMode::MatchAny,
            [&head_rule, &create_rule, &put_rule, &list_rule]
        );

        let report = run_flow(&runner(client)).await.expect("flow should complete");

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].identity, "my-key");
        assert_eq!(report.records[0].body, "13 bytes");
    }

    #[tokio::test]
    async fn bucket_enumeration_survives_a_bad_bucket() {
        let buckets_rule = mock!(Client::list_buckets).then_output(|| {
            ListBucketsOutput::builder()
                .buckets(Bucket::builder().name("my-bucket").build())
                .buckets(Bucket::builder().name("broken-bucket").build())
                .build()
        });
        let objects_rule = mock!(Client::list_objects_v2)
            .match_requests(|request| request.bucket() == Some("my-bucket"))
            .then_output(|| {
                ListObjectsV2Output::builder()
                    .contents(Object::builder().key("my-key").build())
                    .build()
            });
        let broken_rule = mock!(Client::list_objects_v2)
            .match_requests(|request| request.bucket() == Some("broken-bucket"))
            .then_error(|| {
                aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error::unhandled(
                    "listing exploded",
                )
            });
        let client = mock_client!(
            aws_sdk_s3,
            RuleMode::MatchAny,
            [&buckets_rule, &objects_rule, &broken_rule]
        );

        let buckets = runner(client)
            .enumerate_buckets()
            .await
            .expect("enumeration should survive");

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].0, "my-bucket");
    }
}
