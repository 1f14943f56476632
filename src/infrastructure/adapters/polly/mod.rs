//! Polly Adapter - Amazon Polly 客户端实现

mod aws_polly_client;
mod fake_polly_client;

pub use aws_polly_client::{AwsPollyClient, AwsPollyClientFactory};
pub use fake_polly_client::{
    FakeCallLog, FakePollyClient, FakePollyClientConfig, FakePollyClientFactory,
};
