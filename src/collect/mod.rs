#[cfg(feature = "aws")]
pub mod aws;
pub mod fanout;
pub mod snapshot;
pub mod source;

#[cfg(feature = "aws")]
pub use aws::{AwsCredentials, AwsSource};
pub use fanout::{collect_region, collect_usage, CollectError};
pub use snapshot::SnapshotSource;
pub use source::{FunctionInfo, Metric, MetricsSource, SourceError};
