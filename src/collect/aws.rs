use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, Statistic};
use aws_sdk_lambda::config::{Credentials, Region};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::debug;

use super::source::{FunctionInfo, Metric, MetricsSource, SourceError};

/// Seconds in the one-day statistics period
const PERIOD_SECONDS: i32 = 86_400;

/// How to authenticate against AWS
#[derive(Debug, Clone, Default)]
pub enum AwsCredentials {
    /// Default provider chain (environment, shared config, instance role)
    #[default]
    Default,
    /// A named profile from the shared config files
    Profile(String),
    /// Static access key pair
    Static {
        access_key_id: String,
        secret_access_key: String,
    },
}

/// Values built at most once per region, shared by every later caller
struct RegionCache<T> {
    cells: Mutex<HashMap<String, Arc<OnceCell<T>>>>,
}

impl<T: Clone> RegionCache<T> {
    fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    async fn get_or_init<F, Fut>(&self, region: &str, init: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(cells.entry(region.to_string()).or_default())
        };

        cell.get_or_init(init).await.clone()
    }
}

/// SDK clients for one region, sharing one resolved config
#[derive(Clone)]
struct RegionClients {
    lambda: aws_sdk_lambda::Client,
    cloudwatch: aws_sdk_cloudwatch::Client,
}

/// Lambda listing and CloudWatch statistics through the AWS SDK
pub struct AwsSource {
    credentials: AwsCredentials,
    regions: Vec<String>,
    clients: RegionCache<RegionClients>,
}

impl AwsSource {
    pub fn new(credentials: AwsCredentials, regions: Vec<String>) -> Self {
        Self {
            credentials,
            regions,
            clients: RegionCache::new(),
        }
    }

    async fn region_clients(&self, region: &str) -> RegionClients {
        self.clients
            .get_or_init(region, move || async move {
                let config = self.sdk_config(region).await;
                debug!("Resolved AWS config for {}", region);
                RegionClients {
                    lambda: aws_sdk_lambda::Client::new(&config),
                    cloudwatch: aws_sdk_cloudwatch::Client::new(&config),
                }
            })
            .await
    }

    async fn sdk_config(&self, region: &str) -> aws_config::SdkConfig {
        let loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));

        let loader = match &self.credentials {
            AwsCredentials::Default => loader,
            AwsCredentials::Profile(profile) => loader.profile_name(profile),
            AwsCredentials::Static {
                access_key_id,
                secret_access_key,
            } => loader.credentials_provider(Credentials::new(
                access_key_id.clone(),
                secret_access_key.clone(),
                None,
                None,
                "lambda-cost",
            )),
        };

        loader.load().await
    }
}

#[async_trait]
impl MetricsSource for AwsSource {
    async fn regions(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.regions.clone())
    }

    async fn list_functions(&self, region: &str) -> Result<Vec<FunctionInfo>, SourceError> {
        let client = self.region_clients(region).await.lambda;

        let mut functions = Vec::new();
        let mut pages = client.list_functions().into_paginator().send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| SourceError::new(region, "listing functions", e))?;

            for function in page.functions() {
                let Some(name) = function.function_name() else {
                    continue;
                };
                let memory_size_mb = function
                    .memory_size()
                    .and_then(|m| u32::try_from(m).ok())
                    .unwrap_or_default();

                functions.push(FunctionInfo {
                    name: name.to_string(),
                    memory_size_mb,
                });
            }
        }

        debug!("Listed {} functions in {}", functions.len(), region);
        Ok(functions)
    }

    async fn fetch_metric(
        &self,
        region: &str,
        function_name: &str,
        metric: Metric,
    ) -> Result<f64, SourceError> {
        let client = self.region_clients(region).await.cloudwatch;

        let end = Utc::now();
        let start = end - Duration::days(1);
        let statistic = match metric {
            Metric::InvocationSum => Statistic::Sum,
            Metric::AverageDuration => Statistic::Average,
        };

        let output = client
            .get_metric_statistics()
            .namespace("AWS/Lambda")
            .metric_name(metric.metric_name())
            .dimensions(
                Dimension::builder()
                    .name("FunctionName")
                    .value(function_name)
                    .build(),
            )
            .start_time(DateTime::from_secs(start.timestamp()))
            .end_time(DateTime::from_secs(end.timestamp()))
            .period(PERIOD_SECONDS)
            .statistics(statistic)
            .send()
            .await
            .map_err(|e| SourceError::new(region, "fetching metric statistics", e))?;

        // A missing datapoint means the function did not run during the period
        let value = output
            .datapoints()
            .first()
            .and_then(|point| match metric {
                Metric::InvocationSum => point.sum(),
                Metric::AverageDuration => point.average(),
            })
            .unwrap_or(0.0);

        Ok(value)
    }
}
