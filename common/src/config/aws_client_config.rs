use std::str::FromStr;

use anyhow::anyhow;
use rusoto_core::region::Region;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct AwsClientConfig {
    /// Current AWS region.
    aws_region: String,

    /// Only used for development. LocalStack endpoint
    #[serde(default = "default_localstack_test_mode_endpoint")]
    pub localstack_test_mode_endpoint: Option<String>,
}

impl AwsClientConfig {
    pub fn new(aws_region: String, localstack_test_mode_endpoint: Option<String>) -> Self {
        Self {
            aws_region,
            localstack_test_mode_endpoint,
        }
    }

    pub fn region(&self) -> Result<Region, anyhow::Error> {
        if let Some(endpoint) = self.localstack_test_mode_endpoint.clone() {
            Ok(Region::Custom {
                name: self.aws_region.clone(),
                endpoint,
            })
        } else {
            Region::from_str(&self.aws_region).map_err(|e| {
                anyhow!(e).context(format!(r#"Unable to parse AWS region "{}""#, self.aws_region))
            })
        }
    }
}

fn default_localstack_test_mode_endpoint() -> Option<String> {
    None
}
