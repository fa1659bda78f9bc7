use std::time::Duration;

use crate::credentials::SecretString;
use crate::error::{EsmsError, Result};
use crate::types::SmsType;

/// eSMS endpoint that accepts messages as GET query parameters.
pub const DEFAULT_ENDPOINT: &str =
    "http://rest.esms.vn/MainService.svc/json/SendMultipleMessage_V4_get";

/// Message body; `{code}` is replaced by the OTP code.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Ma OTP cua ban la {code}";

pub const DEFAULT_BRAND_NAME: &str = "BaoTriXeMay";

/// Gateway credentials and request defaults, shared by every dispatch.
#[derive(Debug, Clone)]
pub struct EsmsConfig {
    pub api_key: SecretString,
    pub secret_key: SecretString,
    pub brand_name: String,
    pub sms_type: SmsType,
    pub endpoint: String,
    pub message_template: String,
    /// Applied to the default HTTP client only
    pub timeout: Option<Duration>,
}

impl EsmsConfig {
    pub fn new(api_key: impl Into<SecretString>, secret_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            brand_name: DEFAULT_BRAND_NAME.to_string(),
            sms_type: SmsType::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
            timeout: None,
        }
    }

    /// Load configuration from `ESMS_*` environment variables.
    ///
    /// `ESMS_API_KEY` and `ESMS_SECRET_KEY` are required; `ESMS_BRAND_NAME`,
    /// `ESMS_SMS_TYPE`, `ESMS_ENDPOINT`, `ESMS_MESSAGE_TEMPLATE` and
    /// `ESMS_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EsmsConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| EsmsError::Config(format!("{} must be set", key)))
        };

        let mut config = Self::new(required("ESMS_API_KEY")?, required("ESMS_SECRET_KEY")?);

        if let Some(brand_name) = lookup("ESMS_BRAND_NAME") {
            config.brand_name = brand_name;
        }
        if let Some(sms_type) = lookup("ESMS_SMS_TYPE") {
            config.sms_type = sms_type.parse()?;
        }
        if let Some(endpoint) = lookup("ESMS_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(template) = lookup("ESMS_MESSAGE_TEMPLATE") {
            config.message_template = template;
        }
        if let Some(secs) = lookup("ESMS_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                EsmsError::Config(format!("ESMS_TIMEOUT_SECS must be a number, got {:?}", secs))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_brand_name(mut self, brand_name: impl Into<String>) -> Self {
        self.brand_name = brand_name.into();
        self
    }

    pub fn with_sms_type(mut self, sms_type: SmsType) -> Self {
        self.sms_type = sms_type;
        self
    }

    /// Set a custom endpoint (sandbox, proxy).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_message_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
