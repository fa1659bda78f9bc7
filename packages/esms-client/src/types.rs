use std::fmt;
use std::str::FromStr;

use crate::config::EsmsConfig;
use crate::credentials::SecretString;
use crate::error::EsmsError;
use crate::otp::{generate_otp_code, OtpCode};

/// How the gateway originates the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmsType {
    /// Sent from a hotline number
    Hotline = 1,
    /// Sent under the registered brand name
    #[default]
    BrandName = 2,
}

impl SmsType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SmsType {
    type Error = EsmsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Hotline),
            2 => Ok(Self::BrandName),
            other => Err(EsmsError::Config(format!(
                "SmsType must be 1 (hotline) or 2 (brand name), got {}",
                other
            ))),
        }
    }
}

impl FromStr for SmsType {
    type Err = EsmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| EsmsError::Config(format!("SmsType must be 1 or 2, got {:?}", s)))?;
        Self::try_from(value)
    }
}

impl fmt::Display for SmsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Everything the gateway needs for one OTP message.
///
/// The code is generated on construction and the params are consumed by
/// the dispatch, so a code goes out in at most one request. Vendor fields
/// start from [`EsmsConfig`] and can be overridden for a single request
/// with the `with_*` methods.
#[derive(Debug)]
pub struct OtpRequestParams {
    pub phone: String,
    otp_code: OtpCode,
    pub api_key: SecretString,
    pub secret_key: SecretString,
    pub brand_name: String,
    pub sms_type: SmsType,
    message_template: String,
}

impl OtpRequestParams {
    pub fn new(phone: impl Into<String>, config: &EsmsConfig) -> Self {
        Self::with_code(phone, generate_otp_code(), config)
    }

    fn with_code(phone: impl Into<String>, otp_code: OtpCode, config: &EsmsConfig) -> Self {
        Self {
            phone: phone.into(),
            otp_code,
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            brand_name: config.brand_name.clone(),
            sms_type: config.sms_type,
            message_template: config.message_template.clone(),
        }
    }

    pub fn otp_code(&self) -> &OtpCode {
        &self.otp_code
    }

    pub(crate) fn into_otp_code(self) -> OtpCode {
        self.otp_code
    }

    pub fn with_api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<SecretString>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    pub fn with_brand_name(mut self, brand_name: impl Into<String>) -> Self {
        self.brand_name = brand_name.into();
        self
    }

    pub fn with_sms_type(mut self, sms_type: SmsType) -> Self {
        self.sms_type = sms_type;
        self
    }

    /// Message text sent to the phone.
    pub fn content(&self) -> String {
        self.message_template
            .replace("{code}", self.otp_code.as_str())
    }

    /// Query parameters in the order the gateway documents them.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Phone", self.phone.clone()),
            ("Content", self.content()),
            ("ApiKey", self.api_key.expose().to_string()),
            ("SecretKey", self.secret_key.expose().to_string()),
            ("BrandName", self.brand_name.clone()),
            ("SmsType", self.sms_type.to_string()),
        ]
    }
}
