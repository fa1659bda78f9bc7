//! eSMS.vn REST client for one-time passwords.
//!
//! Generates a 6-digit code, sends it to a phone number through the eSMS
//! gateway, and hands back the HTTP status, the code, and the decoded body.
//!
//! # Example
//!
//! ```rust,ignore
//! use esms_client::{EsmsClient, EsmsConfig};
//!
//! let client = EsmsClient::new(EsmsConfig::from_env()?)?;
//!
//! let (status, otp_code, body) = client.send_otp("0976162652").await?.into_parts();
//! if status == 200 && body.is_accepted() {
//!     println!("sent {} (SMSID {:?})", otp_code, body.sms_id());
//! }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod otp;
pub mod record;
pub mod transport;
pub mod types;

pub use config::EsmsConfig;
pub use credentials::SecretString;
pub use error::{EsmsError, Result};
pub use otp::{generate_otp_code, OtpCode};
pub use record::{Field, OtpResponse, Record};
pub use transport::{MockTransport, ReqwestTransport, SmsTransport, TransportResponse};
pub use types::{OtpRequestParams, SmsType};

use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one OTP dispatch.
#[derive(Debug, Clone)]
pub struct OtpDispatch {
    /// HTTP status returned by the gateway, success or not
    pub status: u16,
    pub otp_code: OtpCode,
    pub body: OtpResponse,
}

impl OtpDispatch {
    /// `(status, otp_code, body)`
    pub fn into_parts(self) -> (u16, String, OtpResponse) {
        (self.status, self.otp_code.into_string(), self.body)
    }
}

/// eSMS gateway client.
#[derive(Clone)]
pub struct EsmsClient {
    config: EsmsConfig,
    transport: Arc<dyn SmsTransport>,
    type_name: String,
}

impl EsmsClient {
    /// Create a client over `reqwest`, honouring `config.timeout`.
    pub fn new(config: EsmsConfig) -> Result<Self> {
        let transport = match config.timeout {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::new(),
        };
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: EsmsConfig, transport: Arc<dyn SmsTransport>) -> Self {
        Self {
            config,
            transport,
            type_name: record::DEFAULT_TYPE_NAME.to_string(),
        }
    }

    /// Label given to decoded response records.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Request parameters for `phone` with a freshly generated code.
    pub fn otp_params(&self, phone: impl Into<String>) -> OtpRequestParams {
        OtpRequestParams::new(phone, &self.config)
    }

    /// Send a new OTP code to `phone`.
    pub async fn send_otp(&self, phone: &str) -> Result<OtpDispatch> {
        self.send_otp_with(self.otp_params(phone)).await
    }

    /// Send an OTP using caller-built parameters from [`EsmsClient::otp_params`].
    ///
    /// Transport and decode failures are returned as errors without retry.
    /// A non-2xx status is not an error; check [`OtpDispatch::status`].
    pub async fn send_otp_with(&self, params: OtpRequestParams) -> Result<OtpDispatch> {
        debug!(
            endpoint = %self.config.endpoint,
            phone = %params.phone,
            sms_type = params.sms_type.as_u8(),
            "Sending OTP message"
        );

        let resp = self
            .transport
            .get(&self.config.endpoint, &params.to_query())
            .await?;

        if !resp.is_success() {
            warn!(status = resp.status, phone = %params.phone, "eSMS returned non-success status");
        }

        let body = record::decode(&resp.body, &self.type_name)?;
        info!(
            status = resp.status,
            phone = %params.phone,
            code_result = body.code_result().unwrap_or_default(),
            "OTP message dispatched"
        );

        Ok(OtpDispatch {
            status: resp.status,
            otp_code: params.into_otp_code(),
            body,
        })
    }
}
