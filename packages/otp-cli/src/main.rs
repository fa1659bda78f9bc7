// Manual check of an OTP dispatch against the real eSMS gateway

use anyhow::{Context, Result};
use clap::Parser;
use esms_client::{EsmsClient, EsmsConfig, SmsType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "send-otp")]
#[command(about = "Send a one-time password by SMS through eSMS")]
struct Cli {
    /// Destination phone number
    phone: String,

    /// Override ESMS_BRAND_NAME
    #[arg(long)]
    brand_name: Option<String>,

    /// 1 = hotline number, 2 = brand name
    #[arg(long)]
    sms_type: Option<SmsType>,

    /// Override ESMS_ENDPOINT
    #[arg(long)]
    endpoint: Option<String>,

    /// Label for decoded response records
    #[arg(long, default_value = esms_client::record::DEFAULT_TYPE_NAME)]
    type_name: String,

    /// Print the response body as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, mut config: EsmsConfig) -> EsmsConfig {
        if let Some(brand_name) = &self.brand_name {
            config = config.with_brand_name(brand_name);
        }
        if let Some(sms_type) = self.sms_type {
            config = config.with_sms_type(sms_type);
        }
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,esms_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load .env file if present (development)
    dotenvy::dotenv().ok();
    let config = cli.apply(EsmsConfig::from_env().context("Failed to load eSMS configuration")?);

    let client = EsmsClient::new(config)
        .context("Failed to create eSMS client")?
        .with_type_name(&cli.type_name);

    tracing::info!(phone = %cli.phone, "Dispatching OTP");
    let (status, otp_code, body) = client
        .send_otp(&cli.phone)
        .await
        .context("OTP dispatch failed")?
        .into_parts();

    println!("Status code: {}", status);
    println!("OTP code is {}", otp_code);
    println!("Accepted: {}", body.is_accepted());
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&body).context("Failed to render response body")?
        );
    } else {
        println!("Data received: {}", body);
    }

    Ok(())
}
