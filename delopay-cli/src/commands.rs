//! Subcommands, one per SDK operation.

use clap::{Args, Subcommand};
use delopay_sdk::DelopayClient;
use delopay_sdk::objects::{
    CreatePaymentRequest, Metadata, PaymentProvider, PaymentStatus, RefundPaymentRequest,
    StripePaymentMethodsQuery, UpdatePaymentRequest,
};
use rust_decimal::Decimal;
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, inspect and settle payments
    #[command(subcommand)]
    Payments(PaymentsCommand),

    /// Discover payment providers and their options
    #[command(subcommand)]
    Providers(ProvidersCommand),
}

#[derive(Subcommand, Debug)]
pub enum PaymentsCommand {
    /// Create a payment and print its checkout URL
    Create(CreateArgs),

    /// Fetch a payment by id
    Get { payment_id: String },

    /// Fetch a payment by the merchant's order id
    GetByOrder { client_order_id: String },

    /// Update mutable fields of a payment
    Update {
        payment_id: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Capture an authorized payment
    Capture { payment_id: String },

    /// Refund a payment, fully or partially
    Refund {
        payment_id: String,
        /// Amount to refund; the remaining amount when omitted
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Requeue merchant callbacks that failed to deliver
    ResendFailedCallbacks,
}

#[derive(Subcommand, Debug)]
pub enum ProvidersCommand {
    /// List providers enabled for the merchant
    List,

    /// Show the public client configuration of a provider
    ClientConfig { provider_id: String },

    /// List Stripe payment methods for a country pair
    StripeMethods {
        #[arg(long)]
        merchant_country: String,
        #[arg(long)]
        customer_country: String,
        #[arg(long)]
        currency: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub client_order_id: String,
    /// STRIPE, PAYPAL, NOWPAYMENTS, PAYSAFE, ...
    #[arg(long, value_parser = parse_provider)]
    pub provider: PaymentProvider,
    #[arg(long)]
    pub amount: Decimal,
    #[arg(long)]
    pub currency: String,
    #[arg(long)]
    pub success_url: String,
    #[arg(long)]
    pub cancel_url: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub customer_email: Option<String>,
    #[arg(long)]
    pub callback_url: Option<String>,
    /// JSON object, e.g. '{"cart":"42"}'
    #[arg(long, value_parser = parse_metadata)]
    pub metadata: Option<Metadata>,
    #[arg(long)]
    pub auto_capture: Option<bool>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub customer_email: Option<String>,
    #[arg(long)]
    pub callback_url: Option<String>,
    #[arg(long)]
    pub amount: Option<Decimal>,
    #[arg(long)]
    pub amount_paid: Option<Decimal>,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<PaymentStatus>,
    #[arg(long, value_parser = parse_metadata)]
    pub metadata: Option<Metadata>,
}

impl From<CreateArgs> for CreatePaymentRequest {
    fn from(args: CreateArgs) -> Self {
        let mut request = CreatePaymentRequest::new(
            args.client_order_id,
            args.provider,
            args.amount,
            args.currency,
            args.success_url,
            args.cancel_url,
        );
        request.description = args.description;
        request.customer_email = args.customer_email;
        request.callback_url = args.callback_url;
        request.metadata = args.metadata;
        request.auto_capture = args.auto_capture;
        request
    }
}

impl From<UpdateArgs> for UpdatePaymentRequest {
    fn from(args: UpdateArgs) -> Self {
        Self {
            metadata: args.metadata,
            callback_url: args.callback_url,
            description: args.description,
            customer_email: args.customer_email,
            amount: args.amount,
            amount_paid: args.amount_paid,
            currency: args.currency,
            status: args.status,
        }
    }
}

fn parse_provider(raw: &str) -> Result<PaymentProvider, String> {
    Ok(PaymentProvider::from(raw.trim().to_ascii_uppercase()))
}

fn parse_status(raw: &str) -> Result<PaymentStatus, String> {
    Ok(PaymentStatus::from(raw.trim().to_ascii_uppercase()))
}

fn parse_metadata(raw: &str) -> Result<Metadata, String> {
    serde_json::from_str(raw).map_err(|e| format!("metadata must be a JSON object: {e}"))
}

/// Execute `command` and return the response as JSON for printing.
pub async fn run(command: Command, client: &DelopayClient) -> anyhow::Result<Value> {
    let output = match command {
        Command::Payments(command) => {
            let payments = client.payments();
            match command {
                PaymentsCommand::Create(args) => {
                    let input = CreatePaymentRequest::from(args);
                    serde_json::to_value(payments.create(&input).await?)?
                }
                PaymentsCommand::Get { payment_id } => {
                    serde_json::to_value(payments.get(&payment_id).await?)?
                }
                PaymentsCommand::GetByOrder { client_order_id } => {
                    serde_json::to_value(payments.get_by_order(&client_order_id).await?)?
                }
                PaymentsCommand::Update { payment_id, fields } => {
                    let input = UpdatePaymentRequest::from(fields);
                    serde_json::to_value(payments.update(&payment_id, &input).await?)?
                }
                PaymentsCommand::Capture { payment_id } => {
                    serde_json::to_value(payments.capture(&payment_id).await?)?
                }
                PaymentsCommand::Refund {
                    payment_id,
                    amount,
                    reason,
                } => {
                    let input = RefundPaymentRequest { amount, reason };
                    serde_json::to_value(payments.refund(&payment_id, &input).await?)?
                }
                PaymentsCommand::ResendFailedCallbacks => {
                    serde_json::to_value(payments.resend_failed_callbacks().await?)?
                }
            }
        }
        Command::Providers(command) => {
            let providers = client.providers();
            match command {
                ProvidersCommand::List => serde_json::to_value(providers.list().await?)?,
                ProvidersCommand::ClientConfig { provider_id } => {
                    serde_json::to_value(providers.get_client_config(&provider_id).await?)?
                }
                ProvidersCommand::StripeMethods {
                    merchant_country,
                    customer_country,
                    currency,
                } => {
                    let query = StripePaymentMethodsQuery {
                        merchant_country,
                        customer_country,
                        currency,
                    };
                    serde_json::to_value(providers.get_stripe_payment_methods(&query).await?)?
                }
            }
        }
    };
    Ok(output)
}
