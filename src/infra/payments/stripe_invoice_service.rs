use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{error, info, instrument};

use crate::domain::models::invoice::{InvoiceRequest, IssuedInvoice};
use crate::domain::ports::InvoiceService;
use crate::error::AppError;

const CURRENCY: &str = "usd";
const DAYS_UNTIL_DUE: u32 = 7;

type Form = Vec<(String, String)>;

#[derive(Deserialize)]
struct ObjectRef {
    id: String,
}

#[derive(Deserialize)]
struct ObjectList {
    data: Vec<ObjectRef>,
}

#[derive(Deserialize)]
struct Invoice {
    id: String,
    hosted_invoice_url: Option<String>,
}

/// Invoicing against the Stripe REST API (form-encoded requests).
pub struct StripeInvoiceService {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeInvoiceService {
    pub fn new(api_base: String, secret_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path)
    }

    async fn send<T: DeserializeOwned>(&self, step: &str, request: RequestBuilder) -> Result<T, AppError> {
        let res = request
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::Payment(format!("{}: connection error: {}", step, e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Payment(format!("{}: status {}, body: {}", step, status, text)));
        }

        res.json::<T>()
            .await
            .map_err(|e| AppError::Payment(format!("{}: unreadable response: {}", step, e)))
    }

    async fn find_or_create_customer(&self, request: &InvoiceRequest) -> Result<String, AppError> {
        let existing: ObjectList = self.send(
            "list customers",
            self.client.get(self.url("customers"))
                .query(&[("email", request.customer_email.as_str()), ("limit", "1")]),
        ).await?;

        if let Some(customer) = existing.data.into_iter().next() {
            return Ok(customer.id);
        }

        let created: ObjectRef = self.send(
            "create customer",
            self.client.post(self.url("customers")).form(&customer_form(request)),
        ).await?;
        info!("Created payment customer {}", created.id);
        Ok(created.id)
    }
}

pub fn customer_form(request: &InvoiceRequest) -> Form {
    vec![
        ("email".into(), request.customer_email.clone()),
        ("name".into(), request.customer_name.clone()),
        ("metadata[userId]".into(), request.user_id.clone()),
    ]
}

pub fn invoice_item_form(request: &InvoiceRequest, customer_id: &str) -> Form {
    vec![
        ("customer".into(), customer_id.to_string()),
        ("amount".into(), request.amount.to_string()),
        ("currency".into(), CURRENCY.into()),
        ("description".into(), request.line_item_description()),
    ]
}

pub fn invoice_form(request: &InvoiceRequest, customer_id: &str) -> Form {
    let mut form: Form = vec![
        ("customer".into(), customer_id.to_string()),
        ("collection_method".into(), "send_invoice".into()),
        ("days_until_due".into(), DAYS_UNTIL_DUE.to_string()),
        ("pending_invoice_items_behavior".into(), "include".into()),
        ("metadata[bookingId]".into(), request.booking_id.clone()),
        ("metadata[userId]".into(), request.user_id.clone()),
        ("custom_fields[0][name]".into(), "Event".into()),
        ("custom_fields[0][value]".into(), request.event_title.clone()),
        ("custom_fields[1][name]".into(), "Guests".into()),
        ("custom_fields[1][value]".into(), request.number_of_guests.to_string()),
    ];
    if let Some(description) = &request.description {
        form.push(("description".into(), description.clone()));
    }
    form
}

#[async_trait]
impl InvoiceService for StripeInvoiceService {
    #[instrument(skip(self, request), fields(booking_id = %request.booking_id))]
    async fn create_and_send(&self, request: &InvoiceRequest) -> Result<IssuedInvoice, AppError> {
        if self.secret_key.is_empty() {
            error!("STRIPE_SECRET_KEY is not configured");
            return Err(AppError::Payment("payment provider key missing".into()));
        }

        let customer_id = self.find_or_create_customer(request).await?;

        let _item: ObjectRef = self.send(
            "create invoice item",
            self.client.post(self.url("invoiceitems")).form(&invoice_item_form(request, &customer_id)),
        ).await?;

        let draft: Invoice = self.send(
            "create invoice",
            self.client.post(self.url("invoices")).form(&invoice_form(request, &customer_id)),
        ).await?;

        let _finalized: Invoice = self.send(
            "finalize invoice",
            self.client.post(self.url(&format!("invoices/{}/finalize", draft.id))),
        ).await?;

        let sent: Invoice = self.send(
            "send invoice",
            self.client.post(self.url(&format!("invoices/{}/send", draft.id))),
        ).await?;

        let issued = issued_invoice(sent, customer_id)?;
        info!("Invoice {} sent", issued.invoice_id);
        Ok(issued)
    }
}

/// A sent invoice is only usable when the provider returned a payment page.
fn issued_invoice(sent: Invoice, customer_id: String) -> Result<IssuedInvoice, AppError> {
    let invoice_url = sent.hosted_invoice_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::Payment(format!("invoice {} was sent without a hosted url", sent.id)))?;

    Ok(IssuedInvoice {
        invoice_id: sent.id,
        invoice_url,
        customer_id,
    })
}
