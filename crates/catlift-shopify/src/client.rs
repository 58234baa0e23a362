//! HTTP client for the Shopify Admin REST API.
//!
//! Only the two calls provisioning needs: create a product, then attach its
//! images one by one. Neither is retried, since a repeated POST would create a
//! duplicate.

use std::time::Duration;

use catlift_core::{Image, ProductDraft};
use reqwest::{Client, Response, Url};
use serde::Serialize;

use crate::error::ShopifyError;
use crate::types::{
    CreatedProduct, CreatedProductEnvelope, ImageEnvelope, ImagePayload, ProductEnvelope,
    ProductPayload,
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Result of provisioning one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutcome {
    pub product_id: i64,
    pub images_attached: usize,
    pub images_failed: usize,
}

pub struct AdminClient {
    client: Client,
    access_token: String,
    /// `<store>/admin/api/<version>/`
    api_base: Url,
}

impl AdminClient {
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ShopifyError::InvalidStoreUrl`] if
    /// `store_url` is not a valid URL.
    pub fn new(
        store_url: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("catlift/0.1 (catalog-provisioning)")
            .build()?;

        let normalised = format!(
            "{}/admin/api/{}/",
            store_url.trim_end_matches('/'),
            api_version.trim_matches('/')
        );
        let api_base = Url::parse(&normalised).map_err(|e| ShopifyError::InvalidStoreUrl {
            url: store_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            api_base,
        })
    }

    /// Creates `draft` as a new product.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::MissingTitle`] if the record was never extracted.
    /// - [`ShopifyError::Api`] on a non-2xx response.
    /// - [`ShopifyError::Http`] on network failure.
    /// - [`ShopifyError::Deserialize`] if the response has an unexpected shape.
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<CreatedProduct, ShopifyError> {
        let product = ProductPayload::from_draft(draft).ok_or_else(|| ShopifyError::MissingTitle {
            handle: draft.handle.clone(),
        })?;
        let context = format!("create product {}", draft.handle);

        let response = self
            .post("products.json", &ProductEnvelope { product })
            .await?;
        let body = Self::success_body(response, &context).await?;

        let envelope: CreatedProductEnvelope =
            serde_json::from_str(&body).map_err(|source| ShopifyError::Deserialize {
                context,
                source,
            })?;
        Ok(envelope.product)
    }

    /// Attaches `image` to product `product_id`, linked to `variant_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Api`] on a non-2xx response and
    /// [`ShopifyError::Http`] on network failure.
    pub async fn attach_image(
        &self,
        product_id: i64,
        image: &Image,
        variant_ids: &[i64],
    ) -> Result<(), ShopifyError> {
        let path = format!("products/{product_id}/images.json");
        let payload = ImageEnvelope {
            image: ImagePayload::new(image, variant_ids),
        };
        let response = self.post(&path, &payload).await?;
        Self::success_body(response, &format!("image {}", image.src)).await?;
        Ok(())
    }

    /// Creates the product, then attaches every image to the variants whose
    /// primary option matches the image's colour. A failed image is logged and
    /// counted; it does not fail the product.
    ///
    /// # Errors
    ///
    /// Returns the error of [`AdminClient::create_product`].
    pub async fn provision(&self, draft: &ProductDraft) -> Result<ProvisionOutcome, ShopifyError> {
        let created = self.create_product(draft).await?;
        tracing::info!(handle = %draft.handle, product_id = created.id, "product created");

        let mut outcome = ProvisionOutcome {
            product_id: created.id,
            images_attached: 0,
            images_failed: 0,
        };

        for image in &draft.images {
            let variant_ids = created.variant_ids_for(image);
            match self.attach_image(created.id, image, &variant_ids).await {
                Ok(()) => {
                    tracing::debug!(src = %image.src, variants = variant_ids.len(), "image attached");
                    outcome.images_attached += 1;
                }
                Err(e) => {
                    tracing::warn!(handle = %draft.handle, src = %image.src, error = %e, "image attach failed");
                    outcome.images_failed += 1;
                }
            }
        }

        Ok(outcome)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response, ShopifyError> {
        let url = self
            .api_base
            .join(path)
            .map_err(|e| ShopifyError::InvalidStoreUrl {
                url: self.api_base.to_string(),
                reason: e.to_string(),
            })?;
        Ok(self
            .client
            .post(url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(body)
            .send()
            .await?)
    }

    async fn success_body(response: Response, context: &str) -> Result<String, ShopifyError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                context: context.to_owned(),
                body,
            });
        }
        Ok(body)
    }
}
