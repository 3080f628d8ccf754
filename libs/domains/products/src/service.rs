//! Product Service - Business logic layer

use futures::future::join_all;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::messages;
use crate::models::{
    BulkDeleteResult, BulkDeleteStatus, Category, CreateProduct, DeleteOutcome, Product,
    ProductSummary, UpdateProduct,
};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service layer owns validation and the localized failure messages;
/// repositories only report what happened in the store.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List active products
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<ProductSummary>> {
        self.repository.list_active().await
    }

    /// List all categories
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> ProductResult<Vec<Category>> {
        self.repository.list_categories().await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_with_category(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Create a new product, reactivating an inactive one with the same name
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        // Required-fields check first: an omitted field deserializes to
        // its default and must produce the required-fields message, not
        // a schema error
        if input.name.trim().is_empty()
            || input.category_id.is_nil()
            || input.price <= 0.0
            || input.stock <= 0
        {
            return Err(ProductError::Validation(messages::REQUIRED_FIELDS.into()));
        }

        if let Err(errors) = input.validate() {
            tracing::debug!(%errors, "Create payload failed validation");
            return Err(ProductError::Validation(messages::INVALID_DATA.into()));
        }

        self.repository.create_or_reactivate(input).await
    }

    /// Apply a sparse update to a product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a product, deactivating instead when history references it
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<DeleteOutcome> {
        self.repository.delete_or_deactivate(id).await
    }

    /// Delete many products concurrently, collecting one outcome per id
    ///
    /// Failures never abort the batch; they show up as `failed` entries.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn bulk_delete(&self, ids: Vec<Uuid>) -> Vec<BulkDeleteResult> {
        let tasks = ids.into_iter().map(|id| {
            let repository = Arc::clone(&self.repository);
            async move {
                match repository.delete_or_deactivate(id).await {
                    Ok(outcome) => BulkDeleteResult {
                        id,
                        status: outcome.into(),
                        error: None,
                    },
                    Err(err) => {
                        tracing::warn!(product_id = %id, error = %err, "Bulk delete item failed");
                        BulkDeleteResult {
                            id,
                            status: BulkDeleteStatus::Failed,
                            error: Some(err.to_string()),
                        }
                    }
                }
            }
        });

        join_all(tasks).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
