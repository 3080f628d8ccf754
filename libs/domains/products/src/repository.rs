use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    Category, CreateProduct, DeleteOutcome, Product, ProductSummary, UpdateProduct,
};

/// Repository trait for Product persistence
///
/// Each method is a single atomic operation on the store; the decisions
/// that depend on current state (duplicate name, reactivation, history
/// check) happen inside the store boundary so no check-then-act window
/// exists between requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List all active products with their category embedded
    async fn list_active(&self) -> ProductResult<Vec<ProductSummary>>;

    /// List all categories
    async fn list_categories(&self) -> ProductResult<Vec<Category>>;

    /// Get a product by ID, with its category embedded
    async fn get_with_category(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Insert a new product, or reactivate an inactive product carrying
    /// the same name. An active product with the same name is a
    /// [`ProductError::Duplicate`].
    async fn create_or_reactivate(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Apply a sparse update. `stock` on the DTO is never written.
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product, or deactivate it when purchase or sale history
    /// references it.
    async fn delete_or_deactivate(&self, id: Uuid) -> ProductResult<DeleteOutcome>;
}

/// Stored product row, flat form with the category still a foreign key
#[derive(Debug, Clone)]
struct ProductRow {
    id: Uuid,
    name: String,
    price: f64,
    stock: i32,
    barcode: Option<String>,
    active: bool,
    category_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<Uuid, ProductRow>,
    categories: HashMap<Uuid, Category>,
    purchase_counts: HashMap<Uuid, u32>,
    sale_counts: HashMap<Uuid, u32>,
}

impl Inner {
    fn category_for(&self, row: &ProductRow) -> ProductResult<Category> {
        self.categories
            .get(&row.category_id)
            .cloned()
            .ok_or_else(|| {
                ProductError::Internal(format!("product {} references no category", row.id))
            })
    }

    fn product_from_row(&self, row: &ProductRow) -> ProductResult<Product> {
        Ok(Product {
            id: row.id,
            name: row.name.clone(),
            price: row.price,
            stock: row.stock,
            barcode: row.barcode.clone(),
            active: row.active,
            category: self.category_for(row)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn summary_from_row(&self, row: &ProductRow) -> ProductResult<ProductSummary> {
        Ok(self.product_from_row(row)?.summary())
    }

    fn has_history(&self, id: Uuid) -> bool {
        self.purchase_counts.get(&id).copied().unwrap_or(0) > 0
            || self.sale_counts.get(&id).copied().unwrap_or(0) > 0
    }
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// A single `RwLock` write guard serializes every mutating operation,
/// giving the same atomicity the PostgreSQL implementation gets from
/// its transactions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category (categories are managed by another domain)
    pub async fn add_category(&self, category: Category) {
        let mut inner = self.inner.write().await;
        inner.categories.insert(category.id, category);
    }

    /// Record a purchase against a product, marking it as having history
    pub async fn record_purchase(&self, product_id: Uuid) {
        let mut inner = self.inner.write().await;
        *inner.purchase_counts.entry(product_id).or_insert(0) += 1;
    }

    /// Record a sale against a product, marking it as having history
    pub async fn record_sale(&self, product_id: Uuid) {
        let mut inner = self.inner.write().await;
        *inner.sale_counts.entry(product_id).or_insert(0) += 1;
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_active(&self) -> ProductResult<Vec<ProductSummary>> {
        let inner = self.inner.read().await;

        let mut result: Vec<ProductSummary> = inner
            .products
            .values()
            .filter(|row| row.active)
            .map(|row| inner.summary_from_row(row))
            .collect::<ProductResult<_>>()?;

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn list_categories(&self) -> ProductResult<Vec<Category>> {
        let inner = self.inner.read().await;

        let mut result: Vec<Category> = inner.categories.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn get_with_category(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let inner = self.inner.read().await;

        match inner.products.get(&id) {
            Some(row) => Ok(Some(inner.product_from_row(row)?)),
            None => Ok(None),
        }
    }

    async fn create_or_reactivate(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut inner = self.inner.write().await;

        let existing_id = inner
            .products
            .values()
            .find(|row| row.name == input.name)
            .map(|row| (row.id, row.active));

        // The name conflict is reported before the category is resolved
        if let Some((_, true)) = existing_id {
            return Err(ProductError::Duplicate);
        }

        if !inner.categories.contains_key(&input.category_id) {
            return Err(ProductError::CategoryNotFound);
        }

        let id = match existing_id {
            Some((id, _)) => {
                // Reactivate in place, keeping the id and creation time
                let row = inner
                    .products
                    .get_mut(&id)
                    .ok_or(ProductError::NotFound)?;
                row.active = true;
                row.price = input.price;
                row.stock = input.stock;
                row.category_id = input.category_id;
                row.barcode = input.barcode;
                row.updated_at = Utc::now();

                tracing::info!(product_id = %id, "Reactivated product");
                id
            }
            None => {
                let now = Utc::now();
                let row = ProductRow {
                    id: Uuid::now_v7(),
                    name: input.name,
                    price: input.price,
                    stock: input.stock,
                    barcode: input.barcode,
                    active: true,
                    category_id: input.category_id,
                    created_at: now,
                    updated_at: now,
                };
                let id = row.id;
                inner.products.insert(id, row);

                tracing::info!(product_id = %id, "Created product");
                id
            }
        };

        let row = inner.products.get(&id).ok_or(ProductError::NotFound)?;
        inner.product_from_row(row)
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let mut inner = self.inner.write().await;

        if !inner.products.contains_key(&id) {
            // The legacy update contract reports every missing relation
            // with the category message
            return Err(ProductError::CategoryNotFound);
        }

        if let Some(ref new_name) = input.name {
            let taken = inner
                .products
                .values()
                .any(|row| row.id != id && row.name == *new_name);
            if taken {
                return Err(ProductError::Duplicate);
            }
        }

        if let Some(category_id) = input.category_id
            && !inner.categories.contains_key(&category_id)
        {
            return Err(ProductError::CategoryNotFound);
        }

        let row = inner.products.get_mut(&id).ok_or(ProductError::NotFound)?;
        if let Some(name) = input.name {
            row.name = name;
        }
        if let Some(category_id) = input.category_id {
            row.category_id = category_id;
        }
        if let Some(price) = input.price {
            row.price = price;
        }
        if let Some(active) = input.active {
            row.active = active;
        }
        if let Some(barcode) = input.barcode {
            row.barcode = Some(barcode);
        }
        // input.stock is intentionally ignored
        row.updated_at = Utc::now();

        tracing::info!(product_id = %id, "Updated product");

        let row = inner.products.get(&id).ok_or(ProductError::NotFound)?;
        inner.product_from_row(row)
    }

    async fn delete_or_deactivate(&self, id: Uuid) -> ProductResult<DeleteOutcome> {
        let mut inner = self.inner.write().await;

        if !inner.products.contains_key(&id) {
            return Err(ProductError::NotFound);
        }

        if inner.has_history(id) {
            let row = inner.products.get_mut(&id).ok_or(ProductError::NotFound)?;
            row.active = false;
            row.updated_at = Utc::now();

            tracing::info!(product_id = %id, "Deactivated product with history");
            Ok(DeleteOutcome::Deactivated)
        } else {
            inner.products.remove(&id);
            inner.purchase_counts.remove(&id);
            inner.sale_counts.remove(&id);

            tracing::info!(product_id = %id, "Deleted product");
            Ok(DeleteOutcome::Deleted)
        }
    }
}
