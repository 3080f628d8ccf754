use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::messages;

/// Product category reference embedded in product responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,
    /// Category name
    pub name: String,
}

/// Product entity - the detail projection returned by get-by-id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Product name (unique across the catalog)
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Current stock quantity
    pub stock: i32,
    /// Barcode (EAN, UPC, etc.)
    pub barcode: Option<String>,
    /// Whether the product is visible in listings
    pub active: bool,
    /// The category this product belongs to
    pub category: Category,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Listing projection of a product
///
/// Listings only contain live products, so the `active` flag is omitted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub barcode: Option<String>,
    /// The category this product belongs to
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
///
/// Fields default so that an omitted field fails the required-fields
/// check in the service rather than JSON deserialization.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub category_id: Uuid,
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub stock: i32,
    #[validate(length(min = 1, max = 50))]
    pub barcode: Option<String>,
}

/// DTO for updating an existing product
///
/// All fields are optional; only the fields present are applied. `stock`
/// is accepted for backward compatibility with older clients but is
/// never written (stock changes flow through purchases and sales).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(range(exclusive_min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 1))]
    pub stock: Option<i32>,
    pub active: Option<bool>,
    #[validate(length(min = 1, max = 50))]
    pub barcode: Option<String>,
}

/// Query parameters for the product listing endpoint
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductListQuery {
    /// When `"true"`, the response also carries the full category list;
    /// any other value is treated as false
    #[serde(default, deserialize_with = "truthy_flag")]
    pub include_categories: bool,
}

/// Query-string flags are lenient: exactly `"true"` enables the flag and
/// everything else disables it, never a deserialization rejection.
fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref() == Some("true"))
}

/// Listing response variant carrying the category list alongside products
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductsWithCategories {
    pub products: Vec<ProductSummary>,
    pub categories: Vec<Category>,
}

/// Outcome of a delete: products with purchase or sale history are kept
/// and deactivated, the rest are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Deactivated,
}

impl DeleteOutcome {
    /// User-facing message for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => messages::PRODUCT_DELETED,
            DeleteOutcome::Deactivated => messages::PRODUCT_DEACTIVATED,
        }
    }
}

/// Request body for bulk deletion
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    /// IDs of the products to delete
    pub ids: Vec<Uuid>,
}

/// Per-item outcome of a bulk deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BulkDeleteStatus {
    Deleted,
    Deactivated,
    Failed,
}

/// One entry in the bulk deletion report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResult {
    pub id: Uuid,
    pub status: BulkDeleteStatus,
    /// Failure detail, present only when `status` is `failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for bulk deletion
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResponse {
    pub message: String,
    pub results: Vec<BulkDeleteResult>,
}

/// Minimal `{message}` response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl From<DeleteOutcome> for BulkDeleteStatus {
    fn from(outcome: DeleteOutcome) -> Self {
        match outcome {
            DeleteOutcome::Deleted => BulkDeleteStatus::Deleted,
            DeleteOutcome::Deactivated => BulkDeleteStatus::Deactivated,
        }
    }
}

impl Product {
    /// Listing projection of this product
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
            barcode: self.barcode.clone(),
            category: self.category.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_product_rejects_zero_price() {
        let input = CreateProduct {
            name: "Widget".to_string(),
            category_id: Uuid::now_v7(),
            price: 0.0,
            stock: 5,
            barcode: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_product_empty_is_valid() {
        let input = UpdateProduct::default();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_delete_outcome_messages() {
        assert_eq!(DeleteOutcome::Deleted.message(), messages::PRODUCT_DELETED);
        assert_eq!(
            DeleteOutcome::Deactivated.message(),
            messages::PRODUCT_DEACTIVATED
        );
    }

    #[test]
    fn test_list_query_flag_accepts_only_true() {
        let query: ProductListQuery =
            serde_json::from_str(r#"{"include_categories":"true"}"#).unwrap();
        assert!(query.include_categories);

        let query: ProductListQuery =
            serde_json::from_str(r#"{"include_categories":"1"}"#).unwrap();
        assert!(!query.include_categories);

        let query: ProductListQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.include_categories);
    }

    #[test]
    fn test_bulk_result_omits_absent_error() {
        let result = BulkDeleteResult {
            id: Uuid::now_v7(),
            status: BulkDeleteStatus::Deleted,
            error: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["status"], "deleted");
    }
}
