//! Products Domain
//!
//! Domain implementation for the product catalog of a point-of-sale
//! application: listing, lookup, create with reactivation, sparse
//! updates, and history-aware deletion, backed by PostgreSQL.
//!
//! Handlers delegate to [`ProductService`] for business rules; the
//! service talks to a [`ProductRepository`], implemented for PostgreSQL
//! ([`PgProductRepository`]) and in memory
//! ([`InMemoryProductRepository`]) for tests and local development.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     repository::InMemoryProductRepository,
//!     service::ProductService,
//! };
//!
//! let repository = InMemoryProductRepository::new();
//! let service = ProductService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    BulkDeleteRequest, BulkDeleteResponse, BulkDeleteResult, BulkDeleteStatus, Category,
    CreateProduct, DeleteOutcome, MessageResponse, Product, ProductListQuery, ProductSummary,
    ProductsWithCategories, UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
