use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    AppJson, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    BulkDeleteRequest, BulkDeleteResponse, BulkDeleteResult, Category, CreateProduct,
    MessageResponse, Product, ProductListQuery, ProductSummary, ProductsWithCategories,
    UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

const TAG: &str = "products";

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        bulk_delete_products,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product,
            ProductSummary,
            Category,
            ProductsWithCategories,
            CreateProduct,
            UpdateProduct,
            BulkDeleteRequest,
            BulkDeleteResponse,
            BulkDeleteResult,
            MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_products)
                .post(create_product)
                .delete(bulk_delete_products),
        )
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List active products
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ProductListQuery),
    responses(
        (status = 200, description = "Active products, optionally with the category list", body = Vec<ProductSummary>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<ProductListQuery>,
) -> ProductResult<Response> {
    let products = service.list_products().await?;

    if query.include_categories {
        let categories = service.list_categories().await?;
        Ok(Json(ProductsWithCategories {
            products,
            categories,
        })
        .into_response())
    } else {
        Ok(Json(products).into_response())
    }
}

/// Create a new product
///
/// An inactive product carrying the same name is reactivated in place
/// instead of inserting a second row.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created or reactivated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AppJson(input): AppJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Update a product
///
/// Sparse update: only the fields present in the body are applied, and
/// `stock` is never applied.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    AppJson(input): AppJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product
///
/// Products referenced by purchase or sale history are deactivated
/// instead of removed.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted or deactivated", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<MessageResponse>> {
    let outcome = service.delete_product(id).await?;
    Ok(Json(MessageResponse {
        message: outcome.message().to_string(),
    }))
}

/// Delete many products at once
///
/// All items are awaited; the response reports one outcome per id and
/// the batch itself always settles with 200.
#[utoipa::path(
    delete,
    path = "",
    tag = TAG,
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Per-item deletion outcomes", body = BulkDeleteResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn bulk_delete_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AppJson(request): AppJson<BulkDeleteRequest>,
) -> ProductResult<Json<BulkDeleteResponse>> {
    let results = service.bulk_delete(request.ids).await;

    Ok(Json(BulkDeleteResponse {
        message: crate::messages::PRODUCT_DELETED.to_string(),
        results,
    }))
}
