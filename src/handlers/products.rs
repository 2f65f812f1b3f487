use axum::{
    extract::{Path, State},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::handlers::common::{success_response, validate_input, StrictJson};
use crate::middleware_helpers::verify_csrf;
use crate::{
    errors::ServiceError,
    models::{Product, ProductInput},
    AppState,
};

/// Custom validator for Decimal minimum value
fn validate_price_min_zero(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("decimal_min_zero");
        err.message = Some("price must be a number of 0 or more".into());
        return Err(err);
    }
    Ok(())
}

/// Creates the router for product endpoints.
///
/// Mutating routes sit behind the CSRF check; the list route does not.
pub fn products_routes(state: AppState) -> Router<AppState> {
    let mutating = Router::new()
        .route("/", post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
        .layer(middleware::from_fn_with_state(state, verify_csrf));

    Router::new().route("/", get(list_products)).merge(mutating)
}

/// Payload accepted by the create and update endpoints.
///
/// Fields are optional so that missing values surface as validation
/// messages rather than deserialization failures. `required` carries no
/// message of its own; the "{field} is required" text is produced when
/// the errors are mapped into a [`ValidationFailure`].
///
/// [`ValidationFailure`]: crate::errors::ValidationFailure
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    /// Product display name
    #[validate(
        required,
        length(
            min = 1,
            max = 255,
            message = "product_name must be between 1 and 255 characters"
        )
    )]
    #[schema(example = "Wireless Keyboard")]
    pub product_name: Option<String>,
    /// Units currently in stock
    #[validate(
        required,
        range(min = 0, message = "quantity must be an integer of 0 or more")
    )]
    #[schema(example = 12)]
    pub quantity: Option<i64>,
    /// Unit price
    #[validate(required, custom = "validate_price_min_zero")]
    #[schema(value_type = Option<f64>, example = 49.99)]
    pub price: Option<Decimal>,
}

impl ProductPayload {
    /// Converts a validated payload into service input
    fn into_input(self) -> ProductInput {
        ProductInput {
            product_name: self.product_name.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
        }
    }
}

/// Envelope returned when a product is created
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductCreatedResponse {
    pub success: bool,
    #[schema(example = "Product added successfully")]
    pub message: String,
    pub product: Product,
}

/// Envelope returned by the update and delete endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MutationResponse {
    pub success: bool,
    #[schema(example = "Product updated successfully")]
    pub message: String,
}

/// List all products, newest first
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Products retrieved, newest first", body = [Product]),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let products = state.products.list_products().await?;
    Ok(success_response(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product created", body = ProductCreatedResponse),
        (status = 400, description = "Body is not valid JSON", body = crate::errors::ErrorBody),
        (status = 403, description = "CSRF token missing or stale", body = crate::errors::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    StrictJson(payload): StrictJson<ProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let product = state.products.create_product(payload.into_input()).await?;

    Ok(success_response(ProductCreatedResponse {
        success: true,
        message: "Product added successfully".to_string(),
        product,
    }))
}

/// Update an existing product
#[utoipa::path(
    put,
    path = "/products/:id",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated", body = MutationResponse),
        (status = 400, description = "Body is not valid JSON", body = crate::errors::ErrorBody),
        (status = 403, description = "CSRF token missing or stale", body = crate::errors::ErrorBody),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    StrictJson(payload): StrictJson<ProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    state
        .products
        .update_product(&id, payload.into_input())
        .await?;

    Ok(success_response(MutationResponse {
        success: true,
        message: "Product updated successfully".to_string(),
    }))
}

/// Delete a product.
///
/// Succeeds even when the id does not exist.
#[utoipa::path(
    delete,
    path = "/products/:id",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MutationResponse),
        (status = 403, description = "CSRF token missing or stale", body = crate::errors::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state.products.delete_product(&id).await?;

    Ok(success_response(MutationResponse {
        success: true,
        message: "Product deleted successfully".to_string(),
    }))
}
