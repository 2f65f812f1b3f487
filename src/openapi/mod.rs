use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockbook API",
        version = "0.1.0",
        description = r#"
# Stockbook Inventory API

A single-entity inventory manager: product records with a name, a stock
quantity, and a unit price, persisted to a flat JSON file. Each record
carries a derived `total_value` equal to `quantity * price`.

## Error Handling

Failing endpoints return a consistent envelope:

```json
{
  "success": false,
  "message": "Validation failed",
  "errors": {"quantity": ["quantity must be an integer of 0 or more"]}
}
```

Validation failures carry a field-keyed `errors` map; other failures
omit it.

## CSRF

Mutating endpoints require the `X-CSRF-Token` header. The token is
embedded in the served page as a `<meta name="csrf-token">` tag and is
valid for the lifetime of the server process.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product inventory endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
    ),
    components(
        schemas(
            crate::models::Product,
            crate::handlers::products::ProductPayload,
            crate::handlers::products::ProductCreatedResponse,
            crate::handlers::products::MutationResponse,
            crate::errors::ErrorBody,
            crate::errors::ValidationFailure
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_the_product_surface() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Stockbook API"));
        assert!(json.contains("/products"));
        assert!(json.contains("ProductPayload"));
    }
}
