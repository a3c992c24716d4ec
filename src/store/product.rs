//! Product records and partial updates

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::store::payload::{as_object, integer_field, number_field, require_fields, string_field};
use crate::store::{new_id, timestamp_now, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub created_at: String,
}

impl Product {
    /// Records the product service starts with
    pub fn seed() -> Vec<Product> {
        vec![
            Product {
                id: "1".to_string(),
                name: "Laptop".to_string(),
                price: 999.99,
                stock: 50,
                created_at: "2024-01-01T00:00:00".to_string(),
            },
            Product {
                id: "2".to_string(),
                name: "Mouse".to_string(),
                price: 29.99,
                stock: 200,
                created_at: "2024-01-02T00:00:00".to_string(),
            },
            Product {
                id: "3".to_string(),
                name: "Keyboard".to_string(),
                price: 79.99,
                stock: 150,
                created_at: "2024-01-03T00:00:00".to_string(),
            },
        ]
    }

    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
    }
}

impl Resource for Product {
    const COLLECTION: &'static str = "products";
    const DISPLAY_NAME: &'static str = "Product";
    const SERVICE_NAME: &'static str = "product-service";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_payload(payload: Option<&Value>) -> Result<Self> {
        let object = require_fields(payload, &["name", "price"], "Name and price are required")?;
        let missing = || AppError::Validation("Name and price are required".to_string());

        let name = string_field(object, "name")?.ok_or_else(missing)?;
        let price = number_field(object, "price")?.ok_or_else(missing)?;
        let stock = integer_field(object, "stock")?.unwrap_or(0);

        Ok(Product {
            id: new_id(),
            name,
            price,
            stock,
            created_at: timestamp_now(),
        })
    }
}

/// Fields of a `PUT /products/{id}` body; absent fields stay unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// Validate the whole body up front so a bad field never leaves a
    /// half-applied update behind
    pub fn from_payload(payload: Option<&Value>) -> Result<Self> {
        let object = as_object(payload).ok_or_else(|| {
            AppError::Validation("Request body must be a JSON object".to_string())
        })?;

        Ok(Self {
            name: string_field(object, "name")?,
            price: number_field(object, "price")?,
            stock: integer_field(object, "stock")?,
        })
    }
}
