use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Fulfilment state of an order
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// An order-product line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

/// Order with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    /// `None` for guest checkout or after the user was deleted
    pub user_id: Option<i64>,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub address: String,
    pub apartment: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub notice: Option<String>,
    pub status: OrderStatus,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// One line of a new order
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OrderLine {
    pub product_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// DTO for placing an order together with its items
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrder {
    pub user_id: Option<i64>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub lastname: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub phone: String,
    #[validate(length(max = 255))]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub address: String,
    #[validate(length(max = 255))]
    pub apartment: Option<String>,
    #[validate(length(min = 1, max = 20), custom(function = "validate_not_blank"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub city: String,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub country: String,
    pub notice: Option<String>,
    pub status: Option<OrderStatus>,
    #[validate(range(min = 0.0))]
    pub total: f64,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<OrderLine>,
}

impl CreateOrder {
    /// Field validation plus the rule that a product appears on one line
    /// only.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()?;

        let mut seen = HashSet::new();
        if let Some(line) = self.items.iter().find(|line| !seen.insert(line.product_id)) {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("duplicate_product");
            err.message = Some(format!("Product {} is listed more than once", line.product_id).into());
            errors.add("items", err);
            return Err(errors);
        }
        Ok(())
    }
}

/// An order ready to insert, with its lines
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: Option<i64>,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub address: String,
    pub apartment: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub notice: Option<String>,
    pub status: OrderStatus,
    pub total: f64,
    pub items: Vec<OrderLine>,
}

impl From<CreateOrder> for NewOrder {
    fn from(input: CreateOrder) -> Self {
        Self {
            user_id: input.user_id,
            name: input.name.trim().to_string(),
            lastname: input.lastname.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            phone: input.phone.trim().to_string(),
            company: input.company,
            address: input.address.trim().to_string(),
            apartment: input.apartment,
            postal_code: input.postal_code.trim().to_string(),
            city: input.city.trim().to_string(),
            country: input.country.trim().to_string(),
            notice: input.notice,
            status: input.status.unwrap_or_default(),
            total: input.total,
            items: input.items,
        }
    }
}

/// Partial update of the order itself; line items are managed through the
/// order-product endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrder {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub lastname: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub address: Option<String>,
    #[validate(length(max = 255))]
    pub apartment: Option<String>,
    #[validate(length(min = 1, max = 20), custom(function = "validate_not_blank"))]
    pub postal_code: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub country: Option<String>,
    pub notice: Option<String>,
    pub status: Option<OrderStatus>,
    #[validate(range(min = 0.0))]
    pub total: Option<f64>,
}

impl UpdateOrder {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Trims the required text fields and lowercases the email.
    pub fn normalized(mut self) -> Self {
        let trim = |value: &mut Option<String>| {
            if let Some(v) = value.as_mut() {
                *v = v.trim().to_string();
            }
        };
        trim(&mut self.name);
        trim(&mut self.lastname);
        trim(&mut self.phone);
        trim(&mut self.address);
        trim(&mut self.postal_code);
        trim(&mut self.city);
        trim(&mut self.country);
        self.email = self.email.map(|e| e.trim().to_lowercase());
        self
    }
}

impl Order {
    pub fn apply(&mut self, update: UpdateOrder) {
        let UpdateOrder {
            name,
            lastname,
            email,
            phone,
            company,
            address,
            apartment,
            postal_code,
            city,
            country,
            notice,
            status,
            total,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = lastname {
            self.lastname = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = phone {
            self.phone = v;
        }
        if company.is_some() {
            self.company = company;
        }
        if let Some(v) = address {
            self.address = v;
        }
        if apartment.is_some() {
            self.apartment = apartment;
        }
        if let Some(v) = postal_code {
            self.postal_code = v;
        }
        if let Some(v) = city {
            self.city = v;
        }
        if let Some(v) = country {
            self.country = v;
        }
        if notice.is_some() {
            self.notice = notice;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = total {
            self.total = v;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    pub user_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.user_id.is_none_or(|id| order.user_id == Some(id))
            && self.status.is_none_or(|status| order.status == status)
    }
}

/// DTO for adding a product to an existing order
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderItem {
    pub order_id: i64,
    pub product_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderItem {
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderItemFilter {
    pub order_id: Option<i64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_order(items: Vec<OrderLine>) -> CreateOrder {
        CreateOrder {
            user_id: None,
            name: "Jane".to_string(),
            lastname: "Doe".to_string(),
            email: "Jane.Doe@Example.com ".to_string(),
            phone: "+1 555 0100".to_string(),
            company: None,
            address: "1 Main St".to_string(),
            apartment: None,
            postal_code: "10001".to_string(),
            city: "New York".to_string(),
            country: "US".to_string(),
            notice: None,
            status: None,
            total: 49.5,
            items,
        }
    }

    fn line(product_id: i64, quantity: i32) -> OrderLine {
        OrderLine {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_status_round_trips_lowercase() {
        assert_eq!(OrderStatus::Shipped.to_string(), "shipped");
        assert_eq!(OrderStatus::from_str("cancelled").unwrap(), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(
            serde_json::to_value(OrderStatus::Delivered).unwrap(),
            serde_json::json!("delivered")
        );
    }

    #[test]
    fn test_check_accepts_distinct_lines() {
        assert!(create_order(vec![line(1, 2), line(2, 1)]).check().is_ok());
        assert!(create_order(vec![]).check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_lines() {
        assert!(create_order(vec![line(1, 0)]).check().is_err());
        assert!(create_order(vec![line(1, 1), line(1, 3)]).check().is_err());
    }

    #[test]
    fn test_check_rejects_negative_total() {
        let mut order = create_order(vec![]);
        order.total = -1.0;
        assert!(order.check().is_err());
    }

    #[test]
    fn test_new_order_normalizes() {
        let new_order = NewOrder::from(create_order(vec![line(3, 1)]));
        assert_eq!(new_order.email, "jane.doe@example.com");
        assert_eq!(new_order.status, OrderStatus::Pending);
        assert_eq!(new_order.items, vec![line(3, 1)]);
    }

    #[test]
    fn test_update_normalized_and_empty() {
        assert!(UpdateOrder::default().is_empty());
        let update = UpdateOrder {
            city: Some("  Boston ".to_string()),
            email: Some("A@B.COM".to_string()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(update.city.as_deref(), Some("Boston"));
        assert_eq!(update.email.as_deref(), Some("a@b.com"));
        assert!(!update.is_empty());
    }

    #[test]
    fn test_filter_matches() {
        let now = Utc::now();
        let order = Order {
            id: 1,
            user_id: Some(7),
            name: "Jane".into(),
            lastname: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "1".into(),
            company: None,
            address: "a".into(),
            apartment: None,
            postal_code: "1".into(),
            city: "c".into(),
            country: "c".into(),
            notice: None,
            status: OrderStatus::Processing,
            total: 0.0,
            created_at: now,
            updated_at: now,
            items: vec![],
        };
        assert!(OrderFilter::default().matches(&order));
        assert!(
            OrderFilter {
                user_id: Some(7),
                status: Some(OrderStatus::Processing),
                ..Default::default()
            }
            .matches(&order)
        );
        assert!(
            !OrderFilter {
                user_id: Some(8),
                ..Default::default()
            }
            .matches(&order)
        );
        assert!(
            !OrderFilter {
                status: Some(OrderStatus::Shipped),
                ..Default::default()
            }
            .matches(&order)
        );
    }
}
