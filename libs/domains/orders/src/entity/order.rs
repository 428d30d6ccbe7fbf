use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{NewOrder, OrderStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
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
    #[sea_orm(column_type = "Text", nullable)]
    pub notice: Option<String>,
    pub status: OrderStatus,
    #[sea_orm(column_type = "Double")]
    pub total: f64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_product::Entity")]
    Items,
}

impl Related<super::order_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_order(self, items: Vec<crate::models::OrderItem>) -> crate::models::Order {
        crate::models::Order {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            lastname: self.lastname,
            email: self.email,
            phone: self.phone,
            company: self.company,
            address: self.address,
            apartment: self.apartment,
            postal_code: self.postal_code,
            city: self.city,
            country: self.country,
            notice: self.notice,
            status: self.status,
            total: self.total,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            items,
        }
    }
}

/// The lines are inserted separately.
impl From<&NewOrder> for ActiveModel {
    fn from(input: &NewOrder) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: NotSet,
            user_id: Set(input.user_id),
            name: Set(input.name.clone()),
            lastname: Set(input.lastname.clone()),
            email: Set(input.email.clone()),
            phone: Set(input.phone.clone()),
            company: Set(input.company.clone()),
            address: Set(input.address.clone()),
            apartment: Set(input.apartment.clone()),
            postal_code: Set(input.postal_code.clone()),
            city: Set(input.city.clone()),
            country: Set(input.country.clone()),
            notice: Set(input.notice.clone()),
            status: Set(input.status),
            total: Set(input.total),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
