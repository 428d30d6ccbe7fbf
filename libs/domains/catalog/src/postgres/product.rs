use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::{PgCatalogRepository, categories, constraint_error, escape_like, images, products};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CategoryRef, NewProduct, Product, ProductFilter, ProductSlug, SearchCriteria, UpdateProduct,
};
use crate::repository::ProductRepository;

fn unknown_category(category_id: Option<i64>) -> CatalogError {
    match category_id {
        Some(id) => CatalogError::InvalidReference(format!("Category {} does not exist", id)),
        None => CatalogError::InvalidReference("Unknown category".to_string()),
    }
}

#[async_trait]
impl ProductRepository for PgCatalogRepository {
    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product> {
        let slug = input.slug.clone();
        let category_id = input.category_id;
        let active_model: products::ActiveModel = input.into();

        let model = self.products.insert(active_model).await.map_err(|e| {
            constraint_error(
                e,
                || CatalogError::DuplicateSlug(slug.clone()),
                || unknown_category(category_id),
            )
        })?;

        tracing::info!(product_id = model.id, slug = %model.slug, "Created product");
        Ok(model.into())
    }

    async fn get_product(&self, id: i64) -> CatalogResult<Option<Product>> {
        Ok(self.products.find_by_id(id).await?.map(Into::into))
    }

    async fn get_product_by_slug(&self, slug: &str) -> CatalogResult<Option<Product>> {
        let model = products::Entity::find()
            .filter(products::Column::Slug.eq(slug))
            .one(self.db())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let mut query = products::Entity::find();

        if let Some(category_id) = filter.category_id {
            query = query.filter(products::Column::CategoryId.eq(category_id));
        }
        if let Some(in_stock) = filter.in_stock {
            query = query.filter(products::Column::InStock.eq(in_stock));
        }

        let models = query
            .order_by_asc(products::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn search_products(&self, criteria: SearchCriteria) -> CatalogResult<Vec<Product>> {
        let mut query = products::Entity::find();

        match &criteria.category {
            None => {}
            Some(CategoryRef::Id(id)) => {
                query = query.filter(products::Column::CategoryId.eq(*id));
            }
            Some(CategoryRef::Name(name)) => {
                let category = categories::Entity::find()
                    .filter(Expr::col(categories::Column::Name).ilike(escape_like(name)))
                    .one(self.db())
                    .await?;
                match category {
                    Some(category) => {
                        query = query.filter(products::Column::CategoryId.eq(category.id));
                    }
                    None => return Ok(Vec::new()),
                }
            }
        }

        if let Some(text) = &criteria.text {
            let pattern = format!("%{}%", escape_like(text));
            query = query.filter(
                Condition::any()
                    .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(products::Column::Description).ilike(pattern)),
            );
        }

        if let Some(range) = criteria.price {
            query = query.filter(products::Column::Price.between(range.min, range.max));
        }

        let models = query
            .order_by_asc(products::Column::Id)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_product(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product> {
        let model = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let slug = input.slug.clone();
        let category_id = input.category_id;

        let mut active_model: products::ActiveModel = model.into();
        if let Some(name) = input.name {
            active_model.name = Set(name.trim().to_string());
        }
        if let Some(slug) = input.slug {
            active_model.slug = Set(slug);
        }
        if let Some(description) = input.description {
            active_model.description = Set(description);
        }
        if let Some(manufacturer) = input.manufacturer {
            active_model.manufacturer = Set(Some(manufacturer));
        }
        if let Some(price) = input.price {
            active_model.price = Set(price);
        }
        if let Some(in_stock) = input.in_stock {
            active_model.in_stock = Set(in_stock);
        }
        if let Some(category_id) = input.category_id {
            active_model.category_id = Set(Some(category_id));
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let model = self.products.update(active_model).await.map_err(|e| {
            constraint_error(
                e,
                || CatalogError::DuplicateSlug(slug.unwrap_or_default()),
                || unknown_category(category_id),
            )
        })?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete_product(&self, id: i64) -> CatalogResult<Option<Vec<String>>> {
        let Some(model) = self.products.find_by_id(id).await? else {
            return Ok(None);
        };

        let gallery: Vec<String> = images::Entity::find()
            .select_only()
            .column(images::Column::Image)
            .filter(images::Column::ProductId.eq(id))
            .into_tuple()
            .all(self.db())
            .await?;

        // Gallery rows go with the product (ON DELETE CASCADE); order lines
        // block the delete (ON DELETE RESTRICT).
        let deleted = self.products.delete_by_id(id).await.map_err(|e| {
            constraint_error(
                e,
                || CatalogError::Internal("unexpected unique violation on delete".into()),
                || CatalogError::ProductInUse(id),
            )
        })?;
        if !deleted {
            return Ok(None);
        }

        let mut files: Vec<String> = model.main_image.into_iter().collect();
        files.extend(gallery);

        tracing::info!(product_id = id, files = files.len(), "Deleted product");
        Ok(Some(files))
    }

    async fn slug_exists(&self, slug: &str) -> CatalogResult<bool> {
        let count = products::Entity::find()
            .filter(products::Column::Slug.eq(slug))
            .count(self.db())
            .await?;
        Ok(count > 0)
    }

    async fn list_slugs(&self) -> CatalogResult<Vec<ProductSlug>> {
        let rows: Vec<(i64, String)> = products::Entity::find()
            .select_only()
            .column(products::Column::Id)
            .column(products::Column::Slug)
            .order_by_asc(products::Column::Id)
            .into_tuple()
            .all(self.db())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(product_id, slug)| ProductSlug { slug, product_id })
            .collect())
    }

    async fn set_main_image(
        &self,
        id: i64,
        image: Option<String>,
    ) -> CatalogResult<Option<String>> {
        let model = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;
        let previous = model.main_image.clone();

        let mut active_model: products::ActiveModel = model.into();
        active_model.main_image = Set(image);
        active_model.updated_at = Set(chrono::Utc::now().into());
        self.products.update(active_model).await?;

        tracing::info!(product_id = id, "Updated main image");
        Ok(previous)
    }
}
