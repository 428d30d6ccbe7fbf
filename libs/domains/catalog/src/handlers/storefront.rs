//! Server-rendered storefront page at `/`.
//!
//! The page has three sections (intro, category menu, product listing).
//! The menu and the listing load independently: a failing query is logged
//! and its section renders empty instead of failing the whole page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use std::sync::Arc;
use tracing::{error, instrument};

use crate::models::{Category, CategoryFilter, Product, ProductFilter};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::{CategoryService, ProductService};

pub struct CategoryView {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

pub struct ProductView {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: String,
    pub in_stock: bool,
    pub image_url: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub categories: Vec<CategoryView>,
    pub categories_failed: bool,
    pub products: Vec<ProductView>,
    pub products_failed: bool,
}

struct Storefront<R: CategoryRepository + ProductRepository> {
    categories: CategoryService<R>,
    products: ProductService<R>,
}

/// Router serving the storefront page. Merge it at the application root.
pub fn router<R>(categories: CategoryService<R>, products: ProductService<R>) -> Router
where
    R: CategoryRepository + ProductRepository + 'static,
{
    Router::new()
        .route("/", get(home))
        .with_state(Arc::new(Storefront {
            categories,
            products,
        }))
}

#[instrument(skip(state))]
async fn home<R>(State(state): State<Arc<Storefront<R>>>) -> HomeTemplate
where
    R: CategoryRepository + ProductRepository,
{
    let (categories, products) = tokio::join!(
        state.categories.list_categories(CategoryFilter::default()),
        state.products.list_products(ProductFilter::default()),
    );

    let (categories, categories_failed) = match categories {
        Ok(categories) => (categories.into_iter().map(CategoryView::from).collect(), false),
        Err(e) => {
            error!(error = %e, "Failed to load categories for the storefront");
            (Vec::new(), true)
        }
    };

    let (products, products_failed) = match products {
        Ok(products) => (
            products
                .into_iter()
                .map(|p| product_view(&state.products, p))
                .collect(),
            false,
        ),
        Err(e) => {
            error!(error = %e, "Failed to load products for the storefront");
            (Vec::new(), true)
        }
    };

    HomeTemplate {
        title: "Storefront".to_string(),
        categories,
        categories_failed,
        products,
        products_failed,
    }
}

fn product_view<R: ProductRepository>(service: &ProductService<R>, product: Product) -> ProductView {
    let image_url = service.main_image_of(&product).map(|image| image.url);
    ProductView {
        price: format!("{:.2}", product.price),
        name: product.name,
        slug: product.slug,
        description: product.description,
        in_stock: product.in_stock,
        image_url,
    }
}
