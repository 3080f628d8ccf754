use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{Category, CreateProduct, DeleteOutcome, Product, ProductSummary, UpdateProduct},
    repository::ProductRepository,
};

/// PostgreSQL implementation of ProductRepository
///
/// Mutating operations each run inside one transaction with the product
/// row locked, so concurrent requests serialize at the database instead
/// of racing between a read and a write.
pub struct PgProductRepository {
    base: BaseRepository<entity::product::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn category<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_id: Uuid,
    ) -> ProductResult<entity::category::Model> {
        entity::category::Entity::find_by_id(category_id)
            .one(conn)
            .await?
            .ok_or(ProductError::CategoryNotFound)
    }
}

/// Classifies errors from writes that set `category_id`: the only FK a
/// create or update can violate is the category relation. Delete-path FK
/// errors (a history row landing mid-transaction) take the blanket
/// conversion instead and surface as 500s.
fn category_fk_err(err: DbErr) -> ProductError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => ProductError::CategoryNotFound,
        _ => err.into(),
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_active(&self) -> ProductResult<Vec<ProductSummary>> {
        let rows = entity::product::Entity::find()
            .filter(entity::product::Column::Active.eq(true))
            .find_also_related(entity::category::Entity)
            .order_by_asc(entity::product::Column::Name)
            .all(self.base.db())
            .await?;

        rows.into_iter()
            .map(|(product, category)| {
                let category = category.ok_or_else(|| {
                    ProductError::Internal(format!(
                        "product {} references no category",
                        product.id
                    ))
                })?;
                Ok((product, category).into())
            })
            .collect()
    }

    async fn list_categories(&self) -> ProductResult<Vec<Category>> {
        let categories = entity::category::Entity::find()
            .order_by_asc(entity::category::Column::Name)
            .all(self.base.db())
            .await?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    async fn get_with_category(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let Some(model) = self.base.find_by_id(id).await? else {
            return Ok(None);
        };

        let category = self.category(self.base.db(), model.category_id).await?;
        Ok(Some((model, category).into()))
    }

    async fn create_or_reactivate(&self, input: CreateProduct) -> ProductResult<Product> {
        let txn = self.base.db().begin().await?;

        let existing = entity::product::Entity::find()
            .filter(entity::product::Column::Name.eq(&input.name))
            .lock_exclusive()
            .one(&txn)
            .await?;

        let model = match existing {
            Some(row) if row.active => return Err(ProductError::Duplicate),
            Some(row) => {
                // Reactivate in place, keeping the id and creation time
                let mut active: entity::product::ActiveModel = row.into_active_model();
                active.active = Set(true);
                active.price = Set(input.price);
                active.stock = Set(input.stock);
                active.category_id = Set(input.category_id);
                active.barcode = Set(input.barcode);
                active.updated_at = Set(chrono::Utc::now().into());

                let model = active.update(&txn).await.map_err(category_fk_err)?;
                tracing::info!(product_id = %model.id, "Reactivated product");
                model
            }
            None => {
                let active: entity::product::ActiveModel = input.into();
                let model = active.insert(&txn).await.map_err(category_fk_err)?;
                tracing::info!(product_id = %model.id, "Created product");
                model
            }
        };

        let category = self.category(&txn, model.category_id).await?;
        txn.commit().await?;

        Ok((model, category).into())
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let txn = self.base.db().begin().await?;

        let model = entity::product::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            // The legacy update contract reports every missing relation
            // with the category message
            .ok_or(ProductError::CategoryNotFound)?;

        let mut active: entity::product::ActiveModel = model.into_active_model();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(flag) = input.active {
            active.active = Set(flag);
        }
        if let Some(barcode) = input.barcode {
            active.barcode = Set(Some(barcode));
        }
        // input.stock is intentionally ignored
        active.updated_at = Set(chrono::Utc::now().into());

        let model = active.update(&txn).await.map_err(category_fk_err)?;
        let category = self.category(&txn, model.category_id).await?;
        txn.commit().await?;

        tracing::info!(product_id = %id, "Updated product");
        Ok((model, category).into())
    }

    async fn delete_or_deactivate(&self, id: Uuid) -> ProductResult<DeleteOutcome> {
        let txn = self.base.db().begin().await?;

        let model = entity::product::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ProductError::NotFound)?;

        let purchases = entity::purchase::Entity::find()
            .filter(entity::purchase::Column::ProductId.eq(id))
            .count(&txn)
            .await?;
        let sales = entity::sale::Entity::find()
            .filter(entity::sale::Column::ProductId.eq(id))
            .count(&txn)
            .await?;

        let outcome = if purchases > 0 || sales > 0 {
            let mut active: entity::product::ActiveModel = model.into_active_model();
            active.active = Set(false);
            active.updated_at = Set(chrono::Utc::now().into());
            active.update(&txn).await?;

            tracing::info!(product_id = %id, "Deactivated product with history");
            DeleteOutcome::Deactivated
        } else {
            entity::product::Entity::delete_by_id(id).exec(&txn).await?;

            tracing::info!(product_id = %id, "Deleted product");
            DeleteOutcome::Deleted
        };

        txn.commit().await?;
        Ok(outcome)
    }
}
