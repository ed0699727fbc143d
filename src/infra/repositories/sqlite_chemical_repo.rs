use crate::domain::{models::chemical::Chemical, ports::ChemicalRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteChemicalRepo {
    pool: SqlitePool,
}

impl SqliteChemicalRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChemicalRepository for SqliteChemicalRepo {
    async fn create(&self, chemical: &Chemical) -> Result<Chemical, AppError> {
        sqlx::query_as::<_, Chemical>(
            "INSERT INTO chemicals (id, category, brand, chemical_name, epa_registration, recipe, unit) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
            .bind(&chemical.id)
            .bind(&chemical.category)
            .bind(&chemical.brand)
            .bind(&chemical.chemical_name)
            .bind(&chemical.epa_registration)
            .bind(&chemical.recipe)
            .bind(&chemical.unit)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Chemical>, AppError> {
        sqlx::query_as::<_, Chemical>("SELECT * FROM chemicals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Chemical>, AppError> {
        sqlx::query_as::<_, Chemical>("SELECT * FROM chemicals ORDER BY brand ASC, chemical_name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Chemical>, AppError> {
        sqlx::query_as::<_, Chemical>(
            "SELECT * FROM chemicals WHERE category = ? ORDER BY brand ASC, chemical_name ASC",
        )
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, chemical: &Chemical) -> Result<Chemical, AppError> {
        sqlx::query_as::<_, Chemical>(
            "UPDATE chemicals SET category = ?, brand = ?, chemical_name = ?, epa_registration = ?, recipe = ?, unit = ? WHERE id = ? RETURNING *",
        )
            .bind(&chemical.category)
            .bind(&chemical.brand)
            .bind(&chemical.chemical_name)
            .bind(&chemical.epa_registration)
            .bind(&chemical.recipe)
            .bind(&chemical.unit)
            .bind(&chemical.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM chemicals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Chemical not found".into()));
        }
        Ok(())
    }
}
