use crate::domain::{
    models::form::{Form, FormDetails, FormListOptions, FormView, LawnDetails, PestApp, PesticideDetails, ShrubDetails},
    ports::FormRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

pub struct PostgresFormRepo {
    pool: PgPool,
}

impl PostgresFormRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, form: Form) -> Result<FormView, AppError> {
        let details = match form.form_type.as_str() {
            "shrub" => {
                let row = sqlx::query_as::<_, ShrubDetails>("SELECT * FROM shrubs WHERE form_id = $1")
                    .bind(&form.id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(AppError::Database)?;
                FormDetails::Shrub(row)
            }
            "lawn" => {
                let row = sqlx::query_as::<_, LawnDetails>("SELECT * FROM lawn_forms WHERE form_id = $1")
                    .bind(&form.id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(AppError::Database)?;
                FormDetails::Lawn(row)
            }
            "pesticide" => {
                let row = sqlx::query_as::<_, PesticideDetails>("SELECT * FROM pesticides WHERE form_id = $1")
                    .bind(&form.id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(AppError::Database)?;
                FormDetails::Pesticide(row)
            }
            other => {
                return Err(AppError::DataIntegrity(format!(
                    "Unknown form_type '{}' on form {}",
                    other, form.id
                )));
            }
        };

        let applications = sqlx::query_as::<_, PestApp>(
            "SELECT * FROM pest_apps WHERE form_id = $1 ORDER BY applied_at ASC",
        )
            .bind(&form.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(FormView { form, details, applications })
    }
}

async fn insert_form(tx: &mut Transaction<'_, Postgres>, form: &Form) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO forms (id, created_by, form_type, first_name, last_name, phone, address, city, state, zip_code, jewish_holiday, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
        .bind(&form.id)
        .bind(&form.created_by)
        .bind(&form.form_type)
        .bind(&form.first_name)
        .bind(&form.last_name)
        .bind(&form.phone)
        .bind(&form.address)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.zip_code)
        .bind(form.jewish_holiday)
        .bind(form.created_at)
        .bind(form.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

async fn insert_apps(tx: &mut Transaction<'_, Postgres>, apps: &[PestApp]) -> Result<(), AppError> {
    for app in apps {
        sqlx::query(
            "INSERT INTO pest_apps (id, form_id, chemical_id, applied_at, rate, amount, location_code) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
            .bind(&app.id)
            .bind(&app.form_id)
            .bind(&app.chemical_id)
            .bind(app.applied_at)
            .bind(app.rate)
            .bind(app.amount)
            .bind(&app.location_code)
            .execute(&mut **tx)
            .await
            .map_err(AppError::Database)?;
    }
    Ok(())
}

async fn update_form_base(
    tx: &mut Transaction<'_, Postgres>,
    form: &Form,
    owner: Option<&str>,
) -> Result<u64, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE forms SET first_name = ");
    qb.push_bind(&form.first_name);
    qb.push(", last_name = ").push_bind(&form.last_name);
    qb.push(", phone = ").push_bind(&form.phone);
    qb.push(", address = ").push_bind(&form.address);
    qb.push(", city = ").push_bind(&form.city);
    qb.push(", state = ").push_bind(&form.state);
    qb.push(", zip_code = ").push_bind(&form.zip_code);
    qb.push(", jewish_holiday = ").push_bind(form.jewish_holiday);
    qb.push(", updated_at = ").push_bind(form.updated_at);
    qb.push(" WHERE id = ").push_bind(&form.id);
    if let Some(owner) = owner {
        qb.push(" AND created_by = ").push_bind(owner);
    }

    let result = qb.build().execute(&mut **tx).await.map_err(AppError::Database)?;
    Ok(result.rows_affected())
}

/// The WHERE clause shared by the list and count queries. Column names come
/// from the allow-list in `FormListOptions`; every caller-supplied value is a
/// bound parameter.
fn push_list_predicates<'args>(
    qb: &mut QueryBuilder<'args, Postgres>,
    owner: Option<&'args str>,
    opts: &'args FormListOptions,
) {
    qb.push(" WHERE 1=1");

    if let Some(owner) = owner {
        qb.push(" AND created_by = ").push_bind(owner);
    }
    if let Some(form_type) = opts.form_type.as_deref() {
        if !form_type.is_empty() {
            qb.push(" AND form_type = ").push_bind(form_type);
        }
    }
    if let Some(search) = opts.search_name.as_deref() {
        if !search.is_empty() {
            let pattern = format!("%{}%", search.to_lowercase());
            qb.push(" AND (LOWER(first_name) LIKE ").push_bind(pattern.clone());
            qb.push(" OR LOWER(last_name) LIKE ").push_bind(pattern);
            qb.push(")");
        }
    }
    if let Some(zip) = opts.zip_code.as_deref() {
        if !zip.is_empty() {
            qb.push(" AND zip_code = ").push_bind(zip);
        }
    }
    if let Some(holiday) = opts.jewish_holiday {
        qb.push(" AND jewish_holiday = ").push_bind(holiday);
    }
    if !opts.chemical_ids.is_empty() {
        qb.push(" AND id IN (SELECT form_id FROM pest_apps WHERE chemical_id IN (");
        let mut separated = qb.separated(", ");
        for chemical_id in &opts.chemical_ids {
            separated.push_bind(chemical_id.as_str());
        }
        qb.push("))");
    }
    if opts.date_low.is_some() || opts.date_high.is_some() {
        qb.push(" AND id IN (SELECT form_id FROM pest_apps GROUP BY form_id HAVING 1=1");
        if let Some(low) = opts.date_low {
            qb.push(" AND MIN(applied_at) >= ").push_bind(low);
        }
        if let Some(high) = opts.date_high {
            qb.push(" AND MAX(applied_at) <= ").push_bind(high);
        }
        qb.push(")");
    }
}

#[async_trait]
impl FormRepository for PostgresFormRepo {
    async fn create_shrub(&self, form: &Form, details: &ShrubDetails, apps: &[PestApp]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        insert_form(&mut tx, form).await?;
        sqlx::query("INSERT INTO shrubs (form_id, shrub_count) VALUES ($1, $2)")
            .bind(&details.form_id)
            .bind(details.shrub_count)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        insert_apps(&mut tx, apps).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn create_lawn(&self, form: &Form, details: &LawnDetails, apps: &[PestApp]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        insert_form(&mut tx, form).await?;
        sqlx::query("INSERT INTO lawn_forms (form_id, area_sq_ft) VALUES ($1, $2)")
            .bind(&details.form_id)
            .bind(details.area_sq_ft)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        insert_apps(&mut tx, apps).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn create_pesticide(&self, form: &Form, details: &PesticideDetails) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        insert_form(&mut tx, form).await?;
        sqlx::query("INSERT INTO pesticides (form_id, chemical_name) VALUES ($1, $2)")
            .bind(&details.form_id)
            .bind(&details.chemical_name)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str, owner: Option<&str>) -> Result<Option<FormView>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM forms WHERE id = ");
        qb.push_bind(id);
        if let Some(owner) = owner {
            qb.push(" AND created_by = ").push_bind(owner);
        }

        let form: Option<Form> = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        match form {
            Some(form) => Ok(Some(self.hydrate(form).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, owner: Option<&str>, opts: &FormListOptions) -> Result<(Vec<FormView>, i64), AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM forms");
        push_list_predicates(&mut qb, owner, opts);
        qb.push(" ORDER BY ")
            .push(opts.sort_column())
            .push(" ")
            .push(opts.sort_direction());
        if opts.limit > 0 {
            qb.push(" LIMIT ").push_bind(opts.limit);
            qb.push(" OFFSET ").push_bind(opts.offset);
        }

        let forms: Vec<Form> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM forms");
        push_list_predicates(&mut count_qb, owner, opts);
        let count: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut views = Vec::with_capacity(forms.len());
        for form in forms {
            views.push(self.hydrate(form).await?);
        }
        Ok((views, count))
    }

    async fn update_shrub(&self, form: &Form, details: &ShrubDetails, owner: Option<&str>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if update_form_base(&mut tx, form, owner).await? == 0 {
            return Err(AppError::NotFound("Form not found".into()));
        }
        sqlx::query("UPDATE shrubs SET shrub_count = $1 WHERE form_id = $2")
            .bind(details.shrub_count)
            .bind(&details.form_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn update_lawn(&self, form: &Form, details: &LawnDetails, owner: Option<&str>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if update_form_base(&mut tx, form, owner).await? == 0 {
            return Err(AppError::NotFound("Form not found".into()));
        }
        sqlx::query("UPDATE lawn_forms SET area_sq_ft = $1 WHERE form_id = $2")
            .bind(details.area_sq_ft)
            .bind(&details.form_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn update_pesticide(&self, form: &Form, details: &PesticideDetails, owner: Option<&str>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if update_form_base(&mut tx, form, owner).await? == 0 {
            return Err(AppError::NotFound("Form not found".into()));
        }
        sqlx::query("UPDATE pesticides SET chemical_name = $1 WHERE form_id = $2")
            .bind(&details.chemical_name)
            .bind(&details.form_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, id: &str, owner: Option<&str>) -> Result<(), AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM forms WHERE id = ");
        qb.push_bind(id);
        if let Some(owner) = owner {
            qb.push(" AND created_by = ").push_bind(owner);
        }

        let result = qb.build().execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Form not found".into()));
        }
        Ok(())
    }
}
