//! PostgreSQL implementation of the vehicle store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{VEHICLE_COLUMNS, VehicleRow, encode_images, into_vehicles};
use super::{UpsertOutcome, VehicleStore};
use crate::config::ListingConfig;
use crate::domain::{NewVehicle, Status, Vehicle, VehicleChanges, VehicleId};
use crate::error::ListingError;

/// PostgreSQL-backed vehicle store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresVehicleStore {
    pool: PgPool,
}

impl PostgresVehicleStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from the configuration.
    ///
    /// Acquiring a connection from an exhausted pool fails after
    /// `database_connect_timeout_secs` instead of waiting forever.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the database is unreachable.
    pub async fn connect(config: &ListingConfig) -> Result<Self, ListingError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations in `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), ListingError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn select_many(
        &self,
        sql: &str,
        status: Option<Status>,
    ) -> Result<Vec<Vehicle>, ListingError> {
        let query = sqlx::query_as::<_, VehicleRow>(sql);
        let query = match status {
            Some(status) => query.bind(status.as_str()),
            None => query,
        };
        let rows = query.fetch_all(&self.pool).await?;
        into_vehicles(rows)
    }
}

/// Inserts one row on any executor (pool or open transaction).
async fn insert_vehicle<'e, E>(
    executor: E,
    vehicle: &NewVehicle,
    scrape_id: Option<&str>,
) -> Result<VehicleId, ListingError>
where
    E: sqlx::PgExecutor<'e>,
{
    let images = encode_images(&vehicle.images)?;
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO vehicles (title, price, year, km, fuel, brand, model, images, whatsapp, \
         source, status, scrape_id, description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING id",
    )
    .bind(&vehicle.title)
    .bind(vehicle.price)
    .bind(vehicle.year)
    .bind(vehicle.km)
    .bind(&vehicle.fuel)
    .bind(&vehicle.brand)
    .bind(&vehicle.model)
    .bind(images)
    .bind(vehicle.whatsapp.as_deref())
    .bind(vehicle.source.as_str())
    .bind(vehicle.status.as_str())
    .bind(scrape_id)
    .bind(vehicle.description.as_deref())
    .fetch_one(executor)
    .await?;

    Ok(VehicleId::new(id))
}

#[async_trait]
impl VehicleStore for PostgresVehicleStore {
    async fn list_all(&self) -> Result<Vec<Vehicle>, ListingError> {
        let sql = format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY created_at DESC, id DESC"
        );
        self.select_many(&sql, None).await
    }

    async fn list_active(&self) -> Result<Vec<Vehicle>, ListingError> {
        let sql = format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE status = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        self.select_many(&sql, Some(Status::Active)).await
    }

    async fn get_by_id(&self, id: VehicleId) -> Result<Option<Vehicle>, ListingError> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1");
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Vehicle::try_from).transpose()
    }

    async fn create(&self, vehicle: NewVehicle) -> Result<VehicleId, ListingError> {
        insert_vehicle(&self.pool, &vehicle, vehicle.scrape_id.as_deref()).await
    }

    async fn update(
        &self,
        id: VehicleId,
        changes: &VehicleChanges,
    ) -> Result<bool, ListingError> {
        if changes.is_empty() {
            return Ok(false);
        }

        let images = changes
            .images
            .as_deref()
            .map(encode_images)
            .transpose()?;

        // Nullable columns take a (present, value) pair so that an explicit
        // clear can be told apart from "not supplied".
        let result = sqlx::query(
            "UPDATE vehicles SET \
               title = COALESCE($2, title), \
               price = COALESCE($3, price), \
               year = COALESCE($4, year), \
               km = COALESCE($5, km), \
               fuel = COALESCE($6, fuel), \
               brand = COALESCE($7, brand), \
               model = COALESCE($8, model), \
               images = COALESCE($9, images), \
               whatsapp = CASE WHEN $10 THEN $11 ELSE whatsapp END, \
               status = COALESCE($12, status), \
               description = CASE WHEN $13 THEN $14 ELSE description END, \
               updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1",
        )
        .bind(id.get())
        .bind(changes.title.as_deref())
        .bind(changes.price)
        .bind(changes.year)
        .bind(changes.km)
        .bind(changes.fuel.as_deref())
        .bind(changes.brand.as_deref())
        .bind(changes.model.as_deref())
        .bind(images)
        .bind(changes.whatsapp.is_some())
        .bind(changes.whatsapp.clone().flatten())
        .bind(changes.status.map(Status::as_str))
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: VehicleId) -> Result<bool, ListingError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_by_scrape_id(
        &self,
        scrape_id: &str,
        vehicle: NewVehicle,
    ) -> Result<UpsertOutcome, ListingError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM vehicles WHERE scrape_id = $1 FOR UPDATE",
        )
        .bind(scrape_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            Some(id) => {
                sqlx::query(
                    "UPDATE vehicles SET price = $2, km = $3, \
                     updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond') \
                     WHERE id = $1",
                )
                .bind(id)
                .bind(vehicle.price)
                .bind(vehicle.km)
                .execute(&mut *tx)
                .await?;
                UpsertOutcome::Updated(VehicleId::new(id))
            }
            None => {
                let id = insert_vehicle(&mut *tx, &vehicle, Some(scrape_id)).await?;
                UpsertOutcome::Created(id)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }
}
