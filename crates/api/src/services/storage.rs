//! Storage areas and their coordinate grids.
//!
//! An area's coordinate set always equals its `width × height` cells. Grid
//! changes run in one transaction holding the area's row lock, so two
//! resizes of the same area serialize and a reader never sees a half-built
//! grid.

use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument, warn};

use factory_inventory_core::{
    Actor, AreaName, FactoryScope, GridSize, Permission, ResizePlan, StorageAreaId,
};

use super::{AccessService, ServiceError, non_blank};
use crate::db::{self, RepositoryError, StorageAreaRepository, storage_areas};
use crate::models::{
    Coordinate, CreateStorageAreaInput, StorageArea, StorageAreaDetail, StorageAreaFilter,
    UpdateStorageAreaInput,
};

/// Storage area operations.
pub struct StorageService<'a> {
    pool: &'a PgPool,
    access: AccessService<'a>,
    areas: StorageAreaRepository<'a>,
}

impl<'a> StorageService<'a> {
    /// Create a new storage service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            access: AccessService::new(pool),
            areas: StorageAreaRepository::new(pool),
        }
    }

    /// Areas in the actor's scope with occupancy figures.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on storage failure.
    #[instrument(skip(self, filter), fields(account_id = %actor.account_id))]
    pub async fn list(
        &self,
        actor: &Actor,
        filter: &StorageAreaFilter,
    ) -> Result<Vec<StorageAreaDetail>, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        let areas = self.areas.list(&scope, filter).await?;
        Ok(areas
            .into_iter()
            .map(|(area, occupied)| StorageAreaDetail::new(area, occupied))
            .collect())
    }

    /// One area with occupancy figures.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if it doesn't exist or is out of scope.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn get(
        &self,
        actor: &Actor,
        id: StorageAreaId,
    ) -> Result<StorageAreaDetail, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        let (area, occupied) = self.visible_area(&scope, id).await?;
        Ok(StorageAreaDetail::new(area, occupied))
    }

    /// Every cell of an area, ordered by `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the area doesn't exist or is out
    /// of scope.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn coordinates(
        &self,
        actor: &Actor,
        id: StorageAreaId,
    ) -> Result<Vec<Coordinate>, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        let (area, _) = self.visible_area(&scope, id).await?;
        Ok(self.areas.list_coordinates(&area).await?)
    }

    /// Create an area and generate its grid.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for a bad name or dimensions, or a
    /// name already used in the factory.
    #[instrument(skip(self, input), fields(account_id = %actor.account_id, factory_id = %input.factory_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        input: &CreateStorageAreaInput,
    ) -> Result<StorageAreaDetail, ServiceError> {
        let area_name = AreaName::parse(&input.area_name)?;
        let size = GridSize::new(input.width, input.height)?;
        let scope = self.access.resolve_scope(actor).await?;
        scope.ensure_permission(input.factory_id, Permission::Inventory)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;
        let area = storage_areas::insert(
            &mut tx,
            input.factory_id,
            area_name,
            size,
            non_blank(input.description.as_deref()),
        )
        .await?;
        generate_grid(&mut tx, area.id, size).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            storage_area_id = %area.id,
            factory_id = %area.factory_id,
            area_name = %area.area_name,
            cells = size.total(),
            "storage area created"
        );
        Ok(StorageAreaDetail::new(area, 0))
    }

    /// Change an area's dimensions.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for bad dimensions,
    /// `ServiceError::NotFound` if the area is missing or out of scope and
    /// `ServiceError::Conflict` if another change holds the area.
    pub async fn resize(
        &self,
        actor: &Actor,
        id: StorageAreaId,
        width: i32,
        height: i32,
    ) -> Result<StorageAreaDetail, ServiceError> {
        GridSize::new(width, height)?;
        self.update(
            actor,
            id,
            &UpdateStorageAreaInput {
                width: Some(width),
                height: Some(height),
                description: None,
            },
        )
        .await
    }

    /// Update description and, if either dimension changes, regenerate the
    /// grid.
    ///
    /// Items on cells that still exist are re-pointed to the regenerated
    /// coordinate; items on removed cells lose their coordinate reference.
    /// Same dimensions leave the grid untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resize`].
    #[instrument(skip(self, input), fields(account_id = %actor.account_id))]
    pub async fn update(
        &self,
        actor: &Actor,
        id: StorageAreaId,
        input: &UpdateStorageAreaInput,
    ) -> Result<StorageAreaDetail, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;

        let mut tx = db::begin_locking(self.pool).await?;
        let current = storage_areas::lock(&mut tx, id)
            .await?
            .ok_or_else(|| area_not_found(id))?;
        scope
            .ensure_permission(current.factory_id, Permission::Inventory)
            .map_err(|e| {
                if scope.contains(current.factory_id) {
                    e.into()
                } else {
                    area_not_found(id)
                }
            })?;

        let target = GridSize::new(
            input.width.unwrap_or_else(|| current.size.width()),
            input.height.unwrap_or_else(|| current.size.height()),
        )?;
        let description = non_blank(input.description.as_deref());
        let plan = current.size.plan_resize(target);

        match plan {
            ResizePlan::Unchanged => {
                if description.is_some() {
                    storage_areas::update(&mut tx, id, current.size, description).await?;
                }
            }
            ResizePlan::Regenerate { from, to } => {
                let links = storage_areas::occupied_links(&mut tx, id).await?;
                let (kept, detached) = plan.partition(links);

                storage_areas::clear_grid(&mut tx, id).await?;
                storage_areas::update(&mut tx, id, to, description).await?;
                generate_grid(&mut tx, id, to).await?;
                let repointed = storage_areas::repoint_items(&mut tx, id, &kept).await?;

                if !detached.is_empty() {
                    warn!(
                        storage_area_id = %id,
                        detached = detached.len(),
                        "items on removed cells lost their coordinate"
                    );
                }
                info!(
                    storage_area_id = %id,
                    factory_id = %current.factory_id,
                    from = %format_args!("{}x{}", from.width(), from.height()),
                    to = %format_args!("{}x{}", to.width(), to.height()),
                    repointed,
                    "storage area grid regenerated"
                );
            }
        }
        tx.commit().await.map_err(RepositoryError::from)?;

        let (area, occupied) = self
            .areas
            .get(id)
            .await?
            .ok_or_else(|| area_not_found(id))?;
        Ok(StorageAreaDetail::new(area, occupied))
    }

    async fn visible_area(
        &self,
        scope: &FactoryScope,
        id: StorageAreaId,
    ) -> Result<(StorageArea, i64), ServiceError> {
        let (area, occupied) = self
            .areas
            .get(id)
            .await?
            .ok_or_else(|| area_not_found(id))?;
        if !scope.contains(area.factory_id) {
            return Err(area_not_found(id));
        }
        Ok((area, occupied))
    }
}

/// Insert every cell of `size` and check none went missing.
async fn generate_grid(
    conn: &mut PgConnection,
    area_id: StorageAreaId,
    size: GridSize,
) -> Result<(), ServiceError> {
    let generated = storage_areas::generate_coordinates(conn, area_id, size).await?;
    if u64::try_from(size.total()).ok() != Some(generated) {
        return Err(RepositoryError::DataCorruption(format!(
            "generated {generated} coordinates for a {}x{} grid",
            size.width(),
            size.height()
        ))
        .into());
    }
    Ok(())
}

fn area_not_found(id: StorageAreaId) -> ServiceError {
    ServiceError::not_found(format!("storage area {id}"))
}
