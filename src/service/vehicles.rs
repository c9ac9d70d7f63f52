//! Vehicle CRUD and the vehicle grid

use std::sync::Arc;

use super::dto::VehicleDto;
use super::errors::{ServiceError, ServiceResult};
use crate::grid::{GridDescriptor, GridExecutor, GridQuery, QueryPage};
use crate::model::catalog::vehicle_grid;
use crate::model::{now_millis, NewVehicle};
use crate::storage::{Database, PersonStore, VehicleStore};

/// Default window for `list`
pub const DEFAULT_LIST_LIMIT: u64 = 1000;

pub struct VehicleService {
    db: Arc<Database>,
    grid: GridDescriptor,
}

impl VehicleService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            grid: vehicle_grid(),
        }
    }

    fn check_owner(&self, vehicle: &NewVehicle) -> ServiceResult<()> {
        if let Some(owner) = vehicle.owner_id {
            if !PersonStore::new(&self.db).exists(owner)? {
                return Err(ServiceError::BadRequest(format!("Owner not found: {}", owner)));
            }
        }
        Ok(())
    }

    pub fn create(&self, dto: &VehicleDto) -> ServiceResult<i64> {
        let vehicle = dto.validate()?;
        self.check_owner(&vehicle)?;
        Ok(VehicleStore::new(&self.db).insert(&vehicle, &now_millis())?)
    }

    /// Replace every writable field; the creation date is kept
    pub fn update(&self, id: i64, dto: &VehicleDto) -> ServiceResult<()> {
        let vehicle = dto.validate()?;
        self.check_owner(&vehicle)?;
        if !VehicleStore::new(&self.db).update(id, &vehicle)? {
            return Err(ServiceError::not_found("Vehicle", id));
        }
        Ok(())
    }

    pub fn get(&self, id: i64) -> ServiceResult<VehicleDto> {
        VehicleStore::new(&self.db)
            .find(id)?
            .map(VehicleDto::from)
            .ok_or_else(|| ServiceError::not_found("Vehicle", id))
    }

    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        if !VehicleStore::new(&self.db).delete(id)? {
            return Err(ServiceError::not_found("Vehicle", id));
        }
        Ok(())
    }

    pub fn list(&self, offset: u64, limit: u64) -> ServiceResult<Vec<VehicleDto>> {
        let rows = VehicleStore::new(&self.db).list(offset, limit)?;
        Ok(rows.into_iter().map(VehicleDto::from).collect())
    }

    pub fn query(&self, query: &GridQuery) -> ServiceResult<QueryPage<VehicleDto>> {
        let store = VehicleStore::new(&self.db);
        let page = GridExecutor::new(&self.grid, &store).execute(query)?;
        Ok(page.map(VehicleDto::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FuelType, VehicleType};
    use crate::service::dto::CoordinatesDto;

    fn body(name: &str) -> VehicleDto {
        VehicleDto {
            name: Some(name.to_string()),
            coordinates: Some(CoordinatesDto { x: None, y: Some(5.0) }),
            vehicle_type: Some(VehicleType::Bicycle),
            number_of_wheels: Some(2),
            fuel_consumption: Some(0.1),
            fuel_type: Some(FuelType::Manpower),
            ..VehicleDto::default()
        }
    }

    fn service() -> VehicleService {
        VehicleService::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn test_create_get_update_delete() {
        let service = service();
        let id = service.create(&body("Bike")).unwrap();

        let dto = service.get(id).unwrap();
        assert_eq!(dto.name.as_deref(), Some("Bike"));
        let created = dto.creation_date.clone().unwrap();
        assert_eq!(created.len(), "2025-09-27T13:05:07.123".len());

        service.update(id, &body("Bike 2")).unwrap();
        let updated = service.get(id).unwrap();
        assert_eq!(updated.name.as_deref(), Some("Bike 2"));
        assert_eq!(updated.creation_date, Some(created));

        service.delete(id).unwrap();
        assert_eq!(service.get(id).unwrap_err().status_code(), 404);
        assert_eq!(service.delete(id).unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let service = service();
        assert_eq!(service.update(99, &body("x")).unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_unknown_owner_is_bad_request() {
        let service = service();
        let mut dto = body("Orphan");
        dto.owner_id = Some(404);
        assert_eq!(service.create(&dto).unwrap_err().status_code(), 400);
    }

    #[test]
    fn test_grid_default_order_is_newest_first() {
        let service = service();
        let first = service.create(&body("first")).unwrap();
        let second = service.create(&body("second")).unwrap();

        let page = service.query(&GridQuery::new(0, 10)).unwrap();
        assert_eq!(page.total_count, 2);
        let ids: Vec<i64> = page.rows.iter().filter_map(|r| r.id).collect();
        // same-millisecond inserts fall back to id order
        assert!(ids == vec![second, first] || ids == vec![first, second]);
        assert_eq!(ids.len(), 2);
    }
}
