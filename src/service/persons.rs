//! Person (owner) operations and the person grid

use std::sync::Arc;

use serde::Serialize;

use super::dto::PersonDto;
use super::errors::{ServiceError, ServiceResult};
use crate::grid::{GridDescriptor, GridExecutor, GridQuery, QueryPage};
use crate::model::catalog::person_grid;
use crate::model::{now_millis, AdminRef};
use crate::observability::{log_event_with_fields, Event};
use crate::storage::{Database, PersonStore};

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Vehicles still referencing a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub vehicles: u64,
}

pub struct PersonService {
    db: Arc<Database>,
    grid: GridDescriptor,
    search_limit_max: i64,
}

impl PersonService {
    pub fn new(db: Arc<Database>, search_limit_max: u32) -> Self {
        Self {
            db,
            grid: person_grid(),
            search_limit_max: i64::from(search_limit_max.max(1)),
        }
    }

    fn clamp_limit(&self, limit: i64) -> u32 {
        // both bounds are within u32
        limit.clamp(1, self.search_limit_max) as u32
    }

    /// Grid page with a vehicle count per row, counted in one grouped query
    pub fn query(&self, query: &GridQuery) -> ServiceResult<QueryPage<PersonDto>> {
        let store = PersonStore::new(&self.db);
        let page = GridExecutor::new(&self.grid, &store).execute(query)?;

        let ids: Vec<i64> = page.rows.iter().map(|p| p.id).collect();
        let counts = store.vehicle_counts(&ids)?;
        Ok(page.map(|person| {
            let count = counts.get(&person.id).copied().unwrap_or(0);
            PersonDto::full(person, count)
        }))
    }

    pub fn get(&self, id: i64) -> ServiceResult<PersonDto> {
        let store = PersonStore::new(&self.db);
        let person = store.find(id)?.ok_or_else(|| ServiceError::not_found("Person", id))?;
        let count = store.vehicle_count(id)?;
        Ok(PersonDto::full(person, count))
    }

    /// Create a person owned by the calling admin
    pub fn create(&self, dto: &PersonDto, admin: &AdminRef) -> ServiceResult<i64> {
        let full_name = dto.validate()?;
        Ok(PersonStore::new(&self.db).insert(&full_name, admin.id, &now_millis())?)
    }

    /// Rename; nothing else about a person is writable
    pub fn update(&self, id: i64, dto: &PersonDto) -> ServiceResult<()> {
        let full_name = dto.validate()?;
        if !PersonStore::new(&self.db).update_name(id, &full_name)? {
            return Err(ServiceError::not_found("Person", id));
        }
        Ok(())
    }

    /// Delete a person. With `reassign_to`, their vehicles move to that
    /// person first; without it, the delete is refused while any vehicle
    /// still references them.
    pub fn delete(&self, id: i64, reassign_to: Option<i64>) -> ServiceResult<()> {
        let store = PersonStore::new(&self.db);
        if !store.exists(id)? {
            return Err(ServiceError::not_found("Person", id));
        }

        match reassign_to {
            Some(target) => {
                if target == id {
                    return Err(ServiceError::BadRequest(
                        "Cannot reassign vehicles to the person being deleted".to_string(),
                    ));
                }
                if !store.exists(target)? {
                    return Err(ServiceError::BadRequest(format!(
                        "Reassignment target not found: {}",
                        target
                    )));
                }
                let moved = store.reassign_and_delete(id, target)?;
                let (from, to, moved) = (id.to_string(), target.to_string(), moved.to_string());
                log_event_with_fields(
                    Event::PersonReassigned,
                    &[("from", from.as_str()), ("to", to.as_str()), ("vehicles", moved.as_str())],
                );
                Ok(())
            }
            None => {
                let refs = store.vehicle_count(id)?;
                if refs > 0 {
                    return Err(ServiceError::Conflict {
                        message: format!("Cannot delete owner: {} vehicle(s) still reference it", refs),
                        ref_count: refs,
                    });
                }
                match store.delete(id) {
                    Ok(_) => Ok(()),
                    // a vehicle was attached between the count and the delete
                    Err(err) if err.is_constraint() => {
                        let refs = store.vehicle_count(id)?;
                        Err(ServiceError::Conflict {
                            message: format!("Cannot delete owner: {} vehicle(s) still reference it", refs),
                            ref_count: refs,
                        })
                    }
                    Err(err) => Err(err.into()),
                }
            }
        }
    }

    /// Name search for pickers. A blank query lists the first persons by name.
    pub fn search(&self, q: Option<&str>, limit: i64) -> ServiceResult<Vec<PersonDto>> {
        let limit = self.clamp_limit(limit);
        let store = PersonStore::new(&self.db);
        let rows = match q.map(str::trim).filter(|q| !q.is_empty()) {
            Some(needle) => store.search(needle, limit)?,
            None => store.top(limit)?,
        };
        Ok(rows.into_iter().map(PersonDto::short).collect())
    }

    pub fn list(&self, limit: i64) -> ServiceResult<Vec<PersonDto>> {
        self.search(None, limit)
    }

    pub fn usage(&self, id: i64) -> ServiceResult<Usage> {
        Ok(Usage {
            vehicles: PersonStore::new(&self.db).vehicle_count(id)?,
        })
    }
}
