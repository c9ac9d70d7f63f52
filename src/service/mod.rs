//! Business operations behind the HTTP routes
//!
//! Services are synchronous and own an `Arc<Database>`; the HTTP layer calls
//! them from blocking tasks.

pub mod dto;
pub mod errors;
pub mod persons;
pub mod special;
pub mod vehicles;

pub use dto::{CoordinatesDto, PersonDto, VehicleDto};
pub use errors::{FieldViolation, ServiceError, ServiceResult};
pub use persons::{PersonService, Usage};
pub use special::SpecialService;
pub use vehicles::VehicleService;
