//! University records REST service: paginated CRUD over courses, students,
//! professors, and enrollments, backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod page;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use model::{entity_by_path, EntitySchema, ListOverflow, ENTITIES};
pub use routes::{common_routes, entity_routes, router};
pub use service::CrudService;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
