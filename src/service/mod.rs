//! Request-time engines: validation, authorization and CRUD execution.

mod authorization;
mod crud;
mod validation;
pub use authorization::{bearer_token, Authorizer, Identity};
pub use crud::CrudService;
pub use validation::RequestValidator;
