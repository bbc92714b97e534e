pub mod access;
pub mod error;
pub mod library;
pub mod model;
pub mod password;
pub mod profile;
pub mod recipe;
pub mod review;
pub mod unit;

pub use access::{
    AccessConfig, InMemoryAccess, LocalAccess, LocalAccessBuilder, RecipeHubAccess, RemoteAccess,
    RemoteAccessBuilder,
};
pub use error::HubError;
pub use library::RecipeLibrary;
pub use model::RecipeHubModel;
pub use password::{hash_password, verify_password};
pub use profile::{is_valid_password, is_valid_username, validate_password, validate_username, Profile};
pub use recipe::{Recipe, RecipeRef};
pub use review::Review;
pub use unit::{Unit, UnitCategory};
