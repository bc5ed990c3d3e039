pub mod context;
pub mod errors;
pub mod intent;
pub mod services;
pub mod utils;
