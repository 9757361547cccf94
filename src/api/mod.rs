pub mod handlers;
pub mod locale;
pub mod routes;
pub mod state;

pub use locale::LocaleContext;
pub use routes::{cors_layer, create_router};
pub use state::AppState;
