pub mod products;
pub mod shifts;
pub mod users;

pub use products::ProductService;
pub use shifts::ShiftService;
pub use users::UserService;
