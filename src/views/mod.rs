pub mod chat;
pub mod reports;
pub mod resources;
pub mod shared;

pub use chat::ChatWidget;
pub use reports::ReportsView;
pub use resources::ResourcesView;
