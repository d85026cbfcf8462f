pub mod browse_listings;
pub mod create_listing;
pub mod delete_listing;
pub mod mark_listing_sold;

pub use browse_listings::{BrowseListingsCommand, BrowseListingsUseCase};
pub use create_listing::{CreateListingCommand, CreateListingResponse, CreateListingUseCase};
pub use delete_listing::{DeleteListingCommand, DeleteListingUseCase};
pub use mark_listing_sold::{
  MarkListingSoldCommand, MarkListingSoldResponse, MarkListingSoldUseCase,
};
