pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::Listing;
pub use errors::{BlobStoreError, ListingError};
pub use ports::{BlobStore, ListingRepository};
pub use services::{ListingData, ListingService};
pub use value_objects::{
  ContactMethod, ContactValue, ImageRef, ListingDescription, ListingStatus, ListingTitle, Price,
  ValueObjectError,
};
