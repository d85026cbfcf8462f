pub mod auth;
pub mod cleanup;
pub mod listing;
pub mod notification;

#[cfg(test)]
pub mod testing;
