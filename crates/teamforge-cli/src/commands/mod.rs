pub mod allocate;
pub mod profile;
