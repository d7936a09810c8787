// Business domains
pub mod employers;
