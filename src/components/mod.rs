// Export components
pub mod availability;

// Re-export the availability service
pub use availability::AvailabilityService;
