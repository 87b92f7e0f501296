use std::sync::Arc;

use aerobook_core::booking::BookingManager;
use aerobook_core::enquiry::EnquiryManager;
use aerobook_core::repository::UserRepository;
use aerobook_core::support::SupportManager;

use crate::flights::FlightCatalog;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub bookings: BookingManager,
    pub tickets: SupportManager,
    pub enquiries: EnquiryManager,
    pub catalog: Arc<FlightCatalog>,
    pub auth: AuthConfig,
}
