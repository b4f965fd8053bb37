//! HTTP handlers. Thin layer: extract, validate, delegate to a service,
//! wrap in `ApiResponse`.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services;

pub mod block_productions;
pub mod clients;
pub mod leads;
pub mod machines;
pub mod molded_productions;
pub mod movements;
pub mod orders;
pub mod production_pointings;
pub mod products;
pub mod raw_materials;
pub mod reservations;
pub mod users;

/// Services shared by the HTTP handlers through `AppState`.
#[derive(Clone)]
pub struct AppServices {
    pub raw_materials: Arc<services::raw_materials::RawMaterialService>,
    pub production_pointings: Arc<services::production_pointings::ProductionPointingService>,
    pub reservations: Arc<services::reservations::ReservationService>,
    pub movements: Arc<services::movements::MovementService>,
    pub block_productions: Arc<services::block_productions::BlockProductionService>,
    pub molded_productions: Arc<services::molded_productions::MoldedProductionService>,
    pub machines: Arc<services::machines::MachineService>,
    pub orders: Arc<services::orders::OrderService>,
    pub products: Arc<services::products::ProductService>,
    pub clients: Arc<services::clients::ClientService>,
    pub users: Arc<services::users::UserService>,
    pub leads: Arc<services::leads::LeadService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            raw_materials: Arc::new(services::raw_materials::RawMaterialService::new(db.clone())),
            production_pointings: Arc::new(
                services::production_pointings::ProductionPointingService::new(
                    db.clone(),
                    event_sender.clone(),
                ),
            ),
            reservations: Arc::new(services::reservations::ReservationService::new(
                db.clone(),
                event_sender.clone(),
            )),
            movements: Arc::new(services::movements::MovementService::new(
                db.clone(),
                event_sender.clone(),
            )),
            block_productions: Arc::new(services::block_productions::BlockProductionService::new(
                db.clone(),
                event_sender.clone(),
            )),
            molded_productions: Arc::new(
                services::molded_productions::MoldedProductionService::new(
                    db.clone(),
                    event_sender.clone(),
                ),
            ),
            machines: Arc::new(services::machines::MachineService::new(
                db.clone(),
                event_sender.clone(),
            )),
            orders: Arc::new(services::orders::OrderService::new(
                db.clone(),
                event_sender.clone(),
            )),
            products: Arc::new(services::products::ProductService::new(
                db.clone(),
                event_sender.clone(),
            )),
            clients: Arc::new(services::clients::ClientService::new(
                db.clone(),
                event_sender.clone(),
            )),
            users: Arc::new(services::users::UserService::new(
                db.clone(),
                event_sender.clone(),
            )),
            leads: Arc::new(services::leads::LeadService::new(db, event_sender)),
        }
    }
}

/// Audit attribution for the acting principal, when its subject is a UUID.
pub(crate) fn actor_id(user: &AuthUser) -> Option<Uuid> {
    Uuid::parse_str(&user.user_id).ok()
}
