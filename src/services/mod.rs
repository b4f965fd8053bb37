//! Business services. One service per resource; each owns its queries,
//! domain guards, and event emission. Handlers stay thin.

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
