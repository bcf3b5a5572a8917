//! Stand-ins for the session, location and calendar services
//!
//! The bundled binary runs the engine against these; a host application
//! supplies its own adapters for the same ports.

mod clock;
mod roster;
mod world;

pub use clock::DayPeriodClock;
pub use roster::StaticRoster;
pub use world::SimulatedLocationService;
