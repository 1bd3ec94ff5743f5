pub mod container;
pub mod external;
pub mod index;
pub mod kernel;
pub mod params;
pub mod scene;
pub mod sph;
pub mod vector;

pub use container::Container;
pub use external::ExternalForce;
pub use params::{ConfigError, SphParams};
pub use scene::Scene;
pub use sph::Sph;
pub use vector::SphVector;
