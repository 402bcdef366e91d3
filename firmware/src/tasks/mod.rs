pub mod dht;
pub mod host_link;
pub mod relay;

pub use dht::dht_task;
pub use host_link::host_link_task;
pub use relay::relay_task;
