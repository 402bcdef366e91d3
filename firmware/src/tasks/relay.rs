use crate::ipc::RELAY_SIGNAL;
use defmt::info;
use embassy_executor::task;
use embassy_stm32::gpio::Output;

/// Follows the run state set over the host link. No interlock: the relay
/// is energised exactly while the status flag reads RUNNING.
#[task]
pub async fn relay_task(mut relay: Output<'static>) {
    relay.set_low();
    loop {
        let on = RELAY_SIGNAL.wait().await;
        if on {
            relay.set_high();
        } else {
            relay.set_low();
        }
        info!("peltier relay {}", if on { "on" } else { "off" });
    }
}
