#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use peltier_config::config::{
    CURRENT_PID_REFRESH_RATE, DHTTYPE, MAX_CURR, MAX_VOLT, MIN_VOLT, PERIOD_RATE, PID_MODE,
    RTD_PRESET,
};
use peltier_firmware::{
    tasks::{dht_task, host_link_task, relay_task},
    Board,
};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting peltier regulator");
    info!(
        "PID {:?}, {} probe, DHT{}, loops {} ms / {} ms, drive {}..{} mV, {} mA max",
        PID_MODE,
        RTD_PRESET.name(),
        DHTTYPE.code(),
        PERIOD_RATE,
        CURRENT_PID_REFRESH_RATE,
        MIN_VOLT,
        MAX_VOLT,
        MAX_CURR
    );

    let board = Board::init();

    unwrap!(spawner.spawn(relay_task(board.relay)));
    unwrap!(spawner.spawn(dht_task(board.dht)));
    unwrap!(spawner.spawn(host_link_task(board.host_tx, board.host_rx)));
    info!("Relay, DHT and host link tasks spawned");

    core::future::pending::<()>().await;
}
