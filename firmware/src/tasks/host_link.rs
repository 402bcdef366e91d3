//! Serial register server for the host PC.
//!
//! Bytes from the ring-buffered RX are split into lines, each line is
//! served against the shared register file and the rendered reply is
//! written back before the next line is looked at.

use crate::ipc::{CONVERSION_SIGNAL, LINK_STATS, REGISTERS, RELAY_SIGNAL};
use defmt::{debug, info, warn};
use embassy_executor::task;
use embassy_futures::select::{select, Either};
use embassy_stm32::{
    mode::Async,
    usart::{RingBufferedUartRx, UartTx},
};
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;
use peltier_config::config::HOST_BAUDRATE;
use peltier_config::protocol::{render, LineBuffer};
use peltier_config::registers::Request;
use peltier_config::Error;

const STATS_PERIOD: Duration = Duration::from_secs(60);

#[task]
pub async fn host_link_task(mut tx: UartTx<'static, Async>, mut rx: RingBufferedUartRx<'static>) {
    info!("host link up at {} baud", HOST_BAUDRATE);
    let mut lines = LineBuffer::new();
    let mut chunk = [0u8; 32];
    let mut stats = Ticker::every(STATS_PERIOD);

    loop {
        match select(rx.read(&mut chunk), stats.next()).await {
            Either::First(Ok(n)) => {
                for &byte in &chunk[..n] {
                    if let Some(parsed) = lines.push(byte) {
                        respond(&mut tx, parsed).await;
                    }
                }
            }
            Either::First(Err(e)) => {
                // overrun; the partial line is unusable
                warn!("host rx error: {:?}", e);
                lines = LineBuffer::new();
            }
            Either::Second(()) => {
                let (frames, rejected) = LINK_STATS.take();
                info!("host link: {} frames, {} rejected", frames, rejected);
            }
        }
    }
}

async fn respond(tx: &mut UartTx<'static, Async>, parsed: Result<Request, Error>) {
    let (outcome, relay, convert) = {
        let mut regs = REGISTERS.lock().await;
        let was_running = regs.is_running();
        let outcome = regs.serve(parsed);
        let now_running = regs.is_running();
        (
            outcome,
            (now_running != was_running).then_some(now_running),
            regs.conversion_pending(),
        )
    };

    match &outcome {
        Ok(reply) => debug!("host -> {:?}", reply),
        Err(e) => warn!("host request rejected: {:?}", e),
    }
    LINK_STATS.record(outcome.is_ok());

    if convert {
        CONVERSION_SIGNAL.signal(());
    }

    if let Some(on) = relay {
        info!("run state -> {}", if on { "RUNNING" } else { "STANDBY" });
        RELAY_SIGNAL.signal(on);
    }

    if let Err(e) = tx.write_all(render(&outcome).as_bytes()).await {
        warn!("host tx error: {:?}", e);
    }
}
