use crate::ipc::{CONVERSION_SIGNAL, REGISTERS};
use defmt::{debug, info, warn, Debug2Format};
use dht_sensor::{dht22, DhtReading};
use embassy_executor::task;
use embassy_futures::select::select;
use embassy_stm32::gpio::Flex;
use embassy_time::{Delay, Duration, Instant, Timer};
use peltier_config::config::{DHTPIN, DHTTYPE};
use peltier_config::registers::Fault;
use peltier_config::{DhtType, Measurement};

// DHT21 shares the DHT22 frame format
const _: () = assert!(
    matches!(DHTTYPE, DhtType::Dht21 | DhtType::Dht22),
    "only the DHT21/DHT22 frame decoder is wired in"
);

/// Converts on every host trigger, and at least once per sample interval
/// so the registers never go stale. Back-to-back requests are spaced by
/// the sensor's minimum interval.
#[task]
pub async fn dht_task(mut pin: Flex<'static>) {
    let interval = Duration::from_millis(DHTTYPE.min_sample_interval_ms() as u64);
    info!(
        "DHT{} on D{}, {} ms between conversions",
        DHTTYPE.code(),
        DHTPIN,
        DHTTYPE.min_sample_interval_ms()
    );

    // sensor is unresponsive for one interval after power-up
    let mut ready_at = Instant::now() + interval;

    loop {
        select(CONVERSION_SIGNAL.wait(), Timer::after(interval)).await;
        Timer::at(ready_at).await;

        // bit-banged, ~5 ms blocking
        let reading = dht22::Reading::read(&mut Delay, &mut pin);
        ready_at = Instant::now() + interval;

        let reading = match reading {
            Ok(r) => {
                debug!("DHT {}%RH {}°C", r.relative_humidity, r.temperature);
                Ok(Measurement {
                    humidity: r.relative_humidity,
                    temperature: r.temperature,
                })
            }
            Err(e) => {
                warn!("DHT read failed: {:?}", Debug2Format(&e));
                Err(Fault::Dht)
            }
        };
        REGISTERS.lock().await.record_reading(reading);
    }
}
