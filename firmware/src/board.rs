use embassy_stm32::mode::Async;
use embassy_stm32::usart::{Config as UsartConfig, RingBufferedUartRx, Uart, UartTx};
use embassy_stm32::{
    bind_interrupts,
    gpio::{Flex, Level, Output, Pull, Speed},
    peripherals, rcc, usart, Config,
};
use peltier_config::config::{DHTPIN, HOST_BAUDRATE, HOST_RX_DMA_SIZE, RELAY_PIN};
use static_cell::StaticCell;

// NUCLEO-G071RB Arduino header: D2 = PA10, D7 = PA8.
const _: () = assert!(RELAY_PIN == 7, "relay is wired to D7 (PA8)");
const _: () = assert!(DHTPIN == 2, "DHT data is wired to D2 (PA10)");

// ── IRQ table ─────────────────────────────────────────────
bind_interrupts!(pub struct Irqs {
    USART2 => usart::InterruptHandler<peripherals::USART2>;
});

static HOST_RX_BUF: StaticCell<[u8; HOST_RX_DMA_SIZE]> = StaticCell::new();

// ── Board struct ──────────────────────────────────────────
pub struct Board {
    // ST-LINK virtual COM port
    pub host_tx: UartTx<'static, Async>,
    pub host_rx: RingBufferedUartRx<'static>,
    pub relay: Output<'static>,
    // DHT22 single-wire data, open drain with the module's pull-up
    pub dht: Flex<'static>,
}

impl Board {
    pub fn init() -> Self {
        let mut config = Config::default();

        // HSI 16MHz -> PLL -> 64MHz SYSCLK
        config.rcc.hsi = Some(rcc::Hsi {
            sys_div: rcc::HsiSysDiv::DIV1,
        });
        config.rcc.pll = Some(rcc::Pll {
            source: rcc::PllSource::HSI,
            prediv: rcc::PllPreDiv::DIV2,   // 16MHz / 2 = 8MHz
            mul: rcc::PllMul::MUL16,        // 8MHz * 16 = 128MHz
            divp: None,
            divq: None,
            divr: Some(rcc::PllRDiv::DIV2), // 128MHz / 2 = 64MHz
        });
        config.rcc.sys = rcc::Sysclk::PLL1_R;
        let p = embassy_stm32::init(config);

        // Relay coil off until the host starts a run
        let relay = Output::new(p.PA8, Level::Low, Speed::Low);

        let mut dht = Flex::new(p.PA10);
        dht.set_high();
        dht.set_as_input_output(Speed::Low);

        let mut us_cfg = UsartConfig::default();
        us_cfg.baudrate = HOST_BAUDRATE;
        us_cfg.rx_pull = Pull::Up;

        let uart = defmt::unwrap!(Uart::new(
            p.USART2, p.PA3, p.PA2, Irqs, p.DMA1_CH1, p.DMA1_CH2, us_cfg
        ));
        let (tx, rx) = uart.split();
        // DMA-circular RX driver
        let rx = rx.into_ring_buffered(HOST_RX_BUF.init([0; HOST_RX_DMA_SIZE]));

        Self {
            host_tx: tx,
            host_rx: rx,
            relay,
            dht,
        }
    }
}
