#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{SPI0, USB};
use embassy_rp::spi::{self, Spi};
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use embassy_usb::class::cdc_acm::{Receiver, State};
use embassy_usb::{Builder, Config as UsbConfig};
use nrf_bridge::config::{
    RADIO_SPI_FREQUENCY_HZ, USB_MANUFACTURER, USB_MAX_POWER_MA, USB_PID, USB_PRODUCT,
    USB_SERIAL_NUMBER, USB_VID,
};
use nrf_bridge::{
    configure_usb_serial, pump_usb_rx, Bridge, FlashStore, LedIndicator, Nrf24, SerialRxChannel,
    UsbDriver, UsbSerialPort,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

type RadioSpiBus = Spi<'static, SPI0, spi::Async>;
type RadioSpi = SpiDevice<'static, CriticalSectionRawMutex, RadioSpiBus, Output<'static>>;
type NrfBridge = Bridge<
    UsbSerialPort<'static>,
    Nrf24<RadioSpi, Output<'static>, Delay>,
    FlashStore<'static>,
    LedIndicator<'static>,
>;

/// Host packets handed from the USB receive task to the bridge.
static RX_CHANNEL: StaticCell<SerialRxChannel> = StaticCell::new();

/// SPI bus shared through a mutex so the radio gets an `SpiDevice` with CSN.
static SPI_BUS: StaticCell<Mutex<CriticalSectionRawMutex, RadioSpiBus>> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// CDC-ACM state.
static CDC_STATE: StaticCell<State> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("nRF24L01+ bridge starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(USB_VID, USB_PID);
    usb_config.manufacturer = Some(USB_MANUFACTURER);
    usb_config.product = Some(USB_PRODUCT);
    usb_config.serial_number = Some(USB_SERIAL_NUMBER);
    usb_config.max_power = USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;

    // CDC-ACM spans two interfaces, grouped with an IAD
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;
    usb_config.composite_with_iads = true;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    let cdc_state = CDC_STATE.init(State::new());
    let cdc = configure_usb_serial(&mut builder, cdc_state);

    // Build the USB device
    let usb_device = builder.build();

    let (sender, receiver) = cdc.split();
    let rx_channel: &'static SerialRxChannel = RX_CHANNEL.init(SerialRxChannel::new());
    let serial = UsbSerialPort::new(sender, rx_channel);

    // --- Radio Setup ---
    let mut spi_config = spi::Config::default();
    spi_config.frequency = RADIO_SPI_FREQUENCY_HZ;

    let spi_bus = Spi::new(
        p.SPI0,
        p.PIN_18, // SCK
        p.PIN_19, // MOSI
        p.PIN_16, // MISO
        p.DMA_CH0,
        p.DMA_CH1,
        spi_config,
    );
    let spi_bus = SPI_BUS.init(Mutex::new(spi_bus));
    let csn = Output::new(p.PIN_17, Level::High);
    let ce = Output::new(p.PIN_20, Level::Low);

    let mut radio = Nrf24::new(SpiDevice::new(spi_bus, csn), ce, Delay);
    if let Err(e) = radio.init().await {
        // Keep bridging: directives are still answered with the report
        error!("Radio init failed: {:?}", e);
    }

    // --- Storage & Indicator ---
    let store = FlashStore::new(Flash::new_blocking(p.FLASH));
    let led = LedIndicator::new(Output::new(p.PIN_25, Level::Low));

    let bridge = Bridge::new(serial, radio, store, led);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(usb_rx_task(receiver, rx_channel).unwrap());
    spawner.spawn(bridge_task(bridge).unwrap());

    info!("nRF24L01+ bridge initialized");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, UsbDriver<'static>>) {
    device.run().await;
}

/// USB receive task - queues host packets for the bridge.
#[embassy_executor::task]
async fn usb_rx_task(
    mut receiver: Receiver<'static, UsbDriver<'static>>,
    rx: &'static SerialRxChannel,
) {
    pump_usb_rx(&mut receiver, rx).await
}

/// Bridge task - relays radio payloads and serial chunks, runs directives.
#[embassy_executor::task]
async fn bridge_task(mut bridge: NrfBridge) {
    bridge.run().await
}
