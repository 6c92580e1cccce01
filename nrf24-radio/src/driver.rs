//! nRF24L01+ driver implementing the bridge [`Radio`] trait.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::{Operation, SpiDevice};
use nrf_bridge_core::{Radio, RadioConfig, RadioError, MAX_PAYLOAD_LEN};

use crate::registers::command::*;
use crate::registers::*;

/// Time from power-on reset until the chip accepts SPI commands.
const POWER_ON_RESET_MS: u32 = 100;

/// Start-up time from power down to standby (datasheet: 1.5 ms).
const POWER_UP_MS: u32 = 2;

/// Minimum CE high pulse to start a transmission (datasheet: 10 us).
const CE_PULSE_US: u32 = 15;

/// Interval between STATUS polls while waiting for a transmission to finish.
const TX_POLL_INTERVAL_US: u32 = 100;

/// STATUS polls before giving up on a transmission (50 ms total).
const TX_POLL_ATTEMPTS: u32 = 500;

/// nRF24L01+ transceiver on an SPI device with a CE pin.
///
/// The chip idles as primary receiver listening on pipe 1 (RX address) and
/// switches to primary transmitter for each outgoing payload. Pipe 0 carries
/// the TX address so auto-acknowledgements are received. Dynamic payload
/// length is enabled, so payloads keep their exact size across the link.
pub struct Nrf24<SPI, CE, D> {
    spi: SPI,
    ce: CE,
    delay: D,
}

impl<SPI, CE, D> Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    /// Create a driver. Call [`init`](Self::init) before use.
    #[must_use]
    pub fn new(spi: SPI, ce: CE, delay: D) -> Self {
        Self { spi, ce, delay }
    }

    /// Power up the chip and apply the static link setup.
    ///
    /// Channel, addresses and data rate are applied separately with
    /// [`Radio::configure`]. Returns [`RadioError::Bus`] if the chip does not
    /// answer on SPI.
    pub async fn init(&mut self) -> Result<(), RadioError> {
        self.ce_low()?;
        self.delay.delay_ms(POWER_ON_RESET_MS).await;

        self.write_register(reg::SETUP_AW, ADDRESS_WIDTH_5).await?;
        let width = self.read_register(reg::SETUP_AW).await?;
        if width != ADDRESS_WIDTH_5 {
            error!("nRF24L01+ not responding (SETUP_AW = {:#x})", width);
            return Err(RadioError::Bus);
        }

        self.write_register(reg::SETUP_RETR, RETRANSMIT_750US_15).await?;
        self.write_register(reg::EN_AA, PIPES_0_1).await?;
        self.write_register(reg::EN_RXADDR, PIPES_0_1).await?;
        self.write_register(reg::FEATURE, EN_DPL).await?;
        self.write_register(reg::DYNPD, PIPES_0_1).await?;

        self.command(FLUSH_RX).await?;
        self.command(FLUSH_TX).await?;
        self.write_register(reg::STATUS, STATUS_IRQ_MASK).await?;

        self.write_register(reg::CONFIG, CONFIG_PRX).await?;
        self.delay.delay_ms(POWER_UP_MS).await;
        self.ce_high()?;

        info!("nRF24L01+ initialized");
        Ok(())
    }

    /// Release the SPI device, CE pin and delay.
    pub fn release(self) -> (SPI, CE, D) {
        (self.spi, self.ce, self.delay)
    }

    /// Read the STATUS register (shifted out with every command).
    async fn status(&mut self) -> Result<u8, RadioError> {
        self.command(NOP).await
    }

    /// Wait for the transmission started by the last CE pulse.
    async fn wait_transmitted(&mut self) -> Result<(), RadioError> {
        for _ in 0..TX_POLL_ATTEMPTS {
            let status = self.status().await?;

            if status & TX_DS != 0 {
                self.write_register(reg::STATUS, TX_DS).await?;
                return Ok(());
            }

            if status & MAX_RT != 0 {
                // The payload stays in the TX FIFO after MAX_RT
                self.write_register(reg::STATUS, MAX_RT).await?;
                self.command(FLUSH_TX).await?;
                return Err(RadioError::NoAck);
            }

            self.delay.delay_us(TX_POLL_INTERVAL_US).await;
        }

        self.command(FLUSH_TX).await?;
        Err(RadioError::Timeout)
    }

    fn ce_high(&mut self) -> Result<(), RadioError> {
        self.ce.set_high().map_err(|_| RadioError::Bus)
    }

    fn ce_low(&mut self) -> Result<(), RadioError> {
        self.ce.set_low().map_err(|_| RadioError::Bus)
    }

    /// Send a single-byte command, returning STATUS.
    async fn command(&mut self, cmd: u8) -> Result<u8, RadioError> {
        let mut frame = [cmd];
        self.spi
            .transfer_in_place(&mut frame)
            .await
            .map_err(|_| RadioError::Bus)?;
        Ok(frame[0])
    }

    async fn read_register(&mut self, reg: u8) -> Result<u8, RadioError> {
        let mut frame = [R_REGISTER | (reg & REGISTER_MASK), NOP];
        self.spi
            .transfer_in_place(&mut frame)
            .await
            .map_err(|_| RadioError::Bus)?;
        Ok(frame[1])
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), RadioError> {
        self.spi
            .write(&[W_REGISTER | (reg & REGISTER_MASK), value])
            .await
            .map_err(|_| RadioError::Bus)
    }

    async fn write_register_bytes(&mut self, reg: u8, data: &[u8]) -> Result<(), RadioError> {
        self.write_command(W_REGISTER | (reg & REGISTER_MASK), data)
            .await
    }

    /// Command followed by data bytes (register or TX payload writes).
    async fn write_command(&mut self, cmd: u8, data: &[u8]) -> Result<(), RadioError> {
        let header = [cmd];
        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(data)])
            .await
            .map_err(|_| RadioError::Bus)
    }

    /// Command followed by reading `buf.len()` bytes.
    async fn read_command(&mut self, cmd: u8, buf: &mut [u8]) -> Result<(), RadioError> {
        let header = [cmd];
        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(buf)])
            .await
            .map_err(|_| RadioError::Bus)
    }
}

impl<SPI, CE, D> Radio for Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    async fn available(&mut self) -> Result<bool, RadioError> {
        let fifo = self.read_register(reg::FIFO_STATUS).await?;
        Ok(fifo & RX_EMPTY == 0)
    }

    async fn read_payload(&mut self, buf: &mut [u8; MAX_PAYLOAD_LEN]) -> Result<usize, RadioError> {
        let mut width = [0u8; 1];
        self.read_command(R_RX_PL_WID, &mut width).await?;
        let len = usize::from(width[0]);

        if len == 0 || len > MAX_PAYLOAD_LEN {
            // Datasheet: a width above 32 means the FIFO content is garbage;
            // with dynamic payloads an empty one is never valid either
            warn!("Discarding RX FIFO, payload width {}", len);
            self.command(FLUSH_RX).await?;
            self.write_register(reg::STATUS, RX_DR).await?;
            return Err(RadioError::Corrupt);
        }

        self.read_command(R_RX_PAYLOAD, &mut buf[..len]).await?;
        self.write_register(reg::STATUS, RX_DR).await?;
        Ok(len)
    }

    async fn write_payload(&mut self, data: &[u8]) -> Result<(), RadioError> {
        let data = &data[..data.len().min(MAX_PAYLOAD_LEN)];

        self.ce_low()?;
        self.write_register(reg::CONFIG, CONFIG_PTX).await?;
        self.command(FLUSH_TX).await?;
        self.write_command(W_TX_PAYLOAD, data).await?;

        self.ce_high()?;
        self.delay.delay_us(CE_PULSE_US).await;
        self.ce_low()?;

        let sent = self.wait_transmitted().await;

        // Back to listening regardless of the outcome
        self.write_register(reg::CONFIG, CONFIG_PRX).await?;
        self.ce_high()?;
        sent
    }

    async fn configure(&mut self, config: &RadioConfig) -> Result<(), RadioError> {
        self.ce_low()?;
        self.write_register(reg::RF_CH, config.channel()).await?;
        self.write_register(reg::RF_SETUP, rf_setup(config.data_rate()))
            .await?;
        self.write_register_bytes(reg::TX_ADDR, config.tx_address())
            .await?;
        self.write_register_bytes(reg::RX_ADDR_P0, config.tx_address())
            .await?;
        self.write_register_bytes(reg::RX_ADDR_P1, config.rx_address())
            .await?;
        self.ce_high()?;

        debug!("nRF24L01+ configured: {:?}", config);
        Ok(())
    }
}
