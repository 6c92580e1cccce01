//! USB CDC-ACM serial port for the bridge.
//!
//! The CDC class is split in two halves. The receive half runs in its own
//! task ([`pump_usb_rx`]) and queues every OUT packet whole on a
//! [`SerialRxChannel`]; the bridge drains it one packet at a time through
//! [`UsbSerialPort`], which also owns the transmit half. USB flow control
//! applies naturally: when the channel is full, the receive task stops
//! reading packets and the host backs off.

use defmt::{debug, info, warn};
use embassy_rp::peripherals::USB;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{with_timeout, Duration};
use embassy_usb::class::cdc_acm::{CdcAcmClass, Receiver, Sender, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;
use heapless::Vec;
use nrf_bridge_core::{PacketReader, SerialError, SerialPort};

use crate::config::{SERIAL_RX_PACKETS, SERIAL_WRITE_TIMEOUT_MS, USB_PACKET_SIZE};

/// USB driver used by the firmware.
pub type UsbDriver<'d> = embassy_rp::usb::Driver<'d, USB>;

/// One OUT packet as received from the host.
pub type UsbPacket = Vec<u8, USB_PACKET_SIZE>;

/// Host packets waiting for the bridge.
pub type SerialRxChannel = Channel<CriticalSectionRawMutex, UsbPacket, SERIAL_RX_PACKETS>;

/// Configure the CDC-ACM class in the USB builder.
pub fn configure_usb_serial<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
) -> CdcAcmClass<'d, UsbDriver<'d>> {
    CdcAcmClass::new(builder, state, USB_PACKET_SIZE as u16)
}

/// Queue host packets from the CDC OUT endpoint for the bridge.
///
/// Never returns; waits for a new connection whenever the host goes away.
pub async fn pump_usb_rx<'d>(receiver: &mut Receiver<'d, UsbDriver<'d>>, rx: &SerialRxChannel) -> ! {
    let mut buf = [0u8; USB_PACKET_SIZE];
    loop {
        receiver.wait_connection().await;
        info!("USB serial connected");

        loop {
            match receiver.read_packet(&mut buf).await {
                Ok(0) => {}
                Ok(n) => {
                    // Cannot fail: n is at most the packet size
                    if let Ok(packet) = UsbPacket::from_slice(&buf[..n]) {
                        rx.send(packet).await;
                    }
                }
                Err(EndpointError::BufferOverflow) => warn!("USB packet overflow"),
                Err(EndpointError::Disabled) => break,
            }
        }

        info!("USB serial disconnected");
    }
}

/// Serial port seen by the bridge.
///
/// Writes are gathered into full-size packets; [`flush`](SerialPort::flush)
/// sends the partial remainder, or a zero-length packet when the last packet
/// sent was full, so the host sees the end of the transfer.
pub struct UsbSerialPort<'d> {
    sender: Sender<'d, UsbDriver<'d>>,
    rx: &'d SerialRxChannel,
    reader: PacketReader<USB_PACKET_SIZE>,
    tx: Vec<u8, USB_PACKET_SIZE>,
    pending_zlp: bool,
}

impl<'d> UsbSerialPort<'d> {
    pub fn new(sender: Sender<'d, UsbDriver<'d>>, rx: &'d SerialRxChannel) -> Self {
        Self {
            sender,
            rx,
            reader: PacketReader::new(),
            tx: Vec::new(),
            pending_zlp: false,
        }
    }

    /// Whether a host has the port open (DTR asserted).
    pub fn is_open(&self) -> bool {
        self.sender.dtr()
    }

    /// Take the next host packet once the current one is drained.
    fn refill(&mut self) {
        if self.reader.is_empty() {
            if let Ok(packet) = self.rx.try_receive() {
                self.reader.load(packet);
            }
        }
    }

    async fn send_packet(&mut self) -> Result<(), SerialError> {
        if !self.is_open() {
            // Nobody reads the IN endpoint; drop instead of stalling the bridge.
            self.tx.clear();
            self.pending_zlp = false;
            return Err(SerialError::Disconnected);
        }

        let timeout = Duration::from_millis(SERIAL_WRITE_TIMEOUT_MS);
        let result = with_timeout(timeout, self.sender.write_packet(&self.tx)).await;
        self.pending_zlp = self.tx.len() == USB_PACKET_SIZE;
        self.tx.clear();

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(EndpointError::Disabled)) => Err(SerialError::Disconnected),
            Ok(Err(EndpointError::BufferOverflow)) => Err(SerialError::Io),
            Err(_) => {
                debug!("USB write timed out");
                self.pending_zlp = false;
                Err(SerialError::Io)
            }
        }
    }
}

impl SerialPort for UsbSerialPort<'_> {
    fn available(&mut self) -> usize {
        self.refill();
        self.reader.remaining()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.refill();
        self.reader.read(buf)
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), SerialError> {
        let mut rest = data;
        while !rest.is_empty() {
            let room = USB_PACKET_SIZE - self.tx.len();
            let (chunk, tail) = rest.split_at(room.min(rest.len()));
            // Cannot fail: the chunk fits in the remaining room.
            let _ = self.tx.extend_from_slice(chunk);
            rest = tail;

            if self.tx.is_full() {
                self.send_packet().await?;
            }
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SerialError> {
        if !self.tx.is_empty() || self.pending_zlp {
            // An empty buffer here sends the zero-length packet.
            self.send_packet().await?;
        }
        Ok(())
    }
}
