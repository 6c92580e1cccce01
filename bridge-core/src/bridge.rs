//! Bridge: relays payloads between the serial port and the radio and serves
//! the in-band command protocol.

use embassy_futures::yield_now;

use crate::command::{is_directive, parse, Directive, COMMAND_MARKER};
use crate::config::RadioConfig;
use crate::indicator::Indicator;
use crate::radio::{Radio, RadioError, MAX_PAYLOAD_LEN};
use crate::serial::{SerialError, SerialPort};
use crate::storage::{ConfigStore, StorageError};

/// What the serial branch did during one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialEvent {
    /// Bytes forwarded to the radio as one payload.
    Payload(usize),
    /// A directive was applied and answered with a report.
    Directive(Directive),
}

/// Work done by one loop iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Activity {
    /// Length of the radio payload relayed to the serial port, if any.
    pub relayed: Option<usize>,
    /// Serial input handled, if any.
    pub serial: Option<SerialEvent>,
}

impl Activity {
    /// Whether the iteration found no work.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.relayed.is_none() && self.serial.is_none()
    }
}

/// Bridge between a host serial port and a radio transceiver.
///
/// Owns the current [`RadioConfig`] and the transfer buffer. Each call to
/// [`poll_once`](Self::poll_once) runs both directions once without waiting
/// for input; [`run`](Self::run) repeats that forever.
///
/// # Error Handling
///
/// Collaborator failures never stop the bridge. The per-branch methods return
/// them for inspection, while `poll_once` logs and absorbs them.
pub struct Bridge<S, R, C, L> {
    serial: S,
    radio: R,
    store: C,
    indicator: L,
    config: RadioConfig,
    marker: u8,
    buffer: [u8; MAX_PAYLOAD_LEN],
}

impl<S: SerialPort, R: Radio, C: ConfigStore, L: Indicator> Bridge<S, R, C, L> {
    /// Create a bridge, loading the configuration from `store`.
    ///
    /// Falls back to [`RadioConfig::default`] when nothing valid is stored.
    /// The radio is not touched until [`start`](Self::start).
    pub fn new(serial: S, radio: R, mut store: C, indicator: L) -> Self {
        let config = match store.load() {
            Some(config) => {
                info!("Loaded stored configuration: {:?}", config);
                config
            }
            None => {
                info!("No stored configuration, using defaults");
                RadioConfig::default()
            }
        };

        Self {
            serial,
            radio,
            store,
            indicator,
            config,
            marker: COMMAND_MARKER,
            buffer: [0; MAX_PAYLOAD_LEN],
        }
    }

    /// Use a different command marker than [`COMMAND_MARKER`].
    #[must_use]
    pub fn with_marker(mut self, marker: u8) -> Self {
        self.marker = marker;
        self
    }

    /// Push the current configuration to the radio.
    pub async fn start(&mut self) -> Result<(), BridgeError> {
        self.radio.configure(&self.config).await?;
        Ok(())
    }

    /// Run the bridge forever.
    ///
    /// Yields to the executor between iterations so other tasks (USB stack,
    /// receive pump) keep running.
    pub async fn run(&mut self) -> ! {
        if let Err(e) = self.start().await {
            error!("Initial radio configuration failed: {:?}", e);
        }

        loop {
            self.poll_once().await;
            yield_now().await;
        }
    }

    /// Run one iteration: indicator idle, radio to serial, then serial input.
    pub async fn poll_once(&mut self) -> Activity {
        self.indicator.set_idle();

        let mut activity = Activity::default();

        match self.relay_from_radio().await {
            Ok(relayed) => activity.relayed = relayed,
            Err(e) => warn!("Radio to serial relay failed: {:?}", e),
        }

        match self.service_serial().await {
            Ok(event) => activity.serial = event,
            Err(e) => warn!("Serial input handling failed: {:?}", e),
        }

        activity
    }

    /// Relay one waiting radio payload to the serial port and flush it.
    ///
    /// Returns the payload length, or `None` if nothing was waiting.
    pub async fn relay_from_radio(&mut self) -> Result<Option<usize>, BridgeError> {
        if !self.radio.available().await? {
            return Ok(None);
        }

        self.indicator.set_active();
        let len = self.radio.read_payload(&mut self.buffer).await?;
        let len = len.min(MAX_PAYLOAD_LEN);
        trace!("Radio -> serial: {} bytes", len);

        self.serial.write(&self.buffer[..len]).await?;
        self.serial.flush().await?;
        Ok(Some(len))
    }

    /// Handle buffered serial input, if any.
    ///
    /// Reads at most [`MAX_PAYLOAD_LEN`] bytes; anything beyond stays queued
    /// for the next iteration. A chunk starting with the command marker is
    /// executed as a directive, anything else is sent as one radio payload.
    pub async fn service_serial(&mut self) -> Result<Option<SerialEvent>, BridgeError> {
        if self.serial.available() == 0 {
            return Ok(None);
        }

        let len = self.serial.read(&mut self.buffer);
        if len == 0 {
            return Ok(None);
        }
        let chunk = &self.buffer[..len];

        if is_directive(chunk, self.marker) {
            let directive = parse(chunk);
            self.execute(directive).await?;
            return Ok(Some(SerialEvent::Directive(directive)));
        }

        self.indicator.set_active();
        trace!("Serial -> radio: {} bytes", len);
        self.radio.write_payload(chunk).await?;
        Ok(Some(SerialEvent::Payload(len)))
    }

    /// Apply a directive, reconfigure the radio, persist, and report.
    ///
    /// The report is always sent, even if reconfiguring or persisting fails;
    /// the first such failure is returned afterwards.
    pub async fn execute(&mut self, directive: Directive) -> Result<(), BridgeError> {
        if directive.is_query() {
            debug!("Configuration report requested");
        } else {
            directive.apply(&mut self.config);
            info!("Directive {:?} -> {:?}", directive, self.config);
        }

        let configured = self
            .radio
            .configure(&self.config)
            .await
            .map_err(BridgeError::from);
        let saved = self.store.save(&self.config).map_err(BridgeError::from);

        let report = self.config.report();
        self.serial.write(report.as_bytes()).await?;
        self.serial.flush().await?;

        configured.and(saved)
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Command marker in use.
    #[inline]
    pub fn marker(&self) -> u8 {
        self.marker
    }

    /// Get a reference to the serial port.
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// Get a mutable reference to the serial port.
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Get a reference to the radio.
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Get a mutable reference to the radio.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Get a reference to the indicator.
    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    /// Decompose the bridge into its collaborators.
    pub fn into_parts(self) -> (S, R, C, L) {
        (self.serial, self.radio, self.store, self.indicator)
    }
}

/// Error type for bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Error from the serial port.
    Serial(SerialError),
    /// Error from the radio.
    Radio(RadioError),
    /// Error from the configuration store.
    Storage(StorageError),
}

impl From<SerialError> for BridgeError {
    fn from(err: SerialError) -> Self {
        BridgeError::Serial(err)
    }
}

impl From<RadioError> for BridgeError {
    fn from(err: RadioError) -> Self {
        BridgeError::Radio(err)
    }
}

impl From<StorageError> for BridgeError {
    fn from(err: StorageError) -> Self {
        BridgeError::Storage(err)
    }
}
