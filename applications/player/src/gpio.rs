/// Raspberry Pi GPIO: lamp outputs and button inputs
use crate::dispatcher::{ButtonEvent, EventSender};
use crate::error::{AppError, Result};
use oneclick_core::{IndicatorDriver, LampId, Level, OneClickError};
use rppal::gpio::{Gpio, InputPin, OutputPin, Trigger};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Lamp bank on GPIO output pins; active drives the pin high
pub struct GpioLamps {
    gpio: Gpio,
    pins: Mutex<HashMap<LampId, OutputPin>>,
}

impl GpioLamps {
    pub fn new(gpio: Gpio) -> Self {
        Self {
            gpio,
            pins: Mutex::new(HashMap::new()),
        }
    }
}

impl IndicatorDriver for GpioLamps {
    fn configure_output(&self, lamp: LampId) -> oneclick_core::Result<()> {
        let pin = self
            .gpio
            .get(lamp.pin())
            .map_err(|e| OneClickError::hardware(lamp, e.to_string()))?
            .into_output_low();

        self.pins
            .lock()
            .map_err(|_| OneClickError::hardware(lamp, "pin table poisoned"))?
            .insert(lamp, pin);
        info!(lamp = %lamp, "Lamp claimed");
        Ok(())
    }

    fn set_lamp(&self, lamp: LampId, level: Level) -> oneclick_core::Result<()> {
        let mut pins = self
            .pins
            .lock()
            .map_err(|_| OneClickError::hardware(lamp, "pin table poisoned"))?;
        let pin = pins
            .get_mut(&lamp)
            .ok_or_else(|| OneClickError::hardware(lamp, "not configured as output"))?;

        match level {
            Level::Active => pin.set_high(),
            Level::Inactive => pin.set_low(),
        }
        Ok(())
    }
}

/// Registered button inputs; interrupts stay armed while this is alive
pub struct Buttons {
    _pins: Vec<InputPin>,
}

/// Arm a rising-edge interrupt with pull-down on every line
///
/// Callbacks run on rppal's interrupt thread and only enqueue events.
/// Debouncing happens in the dispatcher.
pub fn register_buttons(gpio: &Gpio, lines: &[u8], events: &EventSender) -> Result<Buttons> {
    let mut pins = Vec::with_capacity(lines.len());

    for &line in lines {
        let mut pin = gpio
            .get(line)
            .map_err(|e| AppError::Hardware(format!("GPIO{}: {}", line, e)))?
            .into_input_pulldown();

        let events = events.clone();
        pin.set_async_interrupt(Trigger::RisingEdge, None, move |_| {
            // Fails only once the dispatcher is gone
            if events.send(ButtonEvent::now(line)).is_err() {
                debug!(line, "Dropping edge after shutdown");
            }
        })
        .map_err(|e| AppError::Hardware(format!("GPIO{} interrupt: {}", line, e)))?;

        info!(line, "Button armed");
        pins.push(pin);
    }

    Ok(Buttons { _pins: pins })
}

/// Open the GPIO peripheral
pub fn open() -> Result<Gpio> {
    Gpio::new().map_err(|e| AppError::Hardware(e.to_string()))
}
