/// Off-board simulation: stdin presses and logged lamps
use crate::dispatcher::{ButtonEvent, EventSender};
use oneclick_core::{IndicatorDriver, LampId, Level, OneClickError};
use std::sync::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Lamp bank rendered as a log line, e.g. `[##o..]`
///
/// `#` is a lamp that is on, `o` one that is off but already claimed,
/// and `.` one not yet claimed.
pub struct LogLamps {
    order: Vec<LampId>,
    levels: Mutex<Vec<Option<Level>>>,
}

impl LogLamps {
    pub fn new(lamps: &[LampId]) -> Self {
        Self {
            order: lamps.to_vec(),
            levels: Mutex::new(vec![None; lamps.len()]),
        }
    }

    /// Current bar as text
    pub fn render(&self) -> String {
        let levels = match self.levels.lock() {
            Ok(levels) => levels.clone(),
            Err(_) => return String::from("[?]"),
        };
        render(&levels)
    }

    fn update(&self, lamp: LampId, level: Level) -> oneclick_core::Result<String> {
        let index = self
            .order
            .iter()
            .position(|l| *l == lamp)
            .ok_or_else(|| OneClickError::hardware(lamp, "not part of the lamp bank"))?;
        let mut levels = self
            .levels
            .lock()
            .map_err(|_| OneClickError::hardware(lamp, "lamp state poisoned"))?;
        levels[index] = Some(level);
        Ok(render(&levels))
    }
}

fn render(levels: &[Option<Level>]) -> String {
    let bar: String = levels
        .iter()
        .map(|level| match level {
            Some(Level::Active) => '#',
            Some(Level::Inactive) => 'o',
            None => '.',
        })
        .collect();
    format!("[{}]", bar)
}

impl IndicatorDriver for LogLamps {
    fn configure_output(&self, lamp: LampId) -> oneclick_core::Result<()> {
        self.update(lamp, Level::Inactive)?;
        Ok(())
    }

    fn set_lamp(&self, lamp: LampId, level: Level) -> oneclick_core::Result<()> {
        let bar = self.update(lamp, level)?;
        info!(lamp = %lamp, level = %level, "{}", bar);
        Ok(())
    }
}

/// Turn stdin lines into presses: `1` presses the first configured button,
/// `2` the second, and so on. Returns at end of input or on `q`.
pub async fn read_presses<R>(input: R, lines: &[u8], events: &EventSender) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut presses = 0;
    let mut input = input.lines();

    while let Some(entry) = input.next_line().await? {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if entry.eq_ignore_ascii_case("q") {
            break;
        }

        let line = entry
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| lines.get(index));
        match line {
            Some(&line) => {
                if events.send(ButtonEvent::now(line)).is_err() {
                    break;
                }
                presses += 1;
            }
            None => warn!(input = %entry, buttons = lines.len(), "Expected a button number"),
        }
    }

    Ok(presses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn bar_tracks_lamp_levels() {
        let lamps = [LampId::new(5), LampId::new(6), LampId::new(13)];
        let driver = LogLamps::new(&lamps);
        assert_eq!(driver.render(), "[...]");

        for lamp in lamps {
            driver.configure_output(lamp).unwrap();
        }
        driver.set_lamp(lamps[0], Level::Active).unwrap();
        assert_eq!(driver.render(), "[#oo]");

        assert!(driver.set_lamp(LampId::new(99), Level::Active).is_err());
    }

    #[tokio::test]
    async fn stdin_numbers_map_to_buttons() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"1\n\n3\n7\nabc\n2\nq\n1\n";

        let presses = read_presses(input, &[20, 22, 23], &tx).await.unwrap();

        assert_eq!(presses, 3);
        let lines: Vec<u8> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|event| event.line)
            .collect();
        assert_eq!(lines, vec![20, 23, 22]);
    }
}
