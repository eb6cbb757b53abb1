use super::*;
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Pin(&'static str, bool),
    Spi(Vec<u8>),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct MockPin {
    name: &'static str,
    log: Log,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push(Event::Pin(self.name, true));
        Ok(())
    }
}

struct MockSpi {
    log: Log,
}

impl embedded_hal::spi::ErrorType for MockSpi {
    type Error = Infallible;
}

impl SpiBus<u8> for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        self.log.borrow_mut().push(Event::Spi(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        self.write(&words.to_vec())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

fn chain(chips: usize, polarity: Polarity, mode: BlankMode) -> (TlcChain<MockPin, MockSpi>, Log) {
    let log: Log = Rc::default();
    let pin = |name| MockPin {
        name,
        log: Rc::clone(&log),
    };
    let pins = ControlPins {
        blank: pin("BLANK"),
        vprg: pin("VPRG"),
        xlat: pin("XLAT"),
        dcprg: pin("DCPRG"),
    };
    let spi = MockSpi {
        log: Rc::clone(&log),
    };
    (TlcChain::new(pins, spi, chips, polarity, mode), log)
}

fn pins_only(log: &Log) -> Vec<(&'static str, bool)> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Pin(n, l) => Some((*n, *l)),
            Event::Spi(_) => None,
        })
        .collect()
}

#[test]
fn pwm_write_shifts_then_latches_under_blank() {
    let (mut tlc, log) = chain(1, Polarity::Normal, BlankMode::DuringLatch);
    let mut values = [0u16; 16];
    values[15] = 0xABC;
    tlc.write_pwm(&values).unwrap();

    let events = log.borrow().clone();
    assert_eq!(events.len(), 5);
    // The last output is shifted first.
    match &events[0] {
        Event::Spi(bytes) => {
            assert_eq!(bytes.len(), 24);
            assert_eq!(&bytes[..2], &[0xAB, 0xC0]);
            assert!(bytes[2..].iter().all(|&b| b == 0));
        }
        other => panic!("expected SPI write first, got {other:?}"),
    }
    assert_eq!(
        &events[1..],
        &[
            Event::Pin("BLANK", true),
            Event::Pin("XLAT", true),
            Event::Pin("XLAT", false),
            Event::Pin("BLANK", false),
        ]
    );
    assert_eq!(tlc.state(), WriteState::Idle);
}

#[test]
fn blank_modes_place_blank_differently() {
    let (mut tlc, log) = chain(1, Polarity::Normal, BlankMode::DuringLoad);
    tlc.write_pwm(&[0; 16]).unwrap();
    assert_eq!(log.borrow()[0], Event::Pin("BLANK", true));
    assert!(matches!(log.borrow()[1], Event::Spi(_)));

    let (mut tlc, log) = chain(1, Polarity::Normal, BlankMode::Overlapped);
    tlc.write_pwm(&[0; 16]).unwrap();
    assert_eq!(pins_only(&log), vec![("XLAT", true), ("XLAT", false)]);
}

#[test]
fn inverted_chain_swaps_levels_and_complements_bytes() {
    let (mut tlc, log) = chain(1, Polarity::Inverted, BlankMode::DuringLatch);
    tlc.write_pwm(&[0; 16]).unwrap();
    match &log.borrow()[0] {
        Event::Spi(bytes) => assert!(bytes.iter().all(|&b| b == 0xFF)),
        other => panic!("expected SPI write, got {other:?}"),
    }
    assert_eq!(
        pins_only(&log),
        vec![
            ("BLANK", false),
            ("XLAT", false),
            ("XLAT", true),
            ("BLANK", true)
        ]
    );
}

#[test]
fn wrong_value_count_is_rejected() {
    let (mut tlc, log) = chain(2, Polarity::Normal, BlankMode::DuringLatch);
    assert!(matches!(
        tlc.write_pwm(&[0; 16]),
        Err(TessledError::Hardware(_))
    ));
    assert!(tlc.write_dc(&[0; 33]).is_err());
    assert!(log.borrow().is_empty());
}

#[test]
fn init_sequence() {
    let (mut tlc, log) = chain(5, Polarity::Normal, BlankMode::DuringLatch);
    tlc.init(None).unwrap();
    let events = log.borrow().clone();
    assert_eq!(
        &events[..5],
        &[
            Event::Pin("DCPRG", false),
            Event::Pin("VPRG", true),
            Event::Pin("XLAT", false),
            Event::Pin("BLANK", true),
            Event::Pin("VPRG", false),
        ]
    );
    assert_eq!(events[5], Event::Spi(vec![0xFF; 120]));
    assert_eq!(events.last(), Some(&Event::Spi(vec![0x01])));
    assert_eq!(events.len(), 5 + 5 + 1);
}

#[test]
fn init_with_dot_correction_loads_the_dc_bank() {
    let (mut tlc, log) = chain(1, Polarity::Normal, BlankMode::DuringLatch);
    tlc.init(Some(DC_MAX)).unwrap();
    let events = log.borrow().clone();
    assert_eq!(
        &events[5..8],
        &[
            Event::Pin("DCPRG", true),
            Event::Pin("VPRG", true),
            Event::Spi(vec![0xFF; 12]),
        ]
    );
    assert_eq!(
        &events[8..11],
        &[
            Event::Pin("XLAT", true),
            Event::Pin("XLAT", false),
            Event::Pin("VPRG", false),
        ]
    );
}

#[test]
fn test_io_cycles_raw_levels() {
    let (mut tlc, log) = chain(5, Polarity::Inverted, BlankMode::DuringLatch);
    let mut prompts = Vec::new();
    tlc.test_io(|msg| {
        prompts.push(msg.to_owned());
        Ok(())
    })
    .unwrap();
    assert_eq!(prompts.len(), 8);
    assert_eq!(prompts[0], "VPRG set high");
    assert_eq!(
        pins_only(&log)[..2],
        [("VPRG", true), ("VPRG", false)]
    );
}

#[test]
fn test_io_stops_when_pause_fails() {
    let (mut tlc, log) = chain(5, Polarity::Normal, BlankMode::DuringLatch);
    let err = tlc
        .test_io(|_| Err(TessledError::hardware("aborted")))
        .unwrap_err();
    assert!(matches!(err, TessledError::Hardware(_)));
    assert_eq!(log.borrow().len(), 1);
}

#[derive(Debug)]
struct Fault;

impl embedded_hal::digital::Error for Fault {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl embedded_hal::spi::Error for Fault {
    fn kind(&self) -> embedded_hal::spi::ErrorKind {
        embedded_hal::spi::ErrorKind::Other
    }
}

/// Counts calls and fails exactly the call numbered `fail_at` (0-based).
#[derive(Clone, Default)]
struct Counter {
    calls: Rc<std::cell::Cell<usize>>,
    fail_at: Option<usize>,
}

impl Counter {
    fn hit(&self) -> Result<(), Fault> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if self.fail_at == Some(n) { Err(Fault) } else { Ok(()) }
    }
}

struct FlakyPin(Counter);

impl embedded_hal::digital::ErrorType for FlakyPin {
    type Error = Fault;
}

impl OutputPin for FlakyPin {
    fn set_low(&mut self) -> Result<(), Fault> {
        self.0.hit()
    }

    fn set_high(&mut self) -> Result<(), Fault> {
        self.0.hit()
    }
}

struct FlakySpi(Counter);

impl embedded_hal::spi::ErrorType for FlakySpi {
    type Error = Fault;
}

impl SpiBus<u8> for FlakySpi {
    fn read(&mut self, _: &mut [u8]) -> Result<(), Fault> {
        Ok(())
    }

    fn write(&mut self, _: &[u8]) -> Result<(), Fault> {
        self.0.hit()
    }

    fn transfer(&mut self, _: &mut [u8], write: &[u8]) -> Result<(), Fault> {
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Fault> {
        self.write(&words.to_vec())
    }

    fn flush(&mut self) -> Result<(), Fault> {
        Ok(())
    }
}

fn flaky_chain(pins: Counter, spi: Counter) -> TlcChain<FlakyPin, FlakySpi> {
    let pin = || FlakyPin(pins.clone());
    let pins = ControlPins {
        blank: pin(),
        vprg: pin(),
        xlat: pin(),
        dcprg: pin(),
    };
    TlcChain::new(pins, FlakySpi(spi), 1, Polarity::Normal, BlankMode::DuringLatch)
}

#[test]
fn failed_shift_is_a_hardware_error_and_never_latches() {
    let pins = Counter::default();
    let spi = Counter {
        fail_at: Some(0),
        ..Counter::default()
    };
    let mut tlc = flaky_chain(pins.clone(), spi.clone());
    let err = tlc.write_pwm(&[0; 16]).unwrap_err();
    assert!(matches!(err, TessledError::Hardware(_)), "{err}");
    assert_eq!(spi.calls.get(), 1);
    assert_eq!(pins.calls.get(), 0);
}

#[test]
fn failed_pin_write_aborts_the_write() {
    let pins = Counter {
        fail_at: Some(0),
        ..Counter::default()
    };
    let spi = Counter::default();
    let mut tlc = flaky_chain(pins.clone(), spi.clone());
    let err = tlc.write_pwm(&[0; 16]).unwrap_err();
    assert!(err.to_string().contains("BLANK"), "{err}");
    // BLANK failed, so XLAT was never touched.
    assert_eq!(pins.calls.get(), 1);
    assert_eq!(spi.calls.get(), 1);
    assert!(tlc.init(None).is_ok());
}
