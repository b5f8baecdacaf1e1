use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use lgddc::{commands, Command, Error, LgDdc, Sleep, Timing, I2C_ADDRESS_DDC_CI, I2C_ADDRESS_EDID};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Write { address: u16, data: Vec<u8> },
    Read { address: u16, len: usize },
    Sleep(Duration),
}

type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, Default)]
struct MockBus {
    log: Log,
    address: u16,
    replies: VecDeque<Vec<u8>>,
    fail_write: bool,
    fail_read: bool,
    fail_address: bool,
}

impl MockBus {
    fn new(log: &Log) -> Self {
        MockBus {
            log: log.clone(),
            ..Default::default()
        }
    }
}

impl i2c::Master for MockBus {
    type Error = io::Error;
}

impl i2c::Address for MockBus {
    fn set_slave_address(&mut self, addr: u16, tenbit: bool) -> Result<(), io::Error> {
        assert!(!tenbit);
        if self.fail_address {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no device"))
        }
        self.address = addr;
        Ok(())
    }
}

impl i2c::ReadWrite for MockBus {
    fn i2c_read(&mut self, value: &mut [u8]) -> Result<usize, io::Error> {
        self.log.borrow_mut().push(Event::Read { address: self.address, len: value.len() });
        if self.fail_read {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out"))
        }

        match self.replies.pop_front() {
            Some(reply) => {
                let len = reply.len().min(value.len());
                value[..len].copy_from_slice(&reply[..len]);
            },
            None => for (i, v) in value.iter_mut().enumerate() {
                *v = i as u8;
            },
        }

        Ok(value.len())
    }

    fn i2c_write(&mut self, value: &[u8]) -> Result<(), io::Error> {
        self.log.borrow_mut().push(Event::Write { address: self.address, data: value.to_vec() });
        if self.fail_write {
            return Err(io::Error::new(io::ErrorKind::Other, "address NAK"))
        }
        Ok(())
    }
}

struct RecordingSleep {
    log: Log,
}

impl Sleep for RecordingSleep {
    fn sleep(&mut self, duration: Duration) {
        self.log.borrow_mut().push(Event::Sleep(duration));
    }
}

fn setup() -> (Log, LgDdc<MockBus, RecordingSleep>) {
    let log = Log::default();
    let ddc = LgDdc::with_sleeper(MockBus::new(&log), RecordingSleep { log: log.clone() });
    (log, ddc)
}

fn events(log: &Log) -> Vec<Event> {
    log.borrow().clone()
}

fn read_lengths(log: &Log) -> Vec<usize> {
    log.borrow().iter().filter_map(|e| match *e {
        Event::Read { len, .. } => Some(len),
        _ => None,
    }).collect()
}

#[test]
fn system_reset_transaction() {
    let (log, mut ddc) = setup();
    let reply = ddc.system_reset().unwrap();

    assert_eq!(reply.len(), 0x10);
    assert_eq!(events(&log), vec![
        Event::Write { address: 0x37, data: vec![0x50, 0x84, 0x03, 0xf5, 0x00, 0x00, 0x4c] },
        Event::Sleep(Duration::from_millis(500)),
        Event::Read { address: 0x37, len: 0x10 },
    ]);
}

#[test]
fn catalog_read_lengths() {
    let (log, mut ddc) = setup();
    ddc.input_select(0x01).unwrap();
    assert_eq!(read_lengths(&log), vec![0x26]);

    let (log, mut ddc) = setup();
    ddc.system_reset().unwrap();
    assert_eq!(read_lengths(&log), vec![0x10]);

    let (log, mut ddc) = setup();
    ddc.get_model_str().unwrap();
    assert_eq!(read_lengths(&log), vec![0x26]);

    let (log, mut ddc) = setup();
    ddc.read_eeprom(0xa0, 0x80).unwrap();
    assert_eq!(read_lengths(&log), vec![0x80]);
}

#[test]
fn write_only_skips_read_and_delay() {
    let (log, mut ddc) = setup();
    ddc.select_language(4).unwrap();

    assert_eq!(events(&log), vec![
        Event::Write { address: 0x37, data: commands::SelectLanguage::new(4).frame().to_vec() },
    ]);
}

#[test]
fn reply_is_returned_unvalidated() {
    let (_log, mut ddc) = setup();
    let mut model = b"\x6e\xa4\xca34WK95U-W".to_vec();
    model.resize(0x26, 0xff);
    ddc.inner_mut().replies.push_back(model.clone());

    let reply = ddc.get_model_str().unwrap();
    assert_eq!(reply.as_bytes(), &model[..]);
    assert!(reply.payload().is_err());
}

#[test]
fn eeprom_dump_pages() {
    let (log, mut ddc) = setup();
    for page in commands::eeprom_pages() {
        let data = ddc.execute(page).unwrap();
        assert_eq!(data.len(), 0x80);
    }

    let writes: Vec<(u8, u8)> = log.borrow().iter().filter_map(|e| match *e {
        Event::Write { ref data, .. } => Some((data[4], data[5])),
        _ => None,
    }).collect();
    assert_eq!(writes.len(), 16);
    assert_eq!(writes[0], (0xa0, 0x00));
    assert_eq!(writes[1], (0xa0, 0x80));
    assert_eq!(writes[15], (0xae, 0x80));
}

#[test]
fn edid_transaction() {
    let (log, mut ddc) = setup();
    let edid = ddc.read_edid().unwrap();

    assert_eq!(edid.len(), 130);
    assert_eq!(events(&log), vec![
        Event::Write { address: I2C_ADDRESS_EDID, data: vec![0x00] },
        Event::Sleep(Duration::from_millis(150)),
        Event::Read { address: I2C_ADDRESS_EDID, len: 130 },
    ]);
}

#[test]
fn write_failure_prevents_read() {
    let (log, mut ddc) = setup();
    ddc.inner_mut().fail_write = true;

    match ddc.get_model_str() {
        Err(Error::BusWriteFailed(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
        r => panic!("unexpected result {:?}", r),
    }
    assert_eq!(events(&log).len(), 1);
    assert!(read_lengths(&log).is_empty());
}

#[test]
fn edid_write_failure_prevents_read() {
    let (log, mut ddc) = setup();
    ddc.inner_mut().fail_write = true;

    assert!(matches!(ddc.read_edid(), Err(Error::BusWriteFailed(..))));
    assert!(read_lengths(&log).is_empty());
}

#[test]
fn address_failure_is_a_write_failure() {
    let (log, mut ddc) = setup();
    ddc.inner_mut().fail_address = true;

    let err = ddc.system_reset().unwrap_err();
    assert_eq!(err.bus_error().map(|e| e.kind()), Some(io::ErrorKind::NotFound));
    assert!(matches!(err, Error::BusWriteFailed(..)));
    assert!(events(&log).is_empty());
}

#[test]
fn read_failure_propagates() {
    let (log, mut ddc) = setup();
    ddc.inner_mut().fail_read = true;

    let err = ddc.read_eeprom(0xa2, 0x00).unwrap_err();
    assert!(matches!(err, Error::BusReadFailed(..)));
    assert_eq!(read_lengths(&log), vec![0x80]);

    let io: io::Error = err.into();
    assert_eq!(io.kind(), io::ErrorKind::Other);
}

#[test]
fn settle_precedes_read() {
    let (log, mut ddc) = setup();
    ddc.input_select(0x02).unwrap();
    ddc.read_edid().unwrap();

    let events = events(&log);
    for (i, event) in events.iter().enumerate() {
        if let Event::Read { .. } = *event {
            assert!(i >= 2);
            assert!(matches!(events[i - 1], Event::Sleep(..)));
            assert!(matches!(events[i - 2], Event::Write { .. }));
        }
    }
}

#[test]
fn custom_timing() {
    let (log, ddc) = setup();
    let mut ddc = ddc.with_timing(Timing {
        command_settle: Duration::from_millis(20),
        edid_settle: Duration::from_millis(5),
    });
    ddc.get_model_str().unwrap();
    ddc.read_edid().unwrap();

    let sleeps: Vec<Duration> = log.borrow().iter().filter_map(|e| match *e {
        Event::Sleep(d) => Some(d),
        _ => None,
    }).collect();
    assert_eq!(sleeps, vec![Duration::from_millis(20), Duration::from_millis(5)]);
}

#[test]
fn raw_transact() {
    let (log, mut ddc) = setup();
    let frame = commands::GetModelString.frame();

    let reply = ddc.transact(I2C_ADDRESS_DDC_CI, &frame, 0).unwrap();
    assert!(reply.is_empty());

    let reply = ddc.transact(I2C_ADDRESS_DDC_CI, &frame, 3).unwrap();
    assert_eq!(reply, vec![0, 1, 2]);
    assert_eq!(read_lengths(&log), vec![3]);
}

#[test]
fn parameters_validated_before_bus() {
    let (log, _ddc) = setup();
    let err: Error<io::Error> = commands::SelectLanguage::from_index(256).unwrap_err().into();

    assert!(matches!(err, Error::InvalidParameter(..)));
    assert!(err.bus_error().is_none());
    assert!(events(&log).is_empty());
}
