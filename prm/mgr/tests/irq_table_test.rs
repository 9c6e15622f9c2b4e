//! Interrupt dispatch table tests for prm-mgr

use core::sync::atomic::{AtomicUsize, Ordering};
use prm_mgr::{IrqCallback, IrqHandler, IrqTable, PrmError};

struct Driver {
    hits: AtomicUsize,
}

impl IrqHandler for Driver {
    fn handle(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

static UART_DRIVER: Driver = Driver { hits: AtomicUsize::new(0) };
static TICKS: AtomicUsize = AtomicUsize::new(0);

fn on_tick() {
    TICKS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn test_attach_and_dispatch() {
    let table = IrqTable::<8>::new();
    assert!(!table.is_attached(3u16));

    table.attach(3u16, IrqCallback::Function(on_tick)).unwrap();
    assert!(table.is_attached(3u16));

    assert!(table.dispatch(3u16));
    assert!(table.dispatch(3u16));
    assert_eq!(TICKS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_second_attach_is_busy() {
    let table = IrqTable::<8>::new();
    table.attach(5u16, IrqCallback::Handler(&UART_DRIVER)).unwrap();
    assert_eq!(
        table.attach(5u16, IrqCallback::Function(on_tick)),
        Err(PrmError::PeripheralBusy)
    );

    assert!(table.dispatch(5u16));
    assert_eq!(UART_DRIVER.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_detach_frees_the_line() {
    let table = IrqTable::<8>::new();
    table.attach(1u16, IrqCallback::Function(on_tick)).unwrap();

    assert_eq!(table.detach(1u16), Ok(()));
    assert_eq!(table.detach(1u16), Ok(()));
    assert!(!table.is_attached(1u16));
    assert!(!table.dispatch(1u16));

    assert_eq!(table.attach(1u16, IrqCallback::Function(on_tick)), Ok(()));
}

#[test]
fn test_lines_outside_the_table() {
    let table = IrqTable::<8>::default();
    assert_eq!(
        table.attach(8u16, IrqCallback::Function(on_tick)),
        Err(PrmError::InvalidDevice)
    );
    assert_eq!(table.detach(200u16), Err(PrmError::InvalidDevice));
    assert!(!table.is_attached(8u16));
    assert!(!table.dispatch(8u16));
}

static NESTED: IrqTable<4> = IrqTable::new();
static NESTED_HITS: AtomicUsize = AtomicUsize::new(0);

fn detach_self() {
    NESTED_HITS.fetch_add(1, Ordering::SeqCst);
    NESTED.detach(2u16).unwrap();
}

#[test]
fn test_callback_may_reenter_the_table() {
    NESTED.attach(2u16, IrqCallback::Function(detach_self)).unwrap();
    assert!(NESTED.dispatch(2u16));
    assert!(!NESTED.is_attached(2u16));
    assert!(!NESTED.dispatch(2u16));
    assert_eq!(NESTED_HITS.load(Ordering::SeqCst), 1);
}
