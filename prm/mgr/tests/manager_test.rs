//! Peripheral manager tests for prm-mgr

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;
use prm_mgr::{
    ClockControl, Descriptor, OwnershipState, PeripheralFamily, PeripheralId, PeripheralManager,
    PrmError,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MockId {
    A,
    B,
    C,
}

impl PeripheralId for MockId {
    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(MockId::A),
            1 => Some(MockId::B),
            2 => Some(MockId::C),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MockUse {
    Tick,
    Pwm,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct MockCaps: u8 {
        const DMA = 1 << 0;
        const ENCODER = 1 << 1;
    }
}

struct Mock;

impl PeripheralFamily for Mock {
    const NAME: &'static str = "mock";
    const TRACE_ID: u8 = 9;

    type Id = MockId;
    type UseKind = MockUse;
    type Class = u8;
    type Flags = MockCaps;
    type Handle = usize;
    type Irq = u16;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Op {
    Enable(MockId),
    Reset(MockId),
    Disable(MockId),
}

/// Clock control double recording every call
#[derive(Clone, Default)]
struct Probe(Rc<RefCell<Vec<Op>>>);

impl Probe {
    fn ops(&self) -> Vec<Op> {
        self.0.borrow().clone()
    }
}

impl ClockControl<MockId> for Probe {
    fn enable_clock(&mut self, id: MockId) {
        self.0.borrow_mut().push(Op::Enable(id));
    }

    fn pulse_reset(&mut self, id: MockId) {
        self.0.borrow_mut().push(Op::Reset(id));
    }

    fn disable_clock(&mut self, id: MockId) {
        self.0.borrow_mut().push(Op::Disable(id));
    }
}

fn three() -> [Descriptor<Mock>; 3] {
    [
        Descriptor::new(MockId::A, 16, MockCaps::DMA, 8_000_000, 0x4000_0000, 28),
        Descriptor::new(MockId::B, 16, MockCaps::DMA.union(MockCaps::ENCODER), 8_000_000, 0x4000_0400, 29),
        Descriptor::new(MockId::C, 32, MockCaps::ENCODER, 16_000_000, 0x4000_0800, 30),
    ]
}

fn manager() -> (PeripheralManager<Mock, Probe, 3>, Probe) {
    let probe = Probe::default();
    let mgr = PeripheralManager::new(three(), probe.clone()).unwrap();
    (mgr, probe)
}

#[test]
fn test_new_rejects_misplaced_descriptor() {
    let [a, b, _] = three();
    assert_eq!(
        PeripheralManager::new([b, a], Probe::default()).err(),
        Some(PrmError::InvalidDevice)
    );
}

#[test]
fn test_fresh_table_is_unused() {
    let (mgr, _) = manager();
    assert_eq!(mgr.len(), 3);
    assert!(!mgr.is_empty());
    assert_eq!(mgr.count_active(), 0);
    assert_eq!(mgr.count_inactive(), 3);
    assert_eq!(mgr.state(MockId::B), Ok(OwnershipState::Unused));
}

#[test]
fn test_accessors() {
    let (mgr, _) = manager();
    assert_eq!(mgr.handle(MockId::B), Ok(0x4000_0400));
    assert_eq!(mgr.irq(MockId::C), Ok(30));
    assert_eq!(mgr.clock_hz(MockId::C), Ok(16_000_000));
    assert_eq!(mgr.class(MockId::C), Ok(32));
    assert_eq!(mgr.flags(MockId::B), Ok(MockCaps::DMA | MockCaps::ENCODER));
}

#[test]
fn test_exclusive_ownership() {
    let (mgr, _) = manager();
    assert_eq!(mgr.claim(MockId::A, MockUse::Tick), Ok(()));
    assert_eq!(mgr.state(MockId::A), Ok(OwnershipState::InUse(MockUse::Tick)));

    // Busy regardless of the purpose asked for
    assert_eq!(mgr.claim(MockId::A, MockUse::Tick), Err(PrmError::PeripheralBusy));
    assert_eq!(mgr.claim(MockId::A, MockUse::Pwm), Err(PrmError::PeripheralBusy));
    assert_eq!(
        mgr.register(MockId::A, OwnershipState::Unused),
        Err(PrmError::PeripheralBusy)
    );
    assert_eq!(mgr.state(MockId::A), Ok(OwnershipState::InUse(MockUse::Tick)));
}

#[test]
fn test_register_unused_is_invalid_request() {
    let (mgr, _) = manager();
    assert_eq!(
        mgr.register(MockId::B, OwnershipState::Unused),
        Err(PrmError::InvalidRequest)
    );
    assert_eq!(mgr.state(MockId::B), Ok(OwnershipState::Unused));
    assert_eq!(mgr.count_active(), 0);
}

#[test]
fn test_release_is_idempotent() {
    let (mgr, _) = manager();
    assert_eq!(mgr.deregister(MockId::C), Ok(()));
    assert_eq!(mgr.deregister(MockId::C), Ok(()));
    assert_eq!(mgr.state(MockId::C), Ok(OwnershipState::Unused));
    assert_eq!(mgr.count_inactive(), 3);
}

#[test]
fn test_register_release_round_trip() {
    let (mgr, _) = manager();
    mgr.register(MockId::B, OwnershipState::InUse(MockUse::Pwm)).unwrap();
    mgr.deregister(MockId::B).unwrap();
    assert_eq!(mgr.state(MockId::B), Ok(OwnershipState::Unused));
    assert_eq!(mgr.claim(MockId::B, MockUse::Tick), Ok(()));
}

#[test]
fn test_first_fit_not_best_fit() {
    let [a, _, c] = three();
    let b32 = Descriptor::<Mock>::new(MockId::B, 32, c.flags(), c.clock_hz(), c.handle(), c.irq());
    let mgr = PeripheralManager::new([a, b32], Probe::default()).unwrap();

    assert_eq!(mgr.find_by_class(16), Some(MockId::A));
    assert_eq!(mgr.find_by_class(16), Some(MockId::A));
    mgr.claim(MockId::A, MockUse::Tick).unwrap();
    assert_eq!(mgr.find_by_class(16), Some(MockId::B));
    mgr.claim(MockId::B, MockUse::Tick).unwrap();
    assert_eq!(mgr.find_by_class(16), None);
}

#[test]
fn test_find_by_flag() {
    let (mgr, _) = manager();
    assert_eq!(mgr.find_by_flag(MockCaps::ENCODER), Some(MockId::B));
    assert_eq!(mgr.find_by_flag(MockCaps::DMA | MockCaps::ENCODER), Some(MockId::B));
    assert_eq!(mgr.find_by_flag(MockCaps::empty()), Some(MockId::A));

    mgr.claim(MockId::B, MockUse::Pwm).unwrap();
    assert_eq!(mgr.find_by_flag(MockCaps::ENCODER), Some(MockId::C));
    assert_eq!(mgr.find_by_flag(MockCaps::DMA | MockCaps::ENCODER), None);
}

#[test]
fn test_find_does_not_claim() {
    let (mgr, _) = manager();
    assert_eq!(mgr.find_by_class(32), Some(MockId::C));
    assert_eq!(mgr.count_active(), 0);
}

#[test]
fn test_acquire_claims_the_found_instance() {
    let (mgr, _) = manager();
    assert_eq!(mgr.acquire_by_class(32, MockUse::Pwm), Some(MockId::C));
    assert_eq!(mgr.state(MockId::C), Ok(OwnershipState::InUse(MockUse::Pwm)));
    assert_eq!(mgr.acquire_by_class(32, MockUse::Pwm), None);

    assert_eq!(mgr.acquire_by_flag(MockCaps::DMA, MockUse::Tick), Some(MockId::A));
    assert_eq!(mgr.acquire_by_flag(MockCaps::DMA, MockUse::Tick), Some(MockId::B));
    assert_eq!(mgr.acquire_by_flag(MockCaps::DMA, MockUse::Tick), None);
    assert_eq!(mgr.count_active(), 3);
}

#[test]
fn test_ids_outside_the_part() {
    let [a, b, _] = three();
    let probe = Probe::default();
    let mgr = PeripheralManager::new([a, b], probe.clone()).unwrap();

    assert_eq!(mgr.state(MockId::C), Err(PrmError::InvalidDevice));
    assert_eq!(mgr.handle(MockId::C), Err(PrmError::InvalidDevice));
    assert_eq!(mgr.claim(MockId::C, MockUse::Tick), Err(PrmError::InvalidDevice));
    assert_eq!(mgr.deregister(MockId::C), Err(PrmError::InvalidDevice));

    mgr.enable_clock(MockId::C);
    mgr.disable_clock(MockId::C);
    assert!(probe.ops().is_empty());
    assert_eq!(mgr.count_active(), 0);
}

#[test]
fn test_enable_pulses_reset_every_time() {
    let (mgr, probe) = manager();
    mgr.enable_clock(MockId::B);
    mgr.disable_clock(MockId::B);
    mgr.enable_clock(MockId::B);

    assert_eq!(
        probe.ops(),
        [
            Op::Enable(MockId::B),
            Op::Reset(MockId::B),
            Op::Disable(MockId::B),
            Op::Enable(MockId::B),
            Op::Reset(MockId::B),
        ]
    );
}

#[test]
fn test_clock_none_is_noop() {
    let (mgr, probe) = manager();
    mgr.enable_clock(None::<MockId>);
    mgr.disable_clock(None::<MockId>);
    mgr.enable_clock(Some(MockId::A));
    assert_eq!(probe.ops(), [Op::Enable(MockId::A), Op::Reset(MockId::A)]);
}

#[test]
fn test_clock_does_not_touch_ownership() {
    let (mgr, _) = manager();
    mgr.claim(MockId::A, MockUse::Tick).unwrap();
    mgr.disable_clock(MockId::A);
    assert_eq!(mgr.state(MockId::A), Ok(OwnershipState::InUse(MockUse::Tick)));
    mgr.deregister(MockId::A).unwrap();
    mgr.enable_clock(MockId::A);
    assert_eq!(mgr.state(MockId::A), Ok(OwnershipState::Unused));
}

#[test]
fn test_counts_stay_consistent() {
    let (mgr, _) = manager();
    let steps: [(MockId, bool); 6] = [
        (MockId::A, true),
        (MockId::C, true),
        (MockId::A, true),
        (MockId::B, false),
        (MockId::C, false),
        (MockId::B, true),
    ];
    for (id, claim) in steps {
        if claim {
            let _ = mgr.claim(id, MockUse::Tick);
        } else {
            mgr.deregister(id).unwrap();
        }
        assert_eq!(mgr.count_active() + mgr.count_inactive(), mgr.len());
    }
    assert_eq!(mgr.count_active(), 2);
}

#[test]
fn test_end_to_end_allocation() {
    let (mgr, _) = manager();

    let wide = mgr.find_by_class(32).unwrap();
    assert_eq!(wide, MockId::C);
    mgr.claim(wide, MockUse::Pwm).unwrap();
    assert_eq!(mgr.find_by_class(32), None);

    let first = mgr.find_by_class(16).unwrap();
    assert_eq!(first, MockId::A);
    mgr.claim(first, MockUse::Tick).unwrap();
    assert_eq!(mgr.find_by_class(16), Some(MockId::B));

    assert_eq!(mgr.count_active(), 2);
    assert_eq!(mgr.count_inactive(), 1);
}

#[test]
fn test_inspect_sees_states() {
    let (mgr, _) = manager();
    mgr.claim(MockId::B, MockUse::Pwm).unwrap();

    let used: Vec<MockId> = mgr.inspect(|table| {
        table.iter().filter(|d| !d.is_unused()).map(|d| d.id()).collect()
    });
    assert_eq!(used, [MockId::B]);
}

#[test]
fn test_inspect_closure_may_call_back() {
    let (mgr, _) = manager();
    mgr.claim(MockId::A, MockUse::Tick).unwrap();

    let (free, active) = mgr.inspect(|table| {
        let free = table.iter().filter(|d| d.is_unused()).count();
        (free, mgr.count_active())
    });
    assert_eq!((free, active), (2, 1));

    // Claiming from inside the closure does not touch the snapshot
    let unused_in_snapshot = mgr.inspect(|table| {
        mgr.claim(MockId::C, MockUse::Pwm).unwrap();
        table[MockId::C as usize].is_unused()
    });
    assert!(unused_in_snapshot);
    assert_eq!(mgr.state(MockId::C), Ok(OwnershipState::InUse(MockUse::Pwm)));
}

#[test]
fn test_empty_flag_set_matches_any_free_instance() {
    let (mgr, _) = manager();
    mgr.claim(MockId::A, MockUse::Tick).unwrap();
    assert_eq!(mgr.find_by_flag(MockCaps::empty()), Some(MockId::B));
    assert_eq!(mgr.acquire_by_flag(MockCaps::empty(), MockUse::Pwm), Some(MockId::B));
}
