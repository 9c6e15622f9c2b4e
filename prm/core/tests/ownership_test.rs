//! Ownership state tests for prm-core

use prm_core::{OwnershipState, PrmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Pwm,
    Encoder,
}

#[test]
fn test_default_is_unused() {
    let state: OwnershipState<Purpose> = OwnershipState::default();
    assert!(state.is_unused());
    assert!(!state.is_in_use());
    assert_eq!(state.use_kind(), None);
}

#[test]
fn test_in_use_carries_kind() {
    let state = OwnershipState::InUse(Purpose::Encoder);
    assert!(state.is_in_use());
    assert_eq!(state.use_kind(), Some(Purpose::Encoder));
    assert_ne!(state, OwnershipState::InUse(Purpose::Pwm));
}

#[test]
fn test_from_kind() {
    let state: OwnershipState<Purpose> = Purpose::Pwm.into();
    assert_eq!(state, OwnershipState::InUse(Purpose::Pwm));
}

#[test]
fn test_display() {
    assert_eq!(OwnershipState::<Purpose>::Unused.to_string(), "Unused");
    assert_eq!(OwnershipState::InUse(Purpose::Pwm).to_string(), "InUse(Pwm)");
    assert_eq!(PrmError::PeripheralBusy.to_string(), "Peripheral is busy");
}
