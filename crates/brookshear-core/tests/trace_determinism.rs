//! Trace hook ordering and replay determinism.

use brookshear_core::{
    FaultClass, Instruction, MachineConfig, MachineState, Register, TraceEvent,
};
use float8 as _;
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;
use tracing_subscriber as _;

fn trace_of(image: &[u8], config: &MachineConfig) -> (Vec<TraceEvent>, MachineState) {
    let mut state = MachineState::load(image).expect("valid image");
    state.start();
    let mut events = Vec::new();
    let _ = state.run_with(config, &mut events);
    (events, state)
}

#[test]
fn events_follow_execution_order() {
    let (events, _) = trace_of(&[0x21, 0x5F, 0xC0, 0x00], &MachineConfig::default());
    assert_eq!(
        events,
        vec![
            TraceEvent::InstructionStart { pc: 0, word: 0x215F },
            TraceEvent::InstructionRetired {
                pc: 0,
                instruction: Instruction::LoadVal {
                    dst: Register::new(1),
                    value: 0x5F,
                },
            },
            TraceEvent::InstructionStart { pc: 2, word: 0xC000 },
            TraceEvent::Halted { pc: 2 },
        ]
    );
}

#[test]
fn arithmetic_fault_is_traced_with_its_class() {
    // LDR r1,$0x7F; FADD r2,r1,r1
    let (events, state) = trace_of(&[0x21, 0x7F, 0x62, 0x11], &MachineConfig::default());
    assert_eq!(
        events.last(),
        Some(&TraceEvent::FaultRaised {
            pc: 2,
            class: FaultClass::Arithmetic,
        })
    );
    assert_eq!(state.pc(), 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn replaying_an_image_reproduces_trace_and_state(
        image in proptest::collection::vec(any::<u8>(), 0..=256),
    ) {
        let config = MachineConfig::with_step_limit(512);
        let first = trace_of(&image, &config);
        let second = trace_of(&image, &config);
        prop_assert_eq!(first, second);
    }
}
