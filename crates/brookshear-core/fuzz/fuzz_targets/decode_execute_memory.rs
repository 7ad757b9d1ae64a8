#![no_main]

use brookshear_core::{
    decode_program, Decoder, ExecutionFault, MachineConfig, MachineState, MEMORY_BYTES,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let word = u16::from_be_bytes([data[0], data[1]]);
    if let Ok(instruction) = Decoder::decode(word) {
        assert_eq!(instruction.encode(), Ok(word));
    }

    let even = data.len() & !1;
    let _ = decode_program(&data[..even]);

    let image = &data[..data.len().min(MEMORY_BYTES)];
    let Ok(mut state) = MachineState::load(image) else {
        return;
    };
    state.start();
    let before = state.clone();
    match state.step() {
        Ok(_) => {}
        Err(_) => assert_eq!(state, before),
    }

    let config = MachineConfig::with_step_limit(4_096);
    match state.run_with(&config, &mut Vec::new()) {
        Ok(_) => assert!(!state.is_running()),
        Err(ExecutionFault::Halted) => unreachable!("run never reports halted"),
        Err(_) => {}
    }
});
