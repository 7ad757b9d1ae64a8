//! Deterministic trace fingerprint for cross-host comparison.
//!
//! Runs the counting-loop program and hashes its trace events and final
//! machine state. Set `RUST_LOG=brookshear_core=trace` to see each step.

use brookshear_core::{decode_program, MachineConfig, MachineState, TraceEvent, TraceSink};
use float8 as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing::info;
use tracing_subscriber::EnvFilter;

// r0=0 r1=3 r2=1; loop: CBE r1,end; ADD r0,r0,r2; CBE r0,loop; end: HLT
const PROGRAM: [u8; 14] = [
    0x20, 0x00, 0x21, 0x03, 0x22, 0x01, 0xB1, 0x0C, 0x50, 0x02, 0xB0, 0x06, 0xC0, 0x00,
];

struct Fingerprint(u64);

impl Fingerprint {
    const fn new() -> Self {
        Self(0xcbf2_9ce4_8422_2325)
    }

    fn hash_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(0x1000_0000_01B3);
        }
    }
}

impl TraceSink for Fingerprint {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionStart { pc, word } => {
                self.hash_bytes(&[0x10, pc]);
                self.hash_bytes(&word.to_be_bytes());
            }
            TraceEvent::InstructionRetired { pc, instruction } => {
                self.hash_bytes(&[0x11, pc, instruction.opcode().to_u4()]);
            }
            TraceEvent::Halted { pc } => self.hash_bytes(&[0x12, pc]),
            TraceEvent::FaultRaised { pc, class } => {
                self.hash_bytes(&[0x13, pc]);
                self.hash_bytes(format!("{class:?}").as_bytes());
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match decode_program(&PROGRAM) {
        Ok(listing) => {
            for (index, instruction) in listing.iter().enumerate() {
                info!("{:02X}  {instruction}", index * 2);
            }
        }
        Err(fault) => {
            eprintln!("listing failed: {fault}");
            std::process::exit(1);
        }
    }

    let mut state = match MachineState::load(&PROGRAM) {
        Ok(state) => state,
        Err(fault) => {
            eprintln!("load failed: {fault}");
            std::process::exit(1);
        }
    };

    let mut fingerprint = Fingerprint::new();
    let config = MachineConfig::with_step_limit(1_000);
    match state.run_with(&config, &mut fingerprint) {
        Ok(outcome) => info!(steps = outcome.steps, "halted"),
        Err(fault) => eprintln!("run aborted: {fault}"),
    }

    fingerprint.hash_bytes(&[state.pc()]);
    fingerprint.hash_bytes(state.registers().gpr());
    fingerprint.hash_bytes(state.memory());
    println!("{:016x}", fingerprint.0);
}
