//! Bounded run loop over a fresh core.

use crate::api::{CoreConfig, CoreState};
use crate::console::Console;
use crate::execute::step_one;
use crate::trace::{CpuSnapshot, RunResult, Tracer};
use crate::{HaltReason, Program, RunState};

/// Runs `program` from `PC = 0` with the default memory size.
///
/// Stops after `max_steps` steps, on `BRK`, when `PC` leaves the program, or
/// on the first runtime fault.
#[must_use]
pub fn run(program: &Program, inputs: &[u16], max_steps: usize) -> RunResult {
    run_with_config(
        program,
        inputs,
        &CoreConfig::default().with_max_steps(max_steps),
    )
}

/// Runs `program` under an explicit configuration.
#[must_use]
pub fn run_with_config(program: &Program, inputs: &[u16], config: &CoreConfig) -> RunResult {
    let mut state = CoreState::with_config(config);
    let mut console = Console::new(inputs);
    let mut tracer = Tracer::new();

    loop {
        if !program.contains(state.arch.pc()) {
            state.run_state = RunState::Halted(HaltReason::ProgramEnd);
            break;
        }
        if tracer.len() >= config.max_steps() {
            break;
        }

        let before = CpuSnapshot::from(&state.arch);
        let outcome = step_one(&mut state, program.as_bytes(), &mut console, &mut tracer);
        tracer.record(before, outcome, &state.arch);

        if state.run_state.is_halted() {
            break;
        }
    }

    RunResult {
        program: program.clone(),
        trace: tracer.into_entries(),
        halted: state.run_state.is_halted(),
        error: state.run_state.fault(),
        outputs: console.into_outputs(),
        final_state: CpuSnapshot::from(&state.arch),
    }
}
