mod machine;
mod observed;
mod phase;

pub use machine::{BoardMachine, HandMachine, PhaseMachine, PhaseObserver};
pub use observed::ObservedCards;
pub use phase::{BoardPhase, HandPhase};
