mod state;
pub use state::*;

mod outcome;
pub use outcome::*;

mod permission_gate;
pub use permission_gate::*;

mod renderer;
pub use renderer::*;

mod capture_flow;
pub use capture_flow::*;

#[cfg(test)]
pub(crate) mod test_support;
