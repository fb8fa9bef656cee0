// Application layer: command flows built on the controller.

pub mod session;
