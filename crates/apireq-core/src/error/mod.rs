//! Error conversion helpers shared across the workspace.

mod boundary;
