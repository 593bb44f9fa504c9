// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits defining the core concepts.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, and traits
//
// Keeping this layer pure means it is testable without a
// backend and readable without framework noise.

// A tokenised corpus sentence
pub mod sentence;

// Core abstractions that other layers implement
pub mod traits;
