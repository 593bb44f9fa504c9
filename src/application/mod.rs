// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one specific goal (training, scoring, or sampling).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - No direct file formats (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The perplexity-scoring workflow
pub mod evaluate_use_case;

// The sentence-generation workflow
pub mod sample_use_case;
